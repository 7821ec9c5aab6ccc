//! Action lists sent to the vendor `run_action_list` endpoint.

use serde::{Deserialize, Serialize};

use crate::convert::{self, PACKED_COLOR_PREFIX};
use crate::types::{Brightness, ColorTemperature, Hsb, PowerMode};

/// Vendor property codes for lights.
pub mod pid {
    pub const POWER: &str = "P3";
    pub const BRIGHTNESS: &str = "P1501";
    pub const COLOR_TEMPERATURE: &str = "P1502";
    pub const COLOR: &str = "P1507";
}

/// Action key for property writes on mesh lights.
pub const MESH_PROPERTY_ACTION_KEY: &str = "set_mesh_property";

/// A single property write inside an action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub pid: String,
    pub pvalue: String,
}

impl Action {
    pub fn new(pid: &str, pvalue: impl Into<String>) -> Self {
        Action {
            pid: pid.to_string(),
            pvalue: pvalue.into(),
        }
    }
}

/// An ordered list of property writes applied by the vendor in one call.
///
/// # Examples
///
/// ```
/// use wyze_lights_rs::{ActionList, Brightness, PowerMode};
///
/// let mut actions = ActionList::new();
/// actions.power(PowerMode::On);
/// actions.brightness(&Brightness::create(80).unwrap());
/// assert_eq!(actions.len(), 2);
/// assert_eq!(actions.actions()[1].pvalue, "80");
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn power(&mut self, power: PowerMode) {
        self.push(Action::new(pid::POWER, power.pvalue()));
    }

    pub fn brightness(&mut self, brightness: &Brightness) {
        self.push(Action::new(pid::BRIGHTNESS, brightness.value().to_string()));
    }

    /// Switch to white mode at the given temperature.
    ///
    /// The vendor only leaves color mode once the color property is cleared,
    /// so this emits the reset before the temperature itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::{ActionList, ColorTemperature};
    ///
    /// let mut actions = ActionList::new();
    /// actions.color_temperature(&ColorTemperature::create(500).unwrap());
    ///
    /// let pids: Vec<_> = actions.actions().iter().map(|a| a.pid.as_str()).collect();
    /// assert_eq!(pids, ["P1507", "P1502"]);
    /// assert_eq!(actions.actions()[0].pvalue, "000000");
    /// assert_eq!(actions.actions()[1].pvalue, "1800");
    /// ```
    pub fn color_temperature(&mut self, temperature: &ColorTemperature) {
        self.color_reset();
        self.push(Action::new(
            pid::COLOR_TEMPERATURE,
            temperature.to_kelvin().kelvin().to_string(),
        ));
    }

    pub fn color(&mut self, color: &Hsb) {
        self.push(Action::new(pid::COLOR, convert::hsb_to_packed_color(color)));
    }

    pub fn color_reset(&mut self) {
        self.push(Action::new(pid::COLOR, PACKED_COLOR_PREFIX));
    }
}

impl From<PowerMode> for ActionList {
    fn from(power: PowerMode) -> Self {
        let mut a = ActionList::new();
        a.power(power);
        a
    }
}

impl From<&Brightness> for ActionList {
    fn from(brightness: &Brightness) -> Self {
        let mut a = ActionList::new();
        a.brightness(brightness);
        a
    }
}

impl From<&ColorTemperature> for ActionList {
    fn from(temperature: &ColorTemperature) -> Self {
        let mut a = ActionList::new();
        a.color_temperature(temperature);
        a
    }
}

impl From<&Hsb> for ActionList {
    fn from(color: &Hsb) -> Self {
        let mut a = ActionList::new();
        a.color(color);
        a
    }
}
