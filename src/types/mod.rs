//! Value types for light control parameters.

mod brightness;
mod color_temperature;
mod hsb;
mod kelvin;
mod power;

pub use brightness::Brightness;
pub use color_temperature::ColorTemperature;
pub use hsb::Hsb;
pub use kelvin::Kelvin;
pub use power::PowerMode;
