mod handler;
mod model;

pub use handler::{get_settings, update_settings};
pub use model::{SettingsPatch, UserSettings};
