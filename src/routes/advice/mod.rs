mod handler;
mod model;

pub use handler::{advice_events, generate_advice};
pub use model::{AdviceRequest, AdviceSettings};
