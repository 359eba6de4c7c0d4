mod handler;
mod model;

pub use handler::{create_insight, delete_insight, get_insights, update_insight};
pub use model::{Insight, InsightPage, InsightPayload, InsightQuery};
