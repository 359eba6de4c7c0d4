mod handler;
mod model;

pub use handler::{delete_record, get_records, save_record};
pub use model::{DeleteRecordRequest, Record, RecordPayload};
