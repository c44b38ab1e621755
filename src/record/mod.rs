//! Income and expense records and the page and endpoints for managing them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod id;
mod records_page;
mod view;

pub use core::{MAX_AMOUNT, NewRecord, Record, RecordKind};
pub(crate) use core::StoredRecord;
pub use create_endpoint::create_record_endpoint;
pub use delete_endpoint::{delete_all_records_endpoint, delete_record_endpoint};
pub use id::RecordId;
pub use records_page::{get_records_content, get_records_page};
pub(crate) use view::refresh_trigger;
