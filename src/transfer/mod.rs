//! Downloading the budget as a JSON file and replacing it with an uploaded
//! one.

mod export;
mod import;

pub use export::get_export;
pub use import::import_budget_endpoint;
