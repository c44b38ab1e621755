//! Dashboard module
//!
//! Provides an overview page with the budget totals and a chart of income
//! versus expenses.

mod cards;
mod charts;
mod handlers;

pub use handlers::{get_dashboard_page, get_dashboard_summary};
