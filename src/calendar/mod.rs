//! A month calendar of daily totals and running balances.

mod grid;
mod page;

pub use grid::{CalendarDay, MonthCalendar};
pub use page::get_calendar_page;
