//! Display formatting for terminal output
//!
//! Provides utilities for formatting books and snapshots for terminal
//! display.

pub mod backup;
pub mod book;

pub use backup::{format_age, format_size, format_snapshot_details, format_snapshot_list};
pub use book::{format_book_details, format_book_list, format_price};
