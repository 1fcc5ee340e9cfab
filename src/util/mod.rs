//! Formatting utilities for feed display.
//!
//! Pure, synchronous, reentrant functions consumed by presentation layers:
//!
//! - [`format_absolute_date`] / [`format_relative_date`] — render the raw
//!   date strings stored on a [`FeedEntry`](crate::FeedEntry)
//! - [`strip_markup`] — remove tags from description text before display

mod date;
mod text;

pub use date::{format_absolute_date, format_relative_date};
pub use text::strip_markup;
