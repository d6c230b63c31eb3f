//! Pure helpers shared by the state containers and callers.

pub mod date;
pub mod format;

pub use date::{Clock, DateError, DateParts, FixedClock, SystemClock};
pub use format::{booking_status_class, booking_status_text, format_price};
