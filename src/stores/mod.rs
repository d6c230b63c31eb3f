//! Client-side state containers
//!
//! - [`Session`] - session token and user profile, persisted to device storage
//! - [`BookingDates`] - check-in / check-out selection with derived fields
//! - [`StoreSelection`] - cached store list and the store being viewed

mod booking_dates;
mod session;
mod store_selection;

pub use booking_dates::{BookingDates, DateSelectionError};
pub use session::Session;
pub use store_selection::StoreSelection;
