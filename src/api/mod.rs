//! HomeStay backend API modules
//!
//! - [`auth`] - Code exchange login, current user, token refresh
//! - [`store`] - Store list and detail
//! - [`room`] - Room types, price calendars, availability
//! - [`booking`] - Create, list, read and cancel bookings
//!
//! Every module is a thin mapping from typed parameters to a [`Route`](crate::routes::Route)
//! plus payload, sent through the shared [`ApiContext`].

pub mod auth;
pub mod booking;
pub mod room;
pub mod store;
pub mod r#trait;

pub use auth::AuthApi;
pub use booking::{BookingApi, BookingListQuery, CreateBookingRequest};
pub use r#trait::{ApiContext, HomestayApi};
pub use room::{AvailabilityQuery, RoomApi};
pub use store::StoreApi;
