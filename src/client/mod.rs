//! HomeStay HTTP client module
//!
//! [`HomestayClient`] is the envelope-aware HTTP layer; [`Homestay`] is the
//! application-facing handle that ties it to a session and the domain APIs.

mod http_client;
pub use http_client::{HomestayClient, HomestayClientBuilder};

mod homestay;
pub use homestay::Homestay;

mod builder;
pub use builder::HomestayBuilder;
