//! Middleware components for the HomeStay SDK.
//!
//! Middleware is plain Tower: any `Layer<HomestayClient>` whose service
//! speaks `reqwest::Request -> reqwest::Response` can be installed with
//! [`HomestayBuilder::with_middleware`](crate::client::HomestayBuilder::with_middleware).
//! It sees the outgoing request after the bearer token is attached and the
//! raw response before envelope handling.
//!
//! ## Middleware Types
//!
//! - [`LoggingMiddleware`] - Logs request/response lines with credentials redacted and guest phones masked
//!
//! ## Usage
//!
//! ```ignore
//! use homestay_mp_sdk::Homestay;
//! use homestay_mp_sdk::middleware::LoggingMiddleware;
//!
//! let homestay = Homestay::builder()
//!     .base_url("https://booking.example.com")
//!     .with_middleware(LoggingMiddleware::new().verbose())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
