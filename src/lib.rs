//! HomeStay Mini Program SDK for Rust
//!
//! Client core for the HomeStay short-stay booking mini program: browse
//! stores and room types, pick a date range, create and manage bookings,
//! and keep a login session alive against the HomeStay REST backend.
//!
//! ## API Coverage
//!
//! | Category | Endpoints |
//! |----------|-----------|
//! | Auth / Session | 4 |
//! | Stores | 2 |
//! | Rooms | 3 |
//! | Bookings | 4 |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use homestay_mp_sdk::{Homestay, platform::FileStorage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let homestay = Homestay::builder()
//!         .base_url("https://booking.example.com")
//!         .storage(Arc::new(FileStorage::new("session.json")))
//!         .build()?;
//!
//!     homestay.on_session_expired(|| println!("please log in again"));
//!
//!     // Exchange the code from the native login handshake
//!     let login = homestay.login("code_from_wx_login").await?;
//!     println!("Welcome, user #{}", login.user.id);
//!
//!     for store in homestay.load_stores(Some("杭州")).await {
//!         println!("{} ({})", store.name, store.city);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Backend API modules (auth, store, room, booking)
//! - [`client`] - HTTP client and the [`Homestay`] facade
//! - [`error`] - Error types
//! - [`events`] - Session-expired signal
//! - [`middleware`] - Tower middleware (request logging)
//! - [`platform`] - Device capabilities: storage, login handshake, notifications
//! - [`routes`] - Route table and URL helpers
//! - [`stores`] - Client state: session, store selection, booking dates
//! - [`types`] - Backend entities and list shapes
//! - [`utils`] - Date and display helpers
//!
//! ## Error Handling
//!
//! Every failure is a [`HomestayError`] carrying a normalized code and message:
//!
//! ```rust,ignore
//! use homestay_mp_sdk::HomestayError;
//!
//! match result {
//!     Ok(booking) => { /* handle success */ }
//!     Err(HomestayError::Business { code, message, .. }) => {
//!         eprintln!("Business error: {} - {}", code, message);
//!     }
//!     Err(HomestayError::Unauthorized) => {
//!         // session already cleared, SessionExpired already emitted
//!     }
//!     Err(e) => {
//!         eprintln!("Error {}: {}", e.code(), e.message());
//!     }
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod events;
pub mod middleware;
pub mod platform;
pub mod routes;
pub mod stores;
pub mod types;
pub mod utils;

pub use client::{Homestay, HomestayBuilder, HomestayClient, HomestayClientBuilder};
pub use error::HomestayError;
