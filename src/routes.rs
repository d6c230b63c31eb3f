//! Backend route table
//!
//! Maps every logical operation to its HTTP method and path under
//! [`API_PREFIX`]. Identifiers are percent-encoded as single path segments.

use std::fmt::Display;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;

/// Prefix shared by every backend route.
pub const API_PREFIX: &str = "/api/v1";

/// Path under the base URL that serves static assets.
pub const STATIC_PREFIX: &str = "/static";

/// Characters that must be encoded inside a single path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    WxLogin,
    WxPhoneLogin,
    Me,
    RefreshToken,
    StoreList,
    StoreDetail(String),
    RoomTypeList(String),
    RoomPrices(String),
    RoomAvailability,
    CreateBooking,
    MyBookings,
    MyBookingDetail(String),
    CancelBooking(String),
}

impl Route {
    pub fn store_detail(store_id: impl Display) -> Self {
        Route::StoreDetail(segment(store_id))
    }

    pub fn room_type_list(store_id: impl Display) -> Self {
        Route::RoomTypeList(segment(store_id))
    }

    pub fn room_prices(room_type_id: impl Display) -> Self {
        Route::RoomPrices(segment(room_type_id))
    }

    pub fn my_booking_detail(booking_id: impl Display) -> Self {
        Route::MyBookingDetail(segment(booking_id))
    }

    pub fn cancel_booking(booking_id: impl Display) -> Self {
        Route::CancelBooking(segment(booking_id))
    }

    pub fn method(&self) -> Method {
        match self {
            Route::WxLogin
            | Route::WxPhoneLogin
            | Route::RefreshToken
            | Route::CreateBooking
            | Route::CancelBooking(_) => Method::POST,
            _ => Method::GET,
        }
    }

    /// Path relative to the base URL, including [`API_PREFIX`].
    pub fn path(&self) -> String {
        let tail = match self {
            Route::WxLogin => "/auth/wx/login".to_string(),
            Route::WxPhoneLogin => "/auth/wx/phone-login".to_string(),
            Route::Me => "/auth/me".to_string(),
            Route::RefreshToken => "/auth/refresh".to_string(),
            Route::StoreList => "/stores/list".to_string(),
            Route::StoreDetail(id) => format!("/stores/{id}/detail"),
            Route::RoomTypeList(store_id) => format!("/rooms/types/list/{store_id}"),
            Route::RoomPrices(room_type_id) => format!("/rooms/prices/{room_type_id}"),
            Route::RoomAvailability => "/rooms/availability".to_string(),
            Route::CreateBooking => "/bookings".to_string(),
            Route::MyBookings => "/bookings/my".to_string(),
            Route::MyBookingDetail(id) => format!("/bookings/my/{id}"),
            Route::CancelBooking(id) => format!("/bookings/my/{id}/cancel"),
        };
        format!("{API_PREFIX}{tail}")
    }
}

fn segment(id: impl Display) -> String {
    utf8_percent_encode(&id.to_string(), PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Resolve a static asset path against `<base_url>/static`.
///
/// Returns an empty string for an empty path.
pub fn image_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{STATIC_PREFIX}{path}")
    } else {
        format!("{base}{STATIC_PREFIX}/{path}")
    }
}

/// Whether the base URL points at a local development backend.
pub fn is_dev(base_url: &str) -> bool {
    base_url.contains("localhost")
}
