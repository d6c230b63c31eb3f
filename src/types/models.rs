//! Entity records mirrored from the backend
//!
//! These are passthrough shapes: no invariants are enforced beyond the
//! presence of optional fields. Referential integrity is the backend's job.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Logged-in user profile
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub openid: Option<String>,
    /// Display name
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    pub fn new(id: i64, created_at: impl Into<String>) -> Self {
        Self {
            id,
            openid: None,
            nickname: None,
            avatar: None,
            phone: None,
            created_at: created_at.into(),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A bookable category of room at a store
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomType {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub max_guests: u32,
    #[serde(default)]
    pub bed_type: Option<String>,
    /// Floor area in square meters
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// One day of a room type's price calendar
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomPrice {
    /// `YYYY-MM-DD`
    pub date: String,
    pub price: f64,
    #[serde(default)]
    pub available: bool,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Availability {
    pub available: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// A priced night within a booking
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookingItem {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub price: f64,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub room_type_id: i64,
    #[serde(default)]
    pub store_id: i64,
    pub check_in_date: String,
    pub check_out_date: String,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default)]
    pub guest_count: Option<u32>,
    #[serde(default, alias = "total_amount")]
    pub total_price: f64,
    /// Raw lifecycle code, see [`BookingStatus`].
    pub status: i32,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default, alias = "line_items")]
    pub items: Vec<BookingItem>,
    #[serde(default)]
    pub created_at: String,
}

impl Booking {
    /// `None` when the backend reports a code this client does not know.
    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::from_code(self.status)
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(
            self.status(),
            Some(BookingStatus::PendingPayment | BookingStatus::PendingConfirmation)
        )
    }
}

/// Booking lifecycle
///
/// pending payment -> pending confirmation -> confirmed -> checked-in ->
/// completed, with cancelled and refunded as terminal alternates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    PendingPayment,
    PendingConfirmation,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    Refunded,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::PendingPayment,
        BookingStatus::PendingConfirmation,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Refunded,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.get(usize::try_from(code).ok()?).copied()
    }

    pub fn code(self) -> i32 {
        match self {
            BookingStatus::PendingPayment => 0,
            BookingStatus::PendingConfirmation => 1,
            BookingStatus::Confirmed => 2,
            BookingStatus::CheckedIn => 3,
            BookingStatus::Completed => 4,
            BookingStatus::Cancelled => 5,
            BookingStatus::Refunded => 6,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            BookingStatus::PendingPayment => "待支付",
            BookingStatus::PendingConfirmation => "待确认",
            BookingStatus::Confirmed => "已确认",
            BookingStatus::CheckedIn => "已入住",
            BookingStatus::Completed => "已完成",
            BookingStatus::Cancelled => "已取消",
            BookingStatus::Refunded => "已退款",
        }
    }

    /// Style class used to tint status badges.
    pub fn style_class(self) -> &'static str {
        match self {
            BookingStatus::PendingPayment | BookingStatus::PendingConfirmation => "warning",
            BookingStatus::Confirmed => "primary",
            BookingStatus::CheckedIn | BookingStatus::Completed => "success",
            BookingStatus::Cancelled | BookingStatus::Refunded => "danger",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Refunded
        )
    }
}

impl TryFrom<i32> for BookingStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown booking status {code}"))
    }
}

/// Result of a login code exchange
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub is_new_user: bool,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CancelBookingResponse {
    #[serde(default)]
    pub success: bool,
}
