//! Booking API
//!
//! Create bookings, list and read the user's own bookings, and cancel them.

use std::sync::Arc;

use serde::Serialize;

use crate::api::r#trait::{ApiContext, HomestayApi, NoParams};
use crate::error::HomestayError;
use crate::routes::Route;
use crate::types::{Booking, BookingStatus, CancelBookingResponse, ListPayload, Page};

/// Body of `POST /bookings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBookingRequest {
    pub store_id: i64,
    pub room_type_id: i64,
    pub check_in_date: String,
    pub check_out_date: String,
    pub guest_name: String,
    pub guest_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl CreateBookingRequest {
    pub fn new(
        store_id: i64,
        room_type_id: i64,
        check_in_date: impl Into<String>,
        check_out_date: impl Into<String>,
        guest_name: impl Into<String>,
        guest_phone: impl Into<String>,
    ) -> Self {
        Self {
            store_id,
            room_type_id,
            check_in_date: check_in_date.into(),
            check_out_date: check_out_date.into(),
            guest_name: guest_name.into(),
            guest_phone: guest_phone.into(),
            guest_count: None,
            remark: None,
        }
    }

    pub fn guest_count(mut self, count: u32) -> Self {
        self.guest_count = Some(count);
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}

/// Filters for `GET /bookings/my`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl BookingListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status.code());
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

#[derive(Debug, Serialize)]
struct CancelBookingRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

pub struct BookingApi {
    context: Arc<ApiContext>,
}

impl BookingApi {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    /// POST /bookings
    pub async fn create(&self, request: &CreateBookingRequest) -> Result<Booking, HomestayError> {
        self.context.request(&Route::CreateBooking, request).await
    }

    /// GET /bookings/my
    ///
    /// Accepts both a bare array and a paginated object from the backend.
    pub async fn my_bookings(
        &self,
        query: &BookingListQuery,
    ) -> Result<Page<Booking>, HomestayError> {
        let payload: ListPayload<Booking> =
            self.context.request(&Route::MyBookings, query).await?;
        Ok(payload.into_page())
    }

    /// GET /bookings/my/{id}
    pub async fn detail(&self, booking_id: i64) -> Result<Booking, HomestayError> {
        self.context
            .request(&Route::my_booking_detail(booking_id), &NoParams {})
            .await
    }

    /// POST /bookings/my/{id}/cancel
    pub async fn cancel(
        &self,
        booking_id: i64,
        reason: Option<&str>,
    ) -> Result<CancelBookingResponse, HomestayError> {
        self.context
            .request(
                &Route::cancel_booking(booking_id),
                &CancelBookingRequest { reason },
            )
            .await
    }
}

impl HomestayApi for BookingApi {
    fn context(&self) -> &ApiContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "booking"
    }
}
