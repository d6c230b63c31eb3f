//! Room API
//!
//! Room types per store, per-day price calendars and availability checks.

use std::sync::Arc;

use serde::Serialize;

use crate::api::r#trait::{ApiContext, HomestayApi, NoParams};
use crate::error::HomestayError;
use crate::routes::Route;
use crate::types::{Availability, ListPayload, RoomPrice, RoomType};

#[derive(Debug, Default, Serialize)]
struct PriceQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    check_in: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_out: Option<&'a str>,
}

/// Query for an availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityQuery {
    pub room_type_id: i64,
    /// `YYYY-MM-DD`
    pub check_in_date: String,
    /// `YYYY-MM-DD`
    pub check_out_date: String,
}

impl AvailabilityQuery {
    pub fn new(
        room_type_id: i64,
        check_in_date: impl Into<String>,
        check_out_date: impl Into<String>,
    ) -> Self {
        Self {
            room_type_id,
            check_in_date: check_in_date.into(),
            check_out_date: check_out_date.into(),
        }
    }
}

pub struct RoomApi {
    context: Arc<ApiContext>,
}

impl RoomApi {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    /// GET /rooms/types/list/{storeId}
    pub async fn type_list(&self, store_id: i64) -> Result<Vec<RoomType>, HomestayError> {
        let payload: ListPayload<RoomType> = self
            .context
            .request(&Route::room_type_list(store_id), &NoParams {})
            .await?;
        Ok(payload.into_items())
    }

    /// GET /rooms/prices/{roomTypeId}
    ///
    /// Bounds left as `None` are omitted from the query.
    pub async fn prices(
        &self,
        room_type_id: i64,
        check_in: Option<&str>,
        check_out: Option<&str>,
    ) -> Result<Vec<RoomPrice>, HomestayError> {
        let query = PriceQuery {
            check_in: check_in.filter(|d| !d.is_empty()),
            check_out: check_out.filter(|d| !d.is_empty()),
        };
        let payload: ListPayload<RoomPrice> = self
            .context
            .request(&Route::room_prices(room_type_id), &query)
            .await?;
        Ok(payload.into_items())
    }

    /// GET /rooms/availability
    pub async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Availability, HomestayError> {
        self.context.request(&Route::RoomAvailability, query).await
    }
}

impl HomestayApi for RoomApi {
    fn context(&self) -> &ApiContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "room"
    }
}
