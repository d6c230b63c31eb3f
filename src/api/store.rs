//! Store API

use std::sync::Arc;

use serde::Serialize;

use crate::api::r#trait::{ApiContext, HomestayApi, NoParams};
use crate::error::HomestayError;
use crate::routes::Route;
use crate::types::{ListPayload, Store};

#[derive(Debug, Default, Serialize)]
struct StoreListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
}

pub struct StoreApi {
    context: Arc<ApiContext>,
}

impl StoreApi {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    /// GET /stores/list, optionally filtered by city.
    ///
    /// An empty city means no filter.
    pub async fn list(&self, city: Option<&str>) -> Result<Vec<Store>, HomestayError> {
        let query = StoreListQuery {
            city: city.filter(|c| !c.is_empty()),
        };
        let payload: ListPayload<Store> = self.context.request(&Route::StoreList, &query).await?;
        Ok(payload.into_items())
    }

    /// GET /stores/{id}/detail
    pub async fn detail(&self, store_id: i64) -> Result<Store, HomestayError> {
        self.context
            .request(&Route::store_detail(store_id), &NoParams {})
            .await
    }
}

impl HomestayApi for StoreApi {
    fn context(&self) -> &ApiContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "store"
    }
}
