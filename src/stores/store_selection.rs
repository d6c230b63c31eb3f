use tokio::sync::Mutex;

use crate::api::StoreApi;
use crate::types::Store;

#[derive(Debug, Default)]
struct SelectionState {
    stores: Vec<Store>,
    current: Option<Store>,
    loading: bool,
}

/// Read-only cache of the store list and the store currently being viewed.
///
/// Loads replace the cached values wholesale. Failures are logged and
/// reported as an empty list or `None`; they never reach the caller.
#[derive(Debug, Default)]
pub struct StoreSelection {
    state: Mutex<SelectionState>,
}

impl StoreSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stores(&self) -> Vec<Store> {
        self.state.lock().await.stores.clone()
    }

    pub async fn current_store(&self) -> Option<Store> {
        self.state.lock().await.current.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Fetch the store list, optionally filtered by city.
    pub async fn load_stores(&self, api: &StoreApi, city: Option<&str>) -> Vec<Store> {
        self.state.lock().await.loading = true;
        let result = api.list(city).await;

        let mut state = self.state.lock().await;
        state.loading = false;
        state.stores = match result {
            Ok(stores) => stores,
            Err(e) => {
                log::error!("[Homestay] failed to load stores: {}", e);
                Vec::new()
            }
        };
        state.stores.clone()
    }

    /// Fetch one store and make it the current store.
    ///
    /// On failure the previous current store is kept.
    pub async fn load_store_detail(&self, api: &StoreApi, store_id: i64) -> Option<Store> {
        self.state.lock().await.loading = true;
        let result = api.detail(store_id).await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(store) => {
                state.current = Some(store.clone());
                Some(store)
            }
            Err(e) => {
                log::error!("[Homestay] failed to load store {}: {}", store_id, e);
                None
            }
        }
    }

    pub async fn clear_current_store(&self) {
        self.state.lock().await.current = None;
    }
}
