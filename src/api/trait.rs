//! HomeStay API trait and context
//!
//! Provides the base trait and context for all HomeStay API implementations.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::HomestayClient;
use crate::error::HomestayError;
use crate::routes::Route;
use crate::stores::Session;

/// Parameters for routes that take none: an empty query, or `{}` as a body.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub(crate) struct NoParams {}

/// Context holding shared resources for HomeStay API implementations.
///
/// The session travels with the context, so every call made through an API
/// module carries exactly the credentials of the session it was built with.
#[derive(Clone)]
pub struct ApiContext {
    /// The HTTP client for making API requests
    pub(crate) client: Arc<HomestayClient>,
    /// The session whose token authorizes requests
    pub(crate) session: Arc<Session>,
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("client", &"HomestayClient { .. }")
            .field("session", &"Session { .. }")
            .finish()
    }
}

impl ApiContext {
    pub fn new(client: Arc<HomestayClient>, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    pub fn client(&self) -> &HomestayClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send `params` as the query string (GET routes) or JSON body (POST routes).
    pub(crate) async fn request<T, P>(&self, route: &Route, params: &P) -> Result<T, HomestayError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let path = route.path();
        if route.method() == Method::POST {
            self.client.post(&self.session, &path, params).await
        } else {
            self.client
                .get_with_query(&self.session, &path, params)
                .await
        }
    }
}

/// Trait for HomeStay API implementations.
pub trait HomestayApi: Send + Sync {
    fn context(&self) -> &ApiContext;

    /// Name of this API for logging and error context.
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
