use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::layer::util::Identity;
use tower::{Layer, Service};

use crate::api::ApiContext;
use crate::error::HomestayError;
use crate::events::EventBus;
use crate::platform::{
    KeyValueStorage, LogNotifier, LoginProvider, MemoryStorage, Notifier, UnsupportedLogin,
};
use crate::stores::Session;
use crate::utils::date::{Clock, SystemClock};

use super::http_client::{HomestayClient, MiddlewareExecutor};
use super::Homestay;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<ReqwestResponse, reqwest::Error>> + Send>>;

/// Builder for [`Homestay`]
///
/// Every capability has a default so that a bare `Homestay::builder().build()`
/// works against a local backend: in-memory storage, log notifications, no
/// native login and the system clock.
#[must_use]
#[derive(Default)]
pub struct HomestayBuilder<M = Identity> {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    notifier: Option<Arc<dyn Notifier>>,
    login_provider: Option<Arc<dyn LoginProvider>>,
    clock: Option<Arc<dyn Clock>>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for HomestayBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomestayBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl<M> HomestayBuilder<M> {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Device storage for the session token and user profile.
    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Native login handshake used by silent login.
    pub fn login_provider(mut self, provider: Arc<dyn LoginProvider>) -> Self {
        self.login_provider = Some(provider);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> HomestayBuilder<M2>
    where
        M2: Layer<HomestayClient> + Clone + Send + Sync + 'static,
    {
        HomestayBuilder {
            base_url: self.base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            storage: self.storage,
            notifier: self.notifier,
            login_provider: self.login_provider,
            clock: self.clock,
            middleware: Some(middleware),
        }
    }

    /// Build the [`Homestay`] client, restoring any persisted session.
    ///
    /// # Errors
    /// `Config` for a base URL that is not http(s), `Network` if the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<Homestay, HomestayError>
    where
        M: Layer<HomestayClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));

        let mut client_builder = HomestayClient::builder()
            .notifier(Arc::clone(&notifier))
            .events(Arc::new(EventBus::new()));
        if let Some(url) = self.base_url {
            client_builder = client_builder.base_url(url);
        }
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            client_builder = client_builder.connect_timeout(timeout);
        }
        let mut client = client_builder.build()?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let session = Arc::new(Session::restore(storage));
        let context = Arc::new(ApiContext::new(Arc::new(client), session));

        Ok(Homestay::new(
            context,
            self.login_provider
                .unwrap_or_else(|| Arc::new(UnsupportedLogin)),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        ))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| -> MiddlewareFuture {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use tower::{Layer, Service};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::platform::TOKEN_KEY;

    #[test]
    fn test_builder_default_values() {
        let homestay = Homestay::builder().build().unwrap();
        assert_eq!(homestay.base_url(), "http://localhost:8000");
        assert!(homestay.is_dev());
    }

    #[test]
    fn test_builder_custom_values() {
        let homestay = Homestay::builder()
            .base_url("https://booking.example.com")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(homestay.base_url(), "https://booking.example.com");
        assert!(!homestay.is_dev());
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = Homestay::builder().base_url("booking.example.com").build();
        assert!(matches!(result, Err(HomestayError::Config(_))));
    }

    #[tokio::test]
    async fn test_builder_restores_session_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "persisted-token").unwrap();

        let homestay = Homestay::builder().storage(storage).build().unwrap();

        assert!(homestay.session().is_logged_in().await);
    }

    #[tokio::test]
    async fn test_middleware_configured_and_executes() {
        #[derive(Clone)]
        struct FlagLayer {
            flag: Arc<AtomicBool>,
        }

        impl Layer<HomestayClient> for FlagLayer {
            type Service = FlagService;

            fn layer(&self, inner: HomestayClient) -> Self::Service {
                FlagService {
                    inner,
                    flag: Arc::clone(&self.flag),
                }
            }
        }

        #[derive(Clone)]
        struct FlagService {
            inner: HomestayClient,
            flag: Arc<AtomicBool>,
        }

        impl Service<ReqwestRequest> for FlagService {
            type Response = ReqwestResponse;
            type Error = reqwest::Error;
            type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: ReqwestRequest) -> Self::Future {
                self.flag.store(true, Ordering::SeqCst);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
        }

        let middleware_invoked = Arc::new(AtomicBool::new(false));
        let layer = FlagLayer {
            flag: Arc::clone(&middleware_invoked),
        };

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/stores/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "data": []
            })))
            .mount(&mock_server)
            .await;

        let homestay = Homestay::builder()
            .base_url(mock_server.uri())
            .with_middleware(layer)
            .build()
            .unwrap();

        let stores = homestay.store_api().list(None).await.unwrap();

        assert!(stores.is_empty());
        assert!(middleware_invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_builder_with_logging_middleware_builds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/stores/1/detail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 0,
                "data": {"id": 1, "name": "西湖店", "city": "杭州"}
            })))
            .mount(&mock_server)
            .await;

        let homestay = Homestay::builder()
            .base_url(mock_server.uri())
            .with_middleware(crate::middleware::LoggingMiddleware::new())
            .build()
            .unwrap();

        let store = homestay.store_api().detail(1).await.unwrap();
        assert_eq!(store.name, "西湖店");
    }
}
