//! HomeStay HTTP Client
//!
//! Builds requests against the backend, attaches the session's bearer token
//! and turns every response into either the unwrapped envelope `data` or a
//! normalized [`HomestayError`].

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use crate::error::HomestayError;
use crate::events::{AppEvent, EventBus};
use crate::platform::{LogNotifier, Notifier};
use crate::stores::Session;

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub(crate) const NETWORK_ERROR_TOAST: &str = "网络错误，请检查网络连接";
pub(crate) const RELOGIN_TOAST: &str = "请重新登录";
const REQUEST_FAILED: &str = "请求失败";
const VALIDATION_FALLBACK: &str = "参数错误";
const SERVER_ERROR_TOAST: &str = "服务器错误";

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// Outcome of the status-code decision table.
#[derive(Debug)]
enum Dispatch {
    Resolve(Value),
    Reject { error: HomestayError, toast: String },
}

/// First validation message of a `detail` field: a string, or an array of `{msg}`.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn dispatch(status: StatusCode, body: Value) -> Dispatch {
    if status.is_success() {
        // Only an absent or numerically zero code is success; `null` is not.
        let failed_code = match body.get("code") {
            None => None,
            Some(code) if code.as_f64() == Some(0.0) => None,
            Some(code) => Some(code.as_i64().unwrap_or(-1)),
        };
        if let Some(code) = failed_code {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(REQUEST_FAILED)
                .to_string();
            return Dispatch::Reject {
                toast: message.clone(),
                error: HomestayError::Business {
                    code,
                    message,
                    body,
                },
            };
        }
        return match body {
            Value::Object(mut map) if map.contains_key("data") => {
                Dispatch::Resolve(map.remove("data").unwrap_or(Value::Null))
            }
            other => Dispatch::Resolve(other),
        };
    }

    match status {
        StatusCode::UNAUTHORIZED => Dispatch::Reject {
            error: HomestayError::Unauthorized,
            toast: RELOGIN_TOAST.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY => {
            let message =
                detail_message(&body).unwrap_or_else(|| VALIDATION_FALLBACK.to_string());
            Dispatch::Reject {
                toast: message.clone(),
                error: HomestayError::Validation { message },
            }
        }
        _ => {
            let detail = detail_message(&body).or_else(|| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            Dispatch::Reject {
                toast: detail
                    .clone()
                    .unwrap_or_else(|| SERVER_ERROR_TOAST.to_string()),
                error: HomestayError::Server {
                    status: status.as_u16(),
                    message: detail.unwrap_or_else(|| REQUEST_FAILED.to_string()),
                },
            }
        }
    }
}

/// Decode a raw body. Empty bodies are `null`, non-JSON text is kept as a string.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// HomeStay API Client
///
/// Reusable HTTP client for calling the booking backend. The session is
/// passed explicitly to every call; the client itself holds no login state.
#[derive(Clone)]
pub struct HomestayClient {
    http: Client,
    base_url: String,
    notifier: Arc<dyn Notifier>,
    events: Arc<EventBus>,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for HomestayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomestayClient")
            .field("base_url", &self.base_url)
            .field("events", &self.events)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl HomestayClient {
    /// Create a new client builder
    pub fn builder() -> HomestayClientBuilder {
        HomestayClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Event bus that receives [`AppEvent::SessionExpired`].
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline
    /// and the envelope handling.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    fn network_failure(&self, error: reqwest::Error) -> HomestayError {
        log::warn!("[Homestay] request failed without response: {}", error);
        self.notifier.notify(NETWORK_ERROR_TOAST);
        HomestayError::Network(error)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        session: &Session,
        builder: RequestBuilder,
    ) -> Result<T, HomestayError> {
        let builder = match session.token().await {
            Some(token) => builder.header(AUTHORIZATION, token.bearer()),
            None => builder,
        };
        let request = builder.build().map_err(|e| self.network_failure(e))?;
        let path = request.url().path().to_string();

        let response = self
            .send_request(request)
            .await
            .map_err(|e| self.network_failure(e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.network_failure(e))?;

        match dispatch(status, parse_body(&bytes)) {
            Dispatch::Resolve(data) => {
                log::debug!("[Homestay] {} resolved ({})", path, status);
                serde_json::from_value(data).map_err(|e| HomestayError::Decode(e.to_string()))
            }
            Dispatch::Reject { error, toast } => {
                log::warn!("[Homestay] {} rejected: {}", path, error);
                if error.is_unauthorized() {
                    session.clear_login_info().await;
                    self.events.emit(AppEvent::SessionExpired);
                }
                self.notifier.notify(&toast);
                Err(error)
            }
        }
    }

    /// Make a GET request without query parameters.
    ///
    /// # Errors
    /// See [`get_with_query`](Self::get_with_query).
    pub async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<T, HomestayError> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(session, self.http.get(url)).await
    }

    /// Make a GET request to the backend
    ///
    /// # Arguments
    /// * `session` - Session whose token is attached as a bearer credential
    /// * `path` - Route path (e.g., "/api/v1/stores/list")
    /// * `query` - Query parameters; `None` fields are omitted
    ///
    /// # Errors
    /// - `HomestayError::Business` when a 2xx envelope carries a nonzero `code`
    /// - `HomestayError::Unauthorized` on 401, after the session is cleared
    /// - `HomestayError::Validation` on 422
    /// - `HomestayError::Server` on any other status
    /// - `HomestayError::Network` when no response arrives
    pub async fn get_with_query<T, Q>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> Result<T, HomestayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        self.execute(session, self.http.get(url).query(query)).await
    }

    /// Make a POST request with a JSON body
    ///
    /// # Errors
    /// Same table as [`get_with_query`](Self::get_with_query).
    pub async fn post<T, B>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> Result<T, HomestayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        self.execute(session, self.http.post(url).json(body)).await
    }
}

impl Service<reqwest::Request> for HomestayClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for HomestayClient
///
/// # Example
///
/// ```rust
/// use homestay_mp_sdk::client::HomestayClient;
///
/// let client = HomestayClient::builder()
///     .base_url("https://booking.example.com")
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url(), "https://booking.example.com");
/// ```
#[derive(Default)]
pub struct HomestayClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    notifier: Option<Arc<dyn Notifier>>,
    events: Option<Arc<EventBus>>,
}

impl std::fmt::Debug for HomestayClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomestayClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl HomestayClientBuilder {
    /// Set the base URL for API calls
    ///
    /// Default: `<http://localhost:8000>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Where user-facing failure notifications go. Default: [`LogNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Share an existing event bus instead of creating a fresh one.
    pub fn events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the HomestayClient
    ///
    /// # Errors
    /// Returns an error if the base URL is not an http(s) URL
    pub fn build(self) -> Result<HomestayClient, HomestayError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(HomestayError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(HomestayClient {
            http: client,
            base_url,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            events: self.events.unwrap_or_default(),
            middleware_executor: None,
        })
    }
}
