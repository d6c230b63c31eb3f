//! Request/response logging with guest data masked.
//!
//! Credentials (`token`, `code`, ...) are replaced outright. Phone numbers
//! keep their carrier prefix and last four digits so support staff can still
//! match a booking. In verbose mode JSON request bodies are logged too, with
//! the same masking applied at any depth.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Request, Response, StatusCode, Url};
use serde_json::Value;
use tower::{Layer, Service};

const REDACTED: &str = "[REDACTED]";

/// Keys whose values never reach the log.
const SECRET_KEYS: &[&str] = &["token", "access_token", "code", "authorization", "password"];

/// Keys holding a guest phone number.
const PHONE_KEYS: &[&str] = &["guest_phone", "phone"];

fn key_in(key: &str, keys: &[&str]) -> bool {
    keys.iter().any(|k| key.eq_ignore_ascii_case(k))
}

/// `13800138000` -> `138****8000`. Anything shorter than seven characters is fully hidden.
fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 7 {
        return "****".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

fn mask_field(key: &str, value: &str) -> String {
    if key_in(key, SECRET_KEYS) {
        REDACTED.to_string()
    } else if key_in(key, PHONE_KEYS) {
        mask_phone(value)
    } else {
        value.to_string()
    }
}

fn mask_url(url: &Url) -> String {
    let Some(query) = url.query() else {
        return url.to_string();
    };
    let mut base = url.clone();
    base.set_query(None);
    let masked: Vec<String> = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some((key, value)) => format!("{key}={}", mask_field(key, value)),
            None => param.to_string(),
        })
        .collect();
    format!("{base}?{}", masked.join("&"))
}

fn mask_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                let scalar = match field {
                    Value::String(text) => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                };
                match scalar {
                    Some(text) if key_in(key, SECRET_KEYS) || key_in(key, PHONE_KEYS) => {
                        *field = Value::String(mask_field(key, &text));
                    }
                    _ => mask_json(field),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_json),
        _ => {}
    }
}

/// Masked JSON body of a buffered request; `None` for empty or non-JSON bodies.
fn masked_body(req: &Request) -> Option<String> {
    let bytes = req.body()?.as_bytes()?;
    let mut value: Value = serde_json::from_slice(bytes).ok()?;
    mask_json(&mut value);
    Some(value.to_string())
}

/// Tower layer logging every backend call.
///
/// Quiet mode writes one `info` line per request and per response. Verbose
/// mode logs at `debug`, including whether a bearer token was attached, the
/// masked request body and the status reason. Error statuses always log at
/// `warn`.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl<S> Layer<S> for LoggingMiddleware
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

fn log_outgoing(req: &Request, verbose: bool) {
    let url = mask_url(req.url());
    if !verbose {
        info!("[Homestay] --> {} {}", req.method(), url);
        return;
    }
    let bearer = if req.headers().contains_key(AUTHORIZATION) {
        "bearer"
    } else {
        "anonymous"
    };
    match masked_body(req) {
        Some(body) => debug!("[Homestay] --> {} {} ({}) {}", req.method(), url, bearer, body),
        None => debug!("[Homestay] --> {} {} ({})", req.method(), url, bearer),
    }
}

fn log_incoming(path: &str, status: StatusCode, elapsed: Duration, verbose: bool) {
    let reason = status.canonical_reason().unwrap_or("");
    if status.is_client_error() || status.is_server_error() {
        warn!(
            "[Homestay] <-- {} {} {} ({:?})",
            status.as_u16(),
            reason,
            path,
            elapsed
        );
    } else if verbose {
        debug!(
            "[Homestay] <-- {} {} {} ({:?})",
            status.as_u16(),
            reason,
            path,
            elapsed
        );
    } else {
        info!("[Homestay] <-- {} {} ({:?})", status.as_u16(), path, elapsed);
    }
}

impl<S, Error> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + Clone + 'static,
    S::Future: Send,
    Error: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        log_outgoing(&req, self.verbose);
        let path = req.url().path().to_string();
        let verbose = self.verbose;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let started = Instant::now();
            let response = inner.call(req).await?;
            log_incoming(&path, response.status(), started.elapsed(), verbose);
            Ok(response)
        })
    }
}
