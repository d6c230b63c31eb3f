//! Authentication API
//!
//! Exchanges platform login codes for a session and reads the current user.

use std::sync::Arc;

use serde::Serialize;

use crate::api::r#trait::{ApiContext, HomestayApi, NoParams};
use crate::error::HomestayError;
use crate::routes::Route;
use crate::types::{LoginResponse, RefreshTokenResponse, User};

#[derive(Debug, Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
}

/// Authentication API
pub struct AuthApi {
    context: Arc<ApiContext>,
}

impl AuthApi {
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    /// Exchange the one-time code from the native login handshake.
    ///
    /// POST /auth/wx/login
    pub async fn wx_login(&self, code: &str) -> Result<LoginResponse, HomestayError> {
        self.context
            .request(&Route::WxLogin, &CodeRequest { code })
            .await
    }

    /// Exchange a phone-number authorization code.
    ///
    /// POST /auth/wx/phone-login
    pub async fn wx_phone_login(&self, code: &str) -> Result<LoginResponse, HomestayError> {
        self.context
            .request(&Route::WxPhoneLogin, &CodeRequest { code })
            .await
    }

    /// GET /auth/me
    pub async fn me(&self) -> Result<User, HomestayError> {
        self.context.request(&Route::Me, &NoParams {}).await
    }

    /// POST /auth/refresh
    ///
    /// Returns the new token; storing it is up to the caller.
    pub async fn refresh_token(&self) -> Result<RefreshTokenResponse, HomestayError> {
        self.context.request(&Route::RefreshToken, &NoParams {}).await
    }
}

impl HomestayApi for AuthApi {
    fn context(&self) -> &ApiContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "auth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_request_serialization() {
        let body = serde_json::to_value(CodeRequest { code: "081abc" }).unwrap();
        assert_eq!(body, serde_json::json!({"code": "081abc"}));
    }

    #[test]
    fn test_no_params_is_empty_object() {
        assert_eq!(
            serde_json::to_value(NoParams {}).unwrap(),
            serde_json::json!({})
        );
    }
}
