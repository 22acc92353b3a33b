use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use gloo_net::http::{Request, Response};
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{ApiError, ApiSuccess, AuthError, Credentials, LoginRequest};
use wasm_bindgen::JsCast;

const DEFAULT_BASE_URL: &str = "/api";
const DEFAULT_AUTH_COOKIE_NAME: &str = "COINS_AUTH";
const DEFAULT_CREDENTIALS_KEY: &str = "COINS_AUTH_CREDENTIALS";

/// The authentication collaborator a widget delegates to.
///
/// Both calls resolve exactly once with the service's response body or the
/// reason it failed.
pub trait AuthClient {
    fn login(&self, username: &str, password: &str) -> impl Future<Output = Result<Value, AuthError>>;

    fn logout(&self) -> impl Future<Output = Result<Value, AuthError>>;
}

impl<T: AuthClient> AuthClient for Rc<T> {
    fn login(&self, username: &str, password: &str) -> impl Future<Output = Result<Value, AuthError>> {
        T::login(self, username, password)
    }

    fn logout(&self) -> impl Future<Output = Result<Value, AuthError>> {
        T::logout(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthOptions {
    pub base_url: String,
    pub auth_cookie_name: String,
    /// Local storage key holding the issued [`Credentials`].
    pub credentials_key: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_cookie_name: DEFAULT_AUTH_COOKIE_NAME.to_string(),
            credentials_key: DEFAULT_CREDENTIALS_KEY.to_string(),
        }
    }
}

impl AuthOptions {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// [`AuthClient`] speaking JSON over HTTP, keeping issued credentials in local storage.
#[derive(Debug, Default)]
pub struct HttpAuthClient {
    options: RefCell<AuthOptions>,
}

impl HttpAuthClient {
    pub fn new(options: AuthOptions) -> Self {
        Self {
            options: RefCell::new(options),
        }
    }

    pub fn options(&self) -> AuthOptions {
        self.options.borrow().clone()
    }

    pub fn set_options(&self, options: AuthOptions) {
        *self.options.borrow_mut() = options;
    }

    pub fn stored_credentials(&self) -> Option<Credentials> {
        LocalStorage::get(&self.options.borrow().credentials_key).ok()
    }

    fn store_credentials(&self, credentials: &Credentials) {
        let key = self.options.borrow().credentials_key.clone();
        if let Err(e) = LocalStorage::set(&key, credentials) {
            log::warn!("Failed to store credentials: {}", e);
        }
    }

    /// Forgets stored credentials and expires the auth cookie.
    pub fn clear_credentials(&self) {
        let options = self.options();
        LocalStorage::delete(&options.credentials_key);
        expire_cookie(&options.auth_cookie_name);
    }

    async fn send_login(&self, request: LoginRequest) -> Result<Value, AuthError> {
        let url = self.options.borrow().url("/auth/keys");

        let response = Request::post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .map_err(|e| AuthError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let body = read_response(response).await?;

        match serde_json::from_value::<ApiSuccess<Credentials>>(body.clone()) {
            Ok(success) => self.store_credentials(&success.data),
            Err(e) => log::warn!("Login response carried no credentials: {}", e),
        }

        Ok(body)
    }

    async fn send_logout(&self, credentials: &Credentials) -> Result<Value, AuthError> {
        let url = self
            .options
            .borrow()
            .url(&format!("/auth/keys/{}", credentials.id));

        let response = Request::delete(&url)
            .header("Authorization", &format!("Bearer {}", credentials.key))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        read_response(response).await
    }
}

impl AuthClient for HttpAuthClient {
    async fn login(&self, username: &str, password: &str) -> Result<Value, AuthError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send_login(request).await
    }

    /// Stored credentials are cleared whether or not the service call succeeds.
    async fn logout(&self) -> Result<Value, AuthError> {
        let now_ms = js_sys::Date::now() as i64;
        let result = match plan_logout(self.stored_credentials(), now_ms) {
            LogoutPlan::Revoke(credentials) => self.send_logout(&credentials).await,
            LogoutPlan::Expired => {
                log::debug!("Stored credentials already expired, skipping revocation");
                Ok(Value::Null)
            }
            LogoutPlan::NotLoggedIn => Err(AuthError::NotAuthenticated),
        };
        self.clear_credentials();
        result
    }
}

#[derive(Debug, PartialEq)]
enum LogoutPlan {
    Revoke(Credentials),
    /// The service has dropped the key on its own; nothing to revoke.
    Expired,
    NotLoggedIn,
}

fn plan_logout(stored: Option<Credentials>, now_ms: i64) -> LogoutPlan {
    match stored {
        Some(credentials) if credentials.is_expired_at(now_ms) => LogoutPlan::Expired,
        Some(credentials) => LogoutPlan::Revoke(credentials),
        None => LogoutPlan::NotLoggedIn,
    }
}

async fn read_response(response: Response) -> Result<Value, AuthError> {
    let status = response.status();

    if response.ok() {
        // Some endpoints answer with an empty body.
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))
    } else {
        let error: ApiError = response.json().await.unwrap_or(ApiError {
            error: "unknown".to_string(),
            message: "An unknown error occurred".to_string(),
        });
        Err(AuthError::Rejected {
            status,
            message: error.message,
        })
    }
}

fn expire_cookie(name: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(document) = document.dyn_into::<web_sys::HtmlDocument>() else {
        return;
    };
    let cookie = format!("{}=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/", name);
    if document.set_cookie(&cookie).is_err() {
        log::warn!("Failed to expire cookie {}", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = AuthOptions::default();
        assert_eq!(options.base_url, "/api");
        assert_eq!(options.credentials_key, "COINS_AUTH_CREDENTIALS");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let options = AuthOptions {
            base_url: "http://localhost:1337/".to_string(),
            ..AuthOptions::default()
        };
        assert_eq!(options.url("/auth/keys"), "http://localhost:1337/auth/keys");
    }

    #[test]
    fn test_set_and_get_options() {
        let client = HttpAuthClient::default();
        let options = AuthOptions {
            base_url: "http://localhost:1337".to_string(),
            auth_cookie_name: "Test_Auth_Cookie_Name".to_string(),
            ..AuthOptions::default()
        };

        client.set_options(options.clone());

        assert_eq!(client.options(), options);
    }

    fn credentials(expire_time: i64) -> Credentials {
        Credentials {
            id: "772d580c".to_string(),
            key: "f14c5870".to_string(),
            algorithm: "sha256".to_string(),
            issue_time: 1_000,
            expire_time,
        }
    }

    #[test]
    fn test_logout_revokes_live_credentials() {
        assert_eq!(
            plan_logout(Some(credentials(2_000)), 1_500),
            LogoutPlan::Revoke(credentials(2_000))
        );
    }

    #[test]
    fn test_logout_skips_expired_credentials() {
        assert_eq!(plan_logout(Some(credentials(2_000)), 2_000), LogoutPlan::Expired);
    }

    #[test]
    fn test_logout_without_credentials() {
        assert_eq!(plan_logout(None, 1_500), LogoutPlan::NotLoggedIn);
    }

    #[test]
    fn test_options_from_json() {
        let options: AuthOptions =
            serde_json::from_str(r#"{"authCookieName":"Test_Auth_Cookie_Name"}"#).unwrap();
        assert_eq!(options.auth_cookie_name, "Test_Auth_Cookie_Name");
        assert_eq!(options.base_url, "/api");
    }
}
