use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Key material issued by the authentication service after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub id: String,
    pub key: String,
    pub algorithm: String,
    pub issue_time: i64,
    pub expire_time: i64,
}

impl Credentials {
    /// Whether the credentials are past their expiry, given a unix time in milliseconds.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expire_time
    }
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub data: T,
}

// ============================================================================
// Tests
// ============================================================================
