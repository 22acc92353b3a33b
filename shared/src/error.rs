use thiserror::Error;

/// Failure reported by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Not logged in")]
    NotAuthenticated,
}

impl AuthError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        let rejected = AuthError::Rejected {
            status: 401,
            message: "Invalid username or password".to_string(),
        };
        assert_eq!(rejected.to_string(), "Invalid username or password");
        assert_eq!(rejected.status(), Some(401));

        assert_eq!(AuthError::Network("offline".to_string()).to_string(), "offline");
        assert_eq!(AuthError::NotAuthenticated.status(), None);
    }
}
