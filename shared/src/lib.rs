mod error;
mod types;

pub use error::AuthError;
pub use types::*;
