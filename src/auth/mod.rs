mod helpers;
mod middleware;
mod token;

pub use helpers::{TokenValidationError, ValidatedToken, validate_token};
pub use middleware::{AuthError, RequireAdmin, RequireCaller};
pub use token::{TokenGenerator, parse_token};
