pub mod claims;
pub mod password;
pub mod role;
pub mod token;

pub use claims::{Claims, Identity, Subject};
pub use password::{hash_password, hash_password_with_cost, verify_password, PasswordError};
pub use role::{Role, UnknownRole};
pub use token::{IssuedToken, TokenError, TokenService};
