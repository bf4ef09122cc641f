pub mod gate;
pub mod identity;
pub mod response;
pub mod validate_user;

pub use gate::{gate_middleware, render_denial};
pub use identity::{bearer_token, cookie_token, session_cookie, clear_session_cookie};
pub use response::{ApiResponse, ApiResult};
pub use validate_user::revalidate;
