// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints; the gate lets these through without a session.

pub mod login;  // POST /api/auth/login - authenticate and get a token
pub mod logout; // POST /api/auth/logout - drop the session cookie

pub use login::{login, LoginRequest, SessionResponse};
pub use logout::logout;
