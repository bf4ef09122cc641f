// handlers/protected/auth/mod.rs - Session endpoints for signed-in users

pub mod refresh; // POST /api/auth/refresh
pub mod whoami;  // GET /api/auth/whoami

pub use refresh::refresh;
pub use whoami::whoami;
