// handlers/public/mod.rs - Public handlers (no session required)
//
// Security Level: None
// Route Prefix: /api/auth/login, /api/auth/logout, /, /health

pub mod auth;
pub mod system;
