// handlers/protected/mod.rs - Protected handlers (session required)
//
// Security Level: gate admits the request for the path's section
// Route Prefix: /api/auth/whoami, /api/auth/refresh, /api/users/*
// Context: `Extension<Identity>` inserted by the gate

pub mod auth;
pub mod users;
