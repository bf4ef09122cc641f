// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (gate-admitted session).
// Anything not routed here is forwarded upstream by the gateway.

pub mod protected;
pub mod public;
