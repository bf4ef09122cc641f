// gateway - Forwarding of admitted and public requests to the portal application
//
// Every path the gate lets through that has no local handler ends up here.

pub mod proxy;

pub use proxy::forward;
