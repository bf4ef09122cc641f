pub mod gate;
pub mod password;
pub mod server;
pub mod token;
