pub mod user;

pub use user::{User, UserRow, UserView};
