pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryUserStore;
pub use models::{User, UserView};
pub use repository::{PgUserStore, StoreError, UserStore};
