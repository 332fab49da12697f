//! Data-access layer: store contracts, PostgreSQL repositories and an in-memory store.

mod memory;
mod pool;
mod repositories;
mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repositories::{PgProductStore, PgUserStore};
pub use store::{DynProductStore, DynUserStore, ProductStore, UserStore};
