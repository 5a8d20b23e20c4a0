pub mod query;
pub mod record_repo;
pub mod schema;
pub mod stats_repo;
pub mod store;
pub mod util;

pub use crate::store::DbStore;
