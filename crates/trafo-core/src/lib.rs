pub mod catalog;
pub mod coerce;
pub mod dashboard;
pub mod error;
pub mod normalize;
pub mod records;
pub mod stats;
pub mod store;

pub mod types;

pub use crate::dashboard::Dashboard;
pub use crate::error::TrafoError;
pub use crate::store::Store;
