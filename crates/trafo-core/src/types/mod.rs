pub mod enums;
pub mod filter;
pub mod ids;
pub mod record;
pub mod stats;

pub use enums::*;
pub use filter::*;
pub use ids::*;
pub use record::*;
pub use stats::*;
