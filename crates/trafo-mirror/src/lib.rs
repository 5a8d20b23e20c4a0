pub mod error;
pub mod queue;
pub mod row;
pub mod sheets;
pub mod sink;

pub use crate::error::MirrorError;
pub use crate::queue::MirrorQueue;
pub use crate::row::{Cell, SheetRow, SHEET_HEADERS};
pub use crate::sink::SheetSink;
