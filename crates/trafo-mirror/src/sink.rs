use crate::error::MirrorError;
use crate::row::SheetRow;
use futures::future::BoxFuture;

/// Destination for mirrored rows, shared by the mirror worker and request handlers.
pub trait SheetSink: Send + Sync {
    fn append<'a>(&'a self, row: &'a SheetRow) -> BoxFuture<'a, Result<(), MirrorError>>;

    fn write_headers(&self) -> BoxFuture<'_, Result<(), MirrorError>>;
}
