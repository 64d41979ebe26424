//! Index reader contract.

use crate::field_index::FieldValueIndex;
use std::io;
use std::sync::Arc;

/// Read access to one index's field caches.
pub trait IndexReader: std::fmt::Debug + Send + Sync {
    /// Field-value index for `field`.
    ///
    /// Returns `Ok(None)` when the field has no string index. Building the
    /// cache may touch storage, hence the I/O error.
    fn string_index(&self, field: &str) -> io::Result<Option<Arc<dyn FieldValueIndex>>>;

    /// Number of documents in the index.
    fn num_docs(&self) -> usize;
}
