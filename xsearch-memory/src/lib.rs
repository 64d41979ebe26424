//! In-memory collaborators for the xsearch join pipeline.
//!
//! - [`MemoryIndex`]: an [`IndexClient`](xsearch_index::IndexClient) over a
//!   fixed document list, with named request templates
//! - [`MemoryReader`]: lazily built, cached field caches
//! - [`MemoryCatalog`]: name → index lookup
//!
//! Used by tests and demos; queries follow the small language described in
//! [`query`].

mod catalog;
mod document;
mod index;
pub mod query;
mod reader;

pub use catalog::MemoryCatalog;
pub use document::MemoryDocument;
pub use index::MemoryIndex;
pub use reader::MemoryReader;
