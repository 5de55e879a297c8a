//! Backlink resolution and batch record linking.

pub mod backlinks;
pub mod batch;

pub use backlinks::{compute_backlinks, BacklinkOptions, RelationGraph};
pub use batch::{link_records, DatedSource, LinkBatch, RecordLinker, RecordLinks};
