//! # Sync Module
//!
//! Everything between a list of local track descriptors and a converged
//! remote playlist:
//!
//! - [`resolver`] - maps descriptors to catalog track ids, one search each
//! - [`inspector`] - lazy, restartable pager over a playlist's contents
//! - [`reconciler`] - chunked remove-then-append of the target ids
//!
//! All three work against the [`CatalogSearch`](crate::spotify::CatalogSearch)
//! and [`PlaylistStore`](crate::spotify::PlaylistStore) traits and report
//! per-item outcomes as values.

pub mod inspector;
pub mod reconciler;
pub mod resolver;

pub use inspector::{PageProgress, PlaylistInspector, PlaylistPager, PlaylistSnapshot};
pub use reconciler::{
    ChunkReport, MAX_BATCH_SIZE, PlaylistReconciler, ReconcileReport, ReconcileStatus, plan_chunks,
};
pub use resolver::{
    CatalogMatch, CatalogResolver, FirstResult, MatchOutcome, MatchPolicy, SEARCH_LIMIT,
    target_ids,
};
