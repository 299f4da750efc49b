use crate::spotify::{ApiError, PlaylistStore};

/// Largest id list Spotify accepts for one remove or append call.
pub const MAX_BATCH_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStatus {
    Success,
    PartialFailure,
}

/// What happened to one chunk. Removal and append fail independently.
#[derive(Debug)]
pub struct ChunkReport {
    pub index: usize,
    pub track_ids: Vec<String>,
    pub removal: Result<(), ApiError>,
    pub append: Result<(), ApiError>,
}

impl ChunkReport {
    pub fn is_ok(&self) -> bool {
        self.removal.is_ok() && self.append.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub chunks: Vec<ChunkReport>,
}

impl ReconcileReport {
    pub fn status(&self) -> ReconcileStatus {
        if self.chunks.iter().all(ChunkReport::is_ok) {
            ReconcileStatus::Success
        } else {
            ReconcileStatus::PartialFailure
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == ReconcileStatus::Success
    }

    pub fn failed_chunks(&self) -> impl Iterator<Item = &ChunkReport> {
        self.chunks.iter().filter(|c| !c.is_ok())
    }

    pub fn track_count(&self) -> usize {
        self.chunks.iter().map(|c| c.track_ids.len()).sum()
    }
}

/// Chunks that [`PlaylistReconciler::reconcile`] submits, in order.
pub fn plan_chunks(target_ids: &[String]) -> Vec<&[String]> {
    target_ids.chunks(MAX_BATCH_SIZE).collect()
}

/// Asserts a list of track ids onto a playlist.
///
/// No diff is computed against the current contents. Every chunk of at most
/// [`MAX_BATCH_SIZE`] ids is first removed everywhere in the playlist and then
/// appended, so re-asserted tracks never end up twice and move to the end.
/// Ids are sent exactly as given, duplicates included.
pub struct PlaylistReconciler<'a, P: ?Sized> {
    store: &'a P,
}

impl<'a, P: PlaylistStore + ?Sized> PlaylistReconciler<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self { store }
    }

    /// Submits `target_ids` to the playlist chunk by chunk.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Playlist to write to
    /// * `target_ids` - Track ids in the order they should end up at the end of
    ///   the playlist
    ///
    /// # Returns
    ///
    /// One [`ChunkReport`] per chunk from [`plan_chunks`], each carrying the
    /// outcome of its removal and its append. An empty target issues no calls
    /// and reports [`ReconcileStatus::Success`].
    ///
    /// # Errors
    ///
    /// Never returns early. A failed call is recorded in its chunk and the
    /// remaining chunks are still submitted; nothing is retried at this level.
    pub async fn reconcile(&self, playlist_id: &str, target_ids: &[String]) -> ReconcileReport {
        self.reconcile_with(playlist_id, target_ids, |_| {}).await
    }

    /// Like [`reconcile`](Self::reconcile), calling `on_chunk` after each
    /// chunk has been submitted.
    ///
    /// Calls are strictly sequential: removal of chunk `n`, append of chunk
    /// `n`, then removal of chunk `n + 1`. The append is sent even when the
    /// removal failed.
    pub async fn reconcile_with<F>(
        &self,
        playlist_id: &str,
        target_ids: &[String],
        mut on_chunk: F,
    ) -> ReconcileReport
    where
        F: FnMut(&ChunkReport),
    {
        let mut report = ReconcileReport::default();

        for (index, chunk) in plan_chunks(target_ids).into_iter().enumerate() {
            let removal = self.store.remove_all_occurrences(playlist_id, chunk).await;
            // append regardless of the removal outcome
            let append = self.store.append_tracks(playlist_id, chunk).await;

            let chunk_report = ChunkReport {
                index,
                track_ids: chunk.to_vec(),
                removal,
                append,
            };
            on_chunk(&chunk_report);
            report.chunks.push(chunk_report);
        }

        report
    }
}
