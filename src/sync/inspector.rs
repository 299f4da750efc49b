use crate::{
    spotify::{ApiError, PlaylistStore},
    types::PlaylistEntry,
};

/// Everything a single page read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProgress {
    pub entries: Vec<PlaylistEntry>,
    /// Offset of the first entry of this page.
    pub start: u32,
    /// Running offset after this page.
    pub offset: u32,
    /// Total as reported by this page's response.
    pub total: u32,
}

/// Playlist contents at observation time. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    pub entries: Vec<PlaylistEntry>,
    /// Total from the last page read.
    pub reported_total: u32,
}

pub struct PlaylistInspector<'a, P: ?Sized> {
    store: &'a P,
    market: String,
}

impl<'a, P: PlaylistStore + ?Sized> PlaylistInspector<'a, P> {
    pub fn new(store: &'a P, market: impl Into<String>) -> Self {
        Self {
            store,
            market: market.into(),
        }
    }

    /// Starts a fresh pass over the playlist at offset 0. No request is sent
    /// until the first [`PlaylistPager::next_page`].
    pub fn list_contents(&self, playlist_id: &str) -> PlaylistPager<'a, P> {
        PlaylistPager {
            store: self.store,
            playlist_id: playlist_id.to_string(),
            market: self.market.clone(),
            offset: 0,
            done: false,
        }
    }

    /// Reads every page into a snapshot.
    pub async fn snapshot(&self, playlist_id: &str) -> Result<PlaylistSnapshot, ApiError> {
        let mut pager = self.list_contents(playlist_id);
        let mut snapshot = PlaylistSnapshot::default();

        while let Some(page) = pager.next_page().await {
            let page = page?;
            snapshot.reported_total = page.total;
            snapshot.entries.extend(page.entries);
        }

        Ok(snapshot)
    }
}

/// Offset cursor over one playlist.
///
/// Ends on the first empty page or after yielding an error. The total is
/// taken from each response as-is, so it can drift if someone else edits the
/// playlist mid-read.
pub struct PlaylistPager<'a, P: ?Sized> {
    store: &'a P,
    playlist_id: String,
    market: String,
    offset: u32,
    done: bool,
}

impl<P: PlaylistStore + ?Sized> PlaylistPager<'_, P> {
    pub async fn next_page(&mut self) -> Option<Result<PageProgress, ApiError>> {
        if self.done {
            return None;
        }

        let page = match self
            .store
            .playlist_page(&self.playlist_id, self.offset, &self.market)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        if page.entries.is_empty() {
            self.done = true;
            return None;
        }

        let start = self.offset;
        self.offset += page.entries.len() as u32;

        Some(Ok(PageProgress {
            entries: page.entries,
            start,
            offset: self.offset,
            total: page.total,
        }))
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}
