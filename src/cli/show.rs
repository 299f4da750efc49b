use crate::{
    cli::{connect, playlist_or_config},
    config, info,
    spotify::PlaylistStore,
    sync::PlaylistInspector,
    warning,
};

pub async fn show(playlist: Option<String>) {
    let playlist_id = playlist_or_config(playlist);
    let client = connect().await;
    display_playlist_contents(&client, &playlist_id, "Current playlist").await;
}

/// Prints every entry of the playlist page by page, followed by the running
/// offset against the total reported with that page.
pub(crate) async fn display_playlist_contents<P: PlaylistStore + ?Sized>(
    store: &P,
    playlist_id: &str,
    title: &str,
) {
    info!("{}:", title);

    let inspector = PlaylistInspector::new(store, config::spotify_market());
    let mut pager = inspector.list_contents(playlist_id);

    while let Some(page) = pager.next_page().await {
        match page {
            Ok(page) => {
                for (i, entry) in page.entries.iter().enumerate() {
                    println!("{} {}", page.start as usize + i + 1, entry);
                }
                println!("[{} / {}]\n", page.offset, page.total);
            }
            Err(e) => warning!("Failed to read playlist {}: {}", playlist_id, e),
        }
    }
}
