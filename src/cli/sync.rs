use std::path::PathBuf;

use crate::{
    cli::{
        connect, directory_or_prompt, playlist_or_config, scan::scan_directory,
        search::search_catalog, show::display_playlist_contents, spinner,
    },
    info,
    spotify::PlaylistStore,
    success,
    sync::{MAX_BATCH_SIZE, PlaylistReconciler, plan_chunks, target_ids},
    warning,
};

pub async fn sync(
    directory: Option<PathBuf>,
    playlist: Option<String>,
    show_before: bool,
    show_after: bool,
    dry_run: bool,
) {
    let playlist_id = playlist_or_config(playlist);
    let directory = directory_or_prompt(directory);

    let report = scan_directory(&directory);
    if report.tracks.is_empty() {
        warning!("Nothing to sync.");
        return;
    }

    let client = connect().await;
    let matches = search_catalog(&client, &report.tracks).await;
    let ids = target_ids(&matches);

    if dry_run {
        for (index, chunk) in plan_chunks(&ids).iter().enumerate() {
            info!(
                "Chunk {}: would remove and re-append {} tracks",
                index + 1,
                chunk.len()
            );
        }
        success!("Dry run, playlist {} left untouched", playlist_id);
        return;
    }

    if show_before {
        display_playlist_contents(&client, &playlist_id, "Current playlist").await;
    }

    update_playlist(&client, &playlist_id, &ids).await;

    if show_after {
        display_playlist_contents(&client, &playlist_id, "Updated playlist").await;
    }
}

async fn update_playlist<P: PlaylistStore + ?Sized>(store: &P, playlist_id: &str, ids: &[String]) {
    if ids.is_empty() {
        warning!("No tracks matched, playlist {} left untouched", playlist_id);
        return;
    }

    let pb = spinner(&format!(
        "Updating playlist in batches of {}...",
        MAX_BATCH_SIZE
    ));
    let report = PlaylistReconciler::new(store)
        .reconcile_with(playlist_id, ids, |chunk| {
            pb.set_message(format!("Submitted chunk {}", chunk.index + 1));
        })
        .await;
    pb.finish_and_clear();

    for chunk in report.failed_chunks() {
        if let Err(e) = &chunk.removal {
            warning!("Chunk {}: removing tracks failed: {}", chunk.index + 1, e);
        }
        if let Err(e) = &chunk.append {
            warning!("Chunk {}: adding tracks failed: {}", chunk.index + 1, e);
        }
        warning!("Chunk {} tracks: {}", chunk.index + 1, chunk.track_ids.join(", "));
    }

    if report.is_success() {
        success!(
            "Playlist {} updated with {} tracks",
            playlist_id,
            report.track_count()
        );
    } else {
        warning!(
            "Playlist {} partially updated: {} of {} chunks failed",
            playlist_id,
            report.failed_chunks().count(),
            report.chunks.len()
        );
    }
}
