use std::path::PathBuf;

use tabled::Table;

use crate::{
    cli::{connect, directory_or_prompt, progress_bar, scan::scan_directory},
    config,
    spotify::CatalogSearch,
    success,
    sync::{CatalogMatch, CatalogResolver, MatchOutcome},
    types::{SearchTableRow, TrackDescriptor},
    warning,
};

pub async fn search(directory: Option<PathBuf>) {
    let directory = directory_or_prompt(directory);
    let report = scan_directory(&directory);
    if report.tracks.is_empty() {
        return;
    }

    let client = connect().await;
    search_catalog(&client, &report.tracks).await;
}

/// Resolves `tracks` against the catalog and prints one row per track.
pub(crate) async fn search_catalog<C: CatalogSearch + ?Sized>(
    catalog: &C,
    tracks: &[TrackDescriptor],
) -> Vec<CatalogMatch> {
    let resolver = CatalogResolver::new(catalog, config::spotify_market());

    let pb = progress_bar(tracks.len() as u64, "Searching Spotify...");
    let matches = resolver
        .resolve_with(tracks, |index, m| {
            pb.inc(1);
            match &m.outcome {
                MatchOutcome::NoResult => {
                    pb.suspend(|| warning!("{}. No tracks found for \"{}\".", index, m.query))
                }
                MatchOutcome::Failed(e) => {
                    pb.suspend(|| warning!("{}. Search for \"{}\" failed: {}", index, m.query, e))
                }
                _ => {}
            }
        })
        .await;
    pb.finish_and_clear();

    let rows: Vec<SearchTableRow> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let (uri, matched) = match &m.outcome {
                MatchOutcome::Found(hit) => {
                    (hit.uri.clone(), format!("{} - {}", hit.artist, hit.name))
                }
                MatchOutcome::Rejected(hit) => (
                    String::from("-"),
                    format!("rejected: {} - {}", hit.artist, hit.name),
                ),
                MatchOutcome::NoResult => (String::from("-"), String::from("no result")),
                MatchOutcome::Failed(_) => (String::from("-"), String::from("search failed")),
            };
            SearchTableRow {
                index: i + 1,
                query: m.query.clone(),
                uri,
                matched,
            }
        })
        .collect();
    println!("{}", Table::new(rows));

    let found = matches.iter().filter(|m| m.track_id().is_some()).count();
    success!("Matched {} of {} tracks", found, matches.len());

    matches
}
