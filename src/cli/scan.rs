use std::path::{Path, PathBuf};

use tabled::Table;

use crate::{
    cli::directory_or_prompt,
    info,
    library::{LibraryScanner, LoftyExtractor, ScanReport},
    success,
    types::TrackTableRow,
    warning,
};

pub fn scan(directory: Option<PathBuf>) {
    let directory = directory_or_prompt(directory);
    scan_directory(&directory);
}

/// Scans `directory` and prints the summary. A directory that cannot be read
/// yields an empty report.
pub(crate) fn scan_directory(directory: &Path) -> ScanReport {
    info!("Scanning '{}'", directory.display());

    let report = match LibraryScanner::new(LoftyExtractor::new()).scan(directory) {
        Ok(report) => report,
        Err(e) => {
            warning!("{}", e);
            return ScanReport::default();
        }
    };

    for skipped in report.unknown_metadata() {
        warning!("{}: {}", skipped.file_name, skipped.reason);
    }

    if report.tracks.is_empty() {
        warning!(
            "No audio files found in '{}' with known metadata.",
            directory.display()
        );
        return report;
    }

    let rows: Vec<TrackTableRow> = report
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            index: i + 1,
            artist: t.artist.clone(),
            title: t.title.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));

    success!(
        "Found {} tracks in '{}', skipped {} files",
        report.tracks.len(),
        directory.display(),
        report.skipped_count()
    );

    report
}
