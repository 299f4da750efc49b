use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    library::{MetadataExtractor, ScanError, SkipReason},
    types::TrackDescriptor,
};

/// File extensions (lowercase, without the dot) considered audio files.
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "aac", "flac", "ogg", "wma"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Outcome of scanning one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub tracks: Vec<TrackDescriptor>,
    pub skipped: Vec<SkippedFile>,
}

impl ScanReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Audio files whose tags could not be used, as opposed to files that
    /// were never audio in the first place.
    pub fn unknown_metadata(&self) -> impl Iterator<Item = &SkippedFile> {
        self.skipped
            .iter()
            .filter(|s| s.reason != SkipReason::UnsupportedExtension)
    }
}

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

pub struct LibraryScanner<E> {
    extractor: E,
}

impl<E: MetadataExtractor> LibraryScanner<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Scans `directory` (non-recursive) in file-name order.
    ///
    /// # Errors
    ///
    /// Only failures to list the directory itself are returned. Every
    /// per-file problem ends up in [`ScanReport::skipped`].
    pub fn scan(&self, directory: &Path) -> Result<ScanReport, ScanError> {
        let display = directory.display().to_string();
        let entries = fs::read_dir(directory).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScanError::DirectoryNotFound(display.clone()),
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(display.clone()),
            _ => ScanError::Io {
                path: display.clone(),
                source: e,
            },
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScanError::Io {
                path: display.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut report = ScanReport::default();
        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let outcome = if is_audio_file(&path) {
                self.extractor.extract(&path)
            } else {
                Err(SkipReason::UnsupportedExtension)
            };

            match outcome {
                Ok(descriptor) => report.tracks.push(descriptor),
                Err(reason) => report.skipped.push(SkippedFile { file_name, reason }),
            }
        }

        Ok(report)
    }
}
