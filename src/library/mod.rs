//! # Library Module
//!
//! Local side of the sync: lists one directory of audio files and turns each
//! file's embedded tags into a [`TrackDescriptor`](crate::types::TrackDescriptor).
//!
//! - [`scanner`] - Non-recursive directory scan with extension filtering
//! - [`metadata`] - Tag extraction backed by `lofty`
//! - [`asf`] - Title and author of `.wma` files, which `lofty` cannot read
//!
//! Per-file problems never abort a scan. They are collected as
//! [`SkippedFile`] entries in the returned [`ScanReport`], so callers can count
//! and name them without parsing console output.

pub mod asf;
pub mod metadata;
pub mod scanner;

use std::fmt;

use thiserror::Error;

pub use metadata::{LoftyExtractor, MetadataExtractor, descriptor_from_tags};
pub use scanner::{AUDIO_EXTENSIONS, LibraryScanner, ScanReport, SkippedFile};

/// Failures that terminate a scan before any file is looked at.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("The directory '{0}' does not exist.")]
    DirectoryNotFound(String),
    #[error("Permission denied for accessing the directory '{0}'.")]
    PermissionDenied(String),
    #[error("Cannot read directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single file produced no track descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension,
    Unreadable(String),
    MissingArtist,
    MissingTitle,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension => write!(f, "not an audio file"),
            SkipReason::Unreadable(e) => write!(f, "unreadable metadata: {}", e),
            SkipReason::MissingArtist => write!(f, "no artist tag"),
            SkipReason::MissingTitle => write!(f, "no title tag"),
        }
    }
}
