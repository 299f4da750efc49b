use std::path::Path;

use lofty::{Accessor, TaggedFileExt};

use crate::{
    library::{SkipReason, asf},
    types::TrackDescriptor,
};

/// Placeholder artist written by some taggers; treated as no artist.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Placeholder title written by some taggers; treated as no title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Reads artist and title from one audio file.
pub trait MetadataExtractor {
    fn extract(&self, path: &Path) -> Result<TrackDescriptor, SkipReason>;
}

impl<T: MetadataExtractor + ?Sized> MetadataExtractor for &T {
    fn extract(&self, path: &Path) -> Result<TrackDescriptor, SkipReason> {
        (**self).extract(path)
    }
}

/// Builds a descriptor from raw tag values.
///
/// Both values must be present and must not be the matching placeholder.
/// Values are used verbatim: no trimming, no case folding.
pub fn descriptor_from_tags(
    artist: Option<&str>,
    title: Option<&str>,
) -> Result<TrackDescriptor, SkipReason> {
    let artist = artist
        .filter(|a| *a != UNKNOWN_ARTIST)
        .ok_or(SkipReason::MissingArtist)?;
    let title = title
        .filter(|t| *t != UNKNOWN_TITLE)
        .ok_or(SkipReason::MissingTitle)?;

    Ok(TrackDescriptor::new(artist, title))
}

/// Tag reader using the lofty library.
///
/// Prefers the format's primary tag and falls back to the first tag found in
/// the file. The first artist and title values are used. lofty has no ASF
/// support, so `.wma` files are read from their Content Description Object
/// instead (author as artist).
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyExtractor;

impl LoftyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> Result<TrackDescriptor, SkipReason> {
        if is_asf(path) {
            let tags = asf::read_tags(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
            return descriptor_from_tags(tags.author.as_deref(), tags.title.as_deref());
        }

        let tagged_file =
            lofty::read_from_path(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        let artist = tag.and_then(|t| t.artist().map(|a| a.into_owned()));
        let title = tag.and_then(|t| t.title().map(|t| t.into_owned()));

        descriptor_from_tags(artist.as_deref(), title.as_deref())
    }
}

fn is_asf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wma"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_tags_present() {
        let d = descriptor_from_tags(Some("Daft Punk"), Some("Get Lucky")).unwrap();
        assert_eq!(d, TrackDescriptor::new("Daft Punk", "Get Lucky"));
    }

    #[test]
    fn missing_artist_or_title() {
        assert_eq!(
            descriptor_from_tags(None, Some("Get Lucky")),
            Err(SkipReason::MissingArtist)
        );
        assert_eq!(
            descriptor_from_tags(Some("Daft Punk"), None),
            Err(SkipReason::MissingTitle)
        );
        assert_eq!(descriptor_from_tags(None, None), Err(SkipReason::MissingArtist));
    }

    #[test]
    fn placeholders_count_as_absent() {
        assert_eq!(
            descriptor_from_tags(Some(UNKNOWN_ARTIST), Some("Song")),
            Err(SkipReason::MissingArtist)
        );
        assert_eq!(
            descriptor_from_tags(Some("Band"), Some(UNKNOWN_TITLE)),
            Err(SkipReason::MissingTitle)
        );
    }

    #[test]
    fn placeholder_only_applies_to_its_own_field() {
        // "Unknown Title" as an artist name is a real value
        let d = descriptor_from_tags(Some(UNKNOWN_TITLE), Some(UNKNOWN_ARTIST)).unwrap();
        assert_eq!(d.artist, UNKNOWN_TITLE);
        assert_eq!(d.title, UNKNOWN_ARTIST);
    }

    #[test]
    fn values_are_kept_verbatim() {
        let d = descriptor_from_tags(Some("  sigur rós "), Some("Hoppípolla\t")).unwrap();
        assert_eq!(d.artist, "  sigur rós ");
        assert_eq!(d.title, "Hoppípolla\t");
    }

    #[test]
    fn wma_tags_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.WMA");
        std::fs::write(&path, asf::header_bytes(Some("Get Lucky"), Some("Daft Punk"))).unwrap();

        let d = LoftyExtractor::new().extract(&path).unwrap();
        assert_eq!(d, TrackDescriptor::new("Daft Punk", "Get Lucky"));
    }

    #[test]
    fn wma_placeholder_author_is_missing_artist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.wma");
        std::fs::write(&path, asf::header_bytes(Some("Song"), Some(UNKNOWN_ARTIST))).unwrap();

        assert_eq!(
            LoftyExtractor::new().extract(&path),
            Err(SkipReason::MissingArtist)
        );
    }

    #[test]
    fn corrupt_wma_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wma");
        std::fs::write(&path, b"not an asf header").unwrap();

        let result = LoftyExtractor::new().extract(&path);
        assert!(matches!(result, Err(SkipReason::Unreadable(_))));
    }

    #[test]
    fn corrupt_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        std::fs::write(&path, b"definitely not a flac stream").unwrap();

        let result = LoftyExtractor::new().extract(&path);
        assert!(matches!(result, Err(SkipReason::Unreadable(_))));
    }
}
