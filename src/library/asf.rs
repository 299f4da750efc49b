//! Title and author from the header of ASF (`.wma`) files.
//!
//! Only the Content Description Object is read. Everything else in the header
//! is skipped by size and the media data is never touched.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use thiserror::Error;

const HEADER_OBJECT: [u8; 16] = [
    0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];
const CONTENT_DESCRIPTION_OBJECT: [u8; 16] = [
    0x33, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];

// guid + size + object count + two reserved bytes
const HEADER_PREAMBLE: usize = 30;
// guid + size
const OBJECT_PREAMBLE: usize = 24;
const MAX_HEADER_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AsfError {
    #[error("cannot read file: {0}")]
    Io(#[from] io::Error),
    #[error("not an ASF file")]
    NotAsf,
    #[error("malformed ASF header")]
    Malformed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AsfTags {
    pub title: Option<String>,
    pub author: Option<String>,
}

pub fn read_tags(path: &Path) -> Result<AsfTags, AsfError> {
    let mut file = File::open(path)?;

    let mut preamble = [0u8; HEADER_PREAMBLE];
    file.read_exact(&mut preamble).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => AsfError::NotAsf,
        _ => AsfError::Io(e),
    })?;
    if preamble[..16] != HEADER_OBJECT {
        return Err(AsfError::NotAsf);
    }

    let size = le_u64(&preamble[16..24]);
    if size < HEADER_PREAMBLE as u64 || size > MAX_HEADER_SIZE {
        return Err(AsfError::Malformed);
    }

    let mut objects = vec![0u8; size as usize - HEADER_PREAMBLE];
    file.read_exact(&mut objects).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => AsfError::Malformed,
        _ => AsfError::Io(e),
    })?;

    parse_header_objects(&objects)
}

fn parse_header_objects(mut objects: &[u8]) -> Result<AsfTags, AsfError> {
    while objects.len() >= OBJECT_PREAMBLE {
        let size = le_u64(&objects[16..24]);
        if size < OBJECT_PREAMBLE as u64 || size > objects.len() as u64 {
            return Err(AsfError::Malformed);
        }

        let (object, rest) = objects.split_at(size as usize);
        if object[..16] == CONTENT_DESCRIPTION_OBJECT {
            return parse_content_description(&object[OBJECT_PREAMBLE..]);
        }
        objects = rest;
    }

    Ok(AsfTags::default())
}

fn parse_content_description(data: &[u8]) -> Result<AsfTags, AsfError> {
    // five u16 lengths: title, author, copyright, description, rating
    if data.len() < 10 {
        return Err(AsfError::Malformed);
    }
    let title_len = le_u16(&data[0..2]) as usize;
    let author_len = le_u16(&data[2..4]) as usize;

    let strings = &data[10..];
    if strings.len() < title_len + author_len {
        return Err(AsfError::Malformed);
    }
    let (title, rest) = strings.split_at(title_len);
    let author = &rest[..author_len];

    Ok(AsfTags {
        title: decode_utf16(title)?,
        author: decode_utf16(author)?,
    })
}

/// Zero-length fields are absent. Stored strings carry a NUL terminator.
fn decode_utf16(bytes: &[u8]) -> Result<Option<String>, AsfError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    if bytes.len() % 2 != 0 {
        return Err(AsfError::Malformed);
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let value = String::from_utf16(&units).map_err(|_| AsfError::Malformed)?;

    Ok(Some(value.trim_end_matches('\0').to_string()))
}

fn le_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

/// Minimal ASF header with an unrelated object followed by a Content
/// Description Object. `None` writes a zero-length field.
#[cfg(test)]
pub(crate) fn header_bytes(title: Option<&str>, author: Option<&str>) -> Vec<u8> {
    fn utf16z(value: Option<&str>) -> Vec<u8> {
        value
            .map(|v| {
                v.encode_utf16()
                    .chain(std::iter::once(0))
                    .flat_map(|u| u.to_le_bytes())
                    .collect()
            })
            .unwrap_or_default()
    }

    let title = utf16z(title);
    let author = utf16z(author);

    let mut other = vec![0xAB; 16];
    other.extend(32u64.to_le_bytes());
    other.extend([0u8; 8]);

    let mut description = CONTENT_DESCRIPTION_OBJECT.to_vec();
    let description_size = OBJECT_PREAMBLE + 10 + title.len() + author.len();
    description.extend((description_size as u64).to_le_bytes());
    for len in [title.len(), author.len(), 0, 0, 0] {
        description.extend((len as u16).to_le_bytes());
    }
    description.extend(&title);
    description.extend(&author);

    let header_size = HEADER_PREAMBLE + other.len() + description.len();
    let mut out = HEADER_OBJECT.to_vec();
    out.extend((header_size as u64).to_le_bytes());
    out.extend(2u32.to_le_bytes());
    out.extend([0x01, 0x02]);
    out.extend(other);
    out.extend(description);
    // start of the data object, never read
    out.extend([0u8; 50]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.wma");
        std::fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_title_and_author() {
        let (_dir, path) = write(&header_bytes(Some("Hoppípolla"), Some("Sigur Rós")));

        let tags = read_tags(&path).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Hoppípolla"));
        assert_eq!(tags.author.as_deref(), Some("Sigur Rós"));
    }

    #[test]
    fn zero_length_fields_are_absent() {
        let (_dir, path) = write(&header_bytes(Some("Title"), None));

        let tags = read_tags(&path).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Title"));
        assert_eq!(tags.author, None);
    }

    #[test]
    fn rejects_other_formats() {
        let (_dir, path) = write(b"ID3\x04\x00\x00\x00\x00\x00\x00 not asf at all........");
        assert!(matches!(read_tags(&path), Err(AsfError::NotAsf)));

        let (_dir, path) = write(b"tiny");
        assert!(matches!(read_tags(&path), Err(AsfError::NotAsf)));
    }

    #[test]
    fn truncated_header_is_malformed() {
        let bytes = header_bytes(Some("Title"), Some("Author"));
        let (_dir, path) = write(&bytes[..60]);

        assert!(matches!(read_tags(&path), Err(AsfError::Malformed)));
    }
}
