//! Riptag reads the ID3 metadata found on ripped audio files.
//!
//! Both tag families decode into one [`Tag`] model: the fixed 128-byte
//! ID3v1/v1.1 trailer and the ID3v2.2/v2.3/v2.4 frame blocks that lead a
//! file. The crate only reads; nothing here writes tags back.
//!
//! # Example
//!
//! ```no_run
//! use riptag::frames::FrameKind;
//!
//! fn main() -> riptag::ParseResult<()> {
//!     if let Some(tag) = riptag::read_tag("music.mp3")? {
//!         println!("version: {}", tag.version());
//!
//!         if let Some(title) = tag.text(FrameKind::Title) {
//!             println!("title: {}", title);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod core;

pub mod err;
pub mod frames;
pub mod id3v1;
pub mod id3v2;
pub mod string;
pub mod tag;
pub mod version;

pub use err::{ParseError, ParseResult};
pub use tag::Tag;
pub use version::{version, version_from, versions, versions_from, Version};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Read the highest-priority tag of the file at `path`: a leading v2 tag if
/// one exists, the trailing v1 record otherwise. `Ok(None)` when the file
/// carries neither.
pub fn read_tag<P: AsRef<Path>>(path: P) -> ParseResult<Option<Tag>> {
    read_tag_from(&mut File::open(path)?)
}

/// Read the highest-priority tag from an open byte source.
pub fn read_tag_from<R: Read + Seek>(input: &mut R) -> ParseResult<Option<Tag>> {
    match version_from(input)? {
        Some(version) if version.is_v2() => {
            input.seek(SeekFrom::Start(0))?;
            id3v2::read_tag_from(input)
        }
        Some(_) => id3v1::read_tag_from(input),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameKind;
    use std::io::Cursor;

    #[test]
    fn dispatch_prefers_v2() {
        // A v2.3 tag at the front and a v1 record at the back; the v2 tag
        // wins.
        let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x0C\
                         TIT2\x00\x00\x00\x02\x00\x00\
                         \x00X"
            .to_vec();

        let mut v1 = [b' '; 128];
        v1[0..3].copy_from_slice(b"TAG");
        v1[3..8].copy_from_slice(b"Other");
        data.extend_from_slice(&v1);

        let tag = read_tag_from(&mut Cursor::new(data)).unwrap().unwrap();
        assert_eq!(tag.version(), Version::V2r3);
        assert_eq!(tag.text(FrameKind::Title), Some("X"));
    }

    #[test]
    fn dispatch_falls_back_to_v1() {
        let mut data = vec![0xAA; 2048];
        let mut v1 = [b' '; 128];
        v1[0..3].copy_from_slice(b"TAG");
        v1[3..8].copy_from_slice(b"Title");
        v1[125] = 0;
        v1[126] = 7;
        data.extend_from_slice(&v1);

        let tag = read_tag_from(&mut Cursor::new(data)).unwrap().unwrap();
        assert_eq!(tag.version(), Version::V1r1);
        assert_eq!(tag.text(FrameKind::TrackNumber), Some("7"));
    }

    #[test]
    fn dispatch_without_any_tag() {
        let data = vec![0u8; 512];
        assert!(read_tag_from(&mut Cursor::new(data)).unwrap().is_none());
    }
}
