//! ID3v2 tag reading.
//!
//! The flow matches the wire format: parse the 10-byte tag header, wrap the
//! rest of the source in the unsynchronisation filter if the tag asks for
//! it, record the extended header, then drive the frame reader until the
//! declared payload size is exhausted.

pub(crate) mod compat;
mod dict;
mod frames;
mod header;
pub(crate) mod syncdata;

use crate::core::io::UnsyncStream;
use crate::err::{ParseError, ParseResult};
use crate::tag::Tag;
use dict::FrameDictionary;
use header::{ExtendedHeader, TagHeader};
use log::warn;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Read the ID3v2 tag leading the file at `path`. Returns `Ok(None)` when
/// there is no usable tag.
pub fn read_tag<P: AsRef<Path>>(path: P) -> ParseResult<Option<Tag>> {
    read_tag_from(File::open(path)?)
}

/// Read an ID3v2 tag from the start of `input`.
///
/// A missing or unsupported tag and any tag-level violation (bad size byte,
/// truncation) yield `Ok(None)`; only real I/O failures are errors.
pub fn read_tag_from<R: Read>(input: R) -> ParseResult<Option<Tag>> {
    let mut input = BufReader::new(input);

    let mut raw = [0; 10];
    if let Err(err) = input.read_exact(&mut raw) {
        return if err.kind() == ErrorKind::UnexpectedEof {
            Ok(None)
        } else {
            Err(err.into())
        };
    }

    let header = match TagHeader::parse(raw) {
        Ok(header) => header,
        Err(err) => {
            warn!(target: "id3v2", "no usable tag: {}", err);
            return Ok(None);
        }
    };

    let mut tag = Tag::new(header.version, header.revision, header.tag_size);

    {
        let flags = tag.flags_mut();
        flags.unsync = header.unsync;
        flags.experimental = header.experimental;
        flags.footer = header.footer;
    }

    // Everything after the tag header, extended header included, runs
    // through the filter when the unsync flag is set.
    let mut stream = UnsyncStream::new(input, header.unsync);

    if header.extended {
        match ExtendedHeader::parse(&mut stream, header.version) {
            Ok(ext) => {
                let flags = tag.flags_mut();
                flags.extended_header_size = Some(ext.size);
                flags.tag_is_update = ext.tag_is_update;
                flags.crc32 = ext.crc32;
                flags.padding_size = ext.padding_size;
                flags.restrictions = ext.restrictions;
            }
            Err(err) => return absent_or_raise(err),
        }
    }

    let dict = FrameDictionary::new(header.version);

    match frames::read_frames(&mut tag, &dict, &mut stream, u64::from(header.tag_size)) {
        Ok(()) => Ok(Some(tag)),
        Err(err) => absent_or_raise(err),
    }
}

/// Map a tag-level failure to an absent tag, letting genuine I/O errors
/// through. An unexpected EOF is truncation, which also abandons the tag.
fn absent_or_raise(err: ParseError) -> ParseResult<Option<Tag>> {
    match err {
        ParseError::Io(io_err) if io_err.kind() != ErrorKind::UnexpectedEof => {
            Err(ParseError::Io(io_err))
        }
        err => {
            warn!(target: "id3v2", "abandoning tag: {}", err);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{FrameBody, FrameKind};
    use crate::string::Encoding;
    use crate::version::Version;
    use std::io::Cursor;

    fn read(data: &[u8]) -> Option<Tag> {
        read_tag_from(Cursor::new(data.to_vec())).unwrap()
    }

    #[test]
    fn read_v3_text_frame() {
        let data = b"ID3\x03\x00\x00\x00\x00\x00\x0C\
                     TIT2\x00\x00\x00\x02\x00\x00\
                     \x00X";
        let tag = read(data).unwrap();

        assert_eq!(tag.version(), Version::V2r3);
        assert_eq!(tag.declared_size(), 12);
        assert_eq!(tag.frames().len(), 1);

        let frame = &tag.frames()[0];
        assert_eq!(frame.kind(), FrameKind::Title);
        assert_eq!(frame.total_size(), 12);
        assert_eq!(frame.text(), Some("X"));
    }

    #[test]
    fn read_v2_text_frame() {
        // ID3v2.2: 6-byte frame headers with 3-character identifiers.
        let data = b"ID3\x02\x00\x00\x00\x00\x00\x08\
                     TT2\x00\x00\x02\
                     \x00X";
        let tag = read(data).unwrap();

        assert_eq!(tag.version(), Version::V2r0);
        let frame = &tag.frames()[0];
        assert_eq!(frame.kind(), FrameKind::Title);
        assert_eq!(frame.total_size(), 8);
        assert_eq!(frame.text(), Some("X"));
    }

    #[test]
    fn read_v4_multi_string() {
        let data = b"ID3\x04\x00\x00\x00\x00\x00\x17\
                     TCON\x00\x00\x00\x0D\x00\x00\
                     \x00Rock\0Electro";
        let tag = read(data).unwrap();

        let frame = &tag.frames()[0];
        assert_eq!(frame.kind(), FrameKind::Genre);

        match frame.body() {
            FrameBody::Text(text) => {
                assert_eq!(text.text, vec!["Rock", "Electro"]);
            }
            other => panic!("expected a text body, found {:?}", other),
        }
    }

    #[test]
    fn read_unsynced_tag() {
        // Unsync flag set; the UTF-16 BOM's FF has a guard zero after it.
        // The frame size field counts the bytes as seen through the filter,
        // while the declared size and the recorded frame size count the
        // stored bytes, so the accounting still closes.
        let data = b"ID3\x03\x00\x80\x00\x00\x00\x12\
                     TIT2\x00\x00\x00\x07\x00\x00\
                     \x01\xFF\x00\xFE\x58\x00\x00\x00";
        let tag = read(data).unwrap();

        assert!(tag.flags().unsync);

        let frame = &tag.frames()[0];
        assert_eq!(frame.total_size(), 18);
        assert_eq!(frame.total_size() + tag.padding(), tag.declared_size());

        match frame.body() {
            FrameBody::Text(text) => {
                assert_eq!(text.encoding, Encoding::Utf16);
                assert_eq!(text.text, vec!["X"]);
            }
            other => panic!("expected a text body, found {:?}", other),
        }
    }

    #[test]
    fn absent_on_invalid_size() {
        let data = b"ID3\x03\x00\x00\x80\x00\x00\x00";
        assert!(read(data).is_none());
    }

    #[test]
    fn absent_on_truncation() {
        // Declared size runs past the end of the data.
        let data = b"ID3\x03\x00\x00\x00\x00\x01\x00\
                     TIT2\x00\x00\x00\x40\x00\x00\x00X";
        assert!(read(data).is_none());
    }

    #[test]
    fn absent_on_garbage() {
        assert!(read(b"not an id3 tag at all").is_none());
        assert!(read(b"").is_none());
    }

    #[test]
    fn padding_accounts_for_declared_size() {
        // One 12-byte frame followed by 20 bytes of padding.
        let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x20\
                         TIT2\x00\x00\x00\x02\x00\x00\
                         \x00X"
            .to_vec();
        data.resize(10 + 0x20, 0);

        let tag = read(&data).unwrap();
        let frame_sizes: u32 = tag.frames().iter().map(|frame| frame.total_size()).sum();

        assert_eq!(frame_sizes + tag.padding(), tag.declared_size());
        assert_eq!(tag.padding(), 20);
    }

    #[test]
    fn unknown_frames_are_skipped() {
        // A PRIV frame this crate does not decode, then a known frame.
        let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x20\
                         PRIV\x00\x00\x00\x0A\x00\x00"
            .to_vec();
        data.extend(b"owner\0\x01\x02\x03\x04");
        data.extend(b"TIT2\x00\x00\x00\x02\x00\x00\x00X");

        let tag = read(&data).unwrap();

        assert_eq!(tag.frames().len(), 1);
        assert_eq!(tag.frames()[0].kind(), FrameKind::Title);
        assert_eq!(tag.padding(), 20);
    }

    #[test]
    fn malformed_frame_is_dropped_not_fatal() {
        // First frame carries an invalid encoding byte, second is fine.
        let data = b"ID3\x03\x00\x00\x00\x00\x00\x18\
                     TIT2\x00\x00\x00\x02\x00\x00\
                     \x09X\
                     TALB\x00\x00\x00\x02\x00\x00\
                     \x00A";
        let tag = read(data).unwrap();

        assert_eq!(tag.frames().len(), 1);
        assert_eq!(tag.frames()[0].kind(), FrameKind::Album);
        assert_eq!(tag.padding(), 12);
    }

    #[test]
    fn discard_set_overrides_preserve_bit() {
        // TLEN with the preserve-on-file-alter bit set; the static discard
        // list wins.
        let data = b"ID3\x03\x00\x00\x00\x00\x00\x0E\
                     TLEN\x00\x00\x00\x04\x40\x00\
                     \x00123";
        let tag = read(data).unwrap();

        let frame = &tag.frames()[0];
        assert_eq!(frame.kind(), FrameKind::Length);
        assert!(!frame.flags().preserve_on_file_alter);
    }

    #[test]
    fn v3_frame_extras() {
        // Group flag set: one group id byte leads the body.
        let data = b"ID3\x03\x00\x00\x00\x00\x00\x0D\
                     TIT2\x00\x00\x00\x03\x00\x20\
                     \x42\x00X";
        let tag = read(data).unwrap();

        let frame = &tag.frames()[0];
        assert_eq!(frame.flags().group_id, Some(0x42));
        assert_eq!(frame.text(), Some("X"));
    }

    #[test]
    fn v4_frame_level_unsync() {
        // Frame flag bit 1 set, tag-level unsync clear: the body alone is
        // de-unsynchronised.
        let data = b"ID3\x04\x00\x00\x00\x00\x00\x10\
                     TIT2\x00\x00\x00\x06\x00\x02\
                     \x01\xFF\x00\xFE\x58\x00";
        let tag = read(data).unwrap();

        let frame = &tag.frames()[0];
        assert!(frame.flags().unsync);
        assert_eq!(frame.text(), Some("X"));
    }
}
