use crate::core::io::UnsyncStream;
use crate::core::raw;
use crate::err::{ParseError, ParseResult};
use crate::id3v2::syncdata;
use crate::version::Version;
use log::{debug, warn};
use std::convert::TryInto;
use std::io::Read;

pub(crate) const ID_HEADER: &[u8] = b"ID3";

/// The 10-byte header leading every ID3v2 tag.
pub(crate) struct TagHeader {
    pub version: Version,
    pub revision: u8,
    pub tag_size: u32,
    pub unsync: bool,
    pub extended: bool,
    pub experimental: bool,
    pub footer: bool,
}

impl TagHeader {
    pub(crate) fn parse(raw: [u8; 10]) -> ParseResult<Self> {
        if &raw[0..3] != ID_HEADER {
            return Err(ParseError::MalformedFrame);
        }

        let version = match raw[3] {
            // Real v2.2 files carry a major byte of 2; 0 is how the probe
            // reports the revision and is accepted for symmetry.
            0 | 2 => Version::V2r0,
            3 => Version::V2r3,
            4 => Version::V2r4,
            _ => return Err(ParseError::Unsupported),
        };

        let revision = raw[4];
        let flags = raw[5];

        let mut header = TagHeader {
            version,
            revision,
            tag_size: 0,
            unsync: raw::bit_at(7, flags),
            extended: false,
            experimental: false,
            footer: false,
        };

        match version {
            Version::V2r0 => {
                // Bit 6 marks whole-tag compression, which has no defined
                // scheme in v2.2. ID3v2.2 says to ignore such tags entirely.
                if raw::bit_at(6, flags) {
                    warn!(target: "id3v2", "ignoring v2.2 tag with compression bit set");
                    return Err(ParseError::Unsupported);
                }
            }
            Version::V2r3 => {
                header.extended = raw::bit_at(6, flags);
                header.experimental = raw::bit_at(5, flags);
            }
            _ => {
                header.extended = raw::bit_at(6, flags);
                header.experimental = raw::bit_at(5, flags);
                header.footer = raw::bit_at(4, flags);
            }
        }

        // Tag size is always 4 bytes, so we can unwrap here.
        header.tag_size = syncdata::to_u28(raw[6..10].try_into().unwrap())?;

        Ok(header)
    }
}

/// An extended header, recorded but never acted upon.
#[derive(Default)]
pub(crate) struct ExtendedHeader {
    pub size: u32,
    pub tag_is_update: bool,
    pub crc32: Option<u64>,
    pub padding_size: Option<u32>,
    pub restrictions: Option<u8>,
}

impl ExtendedHeader {
    pub(crate) fn parse<R: Read>(
        stream: &mut UnsyncStream<R>,
        version: Version,
    ) -> ParseResult<Self> {
        match version {
            Version::V2r3 => read_ext_v3(stream),
            Version::V2r4 => read_ext_v4(stream),
            _ => Err(ParseError::Unsupported),
        }
    }
}

fn read_ext_v3<R: Read>(stream: &mut UnsyncStream<R>) -> ParseResult<ExtendedHeader> {
    // Plain big-endian size, 2 flag bytes, 4 bytes of declared padding. The
    // size excludes itself and is 6 without a CRC, 10 with one.
    let size = raw::to_size(&stream.read_array::<4>()?);
    let flags = stream.read_array::<2>()?;
    let padding = raw::to_size(&stream.read_array::<4>()?);

    let mut header = ExtendedHeader {
        size,
        padding_size: Some(padding),
        ..Default::default()
    };

    if raw::bit_at(7, flags[0]) {
        header.crc32 = Some(u64::from(raw::to_size(&stream.read_array::<4>()?)));
    }

    Ok(header)
}

fn read_ext_v4<R: Read>(stream: &mut UnsyncStream<R>) -> ParseResult<ExtendedHeader> {
    let size = syncdata::to_u28(stream.read_array()?)?;

    if size < 6 {
        warn!(target: "id3v2", "invalid extended header size {}", size);
        return Err(ParseError::MalformedFrame);
    }

    let mut header = ExtendedHeader {
        size,
        ..Default::default()
    };

    let flag_bytes = stream.read_u8()?;
    if flag_bytes != 1 {
        warn!(
            target: "id3v2",
            "extended header should have one flag byte, found {}", flag_bytes
        );
        return Ok(header);
    }

    let flags = stream.read_u8()?;

    // Each set flag is followed by a length-prefixed sub-field, in flag-bit
    // order from the MSB down.
    if raw::bit_at(6, flags) {
        header.tag_is_update = true;

        let len = stream.read_u8()?;
        if len != 0 {
            warn!(
                target: "id3v2",
                "tag-is-update data length should be 0, found {}", len
            );
            stream.skip(u64::from(len))?;
        }
    }

    if raw::bit_at(5, flags) {
        let len = stream.read_u8()?;
        if len == 5 {
            header.crc32 = Some(syncdata::to_u35(stream.read_array()?));
        } else {
            warn!(
                target: "id3v2",
                "CRC data length should be 5, found {}", len
            );
            stream.skip(u64::from(len))?;
        }
    }

    if raw::bit_at(4, flags) {
        let len = stream.read_u8()?;
        if len == 1 {
            let restrictions = stream.read_u8()?;
            header.restrictions = Some(restrictions);
            log_restrictions(restrictions);
        } else {
            warn!(
                target: "id3v2",
                "restrictions data length should be 1, found {}", len
            );
            stream.skip(u64::from(len))?;
        }
    }

    Ok(header)
}

fn log_restrictions(byte: u8) {
    // Diagnostics only, nothing is enforced.
    debug!(target: "id3v2", "tag size restriction: {}", (byte & 0xC0) >> 6);
    debug!(target: "id3v2", "text encoding restriction: {}", (byte & 0x20) >> 5);
    debug!(target: "id3v2", "text field size restriction: {}", (byte & 0x18) >> 3);
    debug!(target: "id3v2", "image encoding restriction: {}", (byte & 0x04) >> 2);
    debug!(target: "id3v2", "image size restriction: {}", byte & 0x03);
}
