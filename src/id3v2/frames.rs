//! The wire-level frame reader.
//!
//! Each revision frames its payload differently: v2.2 uses a 6-byte header
//! with a 3-character identifier, v2.3 a 10-byte header with a plain
//! big-endian size, and v2.4 a 10-byte header with a sync-safe size. The
//! readers here peel those layers off and hand the body to the decoders in
//! [`crate::frames`].

use crate::core::io::{BufStream, UnsyncStream};
use crate::core::raw;
use crate::err::{ParseError, ParseResult};
use crate::frames::{
    AttachedPictureFrame, CommentsFrame, FileIdFrame, Frame, FrameBody, FrameFlags, FrameId,
    FrameKind, InvolvedPeopleFrame, MusicCdIdFrame, PodcastFrame, TextFrame, UrlFrame,
    UserTextFrame, UserUrlFrame,
};
use crate::id3v2::dict::FrameDictionary;
use crate::id3v2::{compat, syncdata};
use crate::tag::Tag;
use crate::version::Version;
use log::warn;
use std::io::Read;

/// What reading one frame yielded.
enum Step {
    /// A decoded frame.
    Frame(Frame),
    /// The all-zero identifier: everything from here on is padding.
    Padding,
    /// An unknown or undecodable frame; this many header and body bytes
    /// were consumed without emitting anything.
    Skipped(u32),
}

/// Read frames until the declared payload size is exhausted. Size accounting
/// uses only the stream's underlying byte count: emitted frame sizes and
/// skipped bytes are raw on-disk spans, so their sum plus the final padding
/// always equals the consumed part of `payload`.
pub(crate) fn read_frames<R: Read>(
    tag: &mut Tag,
    dict: &FrameDictionary,
    stream: &mut UnsyncStream<R>,
    payload: u64,
) -> ParseResult<()> {
    let version = tag.version();
    let header_size = header_size(version);

    loop {
        let before = stream.consumed();
        let left = payload.saturating_sub(before);

        if left < header_size {
            // Too small for another header; whatever remains is padding.
            if left > 0 {
                stream.skip_raw(left)?;
                tag.add_padding(left as u32);
            }
            return Ok(());
        }

        let step = match version {
            Version::V2r0 => read_frame_v2(stream, dict, left),
            Version::V2r3 => read_frame_v3(stream, dict, left),
            _ => read_frame_v4(stream, dict, left, tag.flags().unsync),
        }?;

        match step {
            Step::Frame(frame) => tag.push(frame),
            Step::Skipped(n) => tag.add_padding(n),
            Step::Padding => {
                let rest = payload.saturating_sub(stream.consumed());
                stream.skip_raw(rest)?;
                tag.add_padding((payload - before) as u32);
                return Ok(());
            }
        }
    }
}

pub(crate) fn header_size(version: Version) -> u64 {
    match version {
        Version::V2r0 => 6,
        _ => 10,
    }
}

fn read_frame_v2<R: Read>(
    stream: &mut UnsyncStream<R>,
    dict: &FrameDictionary,
    left: u64,
) -> ParseResult<Step> {
    let start = stream.consumed();
    let id_raw: [u8; 3] = stream.read_array()?;

    if id_raw == [0; 3] {
        return Ok(Step::Padding);
    }

    let size = raw::to_size(&stream.read_array::<3>()?);

    if u64::from(size) > left.saturating_sub(6) {
        return Err(ParseError::NotEnoughData);
    }

    if size == 0 {
        warn!(target: "id3v2", "dropping empty frame {}", show_id(&id_raw));
        return Ok(Step::Skipped(span(stream, start)));
    }

    // Resolve the 3-character identifier to its 4-character form. Unknown
    // identifiers that still look like text or URL frames decode under the
    // user-defined kinds; everything else is skipped.
    let known = compat::upgrade_v2_id(&id_raw)
        .ok()
        .and_then(|id| dict.kind_of(id).map(|kind| (id, kind)));

    if known.is_none() && id_raw[0] != b'T' && id_raw[0] != b'W' {
        warn!(
            target: "id3v2",
            "skipping unsupported frame {} of length {}", show_id(&id_raw), size
        );
        stream.skip(u64::from(size))?;
        return Ok(Step::Skipped(span(stream, start)));
    }

    let body = stream.read_vec(size as usize)?;
    let total = span(stream, start);
    let mut body = BufStream::new(&body);

    let (kind, decoded) = match known {
        Some((id, kind)) => (kind, decode_body(id, kind, Version::V2r0, &mut body)),
        None if id_raw[0] == b'T' => {
            warn!(target: "id3v2", "unknown text frame {}", show_id(&id_raw));
            (
                FrameKind::UserDefinedText,
                TextFrame::parse(&mut body, Version::V2r0).map(FrameBody::Text),
            )
        }
        _ => {
            warn!(target: "id3v2", "unknown URL frame {}", show_id(&id_raw));
            (
                FrameKind::UserDefinedUrl,
                UrlFrame::parse(&mut body).map(FrameBody::Url),
            )
        }
    };

    match decoded {
        Ok(body) => Ok(Step::Frame(Frame::new(
            kind,
            total,
            FrameFlags::default(),
            body,
        ))),
        Err(err) => {
            warn!(
                target: "id3v2",
                "dropping malformed frame {}: {}", show_id(&id_raw), err
            );
            Ok(Step::Skipped(total))
        }
    }
}

fn read_frame_v3<R: Read>(
    stream: &mut UnsyncStream<R>,
    dict: &FrameDictionary,
    left: u64,
) -> ParseResult<Step> {
    let start = stream.consumed();
    let id_raw: [u8; 4] = stream.read_array()?;

    if id_raw == [0; 4] {
        return Ok(Step::Padding);
    }

    // A garbled identifier means the frame boundaries can no longer be
    // trusted, which abandons the whole tag.
    let id = FrameId::parse(&id_raw)?;
    let size = raw::to_size(&stream.read_array::<4>()?);
    let flag_bits = u16::from_be_bytes(stream.read_array()?);

    if u64::from(size) > left.saturating_sub(10) {
        return Err(ParseError::NotEnoughData);
    }

    if size == 0 {
        warn!(target: "id3v2", "dropping empty frame {}", id);
        return Ok(Step::Skipped(span(stream, start)));
    }

    let mut flags = FrameFlags {
        preserve_on_tag_alter: flag_bits & 0x8000 != 0,
        preserve_on_file_alter: !dict.discard_on_file_alter(id) && flag_bits & 0x4000 != 0,
        read_only: flag_bits & 0x2000 != 0,
        compressed: flag_bits & 0x0080 != 0,
        ..Default::default()
    };

    let encrypted = flag_bits & 0x0040 != 0;
    let grouped = flag_bits & 0x0020 != 0;

    let body = stream.read_vec(size as usize)?;
    let total = span(stream, start);
    let mut body = BufStream::new(&body);

    // The extra fields lead the body in this order: the decompressed size
    // (plain big-endian, not sync-safe), the encryption method, the group id.
    let extras = (|| -> ParseResult<()> {
        if flags.compressed {
            flags.data_length = Some(body.read_u32()?);
        }

        if encrypted {
            flags.encryption_method = Some(body.read_u8()?);
        }

        if grouped {
            flags.group_id = Some(body.read_u8()?);
        }

        Ok(())
    })();

    if extras.is_err() {
        warn!(target: "id3v2", "dropping malformed frame {}", id);
        return Ok(Step::Skipped(total));
    }

    finish_frame(id, dict, Version::V2r3, flags, encrypted, total, body)
}

fn read_frame_v4<R: Read>(
    stream: &mut UnsyncStream<R>,
    dict: &FrameDictionary,
    left: u64,
    tag_unsync: bool,
) -> ParseResult<Step> {
    let start = stream.consumed();
    let id_raw: [u8; 4] = stream.read_array()?;

    if id_raw == [0; 4] {
        return Ok(Step::Padding);
    }

    let id = FrameId::parse(&id_raw)?;

    // A non-sync-safe size leaves no reliable next frame boundary, so the
    // tag is abandoned rather than guessed at.
    let size = syncdata::to_u28(stream.read_array()?)?;
    let flag_bits = u16::from_be_bytes(stream.read_array()?);

    if u64::from(size) > left.saturating_sub(10) {
        return Err(ParseError::NotEnoughData);
    }

    if size == 0 {
        warn!(target: "id3v2", "dropping empty frame {}", id);
        return Ok(Step::Skipped(span(stream, start)));
    }

    let mut flags = FrameFlags {
        preserve_on_tag_alter: flag_bits & 0x4000 != 0,
        preserve_on_file_alter: !dict.discard_on_file_alter(id) && flag_bits & 0x2000 != 0,
        read_only: flag_bits & 0x1000 != 0,
        compressed: flag_bits & 0x0008 != 0,
        unsync: flag_bits & 0x0002 != 0,
        ..Default::default()
    };

    let encrypted = flag_bits & 0x0004 != 0;
    let grouped = flag_bits & 0x0040 != 0;
    let has_data_length = flag_bits & 0x0001 != 0;

    let mut raw_body = stream.read_vec(size as usize)?;
    let total = span(stream, start);

    // Frame-level unsynchronisation is reversed at most once: if the
    // tag-level flag was set, the streaming filter already did it.
    if flags.unsync && !tag_unsync {
        raw_body = syncdata::decode(&raw_body);
    }

    let mut body = BufStream::new(&raw_body);

    // Extra fields in their fixed order: group id, encryption method,
    // sync-safe data length indicator.
    let extras = (|| -> ParseResult<()> {
        if grouped {
            flags.group_id = Some(body.read_u8()?);
        }

        if encrypted {
            flags.encryption_method = Some(body.read_u8()?);
        }

        if has_data_length {
            flags.data_length = Some(syncdata::to_u28(body.read_array()?)?);
        }

        Ok(())
    })();

    if extras.is_err() {
        warn!(target: "id3v2", "dropping malformed frame {}", id);
        return Ok(Step::Skipped(total));
    }

    finish_frame(id, dict, Version::V2r4, flags, encrypted, total, body)
}

/// Decode the remaining body and build the frame. Compressed and encrypted
/// bodies are beyond decoding and are passed through raw.
fn finish_frame(
    id: FrameId,
    dict: &FrameDictionary,
    version: Version,
    flags: FrameFlags,
    encrypted: bool,
    total: u32,
    mut body: BufStream,
) -> ParseResult<Step> {
    if flags.compressed || encrypted {
        warn!(
            target: "id3v2",
            "delivering {} raw: compression and encryption are not handled", id
        );

        let raw = FrameBody::Unknown(body.take_rest().to_vec());
        let kind = dict.kind_of(id).unwrap_or(FrameKind::UserDefinedText);
        return Ok(Step::Frame(Frame::new(kind, total, flags, raw)));
    }

    let (kind, decoded) = match dict.kind_of(id) {
        Some(kind) => (kind, decode_body(id, kind, version, &mut body)),
        // Unknown identifiers: text-shaped and URL-shaped frames still
        // decode under the user-defined kinds, the rest are skipped.
        None if id.starts_with(b'T') => {
            warn!(target: "id3v2", "unknown text frame {}", id);
            (
                FrameKind::UserDefinedText,
                TextFrame::parse(&mut body, version).map(FrameBody::Text),
            )
        }
        None if id.starts_with(b'W') => {
            warn!(target: "id3v2", "unknown URL frame {}", id);
            (
                FrameKind::UserDefinedUrl,
                UrlFrame::parse(&mut body).map(FrameBody::Url),
            )
        }
        None => {
            warn!(target: "id3v2", "skipping unsupported frame {}", id);
            return Ok(Step::Skipped(total));
        }
    };

    match decoded {
        Ok(body) => Ok(Step::Frame(Frame::new(kind, total, flags, body))),
        Err(err) => {
            warn!(target: "id3v2", "dropping malformed frame {}: {}", id, err);
            Ok(Step::Skipped(total))
        }
    }
}

fn decode_body(
    id: FrameId,
    kind: FrameKind,
    version: Version,
    body: &mut BufStream,
) -> ParseResult<FrameBody> {
    let body = match id.inner() {
        b"TXXX" => FrameBody::UserText(UserTextFrame::parse(body, version)?),
        b"WXXX" => FrameBody::UserUrl(UserUrlFrame::parse(body, version)?),
        b"UFID" => FrameBody::FileId(FileIdFrame::parse(body)?),
        b"MCDI" => FrameBody::MusicCdId(MusicCdIdFrame::parse(body)?),
        b"APIC" => FrameBody::Picture(AttachedPictureFrame::parse(body, version)?),
        b"COMM" => FrameBody::Comment(CommentsFrame::parse(body, version)?),
        b"IPLS" => FrameBody::InvolvedPeople(InvolvedPeopleFrame::parse(body, version)?),
        b"PCST" => FrameBody::Podcast(PodcastFrame::parse(body)?),
        _ if kind.is_url() => FrameBody::Url(UrlFrame::parse(body)?),
        _ => FrameBody::Text(TextFrame::parse(body, version)?),
    };

    Ok(body)
}

/// The underlying bytes a frame occupied, measured from `start`. Under
/// tag-level unsynchronisation this is larger than the header plus the size
/// field, since every collapsed guard pair is one extra stored byte.
fn span<R: Read>(stream: &UnsyncStream<R>, start: u64) -> u32 {
    (stream.consumed() - start) as u32
}

fn show_id(id: &[u8]) -> String {
    id.iter().map(|&byte| byte as char).collect()
}
