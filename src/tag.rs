use crate::frames::{Frame, FrameKind};
use crate::version::Version;

/// A parsed tag. Frames are kept in source order; tag content is only
/// observable through the accessors here and on [`Frame`](crate::frames::Frame).
pub struct Tag {
    version: Version,
    revision: u8,
    declared_size: u32,
    flags: TagFlags,
    frames: Vec<Frame>,
    padding: u32,
}

impl Tag {
    pub(crate) fn new(version: Version, revision: u8, declared_size: u32) -> Self {
        Tag {
            version,
            revision,
            declared_size,
            flags: TagFlags::default(),
            frames: Vec::new(),
            padding: 0,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn revision(&self) -> u8 {
        self.revision
    }

    /// The payload size the tag header declared. For v1 this is the whole
    /// 128-byte record.
    pub fn declared_size(&self) -> u32 {
        self.declared_size
    }

    pub fn flags(&self) -> &TagFlags {
        &self.flags
    }

    pub(crate) fn flags_mut(&mut self) -> &mut TagFlags {
        &mut self.flags
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Bytes that were skipped as padding or unknown frames, so that
    /// `frames().iter().map(total_size).sum() + padding() == declared_size()`
    /// holds for tags without an extended header.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub(crate) fn add_padding(&mut self, n: u32) {
        self.padding += n;
    }

    /// The first frame of the given kind, in source order.
    pub fn get(&self, kind: FrameKind) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.kind() == kind)
    }

    /// Every frame of the given kind, in source order.
    pub fn get_all(&self, kind: FrameKind) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(move |frame| frame.kind() == kind)
    }

    /// The first text value of the first frame of the given kind.
    pub fn text(&self, kind: FrameKind) -> Option<&str> {
        self.get(kind).and_then(Frame::text)
    }
}

/// Tag-level flags and extended-header fields, as read. None of these are
/// acted upon; the CRC in particular is recorded but never verified.
#[derive(Clone, Debug, Default)]
pub struct TagFlags {
    pub unsync: bool,
    pub experimental: bool,
    pub footer: bool,
    pub extended_header_size: Option<u32>,
    pub tag_is_update: bool,
    pub crc32: Option<u64>,
    /// Declared padding size, from the v2.3 extended header.
    pub padding_size: Option<u32>,
    /// The raw v2.4 restrictions byte; decoded to log output only.
    pub restrictions: Option<u8>,
}

impl TagFlags {
    /// The recorded CRC-32 as lower-case hex, if one was present.
    pub fn crc32_hex(&self) -> Option<String> {
        self.crc32.map(|crc| format!("{:x}", crc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{FrameBody, FrameFlags, TextFrame};

    #[test]
    fn frame_lookup() {
        let mut tag = Tag::new(Version::V2r3, 0, 64);

        tag.push(Frame::new(
            FrameKind::Title,
            11,
            FrameFlags::default(),
            FrameBody::Text(TextFrame::plain("First".to_string())),
        ));
        tag.push(Frame::new(
            FrameKind::Title,
            12,
            FrameFlags::default(),
            FrameBody::Text(TextFrame::plain("Second".to_string())),
        ));

        assert_eq!(tag.text(FrameKind::Title), Some("First"));
        assert_eq!(tag.get_all(FrameKind::Title).count(), 2);
        assert!(tag.get(FrameKind::Album).is_none());
    }

    #[test]
    fn crc_hex_rendering() {
        let mut flags = TagFlags::default();
        assert_eq!(flags.crc32_hex(), None);

        flags.crc32 = Some(0xDEADBEEF);
        assert_eq!(flags.crc32_hex().unwrap(), "deadbeef");
    }
}
