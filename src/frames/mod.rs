//! The uniform frame model.
//!
//! Every tag revision decodes into the same `Frame` shape: a canonical kind
//! that is independent of the revision-specific identifier, the flags the
//! wire format carried, the total on-disk size, and a body that is a sum
//! over the payload layouts ID3 defines. Frames tend to be heterogenous, so
//! the body is a tagged enum rather than one large struct.

pub mod bin;
pub mod comments;
pub(crate) mod encoding;
pub mod file;
pub mod text;
pub mod url;

pub use bin::{FileIdFrame, MusicCdIdFrame, PodcastFrame};
pub use comments::CommentsFrame;
pub use file::AttachedPictureFrame;
pub use text::{InvolvedPeopleFrame, TextFrame, UserTextFrame};
pub use url::{UrlFrame, UserUrlFrame};

use crate::err::{ParseError, ParseResult};
use std::fmt::{self, Display, Formatter};
use std::str;

/// One decoded frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub(crate) kind: FrameKind,
    pub(crate) total_size: u32,
    pub(crate) flags: FrameFlags,
    pub(crate) body: FrameBody,
}

impl Frame {
    pub(crate) fn new(kind: FrameKind, total_size: u32, flags: FrameFlags, body: FrameBody) -> Self {
        Frame {
            kind,
            total_size,
            flags,
            body,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// The size this frame occupied on disk, header included. For frames
    /// read through tag-level unsynchronisation this counts the stored
    /// bytes, guard zeroes included, so it can exceed the header size plus
    /// the frame's declared body size.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    pub fn flags(&self) -> &FrameFlags {
        &self.flags
    }

    pub fn body(&self) -> &FrameBody {
        &self.body
    }

    /// The first text value of this frame, if its body carries text.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            FrameBody::Text(frame) => frame.text.first().map(String::as_str),
            FrameBody::UserText(frame) => Some(&frame.value),
            FrameBody::Url(frame) => Some(&frame.url),
            FrameBody::UserUrl(frame) => Some(&frame.url),
            FrameBody::Comment(frame) => Some(&frame.text),
            _ => None,
        }
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.body)
    }
}

/// The common frame flags. Revisions without a flag field leave this at its
/// default. `preserve_on_file_alter` is forced to `false` for identifiers in
/// the revision's discard-when-altered set, whatever the file said.
#[derive(Clone, Debug, Default)]
pub struct FrameFlags {
    pub preserve_on_tag_alter: bool,
    pub preserve_on_file_alter: bool,
    pub read_only: bool,
    pub compressed: bool,
    pub unsync: bool,
    pub data_length: Option<u32>,
    pub encryption_method: Option<u8>,
    pub group_id: Option<u8>,
}

/// The payload of a frame.
#[derive(Clone, Debug)]
pub enum FrameBody {
    Text(TextFrame),
    UserText(UserTextFrame),
    Url(UrlFrame),
    UserUrl(UserUrlFrame),
    Comment(CommentsFrame),
    FileId(FileIdFrame),
    MusicCdId(MusicCdIdFrame),
    Picture(AttachedPictureFrame),
    InvolvedPeople(InvolvedPeopleFrame),
    Podcast(PodcastFrame),
    /// A body that was delivered raw because its feature flags (compression,
    /// encryption) put it beyond decoding.
    Unknown(Vec<u8>),
}

impl Display for FrameBody {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FrameBody::Text(frame) => frame.fmt(f),
            FrameBody::UserText(frame) => frame.fmt(f),
            FrameBody::Url(frame) => frame.fmt(f),
            FrameBody::UserUrl(frame) => frame.fmt(f),
            FrameBody::Comment(frame) => frame.fmt(f),
            FrameBody::FileId(frame) => frame.fmt(f),
            FrameBody::MusicCdId(frame) => frame.fmt(f),
            FrameBody::Picture(frame) => frame.fmt(f),
            FrameBody::InvolvedPeople(frame) => frame.fmt(f),
            FrameBody::Podcast(frame) => frame.fmt(f),
            FrameBody::Unknown(data) => {
                for byte in data.iter().take(64) {
                    write!(f, "{:02x}", byte)?;
                }

                Ok(())
            }
        }
    }
}

/// The normalised identity of a frame, shared by every revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    ContentGroup,
    Title,
    Subtitle,
    LeadArtist,
    Band,
    Conductor,
    Remixer,
    Composer,
    Lyricist,
    Language,
    Genre,
    Album,
    DiscNumber,
    TrackNumber,
    Isrc,
    Year,
    Date,
    Time,
    RecordingDates,
    MediaType,
    FileType,
    Bpm,
    Copyright,
    Publisher,
    Encoder,
    EncoderSettings,
    OriginalFilename,
    Length,
    Size,
    PlaylistDelay,
    InitialKey,
    OriginalAlbum,
    OriginalArtist,
    OriginalLyricist,
    OriginalReleaseYear,
    FileOwner,
    StationName,
    StationOwner,
    PodcastId,
    PodcastCategory,
    PodcastDescription,
    PodcastKeywords,
    PodcastUrl,
    ReleaseTime,
    EncodingTime,
    OriginalReleaseTime,
    RecordingTime,
    TaggingTime,
    Mood,
    ProducedNotice,
    AlbumSortOrder,
    PerformerSortOrder,
    TitleSortOrder,
    SetSubtitle,
    InvolvedPeople,
    MusicianCredits,
    UrlFile,
    UrlArtist,
    UrlSource,
    UrlCommercial,
    UrlCopyright,
    UrlPublisher,
    UrlRadio,
    UrlPayment,
    UserDefinedText,
    UserDefinedUrl,
    UniqueFileId,
    MusicCdId,
    AttachedPicture,
    Comment,
    ItunesPodcast,
}

impl FrameKind {
    /// Whether this kind is decoded as a bare URL frame. `PodcastUrl` (WFED)
    /// is deliberately absent: it carries an encoding byte and is decoded as
    /// text despite its name.
    pub(crate) fn is_url(&self) -> bool {
        matches!(
            self,
            FrameKind::UrlFile
                | FrameKind::UrlArtist
                | FrameKind::UrlSource
                | FrameKind::UrlCommercial
                | FrameKind::UrlCopyright
                | FrameKind::UrlPublisher
                | FrameKind::UrlRadio
                | FrameKind::UrlPayment
                | FrameKind::UserDefinedUrl
        )
    }
}

/// A 4-character ID3v2 frame identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FrameId([u8; 4]);

impl FrameId {
    pub(crate) fn new(id: &[u8; 4]) -> Self {
        Self::parse(id).expect("frame IDs must be 4 uppercase ASCII characters or numbers")
    }

    pub(crate) fn parse(id: &[u8; 4]) -> ParseResult<Self> {
        for ch in id {
            // Valid frame IDs can only contain uppercase ASCII chars and numbers.
            if !(b'A'..=b'Z').contains(ch) && !(b'0'..=b'9').contains(ch) {
                return Err(ParseError::MalformedFrame);
            }
        }

        Ok(Self(*id))
    }

    pub(crate) fn inner(&self) -> &[u8; 4] {
        &self.0
    }

    pub(crate) fn as_str(&self) -> &str {
        // We've asserted that this id is ASCII, so we can unwrap.
        str::from_utf8(&self.0).unwrap()
    }

    pub(crate) fn starts_with(&self, ch: u8) -> bool {
        self.0[0] == ch
    }
}

impl Display for FrameId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq<[u8; 4]> for FrameId {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0 == *other
    }
}
