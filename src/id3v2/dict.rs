//! The per-revision frame dictionaries.
//!
//! Each revision supports its own identifier set and carries its own list of
//! frames that are discarded when the file (not the tag) is altered. The
//! dictionaries are immutable once built; the tag reader builds the one for
//! its revision and hands it to the frames reader.

use crate::frames::{FrameId, FrameKind};
use crate::version::Version;
use indexmap::{IndexMap, IndexSet};

use FrameKind::*;

const KINDS_V3: &[(&[u8; 4], FrameKind)] = &[
    (b"UFID", UniqueFileId),
    (b"TIT1", ContentGroup),
    (b"TIT2", Title),
    (b"TIT3", Subtitle),
    (b"TPE1", LeadArtist),
    (b"TPE2", Band),
    (b"TPE3", Conductor),
    (b"TPE4", Remixer),
    (b"TCOM", Composer),
    (b"TEXT", Lyricist),
    (b"TLAN", Language),
    (b"TCON", Genre),
    (b"TDES", PodcastDescription),
    (b"TALB", Album),
    (b"TPOS", DiscNumber),
    (b"TRCK", TrackNumber),
    (b"TSRC", Isrc),
    (b"TYER", Year),
    (b"TDAT", Date),
    (b"TIME", Time),
    (b"TRDA", RecordingDates),
    (b"TMED", MediaType),
    (b"TFLT", FileType),
    (b"TBPM", Bpm),
    (b"TCOP", Copyright),
    (b"TPUB", Publisher),
    (b"TENC", Encoder),
    (b"TSSE", EncoderSettings),
    (b"TOFN", OriginalFilename),
    (b"TLEN", Length),
    (b"TSIZ", Size),
    (b"TDLY", PlaylistDelay),
    (b"TKEY", InitialKey),
    (b"TOAL", OriginalAlbum),
    (b"TOPE", OriginalArtist),
    (b"TOLY", OriginalLyricist),
    (b"TORY", OriginalReleaseYear),
    (b"TOWN", FileOwner),
    (b"TRSN", StationName),
    (b"TRSO", StationOwner),
    (b"TGID", PodcastId),
    (b"TCAT", PodcastCategory),
    (b"TDRL", ReleaseTime),
    (b"TKWD", PodcastKeywords),
    (b"TXXX", UserDefinedText),
    (b"WOAF", UrlFile),
    (b"WOAR", UrlArtist),
    (b"WOAS", UrlSource),
    (b"WCOM", UrlCommercial),
    (b"WCOP", UrlCopyright),
    (b"WPUB", UrlPublisher),
    (b"WORS", UrlRadio),
    (b"WPAY", UrlPayment),
    // Name and purpose suggest a URL frame, but WFED carries an encoding
    // byte and is decoded as text.
    (b"WFED", PodcastUrl),
    (b"WXXX", UserDefinedUrl),
    (b"IPLS", InvolvedPeople),
    (b"MCDI", MusicCdId),
    (b"COMM", Comment),
    (b"APIC", AttachedPicture),
    (b"PCST", ItunesPodcast),
];

/// Identifiers v2.4 dropped from the v2.3 set.
const REMOVED_V4: &[&[u8; 4]] = &[
    b"TYER", b"TDAT", b"TIME", b"TRDA", b"TSIZ", b"TORY", b"IPLS",
];

/// Identifiers v2.4 added.
const KINDS_V4: &[(&[u8; 4], FrameKind)] = &[
    (b"TDEN", EncodingTime),
    (b"TDLR", ReleaseTime),
    (b"TDOR", OriginalReleaseTime),
    (b"TDRC", RecordingTime),
    (b"TDTG", TaggingTime),
    (b"TIPL", InvolvedPeople),
    (b"TMCL", MusicianCredits),
    (b"TMOO", Mood),
    (b"TPRO", ProducedNotice),
    (b"TSOA", AlbumSortOrder),
    (b"TSOP", PerformerSortOrder),
    (b"TSOT", TitleSortOrder),
    (b"TSST", SetSubtitle),
];

const DISCARD_V3: &[&[u8; 4]] = &[
    b"AENC", b"ETCO", b"EQUA", b"MLLT", b"POSS", b"SYLT", b"SYTC", b"RVAD", b"TENC", b"TLEN",
    b"TSIZ",
];

const DISCARD_V4: &[&[u8; 4]] = &[
    b"ASPI", b"AENC", b"ETCO", b"EQU2", b"MLLT", b"POSS", b"SEEK", b"SYLT", b"SYTC", b"RVA2",
    b"TENC", b"TLEN",
];

pub(crate) struct FrameDictionary {
    kinds: IndexMap<FrameId, FrameKind>,
    discard: IndexSet<FrameId>,
}

impl FrameDictionary {
    pub fn new(version: Version) -> Self {
        match version {
            // v2.2 identifiers are upgraded to their 4-character form before
            // lookup, and v2.2 has no per-frame flags to discard.
            Version::V2r0 => Self::build(KINDS_V3, &[], &[], &[]),
            Version::V2r3 => Self::build(KINDS_V3, &[], &[], DISCARD_V3),
            Version::V2r4 => Self::build(KINDS_V3, REMOVED_V4, KINDS_V4, DISCARD_V4),
            _ => unreachable!("no frame dictionary for {}", version),
        }
    }

    fn build(
        base: &[(&[u8; 4], FrameKind)],
        removed: &[&[u8; 4]],
        added: &[(&[u8; 4], FrameKind)],
        discard: &[&[u8; 4]],
    ) -> Self {
        let mut kinds = IndexMap::with_capacity(base.len() + added.len());

        for &(id, kind) in base.iter().chain(added) {
            if !removed.contains(&id) {
                kinds.insert(FrameId::new(id), kind);
            }
        }

        let discard = discard.iter().map(|&id| FrameId::new(id)).collect();

        FrameDictionary { kinds, discard }
    }

    pub fn kind_of(&self, id: FrameId) -> Option<FrameKind> {
        self.kinds.get(&id).copied()
    }

    /// Whether the revision statically discards this frame when the file is
    /// altered, overriding whatever the flag bits said.
    pub fn discard_on_file_alter(&self, id: FrameId) -> bool {
        self.discard.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v3_lookups() {
        let dict = FrameDictionary::new(Version::V2r3);

        assert_eq!(dict.kind_of(FrameId::new(b"TIT2")), Some(Title));
        assert_eq!(dict.kind_of(FrameId::new(b"TYER")), Some(Year));
        assert_eq!(dict.kind_of(FrameId::new(b"IPLS")), Some(InvolvedPeople));
        assert_eq!(dict.kind_of(FrameId::new(b"TDRC")), None);
        assert_eq!(dict.kind_of(FrameId::new(b"PRIV")), None);
    }

    #[test]
    fn v4_lookups() {
        let dict = FrameDictionary::new(Version::V2r4);

        assert_eq!(dict.kind_of(FrameId::new(b"TDRC")), Some(RecordingTime));
        assert_eq!(dict.kind_of(FrameId::new(b"TSST")), Some(SetSubtitle));

        // Dropped in v2.4.
        for id in [b"TYER", b"TDAT", b"TIME", b"TRDA", b"TSIZ", b"TORY", b"IPLS"] {
            assert_eq!(dict.kind_of(FrameId::new(id)), None);
        }
    }

    #[test]
    fn discard_sets() {
        let v3 = FrameDictionary::new(Version::V2r3);
        let v4 = FrameDictionary::new(Version::V2r4);

        assert!(v3.discard_on_file_alter(FrameId::new(b"TSIZ")));
        assert!(v3.discard_on_file_alter(FrameId::new(b"RVAD")));
        assert!(!v3.discard_on_file_alter(FrameId::new(b"TIT2")));

        assert!(v4.discard_on_file_alter(FrameId::new(b"RVA2")));
        assert!(v4.discard_on_file_alter(FrameId::new(b"TLEN")));
        assert!(!v4.discard_on_file_alter(FrameId::new(b"RVAD")));

        let v2 = FrameDictionary::new(Version::V2r0);
        assert!(!v2.discard_on_file_alter(FrameId::new(b"TLEN")));
    }
}
