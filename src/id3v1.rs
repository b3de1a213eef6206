//! ID3v1 tag reading.
//!
//! A v1 tag is a fixed 128-byte record at the very end of the file: a "TAG"
//! marker, three 30-byte text fields, a 4-digit year, a comment, and a genre
//! index. v1.1 steals the last two comment bytes for a track number. The
//! fields are surfaced as frames with canonical kinds so that both tag
//! families share one model.

use crate::err::ParseResult;
use crate::frames::{Frame, FrameBody, FrameFlags, FrameKind, TextFrame};
use crate::string;
use crate::tag::Tag;
use crate::version::{Version, V1_MARKER};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Read the ID3v1 tag trailing the file at `path`. Returns `Ok(None)` when
/// there is no tag.
pub fn read_tag<P: AsRef<Path>>(path: P) -> ParseResult<Option<Tag>> {
    read_tag_from(&mut File::open(path)?)
}

/// Read an ID3v1 tag from the last 128 bytes of `input`.
pub fn read_tag_from<R: Read + Seek>(input: &mut R) -> ParseResult<Option<Tag>> {
    let len = input.seek(SeekFrom::End(0))?;

    if len < 128 {
        return Ok(None);
    }

    input.seek(SeekFrom::Start(len - 128))?;

    let mut record = [0; 128];
    input.read_exact(&mut record)?;

    Ok(parse(&record))
}

pub(crate) fn parse(record: &[u8; 128]) -> Option<Tag> {
    if &record[0..3] != V1_MARKER {
        return None;
    }

    // A zeroed byte 28 into the comment field followed by a nonzero track
    // number marks v1.1. Two zeroes could be either revision.
    let (version, revision, track) = match (record[125], record[126]) {
        (0, 0) => (Version::V1, 0, None),
        (0, track) => (Version::V1r1, 1, Some(track)),
        _ => (Version::V1r0, 0, None),
    };

    let comment_width: u32 = if track.is_some() { 28 } else { 30 };

    let mut tag = Tag::new(version, revision, 128);

    push_field(&mut tag, FrameKind::Title, &record[3..33], 30);
    push_field(&mut tag, FrameKind::LeadArtist, &record[33..63], 30);
    push_field(&mut tag, FrameKind::Album, &record[63..93], 30);
    push_field(&mut tag, FrameKind::Year, &record[93..97], 4);
    push_field(
        &mut tag,
        FrameKind::Comment,
        &record[97..97 + comment_width as usize],
        comment_width,
    );

    if let Some(track) = track {
        push_text(&mut tag, FrameKind::TrackNumber, track.to_string(), 1);
    }

    // The genre byte indexes the classic genre table; anything past the
    // table is reported as absent.
    if let Some(genre) = GENRES.get(record[127] as usize) {
        push_text(&mut tag, FrameKind::Genre, (*genre).to_string(), 1);
    }

    Some(tag)
}

fn push_field(tag: &mut Tag, kind: FrameKind, data: &[u8], width: u32) {
    if let Some(text) = field(data) {
        push_text(tag, kind, text, width);
    }
}

fn push_text(tag: &mut Tag, kind: FrameKind, text: String, width: u32) {
    tag.push(Frame::new(
        kind,
        width,
        FrameFlags::default(),
        FrameBody::Text(TextFrame::plain(text)),
    ));
}

/// Decode a fixed-width ISO-8859-1 field, trimming trailing NULs and spaces.
/// Fully blank fields are absent.
fn field(data: &[u8]) -> Option<String> {
    let text = string::decode_latin1(data);
    let text = text.trim_end_matches(|ch| ch == '\0' || ch == ' ');

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// The classic ID3v1 genre table, including the Winamp extensions.
pub const GENRES: &[&str] = &[
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "Alternative Rock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychadelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
    "Folk",
    "Folk-Rock",
    "National Folk",
    "Swing",
    "Fast Fusion",
    "Bebob",
    "Latin",
    "Revival",
    "Celtic",
    "Bluegrass",
    "Avantgarde",
    "Gothic Rock",
    "Progressive Rock",
    "Psychedelic Rock",
    "Symphonic Rock",
    "Slow Rock",
    "Big Band",
    "Chorus",
    "Easy Listening",
    "Acoustic",
    "Humour",
    "Speech",
    "Chanson",
    "Opera",
    "Chamber Music",
    "Sonata",
    "Symphony",
    "Booty Bass",
    "Primus",
    "Porn Groove",
    "Satire",
    "Slow Jam",
    "Club",
    "Tango",
    "Samba",
    "Folklore",
    "Ballad",
    "Power Ballad",
    "Rhythmic Soul",
    "Freestyle",
    "Duet",
    "Punk Rock",
    "Drum Solo",
    "A capella",
    "Euro-House",
    "Dance Hall",
    "Goa",
    "Drum & Bass",
    "Club-House",
    "Hardcore",
    "Terror",
    "Indie",
    "BritPop",
    "Negerpunk",
    "Polsk Punk",
    "Beat",
    "Christian Gangsta Rap",
    "Heavy Metal",
    "Black Metal",
    "Crossover",
    "Contemporary Christian",
    "Christian Rock",
    "Merengue",
    "Salsa",
    "Thrash Metal",
    "Anime",
    "JPop",
    "Synthpop",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(title: &str, artist: &str, album: &str, year: &str, comment: &str) -> [u8; 128] {
        let mut record = [b' '; 128];
        record[0..3].copy_from_slice(b"TAG");
        blit(&mut record, 3, 30, title);
        blit(&mut record, 33, 30, artist);
        blit(&mut record, 63, 30, album);
        blit(&mut record, 93, 4, year);
        blit(&mut record, 97, 30, comment);
        record
    }

    fn blit(record: &mut [u8; 128], at: usize, width: usize, text: &str) {
        record[at..at + text.len().min(width)].copy_from_slice(text.as_bytes());
    }

    #[test]
    fn parse_v1_record() {
        let mut data = record("Title", "Artist", "Album", "2001", "Comment");
        data[127] = 1;

        let tag = parse(&data).unwrap();

        assert_eq!(tag.version(), Version::V1r0);
        assert_eq!(tag.declared_size(), 128);
        assert_eq!(tag.text(FrameKind::Title), Some("Title"));
        assert_eq!(tag.text(FrameKind::LeadArtist), Some("Artist"));
        assert_eq!(tag.text(FrameKind::Album), Some("Album"));
        assert_eq!(tag.text(FrameKind::Year), Some("2001"));
        assert_eq!(tag.text(FrameKind::Comment), Some("Comment"));
        assert_eq!(tag.text(FrameKind::Genre), Some("Classic Rock"));
        assert!(tag.get(FrameKind::TrackNumber).is_none());
    }

    #[test]
    fn parse_v1_1_track_number() {
        let mut data = record("Title", "Artist", "Album", "2001", "Comment");
        data[125] = 0;
        data[126] = 5;
        data[127] = 1;

        let tag = parse(&data).unwrap();

        assert_eq!(tag.version(), Version::V1r1);
        assert_eq!(tag.revision(), 1);
        assert_eq!(tag.text(FrameKind::TrackNumber), Some("5"));

        // The comment narrows to 28 bytes under v1.1.
        let comment = tag.get(FrameKind::Comment).unwrap();
        assert_eq!(comment.total_size(), 28);
        assert_eq!(comment.text(), Some("Comment"));
    }

    #[test]
    fn ambiguous_revision() {
        let mut data = record("Title", "", "", "", "");
        data[125] = 0;
        data[126] = 0;

        let tag = parse(&data).unwrap();
        assert_eq!(tag.version(), Version::V1);
    }

    #[test]
    fn out_of_range_genre_is_absent() {
        let mut data = record("Title", "", "", "", "");
        data[127] = 0xFF;

        let tag = parse(&data).unwrap();
        assert!(tag.get(FrameKind::Genre).is_none());
    }

    #[test]
    fn nul_padded_fields() {
        let mut data = [0u8; 128];
        data[0..3].copy_from_slice(b"TAG");
        data[3..8].copy_from_slice(b"Title");

        let tag = parse(&data).unwrap();
        assert_eq!(tag.text(FrameKind::Title), Some("Title"));
        assert!(tag.get(FrameKind::LeadArtist).is_none());
        assert_eq!(tag.text(FrameKind::Genre), Some("Blues"));
    }

    #[test]
    fn read_from_end_of_file() {
        let mut file = vec![0xAA; 4096];
        file.extend(record("Trailing", "", "", "", ""));

        let tag = read_tag_from(&mut Cursor::new(file)).unwrap().unwrap();
        assert_eq!(tag.text(FrameKind::Title), Some("Trailing"));
    }

    #[test]
    fn short_file_has_no_tag() {
        let mut cursor = Cursor::new(vec![0u8; 64]);
        assert!(read_tag_from(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn missing_marker() {
        let data = [b'X'; 128];
        assert!(parse(&data).is_none());
    }
}
