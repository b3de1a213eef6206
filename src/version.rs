use crate::err::ParseResult;
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

pub(crate) const V1_MARKER: &[u8] = b"TAG";
pub(crate) const V2_MARKER: &[u8] = b"ID3";

/// A tag revision found in a file.
///
/// `V1` is reported when the trailing record could be either v1.0 or v1.1,
/// which cannot be told apart from the last two bytes alone. `V2r0` is
/// ID3v2.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Version {
    V1,
    V1r0,
    V1r1,
    V2r0,
    V2r3,
    V2r4,
}

impl Version {
    pub fn is_v1(&self) -> bool {
        matches!(self, Version::V1 | Version::V1r0 | Version::V1r1)
    }

    pub fn is_v2(&self) -> bool {
        !self.is_v1()
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            Version::V1 => "ID3v1",
            Version::V1r0 => "ID3v1.0",
            Version::V1r1 => "ID3v1.1",
            Version::V2r0 => "ID3v2.2",
            Version::V2r3 => "ID3v2.3",
            Version::V2r4 => "ID3v2.4",
        };

        write!(f, "{}", name)
    }
}

/// Probe a file for the highest-priority tag revision. A leading v2 tag wins
/// over a trailing v1 record. Absence of any marker is `Ok(None)`.
pub fn version<P: AsRef<Path>>(path: P) -> ParseResult<Option<Version>> {
    version_from(&mut File::open(path)?)
}

/// Probe a byte source for the highest-priority tag revision.
pub fn version_from<R: Read + Seek>(input: &mut R) -> ParseResult<Option<Version>> {
    if let Some(version) = probe_v2(input)? {
        return Ok(Some(version));
    }

    Ok(probe_v1(input)?)
}

/// Probe a file for every tag revision present, v2 first.
pub fn versions<P: AsRef<Path>>(path: P) -> ParseResult<Vec<Version>> {
    versions_from(&mut File::open(path)?)
}

/// Probe a byte source for every tag revision present, v2 first.
pub fn versions_from<R: Read + Seek>(input: &mut R) -> ParseResult<Vec<Version>> {
    let mut found = Vec::new();

    if let Some(version) = probe_v2(input)? {
        found.push(version);
    }

    if let Some(version) = probe_v1(input)? {
        found.push(version);
    }

    Ok(found)
}

fn probe_v2<R: Read + Seek>(input: &mut R) -> ParseResult<Option<Version>> {
    input.seek(SeekFrom::Start(0))?;

    let mut prefix = [0; 4];
    if read_fully(input, &mut prefix)? < prefix.len() {
        return Ok(None);
    }

    if &prefix[0..3] != V2_MARKER {
        return Ok(None);
    }

    Ok(match prefix[3] {
        0 => Some(Version::V2r0),
        3 => Some(Version::V2r3),
        4 => Some(Version::V2r4),
        _ => None,
    })
}

fn probe_v1<R: Read + Seek>(input: &mut R) -> ParseResult<Option<Version>> {
    let len = input.seek(SeekFrom::End(0))?;

    if len < 128 {
        return Ok(None);
    }

    input.seek(SeekFrom::Start(len - 128))?;

    let mut marker = [0; 3];
    input.read_exact(&mut marker)?;

    if marker != V1_MARKER {
        return Ok(None);
    }

    // The last two bytes tell the revisions apart: a zeroed byte before a
    // track number means v1.1, two zeroes could be either revision.
    input.seek(SeekFrom::Start(len - 3))?;

    let mut tail = [0; 2];
    input.read_exact(&mut tail)?;

    Ok(match tail {
        [0, 0] => Some(Version::V1),
        [0, _] => Some(Version::V1r1),
        _ => None,
    })
}

fn read_fully<R: Read>(input: &mut R, buf: &mut [u8]) -> ParseResult<usize> {
    let mut total = 0;

    while total < buf.len() {
        let n = input.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }

    Ok(total)
}
