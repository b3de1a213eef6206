use crate::core::io::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::frames::encoding;
use crate::string::{self, Encoding};
use crate::version::Version;
use std::fmt::{self, Display, Formatter};

/// A comment frame (`COMM`/`COM`): a 3-byte language code, a short
/// description, and the comment text itself.
#[derive(Clone, Debug)]
pub struct CommentsFrame {
    pub encoding: Encoding,
    pub lang: [u8; 3],
    pub desc: String,
    pub text: String,
}

impl CommentsFrame {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        let encoding = encoding::parse(stream, version)?;
        let lang = stream.read_array().map_err(|_| ParseError::NotEnoughData)?;
        let desc = string::read_terminated(encoding, stream);
        let text = string::read(encoding, stream);

        Ok(Self {
            encoding,
            lang,
            desc,
            text,
        })
    }

    /// The language code as text, e.g. `"eng"`.
    pub fn language(&self) -> String {
        string::decode_latin1(&self.lang)
    }
}

impl Display for CommentsFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMM_DATA: &[u8] = b"\x00engDescription\x00Text";

    #[test]
    fn parse_comm() {
        let frame = CommentsFrame::parse(&mut BufStream::new(COMM_DATA), Version::V2r3).unwrap();

        assert_eq!(frame.encoding, Encoding::Latin1);
        assert_eq!(frame.language(), "eng");
        assert_eq!(frame.desc, "Description");
        assert_eq!(frame.text, "Text");
    }

    #[test]
    fn parse_comm_empty_desc() {
        let frame =
            CommentsFrame::parse(&mut BufStream::new(b"\x00eng\x00Just text"), Version::V2r3)
                .unwrap();

        assert_eq!(frame.desc, "");
        assert_eq!(frame.text, "Just text");
    }

    #[test]
    fn parse_comm_truncated() {
        assert!(CommentsFrame::parse(&mut BufStream::new(b"\x00en"), Version::V2r3).is_err());
    }
}
