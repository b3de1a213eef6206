use crate::core::io::BufStream;
use crate::err::ParseResult;
use crate::frames::encoding;
use crate::string::{self, Encoding};
use crate::version::Version;
use std::fmt::{self, Display, Formatter};

/// A URL link frame (`W***`/`W**`). The URL is always ISO-8859-1 and has no
/// encoding byte.
#[derive(Clone, Debug)]
pub struct UrlFrame {
    pub url: String,
}

impl UrlFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let url = string::read_terminated(Encoding::Latin1, stream);

        Ok(Self { url })
    }
}

impl Display for UrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// A user-defined URL frame (`WXXX`/`WXX`): a description in the declared
/// encoding followed by an ISO-8859-1 URL.
#[derive(Clone, Debug)]
pub struct UserUrlFrame {
    pub encoding: Encoding,
    pub desc: String,
    pub url: String,
}

impl UserUrlFrame {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        let encoding = encoding::parse(stream, version)?;
        let desc = string::read_terminated(encoding, stream);
        let url = string::read(Encoding::Latin1, stream);

        Ok(Self {
            encoding,
            desc,
            url,
        })
    }
}

impl Display for UserUrlFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL_DATA: &[u8] = b"https://fourtet.net";

    const WXXX_DATA: &[u8] = b"\x00ID3v2.3.0\0https://id3.org/id3v2.3.0";

    #[test]
    fn parse_url() {
        let frame = UrlFrame::parse(&mut BufStream::new(URL_DATA)).unwrap();

        assert_eq!(frame.url, "https://fourtet.net");
    }

    #[test]
    fn parse_url_stops_at_nul() {
        let frame = UrlFrame::parse(&mut BufStream::new(b"https://a\0junk")).unwrap();

        assert_eq!(frame.url, "https://a");
    }

    #[test]
    fn parse_wxxx() {
        let frame = UserUrlFrame::parse(&mut BufStream::new(WXXX_DATA), Version::V2r3).unwrap();

        assert_eq!(frame.encoding, Encoding::Latin1);
        assert_eq!(frame.desc, "ID3v2.3.0");
        assert_eq!(frame.url, "https://id3.org/id3v2.3.0");
    }
}
