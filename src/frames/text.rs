use crate::core::io::BufStream;
use crate::err::ParseResult;
use crate::frames::encoding;
use crate::string::{self, Encoding};
use crate::version::Version;
use std::fmt::{self, Display, Formatter};

/// A text information frame (`T***`/`T**`). Under ID3v2.4 the body may hold
/// several NUL-separated strings; older revisions carry exactly one.
#[derive(Clone, Debug)]
pub struct TextFrame {
    pub encoding: Encoding,
    pub text: Vec<String>,
}

impl TextFrame {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        let encoding = encoding::parse(stream, version)?;

        let text = if version == Version::V2r4 {
            parse_text(encoding, stream)
        } else {
            vec![string::read_terminated(encoding, stream)]
        };

        Ok(Self { encoding, text })
    }

    /// Wrap an already-decoded string, for sources such as the ID3v1 record
    /// that have no wire encoding byte.
    pub(crate) fn plain(text: String) -> Self {
        Self {
            encoding: Encoding::Latin1,
            text: vec![text],
        }
    }
}

impl Display for TextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fmt_text(&self.text, f)
    }
}

/// A user-defined text frame (`TXXX`/`TXX`): a described value.
#[derive(Clone, Debug)]
pub struct UserTextFrame {
    pub encoding: Encoding,
    pub desc: String,
    pub value: String,
}

impl UserTextFrame {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        let encoding = encoding::parse(stream, version)?;
        let desc = string::read_terminated(encoding, stream);
        let value = string::read_terminated(encoding, stream);

        Ok(Self {
            encoding,
            desc,
            value,
        })
    }
}

impl Display for UserTextFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// An involved-people list (`IPLS`/`IPL`): NUL-separated strings, kept in
/// source order.
#[derive(Clone, Debug)]
pub struct InvolvedPeopleFrame {
    pub encoding: Encoding,
    pub entries: Vec<String>,
}

impl InvolvedPeopleFrame {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        let encoding = encoding::parse(stream, version)?;
        let entries = parse_text(encoding, stream);

        Ok(Self { encoding, entries })
    }
}

impl Display for InvolvedPeopleFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fmt_text(&self.entries, f)
    }
}

fn parse_text(encoding: Encoding, stream: &mut BufStream) -> Vec<String> {
    // Bodies can contain multiple strings separated by a NUL terminator, so
    // we manually iterate and find each terminated string. If there are
    // none, the Vec simply holds the one string.
    let mut text = Vec::new();

    while !stream.is_empty() {
        let string = string::read_terminated(encoding, stream);

        // Some taggers pad their text frames with zeroes. Only keep strings
        // with actual content so the padding is not mistaken for values.
        if !string.is_empty() {
            text.push(string);
        }
    }

    if text.is_empty() {
        text.push(String::new());
    }

    text
}

fn fmt_text(text: &[String], f: &mut Formatter) -> fmt::Result {
    for (i, string) in text.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }

        write!(f, "{}", string)?;
    }

    Ok(())
}
