use crate::core::io::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::string::Encoding;
use crate::version::Version;

const FLAG_LATIN1: u8 = 0x00;
const FLAG_UTF16: u8 = 0x01;
const FLAG_UTF16BE: u8 = 0x02;
const FLAG_UTF8: u8 = 0x03;

/// Read the encoding byte that leads every text-bearing frame body. The
/// UTF-16BE and UTF-8 flags only exist in ID3v2.4; under older revisions
/// they mark the frame as malformed, as does any byte outside 0..=3.
pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Encoding> {
    let flag = stream.read_u8().map_err(|_| ParseError::NotEnoughData)?;

    match flag {
        FLAG_LATIN1 => Ok(Encoding::Latin1),
        FLAG_UTF16 => Ok(Encoding::Utf16),
        FLAG_UTF16BE if version == Version::V2r4 => Ok(Encoding::Utf16Be),
        FLAG_UTF8 if version == Version::V2r4 => Ok(Encoding::Utf8),
        _ => Err(ParseError::InvalidEncoding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_v4_encodings() {
        for (flag, expected) in [
            (0u8, Encoding::Latin1),
            (1, Encoding::Utf16),
            (2, Encoding::Utf16Be),
            (3, Encoding::Utf8),
        ] {
            let data = [flag];
            let mut stream = BufStream::new(&data);
            assert_eq!(parse(&mut stream, Version::V2r4).unwrap(), expected);
        }
    }

    #[test]
    fn reject_v4_encodings_in_v3() {
        for flag in [2u8, 3] {
            let data = [flag];
            let mut stream = BufStream::new(&data);
            assert!(matches!(
                parse(&mut stream, Version::V2r3),
                Err(ParseError::InvalidEncoding)
            ));
        }
    }

    #[test]
    fn reject_unknown_encoding() {
        let mut stream = BufStream::new(b"\x04");
        assert!(parse(&mut stream, Version::V2r4).is_err());
    }
}
