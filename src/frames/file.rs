use crate::core::io::BufStream;
use crate::err::{ParseError, ParseResult};
use crate::frames::encoding;
use crate::string::{self, Encoding};
use crate::version::Version;
use std::fmt::{self, Display, Formatter};

/// An attached picture frame (`APIC`/`PIC`).
///
/// ID3v2.2 stores a fixed 3-character image format such as `PNG` or `JPG`;
/// later revisions store a NUL-terminated MIME type. Both land in `mime`.
/// The image itself is opaque bytes, never rendered by this crate.
#[derive(Clone, Debug)]
pub struct AttachedPictureFrame {
    pub encoding: Encoding,
    pub mime: String,
    pub pic_type: u8,
    pub desc: String,
    pub picture: Vec<u8>,
}

impl AttachedPictureFrame {
    pub(crate) fn parse(stream: &mut BufStream, version: Version) -> ParseResult<Self> {
        let encoding = encoding::parse(stream, version)?;

        let mime = if version == Version::V2r0 {
            let format: [u8; 3] = stream.read_array().map_err(|_| ParseError::NotEnoughData)?;
            string::decode_latin1(&format)
        } else {
            string::read_terminated(Encoding::Latin1, stream)
        };

        let pic_type = stream.read_u8().map_err(|_| ParseError::NotEnoughData)?;
        let desc = string::read_terminated(encoding, stream);
        let picture = stream.take_rest().to_vec();

        Ok(Self {
            encoding,
            mime,
            pic_type,
            desc,
            picture,
        })
    }
}

impl Display for AttachedPictureFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} [{}, {} bytes]", self.desc, self.mime, self.picture.len())
    }
}
