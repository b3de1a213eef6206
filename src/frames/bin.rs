use crate::core::io::BufStream;
use crate::err::ParseResult;
use crate::string::{self, Encoding};
use std::fmt::{self, Display, Formatter};

/// A unique file identifier frame (`UFID`/`UFI`): an owner id and an opaque
/// binary identifier.
#[derive(Clone, Debug)]
pub struct FileIdFrame {
    pub owner: String,
    pub identifier: Vec<u8>,
}

impl FileIdFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        let owner = string::read_terminated(Encoding::Latin1, stream);
        let identifier = stream.take_rest().to_vec();

        Ok(Self { owner, identifier })
    }
}

impl Display for FileIdFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.owner)
    }
}

/// A music CD identifier frame (`MCDI`/`MCI`). The table of contents is kept
/// as raw bytes and rendered as lower-case hex for display.
#[derive(Clone, Debug)]
pub struct MusicCdIdFrame {
    pub data: Vec<u8>,
}

impl MusicCdIdFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        Ok(Self {
            data: stream.take_rest().to_vec(),
        })
    }

    pub fn hex(&self) -> String {
        let mut out = String::with_capacity(self.data.len() * 2);

        for byte in &self.data {
            out.push_str(&format!("{:02x}", byte));
        }

        out
    }
}

impl Display for MusicCdIdFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// The unofficial iTunes podcast marker (`PCST`/`PCS`). The payload is
/// opaque and preserved as-is.
#[derive(Clone, Debug)]
pub struct PodcastFrame {
    pub data: Vec<u8>,
}

impl PodcastFrame {
    pub(crate) fn parse(stream: &mut BufStream) -> ParseResult<Self> {
        Ok(Self {
            data: stream.take_rest().to_vec(),
        })
    }
}

impl Display for PodcastFrame {
    fn fmt(&self, _: &mut Formatter) -> fmt::Result {
        // Nothing meaningful to format.
        Ok(())
    }
}
