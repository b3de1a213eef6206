use std::io::{self, ErrorKind, Read};

/// A simple ergonomics layer around an internal slice, created primarily to
/// automate bounds checking. Frame decoders consume their body through this.
pub struct BufStream<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> BufStream<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        BufStream { src, pos: 0 }
    }

    /// Read this stream into a buffer. If the buffer cannot be completely
    /// filled, an error is returned and the buffer is indeterminate.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if self.remaining() < buf.len() {
            return Err(underread_error());
        }

        buf.copy_from_slice(&self.src[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();

        Ok(())
    }

    /// Read this stream into an array of size `N`, returning an error when
    /// the array cannot be filled.
    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut arr = [0; N];
        self.read_exact(&mut arr)?;
        Ok(arr)
    }

    /// Read exactly one byte from this stream.
    pub fn read_u8(&mut self) -> io::Result<u8> {
        if self.remaining() == 0 {
            return Err(eos_error());
        }

        self.pos += 1;

        Ok(self.src[self.pos - 1])
    }

    /// Read a big-endian u32 from this stream.
    pub fn read_u32(&mut self) -> io::Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Search for `pattern` from the current position, stepping by the
    /// pattern length so that multi-byte terminators stay aligned. Returns
    /// the data before the match and consumes the pattern as well. If there
    /// is no match, the rest of the stream is returned and consumed.
    pub fn search(&mut self, pattern: &[u8]) -> &'a [u8] {
        let start = self.pos;
        let step = pattern.len();

        while self.remaining() >= step {
            if &self.src[self.pos..self.pos + step] == pattern {
                let found = &self.src[start..self.pos];
                self.pos += step;
                return found;
            }

            self.pos += step;
        }

        // No match, consume whatever remains.
        self.pos = self.src.len();
        &self.src[start..]
    }

    /// Take the rest of the stream's data, leaving the stream fully consumed.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.src[self.pos..];
        self.pos = self.src.len();
        rest
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.pos()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// A sequential reader over a tag payload that can reverse the
/// unsynchronisation scheme, collapsing the byte pair `FF 00` into `FF`.
///
/// The reader counts every byte taken from the *underlying* source, which is
/// what the tag reader compares against the declared tag size. The count
/// never includes a byte that was looked at but not yet delivered.
pub struct UnsyncStream<R: Read> {
    inner: R,
    filter: bool,
    pending: Option<u8>,
    raw: u64,
}

impl<R: Read> UnsyncStream<R> {
    pub fn new(inner: R, filter: bool) -> Self {
        UnsyncStream {
            inner,
            filter,
            pending: None,
            raw: 0,
        }
    }

    /// The number of bytes consumed from the underlying source.
    pub fn consumed(&self) -> u64 {
        self.raw - self.pending.is_some() as u64
    }

    fn next_raw(&mut self) -> io::Result<u8> {
        let mut buf = [0];
        self.inner.read_exact(&mut buf)?;
        self.raw += 1;
        Ok(buf[0])
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let byte = match self.pending.take() {
            Some(byte) => byte,
            None => self.next_raw()?,
        };

        if self.filter && byte == 0xFF {
            // A zero after FF was inserted by the unsynchronisation scheme
            // and is swallowed. Anything else belongs to the next read.
            match self.next_raw() {
                Ok(0x00) => {}
                Ok(other) => self.pending = Some(other),
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => {}
                Err(err) => return Err(err),
            }
        }

        Ok(byte)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        for byte in buf.iter_mut() {
            *byte = self.read_u8()?;
        }

        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut arr = [0; N];
        self.read_exact(&mut arr)?;
        Ok(arr)
    }

    pub fn read_vec(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Skip `n` bytes as seen through the filter.
    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        for _ in 0..n {
            self.read_u8()?;
        }

        Ok(())
    }

    /// Skip `n` underlying bytes without applying the filter. Used for
    /// padding, which is never unsynchronised.
    pub fn skip_raw(&mut self, n: u64) -> io::Result<()> {
        let mut left = n;

        if left > 0 && self.pending.take().is_some() {
            left -= 1;
        }

        let copied = io::copy(&mut self.inner.by_ref().take(left), &mut io::sink())?;
        self.raw += copied;

        if copied < left {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "padding ran out before the declared tag size",
            ));
        }

        Ok(())
    }
}

fn eos_error() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "end of stream")
}

fn underread_error() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "buffer underread")
}
