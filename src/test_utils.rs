use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// In-memory seekable source that counts how many bytes were read from it.
pub struct CountingReader {
    inner: Cursor<Vec<u8>>,
    pub bytes_read: u64,
}

impl CountingReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Cursor::new(data.into()),
            bytes_read: 0,
        }
    }

    pub fn len(&self) -> u64 {
        self.inner.get_ref().len() as u64
    }
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

impl Seek for CountingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Seekable source whose reads always fail.
pub struct FailingReader {
    pub len: u64,
    pos: u64,
}

impl FailingReader {
    pub fn new(len: u64) -> Self {
        Self { len, pos: 0 }
    }
}

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "simulated device error"))
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.pos = match pos {
            SeekFrom::Start(p) => p,
            SeekFrom::End(off) => (self.len as i64 + off) as u64,
            SeekFrom::Current(off) => (self.pos as i64 + off) as u64,
        };
        Ok(self.pos)
    }
}
