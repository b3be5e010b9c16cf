use super::{TailError, DEFAULT_LINE_COUNT, LARGE_CHUNK, MEDIUM_CHUNK, SMALL_CHUNK};
use memchr::{memchr, memchr_iter};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How many trailing lines to read, and how to size the backward reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailRequest {
    /// Number of trailing lines wanted
    pub line_count: usize,

    /// Size chunks by `line_count` instead of always using 4 KiB.
    /// Only affects how many bytes are read, never the result.
    pub adaptive: bool,
}

impl TailRequest {
    /// Request `line_count` lines with adaptive chunking
    pub fn new(line_count: usize) -> Self {
        Self {
            line_count,
            adaptive: true,
        }
    }

    /// Request `line_count` lines with fixed 4 KiB chunks
    pub fn fixed(line_count: usize) -> Self {
        Self {
            line_count,
            adaptive: false,
        }
    }

    /// Bytes read per backward step
    pub fn chunk_size(&self) -> u64 {
        if !self.adaptive {
            return LARGE_CHUNK;
        }
        match self.line_count {
            0..=1 => SMALL_CHUNK,
            2..=9 => MEDIUM_CHUNK,
            _ => LARGE_CHUNK,
        }
    }
}

impl Default for TailRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_COUNT)
    }
}

/// Tail reader bound to one log file.
///
/// Every [`read`](TailReader::read) opens the file afresh and closes it before
/// returning, so a reader can be kept around and polled as the log grows.
#[derive(Debug, Clone)]
pub struct TailReader {
    path: PathBuf,
    request: TailRequest,
}

impl TailReader {
    pub fn new<P: AsRef<Path>>(path: P, request: TailRequest) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            request,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn request(&self) -> TailRequest {
        self.request
    }

    /// Read the current tail of the file
    pub fn read(&self) -> Result<Vec<String>, TailError> {
        tail_file(&self.path, &self.request)
    }
}

/// Last `line_count` lines of the file at `path`, oldest first.
pub fn tail<P: AsRef<Path>>(
    path: P,
    line_count: usize,
    adaptive: bool,
) -> Result<Vec<String>, TailError> {
    tail_file(
        path,
        &TailRequest {
            line_count,
            adaptive,
        },
    )
}

/// Last lines of the file at `path` as described by `request`.
///
/// A missing, unreadable or non-regular file is [`TailError::NotFound`];
/// an empty file is `Ok` with no lines.
pub fn tail_file<P: AsRef<Path>>(path: P, request: &TailRequest) -> Result<Vec<String>, TailError> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path).map_err(|e| TailError::from_open(path, e))?;
    if !metadata.is_file() {
        return Err(TailError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = File::open(path).map_err(|e| TailError::from_open(path, e))?;
    tail_opened(path, &mut file, request)
}

/// Run the scan on an already opened `source` and attach `path` to failures.
fn tail_opened<R: Read + Seek>(
    path: &Path,
    source: &mut R,
    request: &TailRequest,
) -> Result<Vec<String>, TailError> {
    let lines = tail_reader(source, request).map_err(|e| TailError::io(path, e))?;

    debug!(
        path = %path.display(),
        requested = request.line_count,
        returned = lines.len(),
        "tail read"
    );

    Ok(lines)
}

/// Last lines of any seekable byte source.
///
/// Scans backwards in chunks until one newline more than needed has been
/// seen (or the start is reached), then drops the surplus leading lines.
/// Bytes read are bounded by the requested lines plus one chunk, not by the
/// source length.
pub fn tail_reader<R: Read + Seek>(source: &mut R, request: &TailRequest) -> io::Result<Vec<String>> {
    if request.line_count == 0 {
        return Ok(Vec::new());
    }

    let len = source.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Ok(Vec::new());
    }

    let chunk_size = request.chunk_size();

    // Newlines still needed before the scan can stop. It goes negative once
    // the scan has captured more lines than requested.
    let mut remaining = i64::try_from(request.line_count).unwrap_or(i64::MAX);

    source.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    source.read_exact(&mut last)?;
    // An unterminated last line is already one of the lines we return
    if last[0] != b'\n' {
        remaining -= 1;
    }

    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut pos = len;
    let mut bytes_read = 0u64;

    while pos > 0 && remaining >= 0 {
        let step = pos.min(chunk_size);
        pos -= step;

        source.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; step as usize];
        source.read_exact(&mut chunk)?;
        bytes_read += step;

        remaining -= memchr_iter(b'\n', &chunk).count() as i64;
        chunks.push(chunk);
    }

    debug!(len, chunk_size, bytes_read, steps = chunks.len(), "backward scan done");

    chunks.reverse();
    let buffer = chunks.concat();

    // Drop overshoot: one leading line per surplus newline
    let mut start = 0;
    while remaining < 0 {
        match memchr(b'\n', &buffer[start..]) {
            Some(offset) => start += offset + 1,
            None => {
                start = buffer.len();
                break;
            }
        }
        remaining += 1;
    }

    Ok(split_lines(&buffer[start..]))
}

/// Split on `\n`. A terminating newline does not open another line and a
/// `\r` directly before a newline is dropped. An unterminated last line is
/// returned byte for byte.
fn split_lines(data: &[u8]) -> Vec<String> {
    if data.is_empty() {
        return Vec::new();
    }

    let (body, terminated) = match data.strip_suffix(b"\n") {
        Some(body) => (body, true),
        None => (data, false),
    };

    let lines: Vec<&[u8]> = body.split(|&b| b == b'\n').collect();
    let last = lines.len() - 1;

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let line = if i < last || terminated {
                line.strip_suffix(b"\r").unwrap_or(line)
            } else {
                line
            };
            String::from_utf8_lossy(line).into_owned()
        })
        .collect()
}
