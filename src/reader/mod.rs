pub mod error;
pub mod tail_reader;

pub use error::TailError;
pub use tail_reader::{tail, tail_file, tail_reader, TailReader, TailRequest};

/// Default number of trailing lines when a caller does not ask for a count
pub const DEFAULT_LINE_COUNT: usize = 1000;

/// Chunk size for requests of fewer than two lines
pub const SMALL_CHUNK: u64 = 64;

/// Chunk size for requests of fewer than ten lines
pub const MEDIUM_CHUNK: u64 = 512;

/// Chunk size for everything else, and for non-adaptive requests
pub const LARGE_CHUNK: u64 = 4096;
