// Library interface for logtail
// Reads the tail of large log files and the helpers a log viewer needs around it

pub mod config;
pub mod format;
pub mod log_source;
pub mod maint;
pub mod ntp;
pub mod reader;

#[cfg(test)]
mod test_utils;

pub use log_source::LogSource;
pub use reader::{tail, tail_file, TailError, TailReader, TailRequest};
