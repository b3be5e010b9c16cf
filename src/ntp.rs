//! Clock drift check against an NTP server.
//!
//! Sends a single SNTP request over UDP and compares the server's clock with
//! the local one. Drift beyond two minutes is a warning, beyond ten minutes
//! it is critical.

use chrono::{DateTime, Duration, Utc};
use std::io;
use std::net::{ToSocketAddrs, UdpSocket};
use tracing::debug;

pub const NTP_PORT: u16 = 123;

/// Receive timeout for one request.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(1400);

const PACKET_LEN: usize = 48;

/// Seconds between 1900-01-01 (NTP era 0) and 1970-01-01.
const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

/// Byte offset of the receive timestamp seconds in a server reply.
const RECEIVE_SECONDS_AT: usize = 32;

const WARN_DRIFT_SECS: i64 = 120;
const CRITICAL_DRIFT_SECS: i64 = 600;

/// Drift this large means the reply carried no usable time at all.
const BOGUS_DRIFT_SECS: i64 = 1_400_000_000;

#[derive(Debug, thiserror::Error)]
pub enum NtpError {
    #[error("NTP request failed: {0}")]
    Io(#[from] io::Error),

    #[error("NTP reply too short: {0} bytes")]
    ShortReply(usize),

    #[error("NTP reply carries no timestamp")]
    NoTimestamp,
}

/// How far the local clock is off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    Ok,
    Warning,
    Critical,
}

impl ClockStatus {
    pub fn from_drift(drift: Duration) -> Self {
        let secs = drift.num_seconds().abs();
        if secs > CRITICAL_DRIFT_SECS {
            ClockStatus::Critical
        } else if secs > WARN_DRIFT_SECS {
            ClockStatus::Warning
        } else {
            ClockStatus::Ok
        }
    }
}

/// Result of comparing the local clock with a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockCheck {
    pub server_time: DateTime<Utc>,
    /// Local time minus server time.
    pub drift: Duration,
    pub status: ClockStatus,
}

impl ClockCheck {
    pub fn new(server_time: DateTime<Utc>, local_time: DateTime<Utc>) -> Self {
        let drift = local_time - server_time;
        let status = if drift.num_seconds() > BOGUS_DRIFT_SECS {
            ClockStatus::Critical
        } else {
            ClockStatus::from_drift(drift)
        };
        Self {
            server_time,
            drift,
            status,
        }
    }
}

/// SNTP client request: version 3, client mode.
fn request_packet() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = 0x1b;
    packet
}

/// Server time from a raw reply (whole seconds).
pub fn parse_reply(reply: &[u8]) -> Result<DateTime<Utc>, NtpError> {
    if reply.len() < PACKET_LEN {
        return Err(NtpError::ShortReply(reply.len()));
    }

    let mut word = [0u8; 4];
    word.copy_from_slice(&reply[RECEIVE_SECONDS_AT..RECEIVE_SECONDS_AT + 4]);
    let ntp_secs = i64::from(u32::from_be_bytes(word));
    if ntp_secs == 0 {
        return Err(NtpError::NoTimestamp);
    }

    DateTime::from_timestamp(ntp_secs - NTP_UNIX_OFFSET, 0).ok_or(NtpError::NoTimestamp)
}

/// Ask `server` for its time.
pub fn server_time<A: ToSocketAddrs>(
    server: A,
    timeout: std::time::Duration,
) -> Result<DateTime<Utc>, NtpError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.set_read_timeout(Some(timeout))?;
    socket.connect(server)?;
    socket.send(&request_packet())?;

    let mut reply = [0u8; PACKET_LEN];
    let n = socket.recv(&mut reply)?;
    parse_reply(&reply[..n])
}

/// Compare the local clock with `server`, retrying once on failure.
pub fn check_clock<A: ToSocketAddrs + Copy>(
    server: A,
    timeout: std::time::Duration,
) -> Result<ClockCheck, NtpError> {
    let server_time = match server_time(server, timeout) {
        Ok(time) => time,
        Err(e) => {
            debug!(error = %e, "NTP request failed, retrying");
            server_time(server, timeout)?
        }
    };

    let check = ClockCheck::new(server_time, Utc::now());
    debug!(drift_secs = check.drift.num_seconds(), status = ?check.status, "clock checked");
    Ok(check)
}
