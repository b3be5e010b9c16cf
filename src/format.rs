//! Display helpers for log file metadata.

const SIZE_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count for display, e.g. `1048576` -> `"1.00MB"`.
///
/// The unit is picked from the number of decimal digits (one step per three
/// digits) while the value is scaled by powers of 1024, so `1000` shows as
/// `"0.98kB"`.
pub fn human_filesize(bytes: u64, decimals: usize) -> String {
    let digits = bytes.to_string().len();
    let factor = ((digits - 1) / 3).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(factor as i32);
    format!("{:.*}{}", decimals, value, SIZE_UNITS[factor])
}
