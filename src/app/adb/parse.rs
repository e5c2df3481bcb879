use regex::Regex;

use crate::app::adb::paths::join_entry_path;
use crate::app::models::{DeviceSummary, FileEntry};

/// Sentinel appended by the listing command's `|| echo "error"` fallback
/// when the remote `ls` fails.
pub const REMOTE_ERROR_SENTINEL: &str = "error";

pub fn parse_devices(output: &str) -> Vec<DeviceSummary> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('*'))
        .filter(|line| !line.to_lowercase().contains("list of devices"))
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                return None;
            }
            let serial = tokens[0].to_string();
            let state = tokens[1].to_string();
            let mut model = None;
            let mut product = None;
            let mut device = None;
            let mut transport_id = None;
            for token in tokens.iter().skip(2) {
                if let Some(value) = token.strip_prefix("model:") {
                    model = Some(value.to_string());
                } else if let Some(value) = token.strip_prefix("product:") {
                    product = Some(value.to_string());
                } else if let Some(value) = token.strip_prefix("device:") {
                    device = Some(value.to_string());
                } else if let Some(value) = token.strip_prefix("transport_id:") {
                    transport_id = Some(value.to_string());
                }
            }
            Some(DeviceSummary {
                serial,
                state,
                model,
                product,
                device,
                transport_id,
            })
        })
        .collect()
}

/// True when the listing text carries the remote-failure sentinel on a line
/// of its own.
pub fn listing_reported_error(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.trim() == REMOTE_ERROR_SENTINEL)
}

/// Turn long-format `ls -la` output into entries under `base_path`.
///
/// Remote shells vary in column formatting and listings may carry partial
/// or garbage lines (symlink annotations, truncated rows); lines that do
/// not match the long-format pattern are skipped, never an error. `.` and
/// `..` are excluded. Pure text-in, entries-out: no process is involved.
pub fn parse_directory_listing(base_path: &str, output: &str) -> Vec<FileEntry> {
    if listing_reported_error(output) {
        return Vec::new();
    }
    let Ok(pattern) = Regex::new(
        r"^([\-dlcbpsrwxStT]+)\s+\d+\s+\S+\s+\S+\s+(\d+)\s+(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2})\s+(.+)$",
    ) else {
        return Vec::new();
    };

    output
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("total"))
        .filter_map(|line| {
            let caps = pattern.captures(line)?;
            let permissions = caps[1].to_string();
            let size_bytes = caps[2].parse::<u64>().ok()?;
            let modified_at = format!("{} {}", &caps[3], &caps[4]);
            let name = caps[5].to_string();
            if name == "." || name == ".." {
                return None;
            }
            Some(FileEntry {
                path: join_entry_path(base_path, &name),
                is_dir: permissions.starts_with('d'),
                name,
                size_bytes,
                permissions,
                modified_at,
            })
        })
        .collect()
}
