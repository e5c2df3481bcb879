/// Parent directory of a device path. Top-level entries and degenerate
/// inputs resolve to `/`.
pub fn device_parent_dir(device_path: &str) -> String {
    let trimmed = device_path.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }
    let mut path = trimmed.trim_end_matches('/').to_string();
    if path.is_empty() {
        return "/".to_string();
    }
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => {
            path.truncate(index);
            path
        }
    }
}

/// Path of a listing entry: base with any trailing slash stripped, plus
/// `/`, plus the entry name.
pub fn join_entry_path(base_path: &str, name: &str) -> String {
    format!("{}/{}", base_path.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_handles_common_cases() {
        assert_eq!(device_parent_dir("/sdcard/Download/file.txt"), "/sdcard/Download");
        assert_eq!(device_parent_dir("/sdcard/Download/"), "/sdcard");
        assert_eq!(device_parent_dir("/file.txt"), "/");
        assert_eq!(device_parent_dir("/"), "/");
        assert_eq!(device_parent_dir(""), "/");
    }

    #[test]
    fn join_strips_trailing_slashes_from_base() {
        assert_eq!(join_entry_path("/sdcard", "a.txt"), "/sdcard/a.txt");
        assert_eq!(join_entry_path("/sdcard/", "a.txt"), "/sdcard/a.txt");
        assert_eq!(join_entry_path("/", "a.txt"), "/a.txt");
    }
}
