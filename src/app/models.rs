use serde::{Deserialize, Serialize};

/// One record from `adb devices -l`. `state` is whatever adb reports
/// ("device", "unauthorized", "offline", ...); only "device" means ready.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceSummary {
    pub serial: String,
    pub state: String,
    pub model: Option<String>,
    pub product: Option<String>,
    pub device: Option<String>,
    pub transport_id: Option<String>,
}

impl DeviceSummary {
    pub fn is_ready(&self) -> bool {
        self.state == "device"
    }

    /// Display name for device pickers: the model token, or "Unknown" when
    /// adb did not report one.
    pub fn display_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// One row of a directory listing snapshot. Entries are produced fresh on
/// every listing and superseded wholesale by the next one; `path` is the
/// only identity within a snapshot.
///
/// `modified_at` stays the literal "YYYY-MM-DD HH:MM" string printed by the
/// remote shell. The device clock and timezone are unknown, so it is never
/// parsed into a host timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size_bytes: u64,
    pub permissions: String,
    pub modified_at: String,
}
