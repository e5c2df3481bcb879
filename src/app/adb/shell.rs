//! Remote command synthesis. Commands run through `adb shell <string>`, so
//! each path is embedded into a single shell string rather than passed as
//! an argument vector.

/// Wrap a device path in double quotes, backslash-escaping embedded quote
/// characters.
///
/// Known limitation: this covers quote characters only. Other shell
/// metacharacters in filenames (`;`, `$`, backticks, globs) are passed
/// through to the remote shell unescaped.
pub fn escape_remote_path(path: &str) -> String {
    let escaped = path.replace('"', "\\\"").replace('\'', "\\'");
    format!("\"{escaped}\"")
}

/// `ls -la` with stderr discarded; the `error` fallback line lets the
/// caller distinguish a failed listing from an empty directory.
pub fn list_command(path: &str) -> String {
    format!(
        "ls -la {} 2>/dev/null || echo \"error\"",
        escape_remote_path(path)
    )
}

pub fn move_command(old_path: &str, new_path: &str) -> String {
    format!(
        "mv {} {}",
        escape_remote_path(old_path),
        escape_remote_path(new_path)
    )
}

pub fn remove_command(path: &str, recursive: bool) -> String {
    if recursive {
        format!("rm -r {}", escape_remote_path(path))
    } else {
        format!("rm {}", escape_remote_path(path))
    }
}

pub fn touch_command(path: &str) -> String {
    format!("touch {}", escape_remote_path(path))
}

pub fn mkdir_command(path: &str) -> String {
    format!("mkdir -p {}", escape_remote_path(path))
}

pub fn copy_command(src_path: &str, dest_path: &str) -> String {
    format!(
        "cp -r {} {}",
        escape_remote_path(src_path),
        escape_remote_path(dest_path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_plain_paths_in_double_quotes() {
        assert_eq!(escape_remote_path("/sdcard/Download"), "\"/sdcard/Download\"");
    }

    #[test]
    fn escapes_embedded_quotes() {
        assert_eq!(
            escape_remote_path("/sdcard/it's \"here\""),
            "\"/sdcard/it\\'s \\\"here\\\"\""
        );
    }

    #[test]
    fn synthesizes_the_listing_command() {
        assert_eq!(
            list_command("/sdcard/My Music"),
            "ls -la \"/sdcard/My Music\" 2>/dev/null || echo \"error\""
        );
    }

    #[test]
    fn synthesizes_mutation_commands() {
        assert_eq!(move_command("/a/x", "/a/y"), "mv \"/a/x\" \"/a/y\"");
        assert_eq!(remove_command("/a/x", false), "rm \"/a/x\"");
        assert_eq!(remove_command("/a/dir", true), "rm -r \"/a/dir\"");
        assert_eq!(touch_command("/a/new.txt"), "touch \"/a/new.txt\"");
        assert_eq!(mkdir_command("/a/b/c"), "mkdir -p \"/a/b/c\"");
        assert_eq!(copy_command("/a/x", "/b/x"), "cp -r \"/a/x\" \"/b/x\"");
    }
}
