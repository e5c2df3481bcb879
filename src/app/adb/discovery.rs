use std::collections::BTreeMap;

use tracing::warn;

use crate::app::adb::parse::parse_devices;
use crate::app::adb::runner::{CommandRunner, COMMAND_TIMEOUT};
use crate::app::models::DeviceSummary;

/// Ready devices from `adb devices -l`, as serial → display model.
///
/// Discovery never surfaces an error: a non-zero exit, a missing adb
/// binary, or any other process fault degrades to "no devices connected"
/// with a warning in the log.
pub fn list_devices(
    runner: &dyn CommandRunner,
    adb_program: &str,
    trace_id: &str,
) -> BTreeMap<String, String> {
    let args = vec!["devices".to_string(), "-l".to_string()];
    let output = match runner.run(adb_program, &args, COMMAND_TIMEOUT, trace_id) {
        Ok(output) => output,
        Err(err) => {
            warn!(trace_id = %trace_id, error = %err, "failed to enumerate adb devices");
            return BTreeMap::new();
        }
    };
    if !output.succeeded() {
        warn!(
            trace_id = %trace_id,
            stderr = %output.stderr.trim(),
            "adb devices exited non-zero"
        );
        return BTreeMap::new();
    }
    device_display_map(&parse_devices(&output.stdout))
}

pub fn device_display_map(summaries: &[DeviceSummary]) -> BTreeMap<String, String> {
    summaries
        .iter()
        .filter(|summary| summary.is_ready())
        .map(|summary| (summary.serial.clone(), summary.display_model()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::adb::runner::CommandOutput;
    use crate::app::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ScriptedRunner {
        output: Result<CommandOutput, AppError>,
        calls: AtomicUsize,
    }

    impl CommandRunner for ScriptedRunner {
        fn run(
            &self,
            _program: &str,
            _args: &[String],
            _timeout: Duration,
            _trace_id: &str,
        ) -> Result<CommandOutput, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.output.clone()
        }
    }

    fn ok_output(stdout: &str) -> Result<CommandOutput, AppError> {
        Ok(CommandOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })
    }

    #[test]
    fn maps_ready_devices_to_display_models() {
        let runner = ScriptedRunner {
            output: ok_output(
                "List of devices attached\nABC123  device product:x model:Pixel_5 device:x\n",
            ),
            calls: AtomicUsize::new(0),
        };
        let devices = list_devices(&runner, "adb", "trace-disc");
        assert_eq!(devices.len(), 1);
        assert_eq!(devices.get("ABC123").map(String::as_str), Some("Pixel_5"));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn model_defaults_to_unknown() {
        let runner = ScriptedRunner {
            output: ok_output("List of devices attached\nABC123 device transport_id:1\n"),
            calls: AtomicUsize::new(0),
        };
        let devices = list_devices(&runner, "adb", "trace-disc");
        assert_eq!(devices.get("ABC123").map(String::as_str), Some("Unknown"));
    }

    #[test]
    fn unready_devices_are_excluded() {
        let runner = ScriptedRunner {
            output: ok_output(
                "List of devices attached\nAAA device model:Pixel_5\nBBB unauthorized\n",
            ),
            calls: AtomicUsize::new(0),
        };
        let devices = list_devices(&runner, "adb", "trace-disc");
        assert_eq!(devices.len(), 1);
        assert!(devices.contains_key("AAA"));
    }

    #[test]
    fn non_zero_exit_degrades_to_empty() {
        let runner = ScriptedRunner {
            output: Ok(CommandOutput {
                stdout: String::new(),
                stderr: "cannot connect to daemon".to_string(),
                exit_code: Some(1),
            }),
            calls: AtomicUsize::new(0),
        };
        assert!(list_devices(&runner, "adb", "trace-disc").is_empty());
    }

    #[test]
    fn process_fault_degrades_to_empty() {
        let runner = ScriptedRunner {
            output: Err(AppError::tool_not_found("adb executable not found", "t")),
            calls: AtomicUsize::new(0),
        };
        assert!(list_devices(&runner, "adb", "trace-disc").is_empty());
    }
}
