use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app::adb::discovery::list_devices;
use crate::app::adb::locator::resolve_adb_program;
use crate::app::adb::parse::{listing_reported_error, parse_devices, parse_directory_listing};
use crate::app::adb::paths::device_parent_dir;
use crate::app::adb::runner::{CommandOutput, CommandRunner, SystemRunner, COMMAND_TIMEOUT};
use crate::app::adb::shell;
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::app::models::FileEntry;

/// One bound device plus the file-operation facade.
///
/// A session owns zero or one serial for its whole lifetime. Discovery runs
/// once at construction; switching devices means constructing a new session
/// and discarding this one. Operations are issued one at a time and block
/// until the subprocess exits or the fixed timeout elapses.
///
/// Expected remote failure is never a panic: operations return
/// `Err(AppError)` values carrying the failure kind, and `list_directory`
/// degrades to an empty listing.
pub struct Session {
    runner: Arc<dyn CommandRunner>,
    adb_program: String,
    browse_root: String,
    serial: Option<String>,
    devices: BTreeMap<String, String>,
    connected: bool,
}

fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

fn ensure_non_empty(value: &str, field: &str, trace_id: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required"), trace_id));
    }
    Ok(())
}

impl Session {
    pub fn connect(
        config: &AppConfig,
        runner: Arc<dyn CommandRunner>,
        serial: Option<String>,
    ) -> Self {
        let trace_id = new_trace_id();
        let adb_program = resolve_adb_program(&config.adb.command_path);
        let devices = list_devices(runner.as_ref(), &adb_program, &trace_id);
        let connected = !devices.is_empty();

        let serial = match serial {
            Some(value) => Some(value),
            None if devices.len() == 1 => devices.keys().next().cloned(),
            None => None,
        };

        if connected {
            info!(
                trace_id = %trace_id,
                devices = devices.len(),
                serial = serial.as_deref().unwrap_or(""),
                "adb session connected"
            );
        } else {
            warn!(trace_id = %trace_id, "no adb device connected");
        }

        Self {
            runner,
            adb_program,
            browse_root: config.explorer.browse_root.clone(),
            serial,
            devices,
            connected,
        }
    }

    /// Convenience constructor over the real subprocess runner.
    pub fn connect_system(config: &AppConfig, serial: Option<String>) -> Self {
        Self::connect(config, Arc::new(SystemRunner), serial)
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Ready devices seen at construction, serial → display model.
    pub fn devices(&self) -> &BTreeMap<String, String> {
        &self.devices
    }

    pub fn browse_root(&self) -> &str {
        &self.browse_root
    }

    /// Whether at least one ready device is attached right now. Unlike the
    /// `connected` flag this re-queries adb; a missing executable logs as
    /// `ToolNotFound` and reports false.
    pub fn check_connection(&self) -> bool {
        let trace_id = new_trace_id();
        let args = vec!["devices".to_string()];
        match self
            .runner
            .run(&self.adb_program, &args, COMMAND_TIMEOUT, &trace_id)
        {
            Ok(output) if output.succeeded() => parse_devices(&output.stdout)
                .iter()
                .any(|summary| summary.is_ready()),
            Ok(output) => {
                warn!(
                    trace_id = %trace_id,
                    stderr = %output.stderr.trim(),
                    "adb devices exited non-zero"
                );
                false
            }
            Err(err) => {
                warn!(trace_id = %trace_id, error = %err, "adb connection check failed");
                false
            }
        }
    }

    /// Long-format listing of `path` (the configured browse root when the
    /// path is blank). Empty on any failure, with the failure logged; a
    /// remote `ls` error is signaled by the listing command's sentinel line
    /// rather than the exit status.
    pub fn list_directory(&self, path: &str) -> Vec<FileEntry> {
        let trace_id = new_trace_id();
        if !self.connected {
            warn!(trace_id = %trace_id, "no adb device connected");
            return Vec::new();
        }
        let target = if path.trim().is_empty() {
            self.browse_root.as_str()
        } else {
            path
        };
        debug!(trace_id = %trace_id, path = %target, "listing directory");

        let output = match self.run_shell(shell::list_command(target), &trace_id) {
            Ok(output) => output,
            Err(err) => {
                warn!(trace_id = %trace_id, path = %target, error = %err, "listing failed");
                return Vec::new();
            }
        };
        if !output.succeeded() {
            warn!(
                trace_id = %trace_id,
                path = %target,
                stderr = %output.stderr.trim(),
                "listing exited non-zero"
            );
            return Vec::new();
        }
        if listing_reported_error(&output.stdout) {
            warn!(trace_id = %trace_id, path = %target, "remote listing reported an error");
            return Vec::new();
        }
        parse_directory_listing(target, &output.stdout)
    }

    pub fn pull_file(&self, remote_path: &str, local_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(remote_path, "remote_path", &trace_id)?;
        ensure_non_empty(local_path, "local_path", &trace_id)?;
        self.ensure_connected("pull", remote_path, &trace_id)?;
        let args = vec![
            "pull".to_string(),
            remote_path.to_string(),
            local_path.to_string(),
        ];
        self.execute("pull", remote_path, args, &trace_id)
    }

    pub fn push_file(&self, local_path: &str, remote_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(local_path, "local_path", &trace_id)?;
        ensure_non_empty(remote_path, "remote_path", &trace_id)?;
        self.ensure_connected("push", remote_path, &trace_id)?;
        let args = vec![
            "push".to_string(),
            local_path.to_string(),
            remote_path.to_string(),
        ];
        self.execute("push", remote_path, args, &trace_id)
    }

    pub fn rename_item(&self, old_path: &str, new_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(old_path, "old_path", &trace_id)?;
        ensure_non_empty(new_path, "new_path", &trace_id)?;
        self.ensure_connected("rename", old_path, &trace_id)?;
        self.execute_shell("rename", old_path, shell::move_command(old_path, new_path), &trace_id)
    }

    pub fn delete_item(&self, path: &str, is_dir: bool) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(path, "path", &trace_id)?;
        self.ensure_connected("delete", path, &trace_id)?;
        self.execute_shell("delete", path, shell::remove_command(path, is_dir), &trace_id)
    }

    pub fn create_file(&self, remote_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(remote_path, "remote_path", &trace_id)?;
        self.ensure_connected("create_file", remote_path, &trace_id)?;
        self.execute_shell(
            "create_file",
            remote_path,
            shell::touch_command(remote_path),
            &trace_id,
        )
    }

    pub fn create_folder(&self, remote_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(remote_path, "remote_path", &trace_id)?;
        self.ensure_connected("create_folder", remote_path, &trace_id)?;
        self.execute_shell(
            "create_folder",
            remote_path,
            shell::mkdir_command(remote_path),
            &trace_id,
        )
    }

    pub fn copy_on_device(&self, src_path: &str, dest_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(src_path, "src_path", &trace_id)?;
        ensure_non_empty(dest_path, "dest_path", &trace_id)?;
        self.ensure_connected("copy", src_path, &trace_id)?;
        self.ensure_parent_dir(dest_path, &trace_id);
        self.execute_shell(
            "copy",
            src_path,
            shell::copy_command(src_path, dest_path),
            &trace_id,
        )
    }

    pub fn move_on_device(&self, src_path: &str, dest_path: &str) -> Result<(), AppError> {
        let trace_id = new_trace_id();
        ensure_non_empty(src_path, "src_path", &trace_id)?;
        ensure_non_empty(dest_path, "dest_path", &trace_id)?;
        self.ensure_connected("move", src_path, &trace_id)?;
        self.ensure_parent_dir(dest_path, &trace_id);
        self.execute_shell(
            "move",
            src_path,
            shell::move_command(src_path, dest_path),
            &trace_id,
        )
    }

    fn ensure_connected(
        &self,
        operation: &'static str,
        target: &str,
        trace_id: &str,
    ) -> Result<(), AppError> {
        if self.connected {
            return Ok(());
        }
        warn!(
            trace_id = %trace_id,
            operation = operation,
            target = %target,
            "no adb device connected"
        );
        Err(AppError::no_device("No ADB device connected", trace_id))
    }

    /// Best-effort parent creation before copy/move; the operation's own
    /// exit status decides success.
    fn ensure_parent_dir(&self, dest_path: &str, trace_id: &str) {
        let parent = device_parent_dir(dest_path);
        if parent == "/" {
            return;
        }
        if let Err(err) = self.execute_shell("mkdir", &parent, shell::mkdir_command(&parent), trace_id)
        {
            debug!(
                trace_id = %trace_id,
                parent = %parent,
                error = %err,
                "destination parent creation failed"
            );
        }
    }

    fn run_adb(&self, args: Vec<String>, trace_id: &str) -> Result<CommandOutput, AppError> {
        let mut full_args = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = &self.serial {
            full_args.push("-s".to_string());
            full_args.push(serial.clone());
        }
        full_args.extend(args);
        self.runner
            .run(&self.adb_program, &full_args, COMMAND_TIMEOUT, trace_id)
    }

    fn run_shell(&self, command: String, trace_id: &str) -> Result<CommandOutput, AppError> {
        self.run_adb(vec!["shell".to_string(), command], trace_id)
    }

    fn execute_shell(
        &self,
        operation: &'static str,
        target: &str,
        command: String,
        trace_id: &str,
    ) -> Result<(), AppError> {
        self.finish(
            operation,
            target,
            self.run_shell(command, trace_id),
            trace_id,
        )
    }

    fn execute(
        &self,
        operation: &'static str,
        target: &str,
        args: Vec<String>,
        trace_id: &str,
    ) -> Result<(), AppError> {
        self.finish(operation, target, self.run_adb(args, trace_id), trace_id)
    }

    fn finish(
        &self,
        operation: &'static str,
        target: &str,
        result: Result<CommandOutput, AppError>,
        trace_id: &str,
    ) -> Result<(), AppError> {
        let output = result.map_err(|err| {
            warn!(
                trace_id = %trace_id,
                operation = operation,
                target = %target,
                error = %err,
                "adb command failed"
            );
            err
        })?;
        if !output.succeeded() {
            warn!(
                trace_id = %trace_id,
                operation = operation,
                target = %target,
                stderr = %output.stderr.trim(),
                "remote command exited non-zero"
            );
            return Err(AppError::remote_failure(
                format!("{operation} failed for {target}"),
                trace_id,
            ));
        }
        Ok(())
    }
}
