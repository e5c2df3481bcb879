use std::collections::HashMap;
use std::time::Instant;

use adb_file_explorer::app::config::load_config;
use adb_file_explorer::app::logging::init_logging;
use adb_file_explorer::app::session::Session;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Args {
    serial: Option<String>,
    json: bool,
    with_ops: bool,
    path: Option<String>,
}

#[derive(Serialize)]
struct SmokeSummary {
    tool: &'static str,
    status: &'static str,
    serial: Option<String>,
    devices: HashMap<String, String>,
    checks: Vec<SmokeCheck>,
}

#[derive(Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: &'static str, // pass|fail|skip
    duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut serial = std::env::var("ANDROID_SERIAL")
        .ok()
        .filter(|value| !value.trim().is_empty());
    let mut json = false;
    let mut with_ops = false;
    let mut path: Option<String> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--serial" => {
                serial = it
                    .next()
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty());
                if serial.is_none() {
                    return Err("--serial requires a value".to_string());
                }
            }
            "--path" => {
                let value = it
                    .next()
                    .ok_or_else(|| "--path requires a value".to_string())?;
                path = Some(value);
            }
            "--json" => {
                json = true;
            }
            "--with-ops" => {
                with_ops = true;
            }
            "-h" | "--help" => {
                return Err(
                    "Usage: cargo run --bin smoke -- [--serial SERIAL] [--path DEVICE_DIR] [--json] [--with-ops]\n"
                        .to_string(),
                );
            }
            other => return Err(format!("Unknown arg: {other}")),
        }
    }

    Ok(Args {
        serial,
        json,
        with_ops,
        path,
    })
}

fn run_check<F>(checks: &mut Vec<SmokeCheck>, name: &'static str, f: F) -> bool
where
    F: FnOnce() -> Result<(), String>,
{
    let start = Instant::now();
    match f() {
        Ok(()) => {
            checks.push(SmokeCheck {
                name,
                status: "pass",
                duration_ms: start.elapsed().as_millis(),
                error: None,
            });
            true
        }
        Err(err) => {
            checks.push(SmokeCheck {
                name,
                status: "fail",
                duration_ms: start.elapsed().as_millis(),
                error: Some(err),
            });
            false
        }
    }
}

fn skip(checks: &mut Vec<SmokeCheck>, name: &'static str) {
    checks.push(SmokeCheck {
        name,
        status: "skip",
        duration_ms: 0,
        error: None,
    });
}

fn main() {
    let args = match parse_args() {
        Ok(value) => value,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            std::process::exit(1);
        }
    };
    init_logging(&config.logging);

    let mut checks: Vec<SmokeCheck> = Vec::new();
    let mut status = "pass";

    let session = Session::connect_system(&config, args.serial.clone());
    if !run_check(&mut checks, "connect", || {
        if session.connected() {
            Ok(())
        } else {
            Err("No ADB device connected".to_string())
        }
    }) {
        status = "fail";
    }

    let browse_path = args
        .path
        .clone()
        .unwrap_or_else(|| session.browse_root().to_string());

    if session.connected() {
        if !run_check(&mut checks, "list_browse_root", || {
            let entries = session.list_directory(&browse_path);
            if entries.is_empty() {
                Err(format!("Listing of {browse_path} came back empty"))
            } else {
                Ok(())
            }
        }) {
            status = "fail";
        }
    } else {
        skip(&mut checks, "list_browse_root");
    }

    if session.connected() && args.with_ops {
        if !run_check(&mut checks, "mutation_round", || {
            let base = format!("{}/adb_file_explorer_smoke_{}", browse_path, Uuid::new_v4());
            let dir_a = format!("{base}/a");
            let dir_b = format!("{base}/b");
            let file = format!("{dir_b}/touched.txt");
            let copy = format!("{base}/copied/touched.txt");

            session
                .create_folder(&dir_a)
                .map_err(|err| err.to_string())?;
            session
                .rename_item(&dir_a, &dir_b)
                .map_err(|err| err.to_string())?;
            session.create_file(&file).map_err(|err| err.to_string())?;
            session
                .copy_on_device(&file, &copy)
                .map_err(|err| err.to_string())?;
            session
                .delete_item(&base, true)
                .map_err(|err| err.to_string())?;
            Ok(())
        }) {
            status = "fail";
        }
    } else {
        skip(&mut checks, "mutation_round");
    }

    let summary = SmokeSummary {
        tool: "adb_file_explorer_smoke",
        status,
        serial: session.serial().map(|value| value.to_string()),
        devices: session
            .devices()
            .iter()
            .map(|(serial, model)| (serial.clone(), model.clone()))
            .collect(),
        checks,
    };

    let output = if args.json {
        serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
    } else {
        let mut lines = vec![format!("status: {}", summary.status)];
        for check in &summary.checks {
            lines.push(format!(
                "  {:<18} {} ({} ms){}",
                check.name,
                check.status,
                check.duration_ms,
                check
                    .error
                    .as_deref()
                    .map(|err| format!(": {err}"))
                    .unwrap_or_default()
            ));
        }
        lines.join("\n")
    };

    println!("{output}");
    if summary.status != "pass" {
        std::process::exit(1);
    }
}
