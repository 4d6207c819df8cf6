use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use chrono::Local;
use hexdash::config::load_font_data;
use hexdash::telemetry::{parse_line, MockEngine};
use hexdash::{Dashboard, DashboardConfig, HostError, Snapshot};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Mock engine cadence (~8 updates per second).
const MOCK_INTERVAL: Duration = Duration::from_millis(120);
const FOOTER_DATE_FORMAT: &str = "%Y-%m-%d  %H:%M";

struct Args {
    title: String,
    font_path: Option<String>,
    from_stdin: bool,
    speed_limit: Option<i32>,
    debug_readout: bool,
}

fn parse_args() -> Result<Args, HostError> {
    let mut parsed = Args {
        title: "hexdash".to_string(),
        font_path: env::var("HEXDASH_FONT").ok(),
        from_stdin: false,
        speed_limit: Some(50),
        debug_readout: true,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => {
                parsed.title = args.next().ok_or(HostError::InvalidArgument {
                    flag: "--title",
                    reason: "missing value".to_string(),
                })?;
            }
            "--font" => {
                parsed.font_path = Some(args.next().ok_or(HostError::InvalidArgument {
                    flag: "--font",
                    reason: "missing path".to_string(),
                })?);
            }
            "--stdin" => parsed.from_stdin = true,
            "--mock" => parsed.from_stdin = false,
            "--no-limit" => parsed.speed_limit = None,
            "--limit" => {
                let value = args.next().unwrap_or_default();
                let limit = value.parse().map_err(|e| HostError::InvalidArgument {
                    flag: "--limit",
                    reason: format!("{value:?}: {e}"),
                })?;
                parsed.speed_limit = Some(limit);
            }
            "--no-debug" => parsed.debug_readout = false,
            other => {
                return Err(HostError::InvalidArgument {
                    flag: "argument",
                    reason: format!("unknown flag {other:?}"),
                })
            }
        }
    }
    Ok(parsed)
}

fn stamp(mut snapshot: Snapshot) -> Snapshot {
    snapshot.date = Some(Local::now().format(FOOTER_DATE_FORMAT).to_string());
    snapshot
}

fn spawn_mock(sender: Sender<Snapshot>, speed_limit: Option<i32>) {
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut engine = MockEngine::new(speed_limit).with_jitter(2.0);
        loop {
            let snapshot = engine.step(&mut rng);
            debug!(
                remaining_km = ?snapshot.remaining_km,
                avg_l100 = engine.average_consumption(),
                "mock step"
            );
            if sender.send(stamp(snapshot)).is_err() {
                break;
            }
            thread::sleep(MOCK_INTERVAL);
        }
    });
}

fn spawn_stdin(sender: Sender<Snapshot>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "stdin closed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Ok(snapshot) => {
                    if sender.send(stamp(snapshot)).is_err() {
                        break;
                    }
                }
                Err(err) => warn!(%err, "skipping telemetry line"),
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hexdash=info")),
        )
        .init();

    let args = parse_args()?;
    let font_data = args.font_path.as_deref().map(load_font_data).transpose()?;

    let config = DashboardConfig::builder()
        .title(args.title)
        .show_debug_readout(args.debug_readout)
        .maybe_font_data(font_data)
        .build();

    let (sender, receiver) = mpsc::channel();
    if args.from_stdin {
        info!("reading `speed rpm fuel coolant [limit]` lines from stdin");
        spawn_stdin(sender);
    } else {
        info!(limit = ?args.speed_limit, "driving gauges from the mock engine");
        spawn_mock(sender, args.speed_limit);
    }

    Dashboard::new(config).show_with_snapshots(receiver)?;
    Ok(())
}
