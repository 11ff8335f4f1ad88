use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::configuration::LogLevel;

/// Installs the global logger at `level`. `RUST_LOG` takes precedence when set.
/// Calling it again after a logger is installed only logs a warning.
pub fn init_logger(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_filter())
        .parse_default_env()
        .format(|buf, record| {
            let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
            writeln!(buf, "[{} {:<5}] {}", clock_time(now.as_secs(), now.subsec_millis()), record.level(), record.args())
        })
        .try_init();

    if let Err(e) = result {
        log::warn!("Logger already initialized: {}", e);
    }
}

/// `HH:MM:SS.mmm` of the UTC day.
fn clock_time(secs: u64, millis: u32) -> String {
    format!("{:02}:{:02}:{:02}.{:03}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60, millis)
}
