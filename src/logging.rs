use std::{fs::File, io::Write, path::Path};

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::errors::{Error, Result};

/// Installs the file logger. The file is truncated, then written line by
/// line as `<timestamp> - <level> - <message>`.
///
/// Records from other crates are dropped so the file only holds this
/// application's own lines.
pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path)?;

    Builder::new()
        .filter_level(LevelFilter::Off)
        .filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Info)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| Error::Config(format!("cannot install logger: {}", e)))
}
