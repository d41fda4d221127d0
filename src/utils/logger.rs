use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use chrono::Local;
use log::LevelFilter;
use crate::config::subsystems::LoggingConfig;
use crate::error::Result;

/// Installs the global `env_logger` with the configured level.
///
/// When `log_dir` is set, output goes to `chat_wordcloud_<timestamp>.log` in
/// that directory and its path is returned; otherwise to stderr.
pub fn init_logging(config: &LoggingConfig, level_override: Option<LevelFilter>) -> Result<Option<PathBuf>> {
    let level = level_override.unwrap_or_else(|| config.get_log_level());

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);

    let log_path = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            let path = dir.join(format!("chat_wordcloud_{}.log", timestamp));
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            builder.target(env_logger::Target::Pipe(Box::new(log_file)));
            Some(path)
        }
        None => {
            builder.target(env_logger::Target::Stderr);
            None
        }
    };

    // A second initialisation (tests, embedding) keeps the first logger
    let _ = builder.try_init();
    Ok(log_path)
}
