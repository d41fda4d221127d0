use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use log::debug;

use crate::parser::SkippedMessage;

/// Appends one line per skipped message to a file.
///
/// Line format: `[TYPE] | REASON | METADATA | TEXT`.
#[derive(Debug)]
pub struct DiscardedLogger {
    file: File,
}

impl DiscardedLogger {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        debug!("Initialized discarded content logger at {:?}", path);
        Ok(Self { file })
    }

    fn log_discarded(&mut self, content_type: &str, text: &str, reason: &str, metadata: Option<&str>) -> io::Result<()> {
        writeln!(
            self.file,
            "[{}] | {} | {} | {}",
            content_type,
            reason,
            metadata.unwrap_or("-"),
            text.replace('\n', " ")
        )?;
        self.file.flush()
    }

    pub fn log_skipped(&mut self, source: &str, skipped: &SkippedMessage) -> io::Result<()> {
        let metadata = format!("{} #{}", source, skipped.index);
        self.log_discarded("MESSAGE", &skipped.raw, "malformed text", Some(&metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discarded.log");
        let mut logger = DiscardedLogger::open(&path).unwrap();

        logger
            .log_skipped("result.json", &SkippedMessage { index: 4, raw: "{\"text\":\n12}".to_string() })
            .unwrap();
        logger.log_discarded("FRAGMENT", "x", "test", None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[MESSAGE] | malformed text | result.json #4 | {\"text\": 12}");
        assert_eq!(lines[1], "[FRAGMENT] | test | - | x");
    }

    #[test]
    fn reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discarded.log");
        for index in 0..2 {
            let mut logger = DiscardedLogger::open(&path).unwrap();
            logger
                .log_skipped("chat.json", &SkippedMessage { index, raw: "7".to_string() })
                .unwrap();
        }
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with("chat.json #1 | 7\n"));
    }
}
