pub mod file;
pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use std::fs;
use crate::error::{Error, Result};
use log::trace;

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCloudConfig {
    // File paths
    pub files: file::FileConfig,

    // Subsystem configs
    pub extraction: subsystems::ExtractionConfig,
    pub render: subsystems::RenderConfig,
    pub logging: subsystems::LoggingConfig,

    // Problems met while reading the INI, replayed once logging is up
    #[serde(skip)]
    warnings: Vec<String>,
}

/// Values given on the command line. Each one set wins over the INI file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub on_malformed: Option<subsystems::MalformedPolicy>,
}

impl ChatCloudConfig {
    pub fn validate(&self) -> Result<()> {
        self.files.validate()?;
        self.extraction.validate()?;
        self.render.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        trace!("Loading configuration from: {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| Error::from_io_at(e, path))?;
        Self::from_ini_str(&content)
    }

    pub fn from_ini_str(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num + 1, current_section);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                // Delegate to appropriate subsystem config
                let handled = match current_section.as_str() {
                    "file" => config.files.from_ini_section(&current_section, key, value),
                    "extraction" => config.extraction.from_ini_section(&current_section, key, value),
                    "render" => config.render.from_ini_section(&current_section, key, value),
                    "logging" => config.logging.from_ini_section(&current_section, key, value),
                    _ => None,
                };

                match handled {
                    Some(Err(e)) => config.warnings.push(
                        format!("Error processing config key {}={}: {}", key, value, e)
                    ),
                    Some(Ok(())) => {}
                    None => config.warnings.push(
                        format!("Unrecognized config key: {}={} in section [{}]", key, value, current_section)
                    ),
                }
            } else {
                config.warnings.push(format!("Ignoring malformed config line {}: {}", line_num + 1, line));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Problems found while parsing, in file order. Parsing happens before
    /// any logger is installed, so callers log these themselves.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Applies command-line values over the loaded ones and revalidates.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(dir) = &overrides.data_dir {
            self.files.data_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.files.output_dir = Some(dir.clone());
        }
        if let Some(policy) = overrides.on_malformed {
            self.extraction.on_malformed = policy;
        }
        self.validate()
    }
}
