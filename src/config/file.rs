// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    // Directory holding stop word lists and fonts
    pub data_dir: PathBuf,
    pub arabic_stop_words: String,
    pub english_stop_words: String,
    pub arabic_font: String,
    pub default_font: String,

    // Defaults to the chat file's directory when unset
    pub output_dir: Option<PathBuf>,
    pub arabic_output: String,
    pub english_output: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            arabic_stop_words: "stop_words.txt".to_string(),
            english_stop_words: "stop_words_E.txt".to_string(),
            arabic_font: "BHoma.ttf".to_string(),
            default_font: "DroidSansMono.ttf".to_string(),
            output_dir: None,
            arabic_output: "arabic_example.png".to_string(),
            english_output: "english_example.png".to_string(),
        }
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        let value = value.trim_matches('"');
        match key {
            "data_dir" => {
                self.data_dir = PathBuf::from(value);
                Some(Ok(()))
            },
            "arabic_stop_words" => {
                self.arabic_stop_words = value.to_string();
                Some(Ok(()))
            },
            "english_stop_words" => {
                self.english_stop_words = value.to_string();
                Some(Ok(()))
            },
            "arabic_font" => {
                self.arabic_font = value.to_string();
                Some(Ok(()))
            },
            "default_font" => {
                self.default_font = value.to_string();
                Some(Ok(()))
            },
            "output_dir" => {
                self.output_dir = if value.is_empty() { None } else { Some(PathBuf::from(value)) };
                Some(Ok(()))
            },
            "arabic_output" => {
                self.arabic_output = value.to_string();
                Some(Ok(()))
            },
            "english_output" => {
                self.english_output = value.to_string();
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("arabic_stop_words", &self.arabic_stop_words),
            ("english_stop_words", &self.english_stop_words),
            ("arabic_font", &self.arabic_font),
            ("default_font", &self.default_font),
            ("arabic_output", &self.arabic_output),
            ("english_output", &self.english_output),
        ];
        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(Error::config(format!("{} must not be empty", key)));
            }
        }
        if self.arabic_output == self.english_output {
            return Err(Error::config(format!(
                "arabic_output and english_output must differ (both {:?})", self.arabic_output
            )));
        }
        Ok(())
    }

    pub fn arabic_stop_words_path(&self) -> PathBuf {
        self.data_dir.join(&self.arabic_stop_words)
    }

    pub fn english_stop_words_path(&self) -> PathBuf {
        self.data_dir.join(&self.english_stop_words)
    }

    pub fn arabic_font_path(&self) -> PathBuf {
        self.data_dir.join(&self.arabic_font)
    }

    pub fn default_font_path(&self) -> PathBuf {
        self.data_dir.join(&self.default_font)
    }

    /// Output directory for the images: the configured one, else the chat file's parent.
    pub fn resolve_output_dir(&self, chat_path: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => chat_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_falls_back_to_chat_parent() {
        let files = FileConfig::default();
        assert_eq!(
            files.resolve_output_dir(Path::new("exports/chat/result.json")),
            PathBuf::from("exports/chat")
        );
    }

    #[test]
    fn explicit_output_dir_wins() {
        let files = FileConfig {
            output_dir: Some(PathBuf::from("clouds")),
            ..FileConfig::default()
        };
        assert_eq!(files.resolve_output_dir(Path::new("a/result.json")), PathBuf::from("clouds"));
    }

    #[test]
    fn same_output_names_rejected() {
        let files = FileConfig {
            english_output: "arabic_example.png".to_string(),
            ..FileConfig::default()
        };
        assert!(files.validate().is_err());
    }
}
