//! One word-cloud run over a single chat export.

use log::{info, warn};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::ChatCloudConfig;
use crate::error::{Error, Result};
use crate::parser::{extract_text, tokenize, ClassifiedTokens, ExtractionReport, Language, StopWordSet};
use crate::render::{FontData, WordCloudRenderer};
use crate::types::ChatExport;
use crate::utils::DiscardedLogger;

const TOP_WORDS_LOGGED: usize = 10;

/// Extracted text and its language split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedText {
    pub plain_text: String,
    pub tokens: ClassifiedTokens,
    pub report: ExtractionReport,
}

impl ProcessedText {
    pub fn english_text(&self) -> String {
        self.tokens.english_text()
    }

    pub fn arabic_text(&self) -> String {
        self.tokens.arabic_text()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub arabic: PathBuf,
    pub english: PathBuf,
}

/// Reads a chat export as JSON. A missing file is `FileNotFound`.
pub fn load_chat<P: AsRef<Path>>(path: P) -> Result<ChatExport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::from_io_at(e, path))?;
    let export: ChatExport = serde_json::from_reader(BufReader::new(file))?;
    Ok(export)
}

/// Extraction followed by tokenization. Pure: no I/O, no hidden state.
pub fn process_export(export: &ChatExport, stop_words: &StopWordSet, config: &ChatCloudConfig) -> Result<ProcessedText> {
    let extraction = extract_text(export, config.extraction.on_malformed)?;
    let tokens = tokenize(&extraction.text, stop_words);
    Ok(ProcessedText {
        plain_text: extraction.text,
        tokens,
        report: extraction.report,
    })
}

/// Everything one run needs, loaded up front: the chat, both stop word
/// lists and the Arabic font.
pub struct ChatStatistics {
    chat_path: PathBuf,
    save_path: PathBuf,
    config: ChatCloudConfig,
    chat: ChatExport,
    stop_words: StopWordSet,
    arabic_font: FontData,
}

impl ChatStatistics {
    pub fn new<P: AsRef<Path>>(chat_path: P, save_path: Option<PathBuf>, config: &ChatCloudConfig) -> Result<Self> {
        let chat_path = chat_path.as_ref().to_path_buf();
        info!("Loading the chat data from {:?}", chat_path);

        let save_path = save_path.unwrap_or_else(|| config.files.resolve_output_dir(&chat_path));
        let chat = load_chat(&chat_path)?;
        info!(
            "Loaded {} messages{}",
            chat.messages.len(),
            chat.name().map(|n| format!(" from {:?}", n)).unwrap_or_default()
        );

        let stop_words = StopWordSet::load(
            config.files.arabic_stop_words_path(),
            config.files.english_stop_words_path(),
        )?;
        info!(
            "Loaded {} Arabic and {} English stop words",
            stop_words.arabic_len(),
            stop_words.english_len()
        );
        let arabic_font = FontData::load(config.files.arabic_font_path())?;

        Ok(Self {
            chat_path,
            save_path,
            config: config.clone(),
            chat,
            stop_words,
            arabic_font,
        })
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn process(&self) -> Result<ProcessedText> {
        info!("Processing the chat data");
        let processed = process_export(&self.chat, &self.stop_words, &self.config)?;

        if !processed.report.skipped.is_empty() {
            warn!("Skipped {} malformed messages", processed.report.skipped.len());
            self.record_skipped(&processed.report);
        }

        info!(
            "Chat data processed successfully: {} English and {} Arabic tokens",
            processed.tokens.english.len(),
            processed.tokens.arabic.len()
        );
        for language in [Language::Arabic, Language::English] {
            let top = processed.tokens.top_words(language, TOP_WORDS_LOGGED);
            if !top.is_empty() {
                info!("Top {:?} words: {:?}", language, top);
            }
        }
        Ok(processed)
    }

    // The discarded log is a diagnostic; failing to write it must not stop the run
    fn record_skipped(&self, report: &ExtractionReport) {
        let Some(path) = &self.config.extraction.discarded_log else {
            return;
        };
        let mut logger = match DiscardedLogger::open(path) {
            Ok(logger) => logger,
            Err(e) => {
                warn!("Could not open discarded message log {:?}: {}", path, e);
                return;
            }
        };
        let source = self.chat_path.to_string_lossy();
        for skipped in &report.skipped {
            if let Err(e) = logger.log_skipped(&source, skipped) {
                warn!("Could not record skipped message {}: {}", skipped.index, e);
                return;
            }
        }
    }

    /// Renders and saves both clouds: Arabic with the Arabic font, English
    /// with the renderer's default font.
    pub fn generate_word_cloud<R: WordCloudRenderer>(&self, renderer: &R) -> Result<OutputPaths> {
        info!("Generating word clouds start");
        let processed = self.process()?;

        info!("Generating word clouds");
        let arabic_cloud = renderer.generate(&processed.arabic_text(), Some(&self.arabic_font))?;
        let english_cloud = renderer.generate(&processed.english_text(), None)?;
        info!(
            "Word clouds generated successfully: {} Arabic and {} English words placed",
            arabic_cloud.words().len(),
            english_cloud.words().len()
        );

        info!("Saving the word clouds to {:?}", self.save_path);
        fs::create_dir_all(&self.save_path)?;
        let paths = OutputPaths {
            arabic: self.save_path.join(&self.config.files.arabic_output),
            english: self.save_path.join(&self.config.files.english_output),
        };
        arabic_cloud.to_file(&paths.arabic)?;
        english_cloud.to_file(&paths.english)?;
        info!("Word clouds saved successfully");

        Ok(paths)
    }
}
