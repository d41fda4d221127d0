//! Turning a chat export into classified word lists.
//!
//! [`extractor`] flattens the polymorphic message schema into plain text,
//! [`tokenizer`] splits that text into English and Arabic tokens after
//! removing the words held in a [`StopWordSet`].

pub mod extractor;
pub mod stop_words;
pub mod tokenizer;

pub use self::extractor::{extract_text, Extraction, ExtractionReport, SkippedMessage};
pub use self::stop_words::StopWordSet;
pub use self::tokenizer::{classify_token, tokenize, ClassifiedTokens, Language};
