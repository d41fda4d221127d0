use log::{debug, warn};

use crate::config::subsystems::MalformedPolicy;
use crate::error::{Error, Result};
use crate::types::{classify_message, ChatExport, MessageText};

/// A message left out of the extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMessage {
    pub index: usize,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub messages_seen: usize,
    pub messages_extracted: usize,
    pub fragments_extracted: usize,
    pub skipped: Vec<SkippedMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub report: ExtractionReport,
}

/// Flattens every message into one string, each message or fragment
/// followed by `'\n'`, in source order.
///
/// A message is either appended whole or not at all. Under
/// [`MalformedPolicy::Skip`] a malformed message is recorded in the report and
/// extraction moves on; under [`MalformedPolicy::Fail`] the first one is
/// returned as [`Error::MalformedMessage`].
pub fn extract_text(export: &ChatExport, policy: MalformedPolicy) -> Result<Extraction> {
    let mut text = String::new();
    let mut report = ExtractionReport::default();

    for (index, message) in export.messages.iter().enumerate() {
        report.messages_seen += 1;

        let message_text = match classify_message(index, message) {
            Ok(message_text) => message_text,
            Err(Error::MalformedMessage { index, raw }) if policy == MalformedPolicy::Skip => {
                warn!("Skipping malformed message {}: {}", index, raw);
                report.skipped.push(SkippedMessage { index, raw });
                continue;
            }
            Err(e) => return Err(e),
        };

        match &message_text {
            MessageText::Plain(plain) => {
                text.push_str(plain);
                text.push('\n');
            }
            MessageText::Fragments(fragments) => {
                for fragment in fragments {
                    text.push_str(fragment.text());
                    text.push('\n');
                }
            }
        }

        report.messages_extracted += 1;
        report.fragments_extracted += message_text.fragment_count();
    }

    debug!(
        "Extracted {} of {} messages ({} fragments, {} skipped)",
        report.messages_extracted,
        report.messages_seen,
        report.fragments_extracted,
        report.skipped.len()
    );

    Ok(Extraction { text, report })
}
