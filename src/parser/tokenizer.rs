use ahash::AHashMap;
use log::debug;

use super::StopWordSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Arabic,
}

/// English if every codepoint is below 128, Arabic otherwise.
///
/// Any other non-ASCII script also lands in `Arabic`.
pub fn classify_token(token: &str) -> Language {
    if token.chars().all(|c| (c as u32) < 128) {
        Language::English
    } else {
        Language::Arabic
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTokens {
    pub english: Vec<String>,
    pub arabic: Vec<String>,
}

/// Splits on whitespace, drops stop words and sorts the rest by language.
/// Source order is preserved within each list.
///
/// The information separators U+001C..=U+001F also split tokens.
pub fn tokenize(text: &str, stop_words: &StopWordSet) -> ClassifiedTokens {
    let mut tokens = ClassifiedTokens::default();
    let mut dropped = 0usize;

    for token in text.split(is_separator).filter(|t| !t.is_empty()) {
        if stop_words.contains(token) {
            dropped += 1;
            continue;
        }
        match classify_token(token) {
            Language::English => tokens.english.push(token.to_string()),
            Language::Arabic => tokens.arabic.push(token.to_string()),
        }
    }

    debug!(
        "Tokenized into {} English and {} Arabic tokens, {} stop words dropped",
        tokens.english.len(),
        tokens.arabic.len(),
        dropped
    );
    tokens
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

impl ClassifiedTokens {
    pub fn tokens(&self, language: Language) -> &[String] {
        match language {
            Language::English => &self.english,
            Language::Arabic => &self.arabic,
        }
    }

    /// The list joined by single spaces, as handed to the renderer.
    pub fn joined(&self, language: Language) -> String {
        self.tokens(language).join(" ")
    }

    pub fn english_text(&self) -> String {
        self.joined(Language::English)
    }

    pub fn arabic_text(&self) -> String {
        self.joined(Language::Arabic)
    }

    /// The `n` most frequent tokens with their counts. Ties keep first-seen order.
    pub fn top_words(&self, language: Language, n: usize) -> Vec<(String, usize)> {
        let mut counts: AHashMap<&str, (usize, usize)> = AHashMap::new();
        for (position, token) in self.tokens(language).iter().enumerate() {
            counts.entry(token.as_str()).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(n)
            .map(|(token, count, _)| (token.to_string(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_scripts_with_no_stop_words() {
        let tokens = tokenize("hello world\nمرحبا\n", &StopWordSet::empty());
        assert_eq!(tokens.english, vec!["hello", "world"]);
        assert_eq!(tokens.arabic, vec!["مرحبا"]);
        assert_eq!(tokens.english_text(), "hello world");
        assert_eq!(tokens.arabic_text(), "مرحبا");
    }

    #[test]
    fn stop_words_match_exactly() {
        let stop_words = StopWordSet::new(["في"], ["the"]);
        let tokens = tokenize("the The في فيه the,", &stop_words);
        assert_eq!(tokens.english, vec!["The", "the,"]);
        assert_eq!(tokens.arabic, vec!["فيه"]);
    }

    #[test]
    fn mixed_tokens_count_as_arabic() {
        assert_eq!(classify_token("abc"), Language::English);
        assert_eq!(classify_token("abcé"), Language::Arabic);
        assert_eq!(classify_token("كتابbook"), Language::Arabic);
        assert_eq!(classify_token("привет"), Language::Arabic);
        assert_eq!(classify_token("123!?"), Language::English);
    }

    #[test]
    fn every_surviving_token_lands_once() {
        let text = "one two اثنان ثلاثة 3 ok! naïve\tthe\u{00a0}end";
        let stop_words = StopWordSet::new(Vec::<&str>::new(), vec!["the"]);
        let tokens = tokenize(text, &stop_words);
        let survivors: Vec<&str> = text.split_whitespace().filter(|t| *t != "the").collect();
        assert_eq!(tokens.english.len() + tokens.arabic.len(), survivors.len());
        for token in &tokens.english {
            assert!(token.is_ascii());
        }
        for token in &tokens.arabic {
            assert!(!token.is_ascii());
        }
    }

    #[test]
    fn information_separators_split_tokens() {
        let tokens = tokenize("a\u{1f}b\u{1c}\u{1d}c\u{1e} d", &StopWordSet::empty());
        assert_eq!(tokens.english, vec!["a", "b", "c", "d"]);
        assert_eq!(tokens.english_text(), "a b c d");
    }

    #[test]
    fn top_words_orders_by_count_then_first_seen() {
        let tokens = tokenize("b a b c a b d", &StopWordSet::empty());
        let top = tokens.top_words(Language::English, 3);
        assert_eq!(
            top,
            vec![("b".to_string(), 3), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn empty_text_gives_empty_lists() {
        let tokens = tokenize(" \n\t", &StopWordSet::empty());
        assert!(tokens.english.is_empty());
        assert!(tokens.arabic.is_empty());
        assert_eq!(tokens.english_text(), "");
    }
}
