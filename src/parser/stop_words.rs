use ahash::AHashSet;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Error, Result};

/// Stop words for both languages. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    arabic: AHashSet<String>,
    english: AHashSet<String>,
}

impl StopWordSet {
    pub fn new<A, E, S>(arabic: A, english: E) -> Self
    where
        A: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arabic: arabic.into_iter().map(Into::into).collect(),
            english: english.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads both newline-delimited lists. A missing file is an error.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(arabic_path: P, english_path: Q) -> Result<Self> {
        let arabic = read_list(arabic_path.as_ref())?;
        let english = read_list(english_path.as_ref())?;

        let overlap = arabic.intersection(&english).count();
        if overlap > 0 {
            debug!("{} stop words appear in both lists", overlap);
        }

        Ok(Self { arabic, english })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.arabic.contains(token) || self.english.contains(token)
    }

    pub fn arabic_len(&self) -> usize {
        self.arabic.len()
    }

    pub fn english_len(&self) -> usize {
        self.english.len()
    }
}

fn read_list(path: &Path) -> Result<AHashSet<String>> {
    info!("Loading stop words from: {:?}", path);
    let file = File::open(path).map_err(|e| Error::from_io_at(e, path))?;
    let reader = io::BufReader::new(file);

    let mut words = AHashSet::new();
    for line in reader.lines() {
        let word = line?;
        let word = word.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }

    info!("Loaded {} stop words from {:?}", words.len(), path);
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_both_lists_trimming_lines() {
        let dir = tempfile::tempdir().unwrap();
        let arabic = dir.path().join("stop_words.txt");
        let english = dir.path().join("stop_words_E.txt");
        fs::write(&arabic, "في\r\nمن\n\n").unwrap();
        fs::write(&english, "the\n  and \nThe\n").unwrap();

        let set = StopWordSet::load(&arabic, &english).unwrap();
        assert_eq!(set.arabic_len(), 2);
        assert_eq!(set.english_len(), 3);
        assert!(set.contains("في"));
        assert!(set.contains("and"));
        assert!(set.contains("The"));
        assert!(!set.contains("THE"));
    }

    #[test]
    fn missing_list_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let english = dir.path().join("stop_words_E.txt");
        fs::write(&english, "the\n").unwrap();

        match StopWordSet::load(dir.path().join("stop_words.txt"), &english) {
            Err(Error::FileNotFound { path }) => assert!(path.ends_with("stop_words.txt")),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }
}
