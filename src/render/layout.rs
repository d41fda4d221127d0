use ab_glyph::PxScale;
use ahash::AHashMap;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use super::{FontData, WordCloudImage, WordCloudRenderer};
use crate::config::subsystems::RenderConfig;
use crate::config::ChatCloudConfig;
use crate::error::{Error, Result};

lazy_static! {
    // Two or more word characters, apostrophes allowed after the first
    static ref WORD: Regex = Regex::new(r"\w[\w']+").unwrap();
}

// Sampled from the viridis colour map
const PALETTE: [[u8; 3]; 10] = [
    [72, 40, 120],
    [62, 74, 137],
    [49, 104, 142],
    [38, 130, 142],
    [31, 158, 137],
    [53, 183, 121],
    [109, 205, 89],
    [180, 222, 44],
    [253, 231, 37],
    [68, 1, 84],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub word: String,
    pub count: usize,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

/// Word frequencies, most frequent first. Ties keep first-seen order.
pub fn count_words(text: &str) -> Vec<(String, usize)> {
    let mut counts: AHashMap<&str, (usize, usize)> = AHashMap::new();
    for (position, found) in WORD.find_iter(text).enumerate() {
        counts.entry(found.as_str()).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

fn words_to_plot(text: &str) -> Result<Vec<(String, usize)>> {
    let words = count_words(text);
    if words.is_empty() {
        return Err(Error::render("need at least 1 word to plot a word cloud, got 0"));
    }
    Ok(words)
}

/// Tracks which canvas pixels are taken, with a summed-area table for O(1)
/// rectangle queries.
struct OccupancyMap {
    width: u32,
    height: u32,
    taken: Vec<bool>,
    integral: Vec<u32>,
}

impl OccupancyMap {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            width,
            height,
            taken: vec![false; w * h],
            integral: vec![0; (w + 1) * (h + 1)],
        }
    }

    fn sum_at(&self, x: u32, y: u32) -> u32 {
        self.integral[y as usize * (self.width as usize + 1) + x as usize]
    }

    fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        let total = self.sum_at(x + w, y + h) + self.sum_at(x, y)
            - self.sum_at(x + w, y)
            - self.sum_at(x, y + h);
        total == 0
    }

    /// Picks a uniformly random free top-left corner for a `w`x`h` box.
    fn sample_free(&self, w: u32, h: u32, rng: &mut fastrand::Rng) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }
        let xs = 0..=self.width - w;
        let ys = 0..=self.height - h;

        let mut free = ys
            .flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_free(x, y, w, h));
        let count = free.clone().count();
        if count == 0 {
            return None;
        }
        free.nth(rng.usize(..count))
    }

    fn occupy(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let width = self.width as usize;
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.taken[row as usize * width + col as usize] = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let width = self.width as usize;
        let stride = width + 1;
        for row in 0..self.height as usize {
            let mut row_sum = 0;
            for col in 0..width {
                row_sum += self.taken[row * width + col] as u32;
                let above = self.integral[row * stride + col + 1];
                self.integral[(row + 1) * stride + col + 1] = above + row_sum;
            }
        }
    }
}

/// Frequency-scaled, horizontally laid out word cloud.
///
/// The first word starts at the maximum font size; each following word is
/// sized relative to the previous one by `relative_scaling` and shrunk by
/// `font_step` until a free spot is found. Layout stops at the first word
/// that does not fit at `min_font_size`.
pub struct LayoutRenderer {
    config: RenderConfig,
    default_font: FontData,
}

impl LayoutRenderer {
    pub fn new(config: RenderConfig, default_font: FontData) -> Self {
        Self { config, default_font }
    }

    /// Builds the renderer from a run's configuration, reading the default
    /// font from the data directory. A missing font is `FileNotFound`.
    pub fn from_config(config: &ChatCloudConfig) -> Result<Self> {
        let default_font = FontData::load(config.files.default_font_path())?;
        Ok(Self::new(config.render.clone(), default_font))
    }

    /// Lays out `words` (most frequent first) with `measure(word, font_size)`
    /// returning the rendered text box.
    pub fn place_words<F>(&self, words: &[(String, usize)], measure: F) -> Vec<PlacedWord>
    where
        F: FnMut(&str, u32) -> (u32, u32),
    {
        place_words(&self.config, words, measure)
    }
}

fn place_words<F>(config: &RenderConfig, words: &[(String, usize)], mut measure: F) -> Vec<PlacedWord>
where
    F: FnMut(&str, u32) -> (u32, u32),
{
    let mut rng = fastrand::Rng::with_seed(config.random_state);
    let mut occupancy = OccupancyMap::new(config.width, config.height);
    let margin = config.margin;
    let scaling = config.relative_scaling;

    let mut placed: Vec<PlacedWord> = Vec::new();
    let mut font_size = config.effective_max_font_size();
    let mut last_count: Option<usize> = None;

    for (word, count) in words.iter().take(config.max_words) {
        if let Some(last) = last_count {
            let ratio = *count as f32 / last as f32;
            font_size = ((scaling * ratio + (1.0 - scaling)) * font_size as f32).round() as u32;
        }

        let mut size = font_size;
        let spot = loop {
            if size < config.min_font_size {
                break None;
            }
            let (width, height) = measure(word.as_str(), size);
            let (box_w, box_h) = (width + margin, height + margin);
            if let Some((x, y)) = occupancy.sample_free(box_w, box_h, &mut rng) {
                break Some((x, y, width, height, box_w, box_h));
            }
            size = size.saturating_sub(config.font_step);
        };

        let Some((x, y, width, height, box_w, box_h)) = spot else {
            debug!("No room left for {:?} after {} words, stopping", word, placed.len());
            break;
        };

        occupancy.occupy(x, y, box_w, box_h);
        placed.push(PlacedWord {
            word: word.clone(),
            count: *count,
            font_size: size,
            x: x + margin / 2,
            y: y + margin / 2,
            width,
            height,
            color: PALETTE[rng.usize(..PALETTE.len())],
        });

        font_size = size;
        last_count = Some(*count);
    }

    placed
}

impl WordCloudRenderer for LayoutRenderer {
    fn generate(&self, text: &str, font: Option<&FontData>) -> Result<WordCloudImage> {
        let words = words_to_plot(text)?;
        let font_data = font.unwrap_or(&self.default_font);
        let font = font_data.parse()?;
        debug!("Laying out {} distinct words with font {:?}", words.len(), font_data.source());

        let placed = self.place_words(&words, |word, size| {
            text_size(PxScale::from(size as f32), &font, word)
        });

        let mut image = RgbImage::from_pixel(
            self.config.width,
            self.config.height,
            Rgb(self.config.background),
        );
        for word in &placed {
            draw_text_mut(
                &mut image,
                Rgb(word.color),
                word.x as i32,
                word.y as i32,
                PxScale::from(word.font_size as f32),
                &font,
                &word.word,
            );
        }

        info!("Placed {} of {} distinct words", placed.len(), words.len());
        Ok(WordCloudImage::new(image, placed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Roughly monospace: half an em per character, one em tall
    fn fake_measure(word: &str, size: u32) -> (u32, u32) {
        ((word.chars().count() as u32 * size / 2).max(1), size)
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 120,
            height: 60,
            ..RenderConfig::default()
        }
    }

    fn overlaps(a: &PlacedWord, b: &PlacedWord) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn counts_ignore_single_characters() {
        let words = count_words("b a bb bb cc it's مرحبا مرحبا");
        assert_eq!(
            words,
            vec![
                ("bb".to_string(), 2),
                ("مرحبا".to_string(), 2),
                ("cc".to_string(), 1),
                ("it's".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_text_cannot_be_plotted() {
        assert!(matches!(words_to_plot(""), Err(Error::Render(_))));
        assert!(matches!(words_to_plot("a b c ! ?"), Err(Error::Render(_))));
    }

    #[test]
    fn placed_words_stay_inside_and_apart() {
        let config = small_config();
        let words = count_words("alpha alpha alpha beta beta gamma delta epsilon zeta eta theta");
        let placed = place_words(&config, &words, fake_measure);

        assert!(!placed.is_empty());
        assert_eq!(placed[0].word, "alpha");
        for (i, word) in placed.iter().enumerate() {
            assert!(word.x + word.width <= config.width);
            assert!(word.y + word.height <= config.height);
            for other in &placed[i + 1..] {
                assert!(!overlaps(word, other), "{:?} overlaps {:?}", word, other);
            }
        }
    }

    #[test]
    fn font_sizes_never_grow() {
        let words = count_words("one one one one two two two three three four five six");
        let placed = place_words(&small_config(), &words, fake_measure);
        for pair in placed.windows(2) {
            assert!(pair[0].font_size >= pair[1].font_size);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let words = count_words("red green blue red green red cyan magenta");
        let first = place_words(&small_config(), &words, fake_measure);
        let second = place_words(&small_config(), &words, fake_measure);
        assert_eq!(first, second);
    }

    #[test]
    fn word_too_wide_for_canvas_stops_layout() {
        let config = RenderConfig {
            width: 20,
            height: 20,
            min_font_size: 10,
            ..RenderConfig::default()
        };
        let words = vec![("extraordinarily".to_string(), 3), ("ok".to_string(), 1)];
        let placed = place_words(&config, &words, fake_measure);
        assert!(placed.is_empty());
    }

    #[test]
    fn from_config_reads_the_default_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ChatCloudConfig::default();
        config.files.data_dir = dir.path().to_path_buf();

        match LayoutRenderer::from_config(&config) {
            Err(Error::FileNotFound { path }) => assert!(path.ends_with("DroidSansMono.ttf")),
            Err(e) => panic!("expected FileNotFound, got {:?}", e),
            Ok(_) => panic!("expected FileNotFound"),
        }

        std::fs::write(config.files.default_font_path(), b"not a font").unwrap();
        let renderer = LayoutRenderer::from_config(&config).unwrap();
        assert!(matches!(renderer.generate("some words here", None), Err(Error::Font(_))));
    }

    #[test]
    fn occupancy_queries() {
        let mut map = OccupancyMap::new(10, 10);
        assert!(map.is_free(0, 0, 10, 10));
        map.occupy(2, 2, 3, 3);
        assert!(!map.is_free(0, 0, 10, 10));
        assert!(!map.is_free(4, 4, 2, 2));
        assert!(map.is_free(5, 0, 5, 10));
        assert!(map.is_free(0, 5, 10, 5));
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(map.sample_free(11, 1, &mut rng), None);
        let (x, y) = map.sample_free(5, 5, &mut rng).unwrap();
        assert!(map.is_free(x, y, 5, 5));
    }
}
