//! Word-frequency clouds.
//!
//! Words are counted (stopwords and single letters dropped), sized by
//! frequency and placed on an Archimedean spiral starting at the canvas
//! center. A word that cannot be placed is retried at a smaller size and
//! skipped once it falls below the minimum font size.

use crate::error::{ReviewError, Result};
use once_cell::sync::Lazy;
use plotters::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pixel height reserved for the title above the cloud.
const TITLE_BAND: u32 = 50;

const ANGLE_STEP: f64 = 0.05;
const RADIUS_PER_RADIAN: f64 = 1.2;
const MAX_SPIRAL_STEPS: usize = 10_000;

/// Shrink factor applied to a word that found no free spot.
const SHRINK: f64 = 0.75;

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "could", "couldn", "did", "didn", "do",
        "does", "doesn", "doing", "don", "down", "during", "each", "else", "ever", "few", "for",
        "from", "further", "get", "had", "hadn", "has", "hasn", "have", "haven", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if",
        "in", "into", "is", "isn", "it", "its", "itself", "just", "k", "let", "ll", "me", "more",
        "most", "mustn", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only",
        "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own",
        "r", "re", "same", "shall", "shan", "she", "should", "shouldn", "since", "so", "some",
        "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve",
        "very", "was", "wasn", "we", "were", "weren", "what", "when", "where", "which", "while",
        "who", "whom", "why", "with", "won", "would", "wouldn", "www", "http", "com", "you",
        "your", "yours", "yourself", "yourselves", "br",
    ]
    .into_iter()
    .collect()
});

/// Size and density settings for one cloud image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordCloudOptions {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl WordCloudOptions {
    /// Font sizes scale with the image height.
    pub fn new(width: u32, height: u32, max_words: usize) -> Self {
        Self {
            width,
            height,
            max_words,
            min_font_size: 10.0,
            max_font_size: (height as f64 / 5.0).max(12.0),
        }
    }
}

/// A word with its final position and size, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub font_size: f64,
}

impl PlacedWord {
    fn overlaps(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        x < self.x + self.width as i32
            && self.x < x + width as i32
            && y < self.y + self.height as i32
            && self.y < y + height as i32
    }
}

/// Count words, most frequent first (ties alphabetical), keeping at most
/// `max_words`. Stopwords and one-letter tokens are dropped.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in text.split_whitespace() {
        if token.chars().count() < 2 || STOPWORDS.contains(token) {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut frequencies: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies.truncate(max_words);
    frequencies
}

/// Place words on a `canvas` of the given pixel size.
///
/// `measure` returns the pixel box of a word at a font size. Every placed word
/// lies fully inside the canvas and no two placed words overlap.
pub fn layout_words<F, E>(
    frequencies: &[(String, usize)],
    canvas: (u32, u32),
    options: &WordCloudOptions,
    mut measure: F,
) -> std::result::Result<Vec<PlacedWord>, E>
where
    F: FnMut(&str, f64) -> std::result::Result<(u32, u32), E>,
{
    let Some(top) = frequencies.first().map(|(_, count)| *count) else {
        return Ok(Vec::new());
    };

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(frequencies.len());
    for (word, count) in frequencies {
        let ratio = *count as f64 / top as f64;
        let mut font_size =
            options.min_font_size + (options.max_font_size - options.min_font_size) * ratio;

        while font_size >= options.min_font_size {
            let (width, height) = measure(word, font_size)?;
            if let Some((x, y)) = find_spot(&placed, canvas, width, height) {
                placed.push(PlacedWord {
                    word: word.clone(),
                    x,
                    y,
                    width,
                    height,
                    font_size,
                });
                break;
            }
            font_size *= SHRINK;
        }
    }

    Ok(placed)
}

fn find_spot(
    placed: &[PlacedWord],
    (canvas_w, canvas_h): (u32, u32),
    width: u32,
    height: u32,
) -> Option<(i32, i32)> {
    if width > canvas_w || height > canvas_h {
        return None;
    }

    let center_x = canvas_w as f64 / 2.0;
    let center_y = canvas_h as f64 / 2.0;
    let aspect = canvas_h as f64 / canvas_w.max(1) as f64;

    for step in 0..MAX_SPIRAL_STEPS {
        let t = step as f64 * ANGLE_STEP;
        let r = RADIUS_PER_RADIAN * t;
        let x = (center_x + r * t.cos() - width as f64 / 2.0).round() as i32;
        let y = (center_y + r * t.sin() * aspect - height as f64 / 2.0).round() as i32;

        if x < 0
            || y < 0
            || x + width as i32 > canvas_w as i32
            || y + height as i32 > canvas_h as i32
        {
            continue;
        }
        if !placed.iter().any(|p| p.overlaps(x, y, width, height)) {
            return Some((x, y));
        }
    }
    None
}

fn measure_text(word: &str, font_size: f64) -> std::result::Result<(u32, u32), String> {
    ("sans-serif", font_size)
        .into_font()
        .box_size(word)
        .map_err(|e| e.to_string())
}

/// Render a cloud of `text` to a PNG at `path`.
///
/// Returns `Ok(None)` without creating a file when the text has no countable
/// words or nothing fits on the canvas.
pub fn render_word_cloud(
    text: &str,
    path: &Path,
    title: &str,
    options: &WordCloudOptions,
) -> Result<Option<PathBuf>> {
    if text.trim().is_empty() {
        debug!("Empty corpus, skipping word cloud '{}'", title);
        return Ok(None);
    }

    let frequencies = word_frequencies(text, options.max_words);
    if frequencies.is_empty() {
        debug!("No countable words, skipping word cloud '{}'", title);
        return Ok(None);
    }

    let canvas = (options.width, options.height.saturating_sub(TITLE_BAND));
    let words = layout_words(&frequencies, canvas, options, measure_text)
        .map_err(|e| ReviewError::render(path, e))?;
    if words.is_empty() {
        warn!("No word fits the canvas, skipping word cloud '{}'", title);
        return Ok(None);
    }

    draw_word_cloud(&words, title, path, options).map_err(|e| ReviewError::render(path, e))?;
    debug!(
        "Word cloud saved: {} ({} words)",
        path.display(),
        words.len()
    );
    Ok(Some(path.to_path_buf()))
}

fn draw_word_cloud(
    words: &[PlacedWord],
    title: &str,
    path: &Path,
    options: &WordCloudOptions,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (title_area, canvas) = root.split_vertically(TITLE_BAND);
    let title_style = ("sans-serif", 26.0).into_font().color(&BLACK);
    let (title_w, title_h) = title_area.estimate_text_size(title, &title_style)?;
    let title_x = (options.width as i32 - title_w as i32).max(0) / 2;
    let title_y = (TITLE_BAND as i32 - title_h as i32).max(0) / 2;
    title_area.draw_text(title, &title_style, (title_x, title_y))?;

    for (i, placed) in words.iter().enumerate() {
        let style = ("sans-serif", placed.font_size)
            .into_font()
            .color(&PALETTE[i % PALETTE.len()]);
        canvas.draw(&Text::new(placed.word.as_str(), (placed.x, placed.y), style))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tempfile::TempDir;

    /// Fixed-width glyphs: 0.6 em wide, 1 em tall.
    fn stub_measure(word: &str, size: f64) -> std::result::Result<(u32, u32), Infallible> {
        let width = (word.chars().count() as f64 * size * 0.6).ceil() as u32;
        Ok((width, size.ceil() as u32))
    }

    #[test]
    fn test_word_frequencies() {
        let freqs = word_frequencies(
            "great taste and great price the taste is great a b price",
            10,
        );
        assert_eq!(
            freqs,
            vec![
                ("great".to_string(), 3),
                ("price".to_string(), 2),
                ("taste".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_word_frequencies_limit_and_stopwords() {
        assert!(word_frequencies("the and of a i", 10).is_empty());
        assert_eq!(word_frequencies("zeta alpha beta", 2).len(), 2);
        assert_eq!(word_frequencies("zeta alpha beta", 2)[0].0, "alpha");
    }

    #[test]
    fn test_layout_is_disjoint_and_in_bounds() {
        let text = (0..60)
            .map(|i| format!("word{} ", (b'a' + (i % 26) as u8) as char).repeat(i % 7 + 1))
            .collect::<String>();
        let freqs = word_frequencies(&text, 200);
        let options = WordCloudOptions::new(400, 250, 200);
        let canvas = (400, 200);

        let placed = layout_words(&freqs, canvas, &options, stub_measure).unwrap();
        assert!(!placed.is_empty());

        for (i, a) in placed.iter().enumerate() {
            assert!(a.x >= 0 && a.y >= 0);
            assert!(a.x + a.width as i32 <= 400);
            assert!(a.y + a.height as i32 <= 200);
            for b in &placed[i + 1..] {
                assert!(
                    !a.overlaps(b.x, b.y, b.width, b.height),
                    "{} overlaps {}",
                    a.word,
                    b.word
                );
            }
        }
    }

    #[test]
    fn test_layout_sizes_follow_frequency() {
        let freqs = vec![("often".to_string(), 10), ("rare".to_string(), 1)];
        let options = WordCloudOptions::new(1000, 500, 200);
        let placed = layout_words(&freqs, (1000, 450), &options, stub_measure).unwrap();

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].word, "often");
        assert_eq!(placed[0].font_size, options.max_font_size);
        assert!(placed[1].font_size < placed[0].font_size);
    }

    #[test]
    fn test_layout_skips_words_that_never_fit() {
        let freqs = vec![("enormousword".to_string(), 1)];
        let options = WordCloudOptions::new(20, 60, 200);
        let placed = layout_words(&freqs, (20, 10), &options, stub_measure).unwrap();
        assert!(placed.is_empty());
    }

    #[test]
    fn test_empty_corpus_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty_wc.png");
        let options = WordCloudOptions::new(1000, 500, 200);

        assert_eq!(render_word_cloud("", &path, "x", &options).unwrap(), None);
        assert_eq!(render_word_cloud("   ", &path, "x", &options).unwrap(), None);
        assert_eq!(
            render_word_cloud("the and of", &path, "x", &options).unwrap(),
            None
        );
        assert!(!path.exists());
    }
}
