// src/config/subsystems/render.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    // Canvas
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: [u8; 3],

    // Layout
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,
    /// Falls back to the canvas height when unset
    #[serde(default)]
    pub max_font_size: Option<u32>,
    #[serde(default = "default_font_step")]
    pub font_step: u32,
    #[serde(default = "default_relative_scaling")]
    pub relative_scaling: f32,
    #[serde(default = "default_margin")]
    pub margin: u32,

    // Seed for placement and colours
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

// Default functions
fn default_width() -> u32 { 400 }
fn default_height() -> u32 { 200 }
fn default_background() -> [u8; 3] { [0, 0, 0] }
fn default_max_words() -> usize { 200 }
fn default_min_font_size() -> u32 { 4 }
fn default_font_step() -> u32 { 1 }
fn default_relative_scaling() -> f32 { 0.5 }
fn default_margin() -> u32 { 2 }
fn default_random_state() -> u64 { 42 }

/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            max_words: default_max_words(),
            min_font_size: default_min_font_size(),
            max_font_size: None,
            font_step: default_font_step(),
            relative_scaling: default_relative_scaling(),
            margin: default_margin(),
            random_state: default_random_state(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::config(format!("Invalid {} value: {}", key, value)))
}

/// Parses `#rrggbb` or `rrggbb`.
fn parse_color(value: &str) -> Result<[u8; 3]> {
    let hex = value.trim_matches('"').trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(Error::config(format!("Invalid background colour (expected #rrggbb): {}", value)));
    }
    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| Error::config(format!("Invalid background colour: {}", value)))?;
    }
    Ok(rgb)
}

impl FromIni for RenderConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "render" {
            return None;
        }

        let result = match key {
            "width" => parse_value(key, value).map(|v| self.width = v),
            "height" => parse_value(key, value).map(|v| self.height = v),
            "background" => parse_color(value).map(|v| self.background = v),
            "max_words" => parse_value(key, value).map(|v| self.max_words = v),
            "min_font_size" => parse_value(key, value).map(|v| self.min_font_size = v),
            "max_font_size" => parse_value(key, value).map(|v| self.max_font_size = Some(v)),
            "font_step" => parse_value(key, value).map(|v| self.font_step = v),
            "relative_scaling" => parse_value(key, value).map(|v| self.relative_scaling = v),
            "margin" => parse_value(key, value).map(|v| self.margin = v),
            "random_state" => parse_value(key, value).map(|v| self.random_state = v),
            _ => return None,
        };
        Some(result)
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::config(format!(
                "Canvas must be non-empty, got {}x{}", self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(Error::config(format!(
                "Canvas sides must be at most {}, got {}x{}", MAX_CANVAS_SIDE, self.width, self.height
            )));
        }
        if self.max_words == 0 {
            return Err(Error::config("max_words must be greater than 0".to_string()));
        }
        if self.font_step == 0 {
            return Err(Error::config("font_step must be greater than 0".to_string()));
        }
        if self.min_font_size == 0 {
            return Err(Error::config("min_font_size must be greater than 0".to_string()));
        }
        if self.min_font_size > self.effective_max_font_size() {
            return Err(Error::config(format!(
                "min_font_size ({}) exceeds max_font_size ({})",
                self.min_font_size, self.effective_max_font_size()
            )));
        }
        if !(0.0..=1.0).contains(&self.relative_scaling) {
            return Err(Error::config(format!(
                "relative_scaling must be within 0..=1, got {}", self.relative_scaling
            )));
        }
        Ok(())
    }

    pub fn effective_max_font_size(&self) -> u32 {
        self.max_font_size.unwrap_or(self.height)
    }
}
