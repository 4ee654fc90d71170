//! Card text layout.
//!
//! Card height follows its text: the text is wrapped greedily at word
//! boundaries using a fixed per-character width, and the card grows to fit
//! the resulting lines. The renderer wraps with the same function so the
//! drawn lines always match the derived height.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::config::CanvasConfig;
use crate::geometry::snap_up;

/// Number of characters that fit on one line of a card `width` wide.
#[must_use]
pub fn chars_per_line(width: f64, config: &CanvasConfig) -> usize {
    let inner = (width - config.card_padding * 2.0).max(config.card_char_width);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (inner / config.card_char_width).floor() as usize;
    n.max(1)
}

/// Greedy word wrap. Explicit newlines are kept; words longer than a line are
/// broken at the line length. An empty input yields no lines.
#[must_use]
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();
    if text.is_empty() {
        return out;
    }
    for raw_line in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in raw_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if line_len > 0 {
                    out.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(max_chars);
                out.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
            if needed > max_chars && line_len > 0 {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line_len += word.len();
            line.extend(word);
        }
        out.push(line);
    }
    out
}

/// Height a card of `width` needs to show `text`, rounded up to the grid.
#[must_use]
pub fn card_height(text: &str, width: f64, config: &CanvasConfig) -> f64 {
    let lines = wrap_lines(text, chars_per_line(width, config)).len();
    #[allow(clippy::cast_precision_loss)]
    let text_h = lines as f64 * config.card_line_height + config.card_padding * 2.0;
    let h = snap_up(text_h, config.grid_spacing);
    config.card_bounds.clamp_height(h)
}
