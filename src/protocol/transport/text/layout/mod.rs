//! Greedy word wrap of arbitrary text into the 16x2 character grid.
use crate::protocol::transport::text::{DISPLAY_TEXT_LEN, LINE_WIDTH};

/// Replacement for characters the display cannot render.
const UNPRINTABLE: u8 = b'?';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A formatted message: two space-padded lines of exactly 16 ASCII characters.
pub struct DisplayText([u8; DISPLAY_TEXT_LEN]);

impl DisplayText {
    /// Word-wrap `text` onto the two display lines.
    ///
    /// Rules:
    /// - leading and trailing whitespace is dropped, words are separated by spaces;
    /// - a word that starts a line is cut to 16 characters;
    /// - each word goes on the first line if it still fits there, else on the second;
    /// - the first word that fits on neither line ends the wrap;
    /// - both lines are padded with spaces.
    pub fn format(text: &str) -> Self {
        let mut lines = [Line::new(), Line::new()];

        for word in text.trim().split(' ') {
            let word = word.trim();
            if word.is_empty() {
                continue;
            }

            if lines[0].is_empty() {
                lines[0].push_word(word);
            } else if lines[0].fits(word) {
                lines[0].push_word(word);
            } else if lines[1].is_empty() || lines[1].fits(word) {
                lines[1].push_word(word);
            } else {
                break;
            }
        }

        let mut buffer = [b' '; DISPLAY_TEXT_LEN];
        buffer[..LINE_WIDTH].copy_from_slice(&lines[0].chars);
        buffer[LINE_WIDTH..].copy_from_slice(&lines[1].chars);
        Self(buffer)
    }

    /// All 32 characters, line one first.
    pub fn as_bytes(&self) -> &[u8; DISPLAY_TEXT_LEN] {
        &self.0
    }

    pub fn first_line(&self) -> &str {
        core::str::from_utf8(&self.0[..LINE_WIDTH]).unwrap_or("")
    }

    pub fn second_line(&self) -> &str {
        core::str::from_utf8(&self.0[LINE_WIDTH..]).unwrap_or("")
    }
}

struct Line {
    chars: [u8; LINE_WIDTH],
    len: usize,
}

impl Line {
    fn new() -> Self {
        Self {
            chars: [b' '; LINE_WIDTH],
            len: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn fits(&self, word: &str) -> bool {
        self.len + 1 + word.chars().count() <= LINE_WIDTH
    }

    // Cuts at the line end, which only matters for a word opening the line.
    fn push_word(&mut self, word: &str) {
        if !self.is_empty() {
            self.push(b' ');
        }
        for c in word.chars() {
            if self.len == LINE_WIDTH {
                break;
            }
            self.push(to_display_byte(c));
        }
    }

    fn push(&mut self, byte: u8) {
        self.chars[self.len] = byte;
        self.len += 1;
    }
}

fn to_display_byte(c: char) -> u8 {
    if c.is_ascii() && !c.is_ascii_control() {
        c as u8
    } else {
        UNPRINTABLE
    }
}
