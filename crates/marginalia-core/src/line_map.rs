use serde::{Deserialize, Serialize};

use crate::model::WikiLink;

/// 0-based position, column counted in UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: u32,
    pub col: u32,
}

/// Converts byte offsets produced by the parser into the coordinates used
/// by editors and JavaScript clients (UTF-16 units).
pub struct LineMap<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// Offset counted in UTF-16 code units from the start of the text.
    /// `offset` must lie on a char boundary.
    pub fn utf16_offset(&self, offset: usize) -> usize {
        self.text[..offset].encode_utf16().count()
    }

    pub fn offset_to_point(&self, offset: usize) -> Point {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => Point {
                line: line as u32,
                col: 0,
            },
            Err(next_line_idx) => {
                let line = next_line_idx - 1;
                let line_start = self.line_starts[line];
                let col = self.text[line_start..offset].encode_utf16().count();
                Point {
                    line: line as u32,
                    col: col as u32,
                }
            }
        }
    }

    pub fn point_to_offset(&self, point: Point) -> Option<usize> {
        let line_start = *self.line_starts.get(point.line as usize)?;
        let mut current_col = 0u32;

        for (i, c) in self.text[line_start..].char_indices() {
            if current_col == point.col {
                return Some(line_start + i);
            }
            if c == '\n' {
                break;
            }
            current_col += c.len_utf16() as u32;
        }

        if current_col == point.col {
            return Some(self.text.len());
        }

        None
    }

    /// The link's span as a UTF-16 `(start, end)` pair.
    pub fn utf16_span(&self, link: &WikiLink) -> (usize, usize) {
        (
            self.utf16_offset(link.start_index),
            self.utf16_offset(link.end_index),
        )
    }
}
