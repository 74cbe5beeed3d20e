//! Token window arithmetic shared by the token-based strategies.

use crate::config::ChunkingConfig;
use std::iter::FusedIterator;
use std::ops::Range;

/// Iterator over the `[start, end)` token ranges of one element.
///
/// Starts are `0, step, 2*step, ...` with `end = min(start + chunk_size, total)`,
/// and iteration stops once `start >= total`. An element that fits in one
/// window (`0 < total <= chunk_size`) gives exactly `0..total`; `total == 0`
/// gives none.
#[derive(Debug, Clone)]
pub struct TokenWindows {
    total: usize,
    size: usize,
    step: usize,
    next_start: Option<usize>,
}

impl TokenWindows {
    fn new(total: usize, config: &ChunkingConfig) -> Self {
        Self {
            total,
            size: config.chunk_size(),
            step: config.step(),
            next_start: Some(0),
        }
    }
}

impl Iterator for TokenWindows {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        if start >= self.total {
            self.next_start = None;
            return None;
        }

        if self.total <= self.size {
            self.next_start = None;
            return Some(0..self.total);
        }

        let end = start.saturating_add(self.size).min(self.total);
        self.next_start = Some(start + self.step);

        Some(start..end)
    }
}

impl FusedIterator for TokenWindows {}

/// Windows over an element of `total` tokens under `config`.
pub fn token_windows(total: usize, config: &ChunkingConfig) -> TokenWindows {
    TokenWindows::new(total, config)
}
