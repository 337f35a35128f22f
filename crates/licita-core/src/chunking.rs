//! Boundary-aware overlapping text chunking
//!
//! All positions are character (Unicode scalar) offsets, so multi-byte text
//! never splits inside a code point.

use crate::error::{CoreError, Result};
use crate::models::{Chunk, ChunkMetadata, Document};
use licita_config::ChunkingConfig;
use tracing::debug;

pub trait Chunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// A window of the source text before trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(CoreError::InvalidInput(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(CoreError::InvalidInput(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Compute the cut windows over `chars`
    ///
    /// Windows start at 0, end at `chars.len()` and never leave a gap.
    pub fn windows(&self, chars: &[char]) -> Vec<Window> {
        let len = chars.len();
        let mut windows = Vec::new();
        let mut start = 0;

        while start < len {
            let limit = (start + self.chunk_size).min(len);
            let cut = if limit < len {
                find_cut(chars, start, limit)
            } else {
                len
            };
            windows.push(Window { start, end: cut });

            if cut >= len {
                break;
            }
            let next = cut.saturating_sub(self.overlap);
            start = if next > start { next } else { cut };
        }

        windows
    }

    /// Split raw text into trimmed, non-empty pieces with their windows
    pub fn split(&self, text: &str) -> Vec<(String, Window)> {
        let chars: Vec<char> = text.chars().collect();
        self.windows(&chars)
            .into_iter()
            .filter_map(|w| {
                let piece: String = chars[w.start..w.end].iter().collect();
                let trimmed = piece.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some((trimmed.to_string(), w))
                }
            })
            .collect()
    }
}

impl Chunker for TextChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = self
            .split(&document.raw_text)
            .into_iter()
            .enumerate()
            .map(|(index, (text, window))| Chunk {
                text,
                index,
                start_offset: window.start,
                end_offset: window.end,
                metadata: ChunkMetadata::from_document(
                    &document.metadata,
                    &document.id,
                    index,
                    window.start,
                    window.end,
                ),
            })
            .collect();

        debug!(
            "Chunked {} into {} chunks",
            document.metadata.filename,
            chunks.len()
        );
        chunks
    }
}

/// Cut position inside `[start, limit)`: last paragraph break after `start`,
/// else just after the last period, else `limit`.
fn find_cut(chars: &[char], start: usize, limit: usize) -> usize {
    let window = &chars[start..limit];

    if let Some(pos) = (1..window.len().saturating_sub(1))
        .rev()
        .find(|&i| window[i] == '\n' && window[i + 1] == '\n')
    {
        return start + pos;
    }

    if let Some(pos) = window.iter().rposition(|&c| c == '.') {
        return start + pos + 1;
    }

    limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentMetadata;

    fn chunker(size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(size, overlap).unwrap()
    }

    #[test]
    fn test_plain_text_three_windows() {
        let text = "a".repeat(2500);
        let pieces = chunker(1000, 200).split(&text);
        assert_eq!(pieces.len(), 3);
        let windows: Vec<(usize, usize)> =
            pieces.iter().map(|(_, w)| (w.start, w.end)).collect();
        assert_eq!(windows, vec![(0, 1000), (800, 1800), (1600, 2500)]);
    }

    #[test]
    fn test_sentences_and_paragraphs_cut_at_boundaries() {
        let sentence = "A comissão julgará as propostas pelo menor preço global. ";
        let body = format!("{}\n\n{}", sentence.repeat(27).trim_end(), sentence.repeat(40));
        let text: String = body.chars().take(2500).collect();
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(chars.len(), 2500);

        let windows = chunker(1000, 200).windows(&chars);
        let bounds: Vec<(usize, usize)> = windows.iter().map(|w| (w.start, w.end)).collect();
        assert_eq!(bounds, vec![(0, 968), (768, 1538), (1338, 1538), (1538, 2500)]);

        for w in &windows[..windows.len() - 1] {
            let after_period = chars[w.end - 1] == '.';
            let at_paragraph = chars[w.end] == '\n' && chars[w.end + 1] == '\n';
            assert!(after_period || at_paragraph, "cut at {}", w.end);
        }
        for pair in windows.windows(2) {
            assert!(pair[0].end.saturating_sub(pair[1].start) <= 200);
            assert!(pair[1].start > pair[0].start);
        }
        assert_eq!(windows.last().map(|w| w.end), Some(2500));
    }

    #[test]
    fn test_short_text_single_chunk() {
        let pieces = chunker(1000, 200).split("  Cláusula única.  ");
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].0, "Cláusula única.");
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(chunker(10, 2).split("").is_empty());
        assert!(chunker(10, 2).split("   \n\n   ").is_empty());
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let text = format!("{}\n\n{}", "x".repeat(30), "y".repeat(30));
        let pieces = chunker(40, 5).split(&text);
        assert_eq!(pieces[0].0, "x".repeat(30));
        assert_eq!(pieces[0].1.end, 30);
    }

    #[test]
    fn test_falls_back_to_period() {
        let text = format!("{}. {}", "a".repeat(20), "b".repeat(40));
        let pieces = chunker(40, 5).split(&text);
        assert_eq!(pieces[0].0, format!("{}.", "a".repeat(20)));
        assert_eq!(pieces[0].1.end, 21);
    }

    #[test]
    fn test_windows_cover_text_without_gaps() {
        let text = "Art. 1. O edital.\n\nArt. 2. Propostas serão julgadas. ".repeat(40);
        let chars: Vec<char> = text.chars().collect();
        let windows = chunker(120, 30).windows(&chars);

        assert_eq!(windows.first().map(|w| w.start), Some(0));
        assert_eq!(windows.last().map(|w| w.end), Some(chars.len()));
        for pair in windows.windows(2) {
            assert!(pair[1].start <= pair[0].end);
            assert!(pair[1].start > pair[0].start);
        }
        for w in &windows {
            assert!(w.end - w.start <= 120);
        }
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "Habilitação técnica. Atestados.\n\nGarantia de proposta.".repeat(25);
        let c = chunker(100, 20);
        assert_eq!(c.split(&text), c.split(&text));
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let text = "ção".repeat(50);
        let pieces = chunker(40, 10).split(&text);
        for (piece, w) in &pieces {
            assert!(piece.chars().count() <= 40);
            assert_eq!(piece.chars().count(), w.end - w.start);
        }
    }

    #[test]
    fn test_chunk_metadata_indices() {
        let doc = Document::new("a".repeat(2500), DocumentMetadata::new("lei.txt"));
        let chunks = chunker(1000, 200).chunk(&doc);
        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.metadata.chunk_index, i);
            assert_eq!(chunk.metadata.filename, "lei.txt");
            assert_eq!(chunk.metadata.document_id, doc.id);
        }
        assert_eq!(chunks[2].metadata.start_offset, 1600);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(TextChunker::new(0, 0).is_err());
        assert!(TextChunker::new(100, 100).is_err());
    }
}
