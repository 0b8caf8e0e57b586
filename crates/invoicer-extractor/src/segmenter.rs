//! Split documents into page-level chunks

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use invoicer_domain::{Chunk, Document};
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";
const FORM_FEED: char = '\x0c';

/// Splits documents into bounded, overlapping chunks
///
/// PDFs are read page by page; `.txt` files use form feeds as page
/// breaks. Each page is cut at paragraph, then line, then whitespace
/// boundaries so that no chunk exceeds `max_chunk_chars` characters.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    max_chunk_chars: usize,
    overlap_chars: usize,
}

impl Segmenter {
    /// Create a new segmenter
    ///
    /// `overlap_chars` is clamped below `max_chunk_chars`.
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Self {
        let max_chunk_chars = max_chunk_chars.max(1);
        Self {
            max_chunk_chars,
            overlap_chars: overlap_chars.min(max_chunk_chars - 1),
        }
    }

    /// Create a segmenter from the extractor settings
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.max_chunk_chars, config.chunk_overlap_chars)
    }

    /// Segment a document into chunks in reading order
    ///
    /// # Errors
    ///
    /// [`ExtractorError::DocumentRead`] when the bytes are not a readable
    /// PDF or UTF-8 text file.
    pub fn segment(&self, document: &Document) -> Result<Vec<Chunk>, ExtractorError> {
        let pages = read_pages(document)?;

        let mut chunks = Vec::new();
        for (page_idx, page) in pages.iter().enumerate() {
            for (offset, text) in self.split_page(page) {
                chunks.push(Chunk {
                    text,
                    page: page_idx + 1,
                    index: chunks.len(),
                    offset,
                });
            }
        }

        debug!(
            file = %document.name,
            pages = pages.len(),
            chunks = chunks.len(),
            "Segmented document"
        );

        Ok(chunks)
    }

    /// Split one page into `(char_offset, text)` pieces
    ///
    /// A blank page yields nothing; a page that fits yields one piece.
    pub fn split_page(&self, page: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = page.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = if chars.len() - start <= self.max_chunk_chars {
                chars.len()
            } else {
                self.find_break(&chars, start)
            };

            push_trimmed(&mut pieces, &chars[start..end], start);

            if end == chars.len() {
                break;
            }
            start = if end > start + self.overlap_chars {
                end - self.overlap_chars
            } else {
                end
            };
        }

        pieces
    }

    /// Pick the end of the window starting at `start`
    fn find_break(&self, chars: &[char], start: usize) -> usize {
        let hard_end = start + self.max_chunk_chars;
        // Never produce a piece shorter than half the window
        let floor = start + self.max_chunk_chars / 2 + 1;

        let last_break = |accept: &dyn Fn(usize) -> bool| {
            (floor..=hard_end).rev().find(|&i| accept(i))
        };

        last_break(&|i| i >= 2 && chars[i - 1] == '\n' && chars[i - 2] == '\n')
            .or_else(|| last_break(&|i| chars[i - 1] == '\n'))
            .or_else(|| last_break(&|i| chars[i - 1].is_whitespace()))
            .unwrap_or(hard_end)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(4000, 200)
    }
}

fn push_trimmed(pieces: &mut Vec<(usize, String)>, window: &[char], start: usize) {
    let leading = window.iter().take_while(|c| c.is_whitespace()).count();
    let text: String = window[leading..].iter().collect();
    let text = text.trim_end();
    if !text.is_empty() {
        pieces.push((start + leading, text.to_string()));
    }
}

/// Extract page texts from a document
fn read_pages(document: &Document) -> Result<Vec<String>, ExtractorError> {
    if document.content.starts_with(PDF_MAGIC) {
        return read_pdf_pages(&document.content);
    }

    if document.extension().as_deref() == Some("txt") {
        let text = std::str::from_utf8(&document.content).map_err(|e| {
            ExtractorError::DocumentRead(format!("text file is not valid UTF-8: {}", e))
        })?;
        return Ok(text.split(FORM_FEED).map(str::to_string).collect());
    }

    Err(ExtractorError::DocumentRead(
        "unsupported document type".to_string(),
    ))
}

fn read_pdf_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractorError> {
    let doc = lopdf::Document::load_mem(bytes)?;

    // BTreeMap keys: already in page order
    Ok(doc
        .get_pages()
        .keys()
        .map(|&page_num| {
            doc.extract_text(&[page_num]).unwrap_or_else(|e| {
                debug!(page = page_num, error = %e, "No text extracted from page");
                String::new()
            })
        })
        .collect())
}
