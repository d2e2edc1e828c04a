//! Pure text chunking and cleaning
//!
//! Chunks are fixed-size windows over a document's word stream: every
//! chunk except the last holds exactly `max_words` words, adjacent
//! chunks share `overlap_words` words, and a final partial chunk is
//! kept only once it reaches `min_words`. Blank-line structure does not
//! survive chunking; words are re-joined with single spaces.

/// Word-count parameters for chunking
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Minimum words for the trailing partial chunk to be kept
    pub min_words: usize,
    /// Words per full chunk
    pub max_words: usize,
    /// Words shared between adjacent chunks; must be smaller than
    /// `max_words`
    pub overlap_words: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            min_words: 200,
            max_words: 300,
            overlap_words: 20,
        }
    }
}

/// Split a document into overlapping word chunks.
///
/// Empty input (or anything below `min_words`) yields no chunks.
///
/// # Panics
/// Panics if `overlap_words >= max_words`; callers building options
/// from configuration validate this first.
#[must_use]
pub fn split_into_chunks(text: &str, options: &ChunkOptions) -> Vec<String> {
    let step = options.max_words.saturating_sub(options.overlap_words);
    assert!(step > 0, "overlap_words must be smaller than max_words");

    let mut chunks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        buffer.push(word);

        if buffer.len() >= options.max_words {
            chunks.push(buffer[..options.max_words].join(" "));
            buffer.drain(..step);
        }
    }

    if buffer.len() >= options.min_words {
        chunks.push(buffer.join(" "));
    }

    chunks
}

/// Strip a document down to plain prose.
///
/// Keeps ASCII letters, digits, whitespace, and basic punctuation
/// (`.`, `,`, `!`, `?`, `'`, `"`); collapses whitespace runs of two or
/// more characters to a single space (a lone newline or tab survives
/// as-is); trims the ends.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_ws: Option<(char, usize)> = None;

    for c in text.chars() {
        let kept = c.is_ascii_alphanumeric()
            || c.is_whitespace()
            || matches!(c, '.' | ',' | '!' | '?' | '\'' | '"');
        if !kept {
            continue;
        }

        if c.is_whitespace() {
            pending_ws = Some(match pending_ws {
                Some((first, count)) => (first, count + 1),
                None => (c, 1),
            });
        } else {
            if let Some((first, count)) = pending_ws.take() {
                // Leading whitespace is dropped; a run inside the text
                // collapses to a space only when longer than one char.
                if !out.is_empty() {
                    out.push(if count == 1 { first } else { ' ' });
                }
            }
            out.push(c);
        }
    }

    out
}
