//! Sentence-boundary text chunker.
//!
//! Splits normalized document text into [`Chunk`]s that respect a
//! configurable token budget (`chunk_size`) while carrying a bounded
//! sentence overlap (`chunk_overlap`) across chunk boundaries, so context
//! survives the cut.
//!
//! # Algorithm
//!
//! 1. Split text into sentences at `.` / `!` / `?` followed by whitespace.
//! 2. Greedily accumulate sentences into a buffer, tracking cumulative
//!    tokens via the configured [`TokenCounter`].
//! 3. When the next sentence would exceed `chunk_size`, emit the buffer
//!    and seed the next one with a trailing-sentence overlap prefix of at
//!    most `chunk_overlap` tokens, in original order.
//! 4. A sentence that alone exceeds `chunk_size` is force-split at word
//!    boundaries into sub-chunks; no sentence overlap is carried across
//!    those pieces, and a trailing remainder seeds the next buffer.
//! 5. Flush the final buffer. Empty input yields no chunks.
//!
//! The token budget is an invariant: the overlap prefix is capped so that
//! prefix + pending sentence never starts a buffer over `chunk_size`.
//! Only forced word-level sub-chunks may exceed the budget, and then only
//! when a single word does.

use crate::models::{Chunk, Document};
use crate::tokenizer::{TokenCounter, WordCounter};

/// Default maximum tokens per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 800;
/// Default maximum tokens carried over between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Deterministic sentence-greedy chunker.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    counter: Box<dyn TokenCounter>,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextChunker {
    /// Create a chunker with the whitespace word counter.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self::with_counter(chunk_size, chunk_overlap, Box::new(WordCounter))
    }

    /// Create a chunker with a custom token-counting strategy.
    pub fn with_counter(
        chunk_size: usize,
        chunk_overlap: usize,
        counter: Box<dyn TokenCounter>,
    ) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            counter,
        }
    }

    /// Count tokens under this chunker's counter.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Split `text` into ordered chunks attributed to `source`.
    ///
    /// Deterministic for identical input and configuration. Chunk ids are
    /// contiguous per document starting at 0; `global_id` is seeded with
    /// the per-document id and renumbered by
    /// [`chunk_documents`](Self::chunk_documents).
    pub fn chunk_text(&self, text: &str, source: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let sentences = split_sentences(text);
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_tokens = 0usize;

        for sentence in sentences {
            let tokens = self.counter.count(sentence);

            if tokens > self.chunk_size {
                if !current.is_empty() {
                    self.emit(&mut chunks, &current, source);
                    current.clear();
                }
                let (piece, piece_tokens) = self.split_words(sentence, &mut chunks, source);
                current = piece;
                current_tokens = piece_tokens;
                continue;
            }

            if current_tokens + tokens > self.chunk_size && !current.is_empty() {
                self.emit(&mut chunks, &current, source);

                // Overlap prefix: trailing sentences of the emitted buffer,
                // collected newest first, restored to original order. The
                // chunk budget caps the prefix so the seeded buffer never
                // starts over `chunk_size`.
                let budget = self
                    .chunk_overlap
                    .min(self.chunk_size.saturating_sub(tokens));
                let mut overlap: Vec<&str> = Vec::new();
                let mut overlap_tokens = 0usize;
                for &prev in current.iter().rev() {
                    let prev_tokens = self.counter.count(prev);
                    if overlap_tokens + prev_tokens > budget {
                        break;
                    }
                    overlap.push(prev);
                    overlap_tokens += prev_tokens;
                }
                overlap.reverse();
                overlap.push(sentence);
                current = overlap;
                current_tokens = self.counter.count(&current.join(" "));
            } else {
                current.push(sentence);
                current_tokens += tokens;
            }
        }

        if !current.is_empty() {
            self.emit(&mut chunks, &current, source);
        }

        chunks
    }

    /// Chunk a batch of documents, numbering `global_id` monotonically
    /// across the whole batch in input order.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut all = Vec::new();
        let mut global_id = 0usize;
        for doc in documents {
            let mut chunks = self.chunk_text(&doc.full_text, &doc.filename);
            for chunk in &mut chunks {
                chunk.global_id = global_id;
                global_id += 1;
            }
            all.extend(chunks);
        }
        all
    }

    /// Force-split an oversized sentence at word boundaries, emitting full
    /// sub-chunks and returning the trailing remainder to seed the next
    /// buffer.
    fn split_words<'a>(
        &self,
        sentence: &'a str,
        chunks: &mut Vec<Chunk>,
        source: &str,
    ) -> (Vec<&'a str>, usize) {
        let mut piece: Vec<&str> = Vec::new();
        let mut piece_tokens = 0usize;
        for word in sentence.split_whitespace() {
            let word_tokens = self.counter.count(word);
            if !piece.is_empty() && piece_tokens + word_tokens > self.chunk_size {
                self.emit(chunks, &piece, source);
                piece.clear();
                piece_tokens = 0;
            }
            piece.push(word);
            piece_tokens += word_tokens;
        }
        (piece, piece_tokens)
    }

    fn emit(&self, chunks: &mut Vec<Chunk>, sentences: &[&str], source: &str) {
        let text = sentences.join(" ");
        let token_count = self.counter.count(&text);
        let chunk_id = chunks.len();
        chunks.push(Chunk {
            chunk_id,
            global_id: chunk_id,
            text,
            source: source.to_string(),
            token_count,
        });
    }
}

/// Split text into trimmed sentences at `.` / `!` / `?` followed by
/// whitespace. Text with no such boundary is returned as one sentence, so
/// malformed input degrades instead of failing.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut iter = text.char_indices().peekable();

    while let Some((_, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = iter.peek() {
                if next.is_whitespace() {
                    let piece = text[start..next_idx].trim();
                    if !piece.is_empty() {
                        sentences.push(piece);
                    }
                    start = next_idx;
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A document of `n` unique sentences, each exactly 10 words.
    fn numbered_sentences(n: usize) -> String {
        (0..n)
            .map(|i| {
                format!(
                    "Sentence number {} fills exactly ten words of plain text.",
                    i
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(800, 150);
        assert!(chunker.chunk_text("", "doc.txt").is_empty());
        assert!(chunker.chunk_text("   \n\t ", "doc.txt").is_empty());
    }

    #[test]
    fn test_small_document_single_chunk() {
        let chunker = TextChunker::new(800, 150);
        let text = "First sentence here. Second one follows! Third asks a question?";
        let chunks = chunker.chunk_text(text, "doc.txt");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_id, 0);
        assert_eq!(chunks[0].source, "doc.txt");
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].token_count, 10);
    }

    #[test]
    fn test_sentence_split_boundaries() {
        let sentences = split_sentences("One. Two!  Three? Four");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
    }

    #[test]
    fn test_no_sentence_boundary_degrades_to_one_sentence() {
        // Punctuation not followed by whitespace is not a boundary.
        let sentences = split_sentences("ver1.2.3 shipped without notes");
        assert_eq!(sentences, vec!["ver1.2.3 shipped without notes"]);
    }

    #[test]
    fn test_chunk_ids_contiguous() {
        let chunker = TextChunker::new(30, 10);
        let chunks = chunker.chunk_text(&numbered_sentences(20), "doc.txt");
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i);
        }
    }

    #[test]
    fn test_token_budget_is_an_invariant() {
        let chunker = TextChunker::new(25, 20);
        let chunks = chunker.chunk_text(&numbered_sentences(40), "doc.txt");
        for chunk in &chunks {
            assert!(
                chunk.token_count <= 25,
                "chunk {} has {} tokens",
                chunk.chunk_id,
                chunk.token_count
            );
        }
    }

    #[test]
    fn test_overlap_prefix_matches_previous_suffix() {
        let chunker = TextChunker::new(35, 15);
        let text = numbered_sentences(30);
        let chunks = chunker.chunk_text(&text, "doc.txt");
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            let prev = split_sentences(&pair[0].text);
            let next = split_sentences(&pair[1].text);
            // Locate the shared region: the next chunk's first sentence
            // inside the previous chunk (sentences are unique by content).
            let at = prev
                .iter()
                .position(|s| *s == next[0])
                .expect("no overlap between adjacent chunks");
            let shared = &prev[at..];
            assert_eq!(&next[..shared.len()], shared, "overlap not in order");

            let overlap_tokens: usize = shared.iter().map(|s| chunker.count_tokens(s)).sum();
            assert!(overlap_tokens <= 15, "overlap {} over budget", overlap_tokens);
            assert!(overlap_tokens > 0);
        }
    }

    #[test]
    fn test_dedup_concatenation_reconstructs_sentence_sequence() {
        let chunker = TextChunker::new(35, 15);
        let text = numbered_sentences(30);
        let original: Vec<&str> = split_sentences(&text);
        let chunks = chunker.chunk_text(&text, "doc.txt");

        // Sentences are unique, so dropping already-seen ones removes
        // exactly the duplicated overlap regions.
        let mut rebuilt: Vec<&str> = Vec::new();
        for chunk in &chunks {
            for sentence in split_sentences(&chunk.text) {
                if !rebuilt.contains(&sentence) {
                    rebuilt.push(sentence);
                }
            }
        }
        let rebuilt: Vec<String> = rebuilt.iter().map(|s| s.to_string()).collect();
        let original: Vec<String> = original.iter().map(|s| s.to_string()).collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_oversized_sentence_forced_word_split() {
        let chunker = TextChunker::new(10, 5);
        // One 34-word sentence, no interior boundaries.
        let words: Vec<String> = (0..34).map(|i| format!("w{}", i)).collect();
        let text = format!("{}.", words.join(" "));
        let chunks = chunker.chunk_text(&text, "doc.txt");

        assert!(chunks.len() >= 4);
        for chunk in &chunks {
            assert!(chunk.token_count <= 10);
        }
        // Sub-chunks partition the sentence: no overlap, nothing lost.
        let rebuilt: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.text.split_whitespace().map(str::to_string))
            .collect();
        let expected: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn test_forced_split_remainder_joins_following_sentences() {
        let chunker = TextChunker::new(10, 5);
        let words: Vec<String> = (0..12).map(|i| format!("w{}", i)).collect();
        let text = format!("{}. Short tail here.", words.join(" "));
        let chunks = chunker.chunk_text(&text, "doc.txt");

        // 10 words emitted as one sub-chunk, then the 2-word remainder and
        // the 3-word tail sentence share the final buffer.
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].text, "w10 w11. Short tail here.");
    }

    #[test]
    fn test_default_budget_examples() {
        // 3 sentences, 30 words total, defaults 800/150: one chunk.
        let chunker = TextChunker::default();
        let chunks = chunker.chunk_text(&numbered_sentences(3), "doc.txt");
        assert_eq!(chunks.len(), 1);

        // 200 sentences x 10 tokens = 2000 tokens, none oversized:
        // at least 3 chunks, all within budget, overlapping.
        let chunks = chunker.chunk_text(&numbered_sentences(200), "doc.txt");
        assert!(chunks.len() >= 3, "got {} chunks", chunks.len());
        for chunk in &chunks {
            assert!(chunk.token_count <= 800);
        }
        for pair in chunks.windows(2) {
            let prev = split_sentences(&pair[0].text);
            let next = split_sentences(&pair[1].text);
            assert!(prev.contains(&next[0]), "no measurable overlap");
        }
    }

    #[test]
    fn test_global_ids_across_documents() {
        let chunker = TextChunker::new(30, 10);
        let docs = vec![
            Document::new("a.txt", numbered_sentences(12)),
            Document::new("b.txt", numbered_sentences(12)),
        ];
        let chunks = chunker.chunk_documents(&docs);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.global_id, i);
        }
        let first_b = chunks.iter().position(|c| c.source == "b.txt").unwrap();
        assert!(first_b > 0);
        assert_eq!(chunks[first_b].chunk_id, 0, "chunk_id restarts per document");
        assert_eq!(chunks[first_b].global_id, first_b);
    }

    #[test]
    fn test_deterministic() {
        let chunker = TextChunker::new(35, 15);
        let text = numbered_sentences(25);
        let a = chunker.chunk_text(&text, "doc.txt");
        let b = chunker.chunk_text(&text, "doc.txt");
        assert_eq!(a, b);
    }

    #[test]
    fn test_never_emits_empty_chunks() {
        let chunker = TextChunker::new(3, 1);
        let chunks = chunker.chunk_text("Tiny. Bits! Of? Text here. More!", "doc.txt");
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(!chunk.text.trim().is_empty());
            assert!(chunk.token_count > 0);
        }
    }
}
