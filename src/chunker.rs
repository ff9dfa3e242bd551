//! Word-aligned text chunking for LLM prompts

/// Default character budget per chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1500;

/// Splits text into chunks of at most `max_chunk_size` characters without
/// breaking words.
///
/// A word longer than the budget becomes a chunk of its own and is not split.
pub struct Chunker {
    max_chunk_size: usize,
}

impl Chunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self { max_chunk_size }
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Chunk text using the configured budget
    pub fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.max_chunk_size)
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}

/// Greedily pack whitespace-separated words into chunks.
///
/// Every word is charged its length plus one separator. Lengths are counted
/// in characters, not bytes.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_length = word.chars().count();

        if current_length + word_length + 1 > max_chunk_size {
            // An oversized first word arrives with `current` empty; don't emit an empty chunk for it
            if !current.is_empty() {
                chunks.push(current.join(" "));
            }
            current = vec![word];
            current_length = word_length + 1;
        } else {
            current.push(word);
            current_length += word_length + 1;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   \n\t  ", 100).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("the quick brown fox", 1500);
        assert_eq!(chunks, vec!["the quick brown fox"]);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let chunks = chunk_text("  alpha\n\nbeta\tgamma  ", 1500);
        assert_eq!(chunks, vec!["alpha beta gamma"]);
    }

    #[test]
    fn test_splits_at_word_boundaries() {
        // Each word costs 4 ("abc" + separator); 10 chars fits two words
        let chunks = chunk_text("abc def ghi jkl mno", 10);
        assert_eq!(chunks, vec!["abc def", "ghi jkl", "mno"]);
    }

    #[test]
    fn test_word_sequence_preserved() {
        let text = (0..500)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = chunk_text(&text, 97);
        assert!(chunks.len() > 1);

        let rejoined = chunks.join(" ");
        assert_eq!(words(&rejoined), words(&text));
    }

    #[test]
    fn test_chunks_respect_budget() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod \
                    tempor incididunt ut labore et dolore magna aliqua"
            .repeat(20);
        let max = 60;
        for chunk in chunk_text(&text, max) {
            assert!(chunk.chars().count() <= max, "chunk too long: {}", chunk);
        }
    }

    #[test]
    fn test_oversized_word_is_its_own_chunk() {
        let long_word = "x".repeat(30);
        let text = format!("a {} b", long_word);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks, vec!["a".to_string(), long_word, "b".to_string()]);
    }

    #[test]
    fn test_oversized_first_word() {
        let long_word = "y".repeat(25);
        let chunks = chunk_text(&long_word, 10);
        assert_eq!(chunks, vec![long_word]);
    }

    #[test]
    fn test_length_counts_characters() {
        // 3 chars but 6 bytes each; two words cost 8 chars
        let chunks = chunk_text("äöü éèê", 8);
        assert_eq!(chunks, vec!["äöü éèê"]);
    }

    #[test]
    fn test_chunker_struct_uses_budget() {
        let chunker = Chunker::new(10);
        assert_eq!(chunker.max_chunk_size(), 10);
        assert_eq!(chunker.chunk("abc def ghi").len(), 2);
        assert_eq!(Chunker::default().max_chunk_size(), DEFAULT_MAX_CHUNK_SIZE);
    }
}
