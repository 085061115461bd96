//! Text analysis shared by the lexical index and the hashing embedder.

use unicode_segmentation::UnicodeSegmentation;

/// Split text into lowercase Unicode words, dropping punctuation and whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|word| word.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("What's the Capital of France?"),
            vec!["what's", "the", "capital", "of", "france"]
        );
        assert!(tokenize(" -- ?! ").is_empty());
    }

    #[test]
    fn test_tokenize_unicode() {
        assert_eq!(tokenize("Café DÉJÀ vu"), vec!["café", "déjà", "vu"]);
    }
}
