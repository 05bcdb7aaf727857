//! Vocabulary construction and per-document word counting.

use std::collections::HashMap;

use crate::normalize::tokens;

// ── Vocabulary ─────────────────────────────────────────────────────────────

/// Distinct tokens observed in a training corpus, in first-seen order.
///
/// Built once per training run and read-only afterward. Iteration order is
/// the order in which tokens first appeared, so runs over the same corpus
/// are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build the vocabulary of a corpus of normalized comments.
    pub fn build<S: AsRef<str>>(comments: &[S]) -> Self {
        let mut vocab = Self::default();
        for comment in comments {
            for token in tokens(comment.as_ref()) {
                vocab.insert(token);
            }
        }
        vocab
    }

    fn insert(&mut self, word: &str) {
        if !self.index.contains_key(word) {
            self.index.insert(word.to_string(), self.words.len());
            self.words.push(word.to_string());
        }
    }

    /// Position of `word` in first-seen order, if present.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate words in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Build the vocabulary of a corpus of normalized comments.
pub fn build_vocabulary<S: AsRef<str>>(comments: &[S]) -> Vocabulary {
    Vocabulary::build(comments)
}

// ── WordCountTable ─────────────────────────────────────────────────────────

/// Per-word, per-document occurrence counts over one corpus.
///
/// Rows follow vocabulary order; each row has one entry per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCountTable<'v> {
    vocab: &'v Vocabulary,
    counts: Vec<Vec<u32>>,
    documents: usize,
}

impl<'v> WordCountTable<'v> {
    /// Per-document counts for `word`, or `None` if it is out of vocabulary.
    pub fn get(&self, word: &str) -> Option<&[u32]> {
        self.vocab
            .position(word)
            .map(|i| self.counts[i].as_slice())
    }

    /// Total occurrences of `word` across all documents (0 if out of vocabulary).
    pub fn total(&self, word: &str) -> u64 {
        self.get(word)
            .map(|row| row.iter().map(|&c| u64::from(c)).sum())
            .unwrap_or(0)
    }

    /// Number of documents the table was built over.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Iterate `(word, per-document counts)` in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.vocab
            .iter()
            .zip(self.counts.iter().map(Vec::as_slice))
    }
}

/// Count occurrences of every vocabulary word in every comment.
///
/// Tokens that are not in `vocab` are ignored. Each call builds a fresh
/// table; nothing is shared between calls.
pub fn count_words<'v, S: AsRef<str>>(comments: &[S], vocab: &'v Vocabulary) -> WordCountTable<'v> {
    let mut counts = vec![vec![0u32; comments.len()]; vocab.len()];
    for (doc, comment) in comments.iter().enumerate() {
        for token in tokens(comment.as_ref()) {
            if let Some(word) = vocab.position(token) {
                counts[word][doc] += 1;
            }
        }
    }
    WordCountTable {
        vocab,
        counts,
        documents: comments.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Vocabulary ─────────────────────────────────────────────────────

    #[test]
    fn vocabulary_preserves_first_seen_order() {
        let vocab = build_vocabulary(&["b a", "c a b", "d"]);
        let words: Vec<&str> = vocab.iter().collect();
        assert_eq!(words, vec!["b", "a", "c", "d"]);
        assert_eq!(vocab.position("c"), Some(2));
    }

    #[test]
    fn vocabulary_covers_exactly_the_corpus_tokens() {
        let corpus = ["check out my link channel", "great video thanks", "my video"];
        let vocab = build_vocabulary(&corpus);

        for comment in &corpus {
            for token in tokens(comment) {
                assert!(vocab.contains(token), "missing {token}");
            }
        }
        for word in vocab.iter() {
            assert!(
                corpus.iter().any(|c| tokens(c).any(|t| t == word)),
                "{word} not in any comment"
            );
        }
        assert_eq!(vocab.len(), 8);
    }

    #[test]
    fn empty_comments_add_no_tokens() {
        let vocab = build_vocabulary(&["", "hello", ""]);
        assert_eq!(vocab.len(), 1);
        assert!(!vocab.contains(""));
    }

    #[test]
    fn empty_corpus_gives_empty_vocabulary() {
        let vocab = build_vocabulary::<&str>(&[]);
        assert!(vocab.is_empty());
    }

    // ── Word counting ──────────────────────────────────────────────────

    #[test]
    fn counts_per_document() {
        let corpus = ["spam spam eggs", "eggs", "ham"];
        let vocab = build_vocabulary(&corpus);
        let table = count_words(&corpus, &vocab);

        assert_eq!(table.documents(), 3);
        assert_eq!(table.get("spam"), Some(&[2, 0, 0][..]));
        assert_eq!(table.get("eggs"), Some(&[1, 1, 0][..]));
        assert_eq!(table.total("eggs"), 2);
        assert_eq!(table.total("ham"), 1);
    }

    #[test]
    fn out_of_vocabulary_tokens_are_ignored() {
        let vocab = build_vocabulary(&["known words"]);
        let table = count_words(&["known unknown words known"], &vocab);

        assert_eq!(table.get("known"), Some(&[2][..]));
        assert_eq!(table.get("unknown"), None);
        assert_eq!(table.total("unknown"), 0);
    }

    #[test]
    fn table_over_other_corpus_has_its_document_count() {
        let vocab = build_vocabulary(&["a b c"]);
        let table = count_words(&["a", "b", "x", "c c"], &vocab);
        assert_eq!(table.documents(), 4);
        let rows: Vec<(&str, Vec<u32>)> =
            table.iter().map(|(w, r)| (w, r.to_vec())).collect();
        assert_eq!(
            rows,
            vec![
                ("a", vec![1, 0, 0, 0]),
                ("b", vec![0, 1, 0, 0]),
                ("c", vec![0, 0, 0, 2]),
            ]
        );
    }
}
