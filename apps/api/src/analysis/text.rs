//! Tokenization, stopwords, and ordered word counting shared by the analyzers.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

/// Standard English stopword list.
const STOPWORD_LIST: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they",
    "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that",
    "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and",
    "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
    "about", "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all", "any",
    "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't",
    "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn", "wasn't",
    "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORD_LIST.iter().copied().collect());

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Unicode (UAX #29) words; punctuation and whitespace are dropped.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.unicode_words()
}

/// Lowercased words of length > `min_len` chars that are not stopwords.
pub fn significant_words(text: &str, min_len: usize) -> Vec<String> {
    words(&text.to_lowercase())
        .filter(|w| w.chars().count() > min_len && !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// UAX #29 sentences. Empty input yields none; the segmenter underflows on it.
pub fn sentences(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.unicode_sentences().collect()
}

/// Frequency counter that remembers first-seen order.
///
/// Iteration and `most_common` ties both follow the order in which words
/// first appeared, so results never depend on hash order.
#[derive(Debug, Default)]
pub struct WordCounts {
    order: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl WordCounts {
    pub fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&i) => self.order[i].1 += 1,
            None => {
                self.index.insert(word.to_string(), self.order.len());
                self.order.push((word.to_string(), 1));
            }
        }
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.order.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// Up to `n` entries by descending count; ties keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(String, u32)> {
        let mut ranked = self.order.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1)); // stable
        ranked.truncate(n);
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordCounts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counts = WordCounts::default();
        for word in iter {
            counts.add(word.as_ref());
        }
        counts
    }
}
