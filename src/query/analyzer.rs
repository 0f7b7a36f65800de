use std::collections::BTreeSet;

/// Lower-case, collapse runs of non-alphanumeric characters to a single
/// space, trim. Shared by the analyzer and every field the scorer matches
/// against, so both sides of a containment test normalize identically.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_space = true;
        }
    }
    out
}

/// Ephemeral search surface derived from one utterance.
///
/// Phrases are the tokens plus every contiguous 2- and 3-token window,
/// collapsed into a set. Never persisted across turns.
#[derive(Debug, Clone)]
pub struct QueryAnalysis {
    text: String,
    tokens: Vec<String>,
    phrases: BTreeSet<String>,
}

impl QueryAnalysis {
    pub fn new(utterance: &str) -> Self {
        let normalized = normalize(utterance);
        let tokens: Vec<String> = normalized
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        let mut phrases: BTreeSet<String> = tokens.iter().cloned().collect();
        for window in 2..=3usize {
            for slice in tokens.windows(window) {
                phrases.insert(slice.join(" "));
            }
        }

        Self {
            text: utterance.to_string(),
            tokens,
            phrases,
        }
    }

    /// Original, unnormalized utterance.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Empty or whitespace-only input yields an empty analysis; every
    /// scorer treats that as "no match possible".
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Tokens ∪ 2-grams ∪ 3-grams, deterministically ordered.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}
