/// Matches keys containing at least one of a set of substrings.
#[derive(Clone, Debug, Default)]
pub struct KeyFilter {
    terms: Vec<String>,
}

impl KeyFilter {
    /// Builds a filter from a space-separated list of substrings. Keys are compared in
    /// lowercase form, so the terms are lowercased too. No terms matches every key.
    /// Runs of spaces are a single separator; they do not add an empty, match-all term.
    pub fn new(spec: &str) -> KeyFilter {
        KeyFilter { terms: spec.split_whitespace().map(str::to_lowercase).collect() }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.terms.is_empty() || self.terms.iter().any(|term| key.contains(term.as_str()))
    }
}

/// `None` lets every key through.
pub fn passes(filter: Option<&KeyFilter>, key: &str) -> bool {
    filter.map_or(true, |f| f.matches(key))
}
