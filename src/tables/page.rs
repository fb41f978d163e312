use ahash::{HashMap, HashMapExt};

use crate::filter::{passes, KeyFilter};
use crate::stats::{DurationStats, Summary};
use crate::tables::{DimensionTable, SortedKeys};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRow {
    pub path: String,
    pub summary: Summary,
}

/// Durations per normalized request path. Also used for the all-dates rollup.
#[derive(Clone, Debug, Default)]
pub struct PageTable {
    requests: HashMap<String, DurationStats>,
    keys: SortedKeys<String>,
}

impl PageTable {
    pub fn new() -> Self { PageTable { requests: HashMap::new(), keys: SortedKeys::default() } }

    pub fn add(&mut self, path: &str, duration: i64) {
        if let Some(stats) = self.requests.get_mut(path) {
            stats.observe(duration);
        } else {
            let mut stats = DurationStats::new();
            stats.observe(duration);
            self.requests.insert(path.to_string(), stats);
        }
        self.keys.touch();
    }

    /// Adds every observation of another table, as if each had been passed to `add`.
    pub fn absorb(&mut self, other: &PageTable) {
        for (path, stats) in &other.requests {
            if let Some(existing) = self.requests.get_mut(path) {
                existing.extend(stats);
            } else {
                self.requests.insert(path.clone(), stats.clone());
            }
        }
        if !other.is_empty() {
            self.keys.touch();
        }
    }

    pub fn len(&self) -> usize { self.requests.len() }

    pub fn is_empty(&self) -> bool { self.requests.is_empty() }
}

impl DimensionTable for PageTable {
    type Row = PageRow;

    fn seal(&mut self) { self.keys.seal(self.requests.keys().cloned()) }

    fn is_stale(&self) -> bool { self.keys.is_stale() }

    fn rows(&self, filter: Option<&KeyFilter>) -> Vec<PageRow> {
        self.keys
            .iter()
            .filter(|path| passes(filter, path))
            .filter_map(|path| {
                self.requests
                    .get(path)
                    .map(|stats| PageRow { path: path.clone(), summary: stats.summary() })
            })
            .collect()
    }
}
