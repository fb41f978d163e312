use ahash::{HashMap, HashMapExt};

use crate::filter::{passes, KeyFilter};
use crate::tables::{DimensionTable, SortedKeys};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusRow {
    pub code: String,
    pub count: usize,
}

#[derive(Clone, Debug, Default)]
pub struct StatusTable {
    requests: HashMap<String, usize>,
    keys: SortedKeys<String>,
}

impl StatusTable {
    pub fn new() -> Self { StatusTable { requests: HashMap::new(), keys: SortedKeys::default() } }

    pub fn add(&mut self, code: &str) {
        if let Some(count) = self.requests.get_mut(code) {
            *count += 1;
        } else {
            self.requests.insert(code.to_string(), 1);
        }
        self.keys.touch();
    }
}

impl DimensionTable for StatusTable {
    type Row = StatusRow;

    fn seal(&mut self) { self.keys.seal(self.requests.keys().cloned()) }

    fn is_stale(&self) -> bool { self.keys.is_stale() }

    fn rows(&self, filter: Option<&KeyFilter>) -> Vec<StatusRow> {
        self.keys
            .iter()
            .filter(|code| passes(filter, code))
            .filter_map(|code| {
                self.requests.get(code).map(|&count| StatusRow { code: code.clone(), count })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_counts_status_codes() {
        let mut table = StatusTable::new();
        for code in ["404", "200", "304", "200"] {
            table.add(code);
        }
        table.seal();
        let rows: Vec<(String, usize)> =
            table.rows(None).into_iter().map(|r| (r.code, r.count)).collect();
        assert_eq!(
            rows,
            vec![("200".to_string(), 2), ("304".to_string(), 1), ("404".to_string(), 1)]
        );
    }
}
