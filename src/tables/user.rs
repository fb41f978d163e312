use ahash::{HashMap, HashMapExt};

use crate::filter::{passes, KeyFilter};
use crate::tables::{DimensionTable, SortedKeys};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub username: String,
    pub path: String,
    pub count: usize,
}

/// Request counts per username and normalized path. Usernames are taken literally, so
/// anonymous requests are kept under `-`.
#[derive(Clone, Debug, Default)]
pub struct UserTable {
    requests: HashMap<String, HashMap<String, usize>>,
    keys: SortedKeys<(String, String)>,
}

impl UserTable {
    pub fn new() -> Self { UserTable { requests: HashMap::new(), keys: SortedKeys::default() } }

    pub fn add(&mut self, username: &str, path: &str) {
        let paths = self.requests.entry(username.to_string()).or_default();
        *paths.entry(path.to_string()).or_insert(0) += 1;
        self.keys.touch();
    }

    pub fn count(&self, username: &str, path: &str) -> usize {
        self.requests.get(username).and_then(|paths| paths.get(path)).copied().unwrap_or(0)
    }
}

impl DimensionTable for UserTable {
    type Row = UserRow;

    fn seal(&mut self) {
        let pairs = self.requests.iter().flat_map(|(username, paths)| {
            paths.keys().map(move |path| (username.clone(), path.clone()))
        });
        self.keys.seal(pairs)
    }

    fn is_stale(&self) -> bool { self.keys.is_stale() }

    fn rows(&self, filter: Option<&KeyFilter>) -> Vec<UserRow> {
        self.keys
            .iter()
            .filter(|(_, path)| passes(filter, path))
            .map(|(username, path)| UserRow {
                username: username.clone(),
                path: path.clone(),
                count: self.count(username, path),
            })
            .collect()
    }
}
