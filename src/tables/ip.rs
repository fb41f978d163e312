use ahash::{HashMap, HashMapExt};

use crate::filter::{passes, KeyFilter};
use crate::tables::{DimensionTable, SortedKeys, NO_USER};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpRow {
    pub address: String,
    /// Distinct usernames seen from the address, space-separated in order of appearance.
    pub usernames: String,
    pub requests: usize,
}

#[derive(Clone, Debug, Default)]
struct IpEntry {
    usernames: String,
    requests: usize,
}

impl IpEntry {
    fn record(&mut self, username: &str) {
        self.requests += 1;
        if username == NO_USER || self.usernames.split(' ').any(|known| known == username) {
            return;
        }
        if !self.usernames.is_empty() {
            self.usernames.push(' ');
        }
        self.usernames.push_str(username);
    }
}

/// Request counts and usernames per client address.
#[derive(Clone, Debug, Default)]
pub struct IpTable {
    requests: HashMap<String, IpEntry>,
    keys: SortedKeys<String>,
}

impl IpTable {
    pub fn new() -> Self { IpTable { requests: HashMap::new(), keys: SortedKeys::default() } }

    pub fn add(&mut self, address: &str, username: &str) {
        if let Some(entry) = self.requests.get_mut(address) {
            entry.record(username);
        } else {
            let mut entry = IpEntry::default();
            entry.record(username);
            self.requests.insert(address.to_string(), entry);
        }
        self.keys.touch();
    }
}

impl DimensionTable for IpTable {
    type Row = IpRow;

    fn seal(&mut self) { self.keys.seal(self.requests.keys().cloned()) }

    fn is_stale(&self) -> bool { self.keys.is_stale() }

    fn rows(&self, filter: Option<&KeyFilter>) -> Vec<IpRow> {
        self.keys
            .iter()
            .filter(|address| passes(filter, address))
            .filter_map(|address| {
                self.requests.get(address).map(|entry| IpRow {
                    address: address.clone(),
                    usernames: entry.usernames.clone(),
                    requests: entry.requests,
                })
            })
            .collect()
    }
}
