mod interval;
mod ip;
mod page;
mod status;
mod user;

use crate::filter::KeyFilter;

pub use self::interval::{IntervalRow, IntervalTable};
pub use self::ip::{IpRow, IpTable};
pub use self::page::{PageRow, PageTable};
pub use self::status::{StatusRow, StatusTable};
pub use self::user::{UserRow, UserTable};

/// The username IIS logs for anonymous requests.
pub const NO_USER: &str = "-";

/// A keyed aggregate over one axis of the log.
///
/// Rows come out in the key order computed by the last `seal`. Keys added after that
/// are not emitted until the table is sealed again.
pub trait DimensionTable {
    type Row;

    fn seal(&mut self);

    fn is_stale(&self) -> bool;

    fn rows(&self, filter: Option<&KeyFilter>) -> Vec<Self::Row>;
}

/// Key order derived from a table's map, valid as of the last `seal`.
#[derive(Clone, Debug)]
pub struct SortedKeys<K> {
    keys: Vec<K>,
    stale: bool,
}

impl<K: Ord> SortedKeys<K> {
    pub fn seal(&mut self, keys: impl IntoIterator<Item = K>) {
        self.keys = keys.into_iter().collect();
        self.keys.sort_unstable();
        self.stale = false;
    }

    pub fn touch(&mut self) { self.stale = true; }

    pub fn is_stale(&self) -> bool { self.stale }

    pub fn iter(&self) -> std::slice::Iter<'_, K> { self.keys.iter() }
}

impl<K> Default for SortedKeys<K> {
    fn default() -> Self { SortedKeys { keys: Vec::new(), stale: true } }
}
