use ahash::{HashMap, HashMapExt};

use crate::filter::{passes, KeyFilter};
use crate::stats::{DurationStats, Summary};
use crate::tables::{DimensionTable, SortedKeys};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalRow {
    pub hour: String,
    pub path: String,
    pub summary: Summary,
}

/// Durations per hour of day and normalized path.
#[derive(Clone, Debug, Default)]
pub struct IntervalTable {
    requests: HashMap<String, HashMap<String, DurationStats>>,
    keys: SortedKeys<(String, String)>,
}

impl IntervalTable {
    pub fn new() -> Self {
        IntervalTable { requests: HashMap::new(), keys: SortedKeys::default() }
    }

    /// Files the duration under the hour of `time_of_day` (`"hh:mm:ss"`).
    pub fn add(&mut self, time_of_day: &str, path: &str, duration: i64) {
        let paths = self.requests.entry(hour_of(time_of_day).to_string()).or_default();
        if let Some(stats) = paths.get_mut(path) {
            stats.observe(duration);
        } else {
            let mut stats = DurationStats::new();
            stats.observe(duration);
            paths.insert(path.to_string(), stats);
        }
        self.keys.touch();
    }

    pub fn get(&self, hour: &str, path: &str) -> Option<&DurationStats> {
        self.requests.get(hour).and_then(|paths| paths.get(path))
    }
}

fn hour_of(time_of_day: &str) -> &str { time_of_day.get(..2).unwrap_or(time_of_day) }

impl DimensionTable for IntervalTable {
    type Row = IntervalRow;

    fn seal(&mut self) {
        let pairs = self.requests.iter().flat_map(|(hour, paths)| {
            paths.keys().map(move |path| (hour.clone(), path.clone()))
        });
        self.keys.seal(pairs)
    }

    fn is_stale(&self) -> bool { self.keys.is_stale() }

    fn rows(&self, filter: Option<&KeyFilter>) -> Vec<IntervalRow> {
        self.keys
            .iter()
            .filter(|(_, path)| passes(filter, path))
            .filter_map(|(hour, path)| {
                self.get(hour, path).map(|stats| IntervalRow {
                    hour: hour.clone(),
                    path: path.clone(),
                    summary: stats.summary(),
                })
            })
            .collect()
    }
}
