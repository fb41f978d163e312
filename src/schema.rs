use ahash::{HashMap, HashMapExt};
use once_cell::sync::Lazy;

use crate::error::AggregateError;

pub const TIME: &str = "time";
pub const PATH: &str = "cs-uri-stem";
pub const USERNAME: &str = "cs-username";
pub const CLIENT_IP: &str = "c-ip";
pub const STATUS: &str = "sc-status";
pub const DURATION: &str = "time-taken";

/// The layout IIS wrote before logs carried a `#Fields` directive.
const LEGACY_FIELDS: [&str; 14] = [
    "date",
    TIME,
    "s-ip",
    "cs-method",
    PATH,
    "cs-uri-query",
    "s-port",
    USERNAME,
    CLIENT_IP,
    "cs(User-Agent)",
    STATUS,
    "sc-substatus",
    "sc-win32-status",
    DURATION,
];

static LEGACY: Lazy<Schema> = Lazy::new(|| Schema::resolve(LEGACY_FIELDS));

/// Ordered field names of one log file, as declared by its `#Fields` directive.
#[derive(Clone, Debug)]
pub struct Schema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Schema {
    pub fn resolve<I, S>(header_tokens: I) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = header_tokens.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            // first declaration wins if a name is repeated
            positions.entry(name.clone()).or_insert(index);
        }
        Schema { names, positions }
    }

    pub fn legacy() -> &'static Schema { &LEGACY }

    pub fn width(&self) -> usize { self.names.len() }

    pub fn index_of(&self, name: &str) -> Result<usize, AggregateError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| AggregateError::FieldNotFound(name.to_string()))
    }

    /// Looks up every field the aggregator reads, once per schema.
    pub fn fields(&self) -> Result<Fields, AggregateError> {
        Ok(Fields {
            time: self.index_of(TIME)?,
            path: self.index_of(PATH)?,
            username: self.index_of(USERNAME)?,
            client_ip: self.index_of(CLIENT_IP)?,
            status: self.index_of(STATUS)?,
            duration: self.index_of(DURATION)?,
            width: self.width(),
        })
    }
}

/// Token positions of the fields a log record is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fields {
    pub time: usize,
    pub path: usize,
    pub username: usize,
    pub client_ip: usize,
    pub status: usize,
    pub duration: usize,
    pub width: usize,
}
