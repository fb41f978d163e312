use once_cell::sync::OnceCell;
use regex::Regex;

use crate::schema::Fields;

/// One line of an extended log file.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// `#Name: value...`
    Directive { name: &'a str, value: &'a str },
    /// A comment line that is not a directive.
    Comment,
    Data(Vec<&'a str>),
    Blank,
}

pub fn parse_line(line: &str) -> Line<'_> {
    static REGEX: OnceCell<Regex> = OnceCell::new();
    let regex =
        REGEX.get_or_init(|| Regex::new(r"^#(?P<name>[^:\s]+):\s*(?P<value>.*?)\s*$").unwrap());

    if line.starts_with('#') {
        return match regex.captures(line) {
            Some(caps) => Line::Directive {
                name: caps.name("name").map_or("", |m| m.as_str()),
                value: caps.name("value").map_or("", |m| m.as_str()),
            },
            None => Line::Comment,
        };
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        Line::Blank
    } else {
        Line::Data(tokens)
    }
}

/// The fields of a data line the statistics are built from.
#[derive(Debug, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub time: &'a str,
    pub client_ip: &'a str,
    pub path: &'a str,
    pub username: &'a str,
    pub status: &'a str,
    /// `None` if the duration field is not an integer.
    pub duration: Option<i64>,
}

impl<'a> LogRecord<'a> {
    /// Returns `None` for lines with fewer tokens than the schema declares.
    pub fn extract(tokens: &[&'a str], fields: &Fields) -> Option<LogRecord<'a>> {
        if tokens.len() < fields.width {
            return None;
        }
        Some(LogRecord {
            time: tokens[fields.time],
            client_ip: tokens[fields.client_ip],
            path: tokens[fields.path],
            username: tokens[fields.username],
            status: tokens[fields.status],
            duration: tokens[fields.duration].parse::<i64>().ok(),
        })
    }
}
