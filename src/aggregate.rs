use std::io::{BufRead, BufReader, Read};

use tracing::debug;

use crate::error::AggregateError;
use crate::log_parser::{parse_line, Line, LogRecord};
use crate::normalize::normalize_path;
use crate::schema::{Fields, Schema};
use crate::tables::{DimensionTable, IntervalTable, IpTable, PageTable, StatusTable, UserTable};

/// Lines that were read but left out of some or all tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Data lines with fewer tokens than the schema declares.
    pub short_lines: usize,
    /// Records whose duration is not an integer. They still count towards the
    /// status, IP and user tables.
    pub bad_durations: usize,
}

/// Everything aggregated from one log file.
#[derive(Clone, Debug)]
pub struct DailyReport {
    pub date: String,
    pub pages: PageTable,
    pub ips: IpTable,
    pub statuses: StatusTable,
    pub intervals: IntervalTable,
    pub users: UserTable,
    pub skipped: SkipCounts,
}

impl DailyReport {
    pub fn seal(&mut self) {
        self.pages.seal();
        self.ips.seal();
        self.statuses.seal();
        self.intervals.seal();
        self.users.seal();
    }
}

/// Reads one log file and aggregates its records.
///
/// Returns `Ok(None)` when the file never declares a `#Date:`; such a file contributes
/// nothing, not even to `global`. Otherwise the file's page statistics are also added to
/// `global` once the whole file has been read.
pub fn aggregate_log(
    log: impl Read,
    global: Option<&mut PageTable>,
) -> Result<Option<DailyReport>, AggregateError> {
    let mut aggregator = LogAggregator::new()?;
    for line in BufReader::new(log).split(b'\n') {
        aggregator.consume(&String::from_utf8_lossy(&line?))?;
    }

    let report = aggregator.finish();
    if let (Some(report), Some(global)) = (&report, global) {
        global.absorb(&report.pages);
    }
    Ok(report)
}

/// Per-file aggregation state. Data lines are read with the legacy field layout until a
/// `#Fields:` directive declares another one.
pub struct LogAggregator {
    date: Option<String>,
    fields: Fields,
    pages: PageTable,
    ips: IpTable,
    statuses: StatusTable,
    intervals: IntervalTable,
    users: UserTable,
    skipped: SkipCounts,
}

impl LogAggregator {
    pub fn new() -> Result<Self, AggregateError> {
        Ok(LogAggregator {
            date: None,
            fields: Schema::legacy().fields()?,
            pages: PageTable::new(),
            ips: IpTable::new(),
            statuses: StatusTable::new(),
            intervals: IntervalTable::new(),
            users: UserTable::new(),
            skipped: SkipCounts::default(),
        })
    }

    pub fn consume(&mut self, line: &str) -> Result<(), AggregateError> {
        match parse_line(line) {
            Line::Directive { name, value } => self.apply_directive(name, value),
            Line::Data(tokens) => {
                match LogRecord::extract(&tokens, &self.fields) {
                    Some(record) => self.add(&record),
                    None => self.skipped.short_lines += 1,
                }
                Ok(())
            }
            Line::Comment | Line::Blank => Ok(()),
        }
    }

    fn apply_directive(&mut self, name: &str, value: &str) -> Result<(), AggregateError> {
        debug!(%name, %value, "log directive");
        match name {
            "Date" => {
                if let Some(date) = value.split_whitespace().next() {
                    self.date = Some(date.to_string());
                }
            }
            "Fields" => {
                self.fields = Schema::resolve(value.split_whitespace()).fields()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn add(&mut self, record: &LogRecord) {
        let path = normalize_path(record.path);
        self.statuses.add(record.status);
        self.ips.add(record.client_ip, record.username);
        self.users.add(record.username, &path);
        match record.duration {
            Some(duration) => {
                self.pages.add(&path, duration);
                self.intervals.add(record.time, &path, duration);
            }
            None => self.skipped.bad_durations += 1,
        }
    }

    /// The aggregated tables, or `None` if no `#Date:` was seen.
    pub fn finish(self) -> Option<DailyReport> {
        let date = self.date?;
        Some(DailyReport {
            date,
            pages: self.pages,
            ips: self.ips,
            statuses: self.statuses,
            intervals: self.intervals,
            users: self.users,
            skipped: self.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const DAY_ONE: &str = indoc! {"
        #Software: Microsoft Internet Information Services 10.0
        #Version: 1.0
        #Date: 2023-03-01 00:00:00
        #Fields: date time s-ip cs-method cs-uri-stem cs-uri-query s-port cs-username c-ip cs(User-Agent) sc-status sc-substatus sc-win32-status time-taken
        2023-03-01 08:15:00 10.1.1.1 GET /Home/Index.aspx - 443 alice 10.0.0.1 Mozilla 200 0 0 100
        2023-03-01 08:16:00 10.1.1.1 GET /api/orders/42/items - 443 alice 10.0.0.1 Mozilla 200 0 0 300
        2023-03-01 09:01:00 10.1.1.1 GET /api/orders/7/items - 443 bob 10.0.0.1 Mozilla 302 0 0 0
        2023-03-01 09:02:00 10.1.1.1 GET /Home/Index.aspx - 443 - 10.0.0.2 Mozilla 404 0 0 abc
        2023-03-01 09:03:00 10.1.1.1 GET /truncated
    "};

    fn read(log: &str, global: Option<&mut PageTable>) -> Option<DailyReport> {
        let mut report = aggregate_log(log.as_bytes(), global).unwrap();
        if let Some(report) = report.as_mut() {
            report.seal();
        }
        report
    }

    #[test]
    fn it_aggregates_every_dimension() {
        let report = read(DAY_ONE, None).unwrap();
        assert_eq!(report.date, "2023-03-01");

        let pages = report.pages.rows(None);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].path, "/api/orders");
        assert_eq!(pages[0].summary.count, 2);
        assert_eq!(pages[0].summary.average, 300);
        assert_eq!(pages[0].summary.min, 300);
        assert_eq!(pages[1].path, "/home/index.aspx");
        assert_eq!(pages[1].summary.count, 1);

        let ips = report.ips.rows(None);
        assert_eq!(ips.len(), 2);
        assert_eq!(ips[0].usernames, "alice bob");
        assert_eq!(ips[0].requests, 3);
        assert_eq!(ips[1].usernames, "");

        let statuses: Vec<(String, usize)> =
            report.statuses.rows(None).into_iter().map(|r| (r.code, r.count)).collect();
        assert_eq!(
            statuses,
            vec![("200".to_string(), 2), ("302".to_string(), 1), ("404".to_string(), 1)]
        );

        let intervals = report.intervals.rows(None);
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[0].hour, "08");
        assert_eq!(intervals[2].hour, "09");
        assert_eq!(intervals[2].path, "/api/orders");

        assert_eq!(report.users.count("alice", "/api/orders"), 1);
        assert_eq!(report.users.count("bob", "/api/orders"), 1);
        assert_eq!(report.users.count("-", "/home/index.aspx"), 1);
    }

    #[test]
    fn it_counts_skipped_lines() {
        let report = read(DAY_ONE, None).unwrap();
        assert_eq!(report.skipped, SkipCounts { short_lines: 1, bad_durations: 1 });
    }

    #[test]
    fn it_keeps_bad_durations_out_of_duration_tables_only() {
        let log = indoc! {"
            #Date: 2023-03-02 00:00:00
            #Fields: time cs-uri-stem c-ip cs-username sc-status time-taken
            10:00:00 /a.aspx 10.0.0.9 dave 500 -
        "};
        let report = read(log, None).unwrap();
        assert!(report.pages.is_empty());
        assert!(report.intervals.rows(None).is_empty());
        assert_eq!(report.statuses.rows(None).len(), 1);
        assert_eq!(report.ips.rows(None)[0].usernames, "dave");
        assert_eq!(report.users.count("dave", "/a.aspx"), 1);
    }

    #[test]
    fn it_skips_logs_without_a_date() {
        let log = indoc! {"
            #Fields: time cs-uri-stem c-ip cs-username sc-status time-taken
            10:00:00 /a 10.0.0.1 - 200 100
        "};
        let mut global = PageTable::new();
        assert!(read(log, Some(&mut global)).is_none());
        assert!(global.is_empty());
    }

    #[test]
    fn it_falls_back_to_the_legacy_layout() {
        let log = indoc! {"
            #Date: 2019-06-01 00:00:00
            2019-06-01 23:59:59 10.1.1.1 GET /Legacy.aspx - 80 - 10.0.0.5 Mozilla 200 0 0 42
        "};
        let report = read(log, None).unwrap();
        let pages = report.pages.rows(None);
        assert_eq!(pages[0].path, "/legacy.aspx");
        assert_eq!(pages[0].summary.max, 42);
        assert_eq!(report.intervals.rows(None)[0].hour, "23");
    }

    #[test]
    fn it_follows_a_redeclared_schema() {
        let log = indoc! {"
            #Date: 2023-03-03 00:00:00
            #Fields: time cs-uri-stem c-ip cs-username sc-status time-taken
            10:00:00 /a 10.0.0.1 - 200 100
            #Fields: time-taken sc-status cs-username c-ip cs-uri-stem time
            200 200 - 10.0.0.1 /a 11:00:00
        "};
        let report = read(log, None).unwrap();
        let pages = report.pages.rows(None);
        assert_eq!(pages[0].summary.count, 2);
        assert_eq!(pages[0].summary.average, 150);
    }

    #[test]
    fn it_fails_on_a_schema_missing_required_fields() {
        let log = indoc! {"
            #Date: 2023-03-03 00:00:00
            #Fields: date time cs-uri-stem
        "};
        match aggregate_log(log.as_bytes(), None) {
            Err(AggregateError::FieldNotFound(_)) => {}
            other => panic!("expected FieldNotFound, got {:?}", other.map(|r| r.is_some())),
        }
    }

    #[test]
    fn it_rolls_up_pages_across_files() {
        let day_one = indoc! {"
            #Date: 2023-03-01 00:00:00
            #Fields: time cs-uri-stem c-ip cs-username sc-status time-taken
            10:00:00 /a 10.0.0.1 - 200 100
        "};
        let day_two = indoc! {"
            #Date: 2023-03-02 00:00:00
            #Fields: time cs-uri-stem c-ip cs-username sc-status time-taken
            10:00:00 /a 10.0.0.1 - 200 300
        "};

        let mut global = PageTable::new();
        let first = read(day_one, Some(&mut global)).unwrap();
        let second = read(day_two, Some(&mut global)).unwrap();
        global.seal();

        let rows = global.rows(None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, "/a");
        assert_eq!(rows[0].summary.count, 2);
        assert_eq!(rows[0].summary.average, 200);
        assert_eq!(first.pages.rows(None)[0].summary.count, 1);
        assert_eq!(second.pages.rows(None)[0].summary.average, 300);
    }

    #[test]
    fn it_sums_huge_durations_without_overflow() {
        let log = indoc! {"
            #Date: 2023-03-04 00:00:00
            #Fields: time cs-uri-stem c-ip cs-username sc-status time-taken
            10:00:00 /a 10.0.0.1 - 200 9223372036854775807
            10:00:01 /a 10.0.0.1 - 200 9223372036854775807
        "};
        let mut global = PageTable::new();
        let report = read(log, Some(&mut global)).unwrap();
        assert_eq!(report.pages.rows(None)[0].summary.average, i64::MAX);
        assert_eq!(report.intervals.rows(None)[0].summary.count, 2);

        global.seal();
        assert_eq!(global.rows(None)[0].summary.average, i64::MAX);
    }

    #[test]
    fn it_produces_nothing_for_a_header_and_line_without_date() {
        let log = indoc! {"
            #Fields: date time s-ip cs-method cs-uri-stem cs-uri-query s-port cs-username c-ip cs(User-Agent) sc-status sc-substatus sc-win32-status time-taken
            2023-03-01 08:15:00 10.1.1.1 GET /x.aspx - 443 - 10.0.0.1 Mozilla 200 0 0 10
        "};
        let mut global = PageTable::new();
        assert!(read(log, Some(&mut global)).is_none());
        assert!(global.is_empty());
    }
}
