use std::path::{Path, PathBuf};

use time::macros::format_description;
use time::{Date, Duration};

/// The name IIS gives the log of `date`, e.g. `u_ex230301.log`.
pub fn log_file_name(date: Date) -> String {
    format!(
        "u_ex{:02}{:02}{:02}.log",
        date.year().rem_euclid(100),
        u8::from(date.month()),
        date.day()
    )
}

/// The `days` dates before `today`, newest first.
pub fn days_before(today: Date, days: u32) -> Vec<Date> {
    (1..=i64::from(days)).filter_map(|n| today.checked_sub(Duration::days(n))).collect()
}

/// Every date from `from` to `to`, both included.
pub fn date_range(from: Date, to: Date) -> Vec<Date> {
    let mut dates = Vec::new();
    let mut date = from;
    while date <= to {
        dates.push(date);
        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
    }
    dates
}

pub fn parse_date(arg: &str) -> Result<Date, String> {
    Date::parse(arg, format_description!("[year]-[month]-[day]"))
        .map_err(|err| format!("Invalid date '{}', expected YYYY-MM-DD: {}", arg, err))
}

pub fn log_paths(dir: Option<&Path>, dates: &[Date]) -> Vec<PathBuf> {
    dates
        .iter()
        .map(|&date| {
            let name = log_file_name(date);
            match dir {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        })
        .collect()
}
