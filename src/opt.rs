use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use time::Date;

use crate::files::parse_date;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Detail {
    Page,
    Ip,
    Status,
    Interval,
    User,
    All,
}

#[derive(Parser)]
pub struct Opt {
    /// Log files to read, in order
    pub files: Vec<PathBuf>,
    #[arg(short, long = "detail", default_value = "page")]
    /// Which statistics to report; may be given more than once
    pub details: Vec<Detail>,
    #[arg(short, long, default_value = ".aspx")]
    /// Space-separated substrings; a path is reported if it contains any of them
    pub filter: String,
    #[arg(short, long)]
    /// Do not print the report to the console
    pub quiet: bool,
    #[arg(long)]
    /// Read the logs of this many days before today instead of the given files
    pub days: Option<u32>,
    #[arg(long, value_parser = parse_date)]
    /// First day (YYYY-MM-DD) of a range of logs to read
    pub from: Option<Date>,
    #[arg(long, value_parser = parse_date, requires = "from")]
    /// Last day of the range, defaults to --from
    pub to: Option<Date>,
    #[arg(long)]
    /// Directory holding the logs named by --days or --from/--to
    pub log_dir: Option<PathBuf>,
    #[arg(short, long)]
    /// Write the report as tab-separated sections to this file
    pub report: Option<PathBuf>,
    #[arg(short, long)]
    /// Also report page statistics over all files together
    pub global: bool,
    #[arg(short, long)]
    /// Prints the program's version number
    pub version: bool,
}

impl Opt {
    pub fn wants(&self, detail: Detail) -> bool {
        self.details.iter().any(|&d| d == detail || d == Detail::All)
    }
}
