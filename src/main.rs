mod aggregate;
mod error;
mod files;
mod filter;
mod log_parser;
mod logging;
mod normalize;
mod opt;
mod report;
mod schema;
mod stats;
mod tables;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use aggregate::{aggregate_log, DailyReport};
use error::AggregateError;
use files::{date_range, days_before, log_paths};
use filter::KeyFilter;
use opt::{Detail, Opt};
use report::{Sheet, ALL_DATES};
use tables::{DimensionTable, PageTable};

fn main() {
    let opt = Opt::parse();
    if opt.version {
        print_version();
        process::exit(0);
    }
    logging::init_logging();

    if let Err(err) = run(&opt) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(opt: &Opt) -> anyhow::Result<()> {
    let filter = KeyFilter::new(&opt.filter);
    let mut global = PageTable::new();
    let mut sheets = Vec::new();

    for path in log_files(opt) {
        let Some(mut daily) = read_log(&path, &mut global) else {
            continue;
        };
        daily.seal();
        sheets.extend(daily_sheets(opt, &daily, &filter));
    }

    if opt.global {
        if global.is_stale() {
            global.seal();
        }
        info!(pages = global.len(), "all dates rolled up");
        sheets.push(report::page_sheet(ALL_DATES, &global.rows(Some(&filter))));
    }

    if !opt.quiet {
        for sheet in &sheets {
            println!("{}", sheet);
        }
    }
    if let Some(path) = &opt.report {
        report::write_report(path, &sheets)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), sheets = sheets.len(), "report written");
    }
    Ok(())
}

/// Explicit file names, unless `--days` or `--from` ask for a run of daily logs.
fn log_files(opt: &Opt) -> Vec<PathBuf> {
    let dates = match (opt.days, opt.from) {
        (Some(days), _) => {
            let today = OffsetDateTime::now_utc().date();
            days_before(today, days)
        }
        (None, Some(from)) => date_range(from, opt.to.unwrap_or(from)),
        (None, None) => return opt.files.clone(),
    };
    log_paths(opt.log_dir.as_deref(), &dates)
}

/// A file that cannot be read, lacks a date, or declares an unusable schema is skipped.
fn read_log(path: &Path, global: &mut PageTable) -> Option<DailyReport> {
    info!(file = %path.display(), "reading log");
    let result = File::open(path)
        .map_err(AggregateError::from)
        .and_then(|file| aggregate_log(file, Some(global)));
    match result {
        Ok(Some(daily)) => {
            info!(file = %path.display(), date = %daily.date, "log read");
            debug!(
                file = %path.display(),
                short_lines = daily.skipped.short_lines,
                bad_durations = daily.skipped.bad_durations,
                "skipped lines"
            );
            Some(daily)
        }
        Ok(None) => {
            info!(file = %path.display(), "no #Date directive, skipping");
            None
        }
        Err(err) => {
            warn!(file = %path.display(), error = %err, "skipping log");
            None
        }
    }
}

fn daily_sheets(opt: &Opt, daily: &DailyReport, filter: &KeyFilter) -> Vec<Sheet> {
    let date = daily.date.as_str();
    let mut sheets = Vec::new();
    if opt.wants(Detail::Page) {
        sheets.push(report::page_sheet(date, &daily.pages.rows(Some(filter))));
    }
    if opt.wants(Detail::Ip) {
        sheets.push(report::ip_sheet(date, &daily.ips.rows(None)));
    }
    if opt.wants(Detail::Status) {
        sheets.push(report::status_sheet(date, &daily.statuses.rows(None)));
    }
    if opt.wants(Detail::Interval) {
        sheets.push(report::interval_sheet(date, &daily.intervals.rows(Some(filter))));
    }
    if opt.wants(Detail::User) {
        sheets.push(report::user_sheet(date, &daily.users.rows(Some(filter))));
    }
    sheets
}

fn print_version() {
    println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}
