use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::stats::Summary;
use crate::tables::{IntervalRow, IpRow, PageRow, StatusRow, UserRow};

pub const ALL_DATES: &str = "All dates";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(i64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Int(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self { Cell::Text(text.to_string()) }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self { Cell::Int(value as i64) }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self { Cell::Int(value) }
}

/// A labelled section of the report.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub label: String,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

const DURATION_COLUMNS: [&str; 5] = ["Count", "Average", "Over average", "Maximum", "Minimum"];

fn summary_cells(summary: &Summary) -> [Cell; 5] {
    [
        summary.count.into(),
        summary.average.into(),
        summary.over_average.into(),
        summary.max.into(),
        summary.min.into(),
    ]
}

pub fn page_sheet(label: &str, rows: &[PageRow]) -> Sheet {
    const COLUMNS: [&str; 6] = [
        "Request",
        DURATION_COLUMNS[0],
        DURATION_COLUMNS[1],
        DURATION_COLUMNS[2],
        DURATION_COLUMNS[3],
        DURATION_COLUMNS[4],
    ];
    let rows = rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(row.path.as_str())];
            cells.extend(summary_cells(&row.summary));
            cells
        })
        .collect();
    Sheet { label: label.to_string(), columns: &COLUMNS, rows }
}

pub fn ip_sheet(date: &str, rows: &[IpRow]) -> Sheet {
    let rows = rows
        .iter()
        .map(|row| {
            vec![
                Cell::from(row.address.as_str()),
                Cell::from(row.usernames.as_str()),
                Cell::from(row.requests),
            ]
        })
        .collect();
    Sheet {
        label: format!("{} IP info", date),
        columns: &["IP address", "Usernames", "Requests"],
        rows,
    }
}

pub fn status_sheet(date: &str, rows: &[StatusRow]) -> Sheet {
    let rows =
        rows.iter().map(|row| vec![Cell::from(row.code.as_str()), Cell::from(row.count)]).collect();
    Sheet {
        label: format!("{} Status codes", date),
        columns: &["HTTP status", "Requests"],
        rows,
    }
}

pub fn interval_sheet(date: &str, rows: &[IntervalRow]) -> Sheet {
    const COLUMNS: [&str; 7] = [
        "Hour",
        "Request",
        DURATION_COLUMNS[0],
        DURATION_COLUMNS[1],
        DURATION_COLUMNS[2],
        DURATION_COLUMNS[3],
        DURATION_COLUMNS[4],
    ];
    let rows = rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(row.hour.as_str()), Cell::from(row.path.as_str())];
            cells.extend(summary_cells(&row.summary));
            cells
        })
        .collect();
    Sheet { label: format!("{} Intervals", date), columns: &COLUMNS, rows }
}

pub fn user_sheet(date: &str, rows: &[UserRow]) -> Sheet {
    let rows = rows
        .iter()
        .map(|row| {
            vec![
                Cell::from(row.username.as_str()),
                Cell::from(row.path.as_str()),
                Cell::from(row.count),
            ]
        })
        .collect();
    Sheet { label: format!("{} Users", date), columns: &["Username", "Request", "Requests"], rows }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered: Vec<Vec<String>> =
            self.rows.iter().map(|row| row.iter().map(Cell::to_string).collect()).collect();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &rendered {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(f, "{}", self.label)?;
        writeln!(f, "{}", "=".repeat(self.label.chars().count()))?;
        let header: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write_padded(f, &header, &widths)?;
        for row in &rendered {
            write_padded(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_padded(f: &mut fmt::Formatter, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

/// Writes every sheet as a `#`-labelled block of tab-separated lines.
pub fn write_sheets(mut out: impl Write, sheets: &[Sheet]) -> io::Result<()> {
    for (index, sheet) in sheets.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "# {}", sheet.label)?;
        writeln!(out, "{}", sheet.columns.join("\t"))?;
        for row in &sheet.rows {
            let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(out, "{}", cells.join("\t"))?;
        }
    }
    out.flush()
}

pub fn write_report(path: &Path, sheets: &[Sheet]) -> io::Result<()> {
    write_sheets(BufWriter::new(File::create(path)?), sheets)
}
