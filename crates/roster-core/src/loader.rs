//! Loader — turns a spreadsheet on disk into a [`Table`].
//!
//! The first row of the worksheet is the header. Header names are trimmed,
//! blanks become `Unnamed: <index>`, and repeats get a `.N` suffix so column
//! names stay unique. Every cell is rendered to text; empty and error cells
//! become `""`.

use crate::{error::LoadError, types::Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};

/// Anything that can produce a [`Table`] on demand.
///
/// [`DatasetCache`](crate::cache::DatasetCache) owns one of these and calls
/// [`TableSource::load`] at most once per cache fill.
pub trait TableSource: Send + Sync {
    /// Human-readable locator used in log events.
    fn id(&self) -> String;

    fn load(&self) -> Result<Table, LoadError>;
}

/// Reads `.xlsx`, `.xls`, `.xlsb` and `.ods` workbooks.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl SpreadsheetSource {
    /// Read the first worksheet of the workbook at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    /// Read the named worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for SpreadsheetSource {
    fn id(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}#{sheet}", self.path.display()),
            None => self.path.display().to_string(),
        }
    }

    fn load(&self) -> Result<Table, LoadError> {
        if !self.path.is_file() {
            return Err(LoadError::NotFound {
                path: self.path.clone(),
            });
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| LoadError::Open {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let sheet = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(LoadError::SheetMissing {
                        path: self.path.clone(),
                        sheet: name.clone(),
                    });
                }
                name.clone()
            }
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| LoadError::NoSheet {
                    path: self.path.clone(),
                })?,
        };

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| LoadError::Sheet {
                path: self.path.clone(),
                sheet: sheet.clone(),
                reason: e.to_string(),
            })?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
            .unwrap_or_default();

        Ok(build_table(
            header,
            rows.map(|cells| cells.iter().map(cell_text).collect()),
        ))
    }
}

/// Assemble a [`Table`] from a raw header row and raw body rows.
///
/// Applies header shaping and drops rows whose cells are all empty.
pub fn build_table<I>(header: Vec<String>, body: I) -> Table
where
    I: IntoIterator<Item = Vec<String>>,
{
    let columns = shape_header(header);
    let rows = body
        .into_iter()
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();
    Table::new(columns, rows)
}

/// Trim header names, fill blanks, and de-duplicate.
pub fn shape_header(raw: Vec<String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {i}")
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while columns.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        columns.push(candidate);
    }
    columns
}

/// Render one worksheet cell as text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| float_text(dt.as_f64())),
    }
}

/// Integral values print as integers. Everything else uses the shortest
/// round-trip digits, switching to `d.ddde±XX` exponent form below `1e-4` and
/// from `1e16` up.
fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e16 {
        return format!("{}", f as i64);
    }

    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => return f.to_string(),
    };
    if (-4..16).contains(&exponent) {
        f.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}
