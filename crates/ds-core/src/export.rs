//! Export preparation and the flat export writers.
//!
//! Flat formats carry files only; directories are dropped by [`files_only`]
//! before any writer sees the records. CSV, JSON and XLSX share the same
//! columns; the spreadsheet links each `full_path` cell to the file.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use camino::Utf8Path;
use rust_xlsxwriter::{Format, Url, Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExportError};
use crate::types::{DirectoryEntry, EntryKind};

/// Column order shared by every flat format.
const CSV_HEADER: [&str; 7] = [
    "path",
    "name",
    "kind",
    "size",
    "modified",
    "extension",
    "full_path",
];

/// Output format for the `export` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// A JSON array of records.
    #[default]
    Json,
    /// Comma-separated values with a header row.
    Csv,
    /// An Excel workbook with one sheet.
    Xlsx,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(ConfigError::invalid_option(
                "format",
                format!("unknown export format '{other}', expected json, csv or xlsx"),
            )),
        }
    }
}

/// One exported row, with every column already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Path relative to the scan root.
    pub path: String,
    /// Base name.
    pub name: String,
    /// Always [`EntryKind::File`] for flat exports.
    pub kind: EntryKind,
    /// Formatted size (`"1.5 KB"`, or `"unknown"`).
    pub size: String,
    /// Raw byte count, absent when the size could not be read.
    pub size_bytes: Option<u64>,
    /// Formatted modification time, or `"unknown"`.
    pub modified: String,
    /// Dotted lower-case extension, empty when the name has none.
    pub extension: String,
    /// Absolute path (scan root joined with the relative path).
    pub full_path: String,
}

impl ExportRecord {
    /// Renders one entry against the scan root.
    #[must_use]
    pub fn from_entry(entry: &DirectoryEntry, root: &Utf8Path) -> Self {
        Self {
            path: entry.path.to_string(),
            name: entry.name.clone(),
            kind: entry.kind,
            size: entry.size.to_string(),
            size_bytes: entry.size.bytes(),
            modified: entry.modified_display(),
            extension: entry.extension().unwrap_or_default(),
            full_path: entry.path.to_path(root).into_string(),
        }
    }

    fn csv_fields(&self) -> [&str; 7] {
        [
            &self.path,
            &self.name,
            self.kind.label(),
            &self.size,
            &self.modified,
            &self.extension,
            &self.full_path,
        ]
    }
}

/// Keeps the file entries of a result set, in traversal order.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ds_core::{files_only, DirectoryEntry, EntrySize, RelativePath};
///
/// let entries = vec![
///     DirectoryEntry::file(RelativePath::from_segments(["sub", "a.txt"]), EntrySize::Bytes(3), None),
///     DirectoryEntry::directory(RelativePath::from_segments(["sub"]), None),
/// ];
///
/// let records = files_only(&entries, Utf8Path::new("/data"));
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].extension, ".txt");
/// ```
#[must_use]
pub fn files_only(entries: &[DirectoryEntry], root: &Utf8Path) -> Vec<ExportRecord> {
    entries
        .iter()
        .filter(|e| e.is_file())
        .map(|e| ExportRecord::from_entry(e, root))
        .collect()
}

/// Writes records as CSV with a header row.
///
/// Fields containing a comma, a double quote or a line break are quoted,
/// with embedded quotes doubled.
pub fn write_csv<W: Write>(records: &[ExportRecord], mut writer: W) -> io::Result<()> {
    write_csv_row(&mut writer, CSV_HEADER)?;
    for record in records {
        write_csv_row(&mut writer, record.csv_fields())?;
    }
    writer.flush()
}

fn write_csv_row<W: Write>(writer: &mut W, fields: [&str; 7]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        if field.contains([',', '"', '\n', '\r']) {
            write!(writer, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            writer.write_all(field.as_bytes())?;
        }
    }
    writer.write_all(b"\n")
}

/// Writes records as a JSON array.
pub fn write_json<W: Write>(records: &[ExportRecord], mut writer: W, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, records)?;
    } else {
        serde_json::to_writer(&mut writer, records)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Worksheet holding the exported rows.
pub const XLSX_SHEET_NAME: &str = "Files";

/// Column index of `full_path`, written as a hyperlink.
const FULL_PATH_COLUMN: u16 = 6;

/// Longest hyperlink Excel accepts; longer paths are written as plain text.
const XLSX_MAX_URL_LEN: usize = 2079;

/// Writes records as an Excel workbook with a bold, frozen header row.
///
/// The workbook is assembled in memory and then written to `writer` in one go.
pub fn write_xlsx<W: Write>(records: &[ExportRecord], mut writer: W) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, title) in (0u16..).zip(CSV_HEADER) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        for (col, field) in (0u16..).zip(record.csv_fields()) {
            if col == FULL_PATH_COLUMN {
                write_file_link(sheet, row, col, field)?;
            } else {
                sheet.write_string(row, col, field)?;
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();

    let buffer = workbook.save_to_buffer()?;
    writer.write_all(&buffer)?;
    writer.flush()?;
    Ok(())
}

fn write_file_link(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    path: &str,
) -> Result<(), ExportError> {
    let url = file_url(path);
    if url.len() > XLSX_MAX_URL_LEN {
        sheet.write_string(row, col, path)?;
    } else {
        sheet.write_url_with_text(row, col, Url::new(url), path)?;
    }
    Ok(())
}

/// `file://` URL for an absolute path, with forward slashes.
fn file_url(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntrySize, RelativePath};

    fn sample() -> Vec<DirectoryEntry> {
        vec![
            DirectoryEntry::file(RelativePath::from_segments(["a.txt"]), EntrySize::Bytes(1536), None),
            DirectoryEntry::file(
                RelativePath::from_segments(["sub", "notes, \"draft\".md"]),
                EntrySize::Unknown,
                None,
            ),
            DirectoryEntry::file(RelativePath::from_segments(["sub", "Makefile"]), EntrySize::Bytes(10), None),
            DirectoryEntry::directory(RelativePath::from_segments(["sub"]), None),
        ]
    }

    #[test]
    fn test_files_only_drops_directories() {
        let records = files_only(&sample(), Utf8Path::new("/data"));
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.kind == EntryKind::File));
        assert_eq!(records[0].full_path, "/data/a.txt");
        assert_eq!(records[0].size_bytes, Some(1536));
        assert_eq!(records[1].size_bytes, None);
        assert_eq!(records[2].extension, "");
    }

    #[test]
    fn test_csv_output() {
        let records = files_only(&sample(), Utf8Path::new("/data"));
        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        insta::assert_snapshot!(csv, @r#"
        path,name,kind,size,modified,extension,full_path
        a.txt,a.txt,file,1.5 KB,unknown,.txt,/data/a.txt
        "sub/notes, ""draft"".md","notes, ""draft"".md",file,unknown,unknown,.md,"/data/sub/notes, ""draft"".md"
        sub/Makefile,Makefile,file,10 B,unknown,,/data/sub/Makefile
        "#);
    }

    #[test]
    fn test_json_output_is_the_record_list() {
        let records = files_only(&sample()[..1], Utf8Path::new("/data"));
        let mut out = Vec::new();
        write_json(&records, &mut out, false).unwrap();
        let json = String::from_utf8(out).unwrap();

        insta::assert_snapshot!(json, @r#"[{"path":"a.txt","name":"a.txt","kind":"file","size":"1.5 KB","size_bytes":1536,"modified":"unknown","extension":".txt","full_path":"/data/a.txt"}]"#);

        let parsed: Vec<ExportRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_empty_export() {
        let mut out = Vec::new();
        write_json(&[], &mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");

        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "path,name,kind,size,modified,extension,full_path\n"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("ods".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_file_url() {
        assert_eq!(file_url("/data/a b.txt"), "file:///data/a b.txt");
        assert_eq!(file_url(r"C:\data\a.txt"), "file:///C:/data/a.txt");
    }

    #[test]
    fn test_xlsx_output_reads_back() {
        use calamine::{Reader, Xlsx, open_workbook_from_rs};

        let records = files_only(&sample(), Utf8Path::new("/data"));
        let mut out = Vec::new();
        write_xlsx(&records, &mut out).unwrap();
        assert!(out.starts_with(b"PK"));

        let mut workbook: Xlsx<_> = open_workbook_from_rs(io::Cursor::new(out)).unwrap();
        let range = workbook.worksheet_range(XLSX_SHEET_NAME).unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], CSV_HEADER);
        assert_eq!(
            rows[1],
            ["a.txt", "a.txt", "file", "1.5 KB", "unknown", ".txt", "/data/a.txt"]
        );
        assert_eq!(rows[2][1], "notes, \"draft\".md");
        assert_eq!(rows[3][5], "");
    }

    #[test]
    fn test_xlsx_empty_export_has_header_only() {
        use calamine::{Reader, Xlsx, open_workbook_from_rs};

        let mut out = Vec::new();
        write_xlsx(&[], &mut out).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(io::Cursor::new(out)).unwrap();
        let range = workbook.worksheet_range(XLSX_SHEET_NAME).unwrap();
        assert_eq!(range.rows().count(), 1);
    }
}
