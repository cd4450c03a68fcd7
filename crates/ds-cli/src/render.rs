//! Text rendering of scan results.
//!
//! Three views mirror the display modes of a desktop file browser:
//!
//! - **detail**: aligned table of files (path, kind, size, modified, extension)
//! - **list**: one compact line per file
//! - **tree**: every kept entry drawn as a hierarchy below the scan root
//!
//! All functions write to any [`Write`] so they can be tested against a buffer.

use std::io::{self, Write};

use clap::ValueEnum;
use ds_core::{
    DirectoryEntry, FxHashMap, RelativePath, SortState, format_duration, format_size, sort_entries,
};
use ds_scanner::{ScanOutcome, ScanStatistics};

/// Result presentation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Table with one row per file.
    #[default]
    Detail,
    /// Compact one-line-per-file listing.
    List,
    /// Directory hierarchy including kept folders.
    Tree,
}

const DETAIL_HEADERS: [&str; 5] = ["PATH", "KIND", "SIZE", "MODIFIED", "EXTENSION"];

/// Renders `entries` in the requested view.
pub fn render_view(
    out: &mut impl Write,
    view: View,
    root_label: &str,
    entries: &[DirectoryEntry],
    sort: SortState,
) -> io::Result<()> {
    match view {
        View::Detail => render_detail(out, &sorted_files(entries, sort)),
        View::List => render_list(out, &sorted_files(entries, sort)),
        View::Tree => render_tree(out, root_label, entries, sort),
    }
}

fn sorted_files(entries: &[DirectoryEntry], sort: SortState) -> Vec<DirectoryEntry> {
    let mut files: Vec<DirectoryEntry> = entries.iter().filter(|e| e.is_file()).cloned().collect();
    sort_entries(&mut files, sort);
    files
}

fn render_detail(out: &mut impl Write, files: &[DirectoryEntry]) -> io::Result<()> {
    let rows: Vec<[String; 5]> = files
        .iter()
        .map(|e| {
            [
                e.path.to_string(),
                e.kind.to_string(),
                e.size.to_string(),
                e.modified_display(),
                e.extension().unwrap_or_else(|| "-".to_owned()),
            ]
        })
        .collect();

    let mut widths = DETAIL_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &DETAIL_HEADERS.map(str::to_owned), &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String; 5], widths: &[usize; 5]) -> io::Result<()> {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < cells.len() {
            let pad = width.saturating_sub(cell.chars().count());
            line.extend(std::iter::repeat_n(' ', pad));
        }
    }
    writeln!(out, "{line}")
}

fn render_list(out: &mut impl Write, files: &[DirectoryEntry]) -> io::Result<()> {
    for e in files {
        writeln!(
            out,
            "{:<6} | {:<30} | {:<10} | {}",
            e.kind.label(),
            e.name,
            e.size.to_string(),
            e.modified_display()
        )?;
    }
    Ok(())
}

fn render_tree(
    out: &mut impl Write,
    root_label: &str,
    entries: &[DirectoryEntry],
    sort: SortState,
) -> io::Result<()> {
    // Traversal order lists a directory's files before its subdirectories,
    // so grouping by parent keeps that order within each group.
    let mut children: FxHashMap<RelativePath, Vec<DirectoryEntry>> = FxHashMap::default();
    for entry in entries {
        if let Some(parent) = entry.path.parent() {
            children.entry(parent).or_default().push(entry.clone());
        }
    }
    for group in children.values_mut() {
        sort_entries(group, sort);
    }

    writeln!(out, "{root_label}")?;
    write_children(out, &children, &RelativePath::root(), "")
}

fn write_children(
    out: &mut impl Write,
    children: &FxHashMap<RelativePath, Vec<DirectoryEntry>>,
    parent: &RelativePath,
    prefix: &str,
) -> io::Result<()> {
    let Some(group) = children.get(parent) else {
        return Ok(());
    };

    for (i, entry) in group.iter().enumerate() {
        let is_last = i + 1 == group.len();
        let connector = if is_last { "└── " } else { "├── " };

        if entry.is_directory() {
            writeln!(out, "{prefix}{connector}{}/", entry.name)?;
            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            write_children(out, children, &entry.path, &child_prefix)?;
        } else {
            writeln!(
                out,
                "{prefix}{connector}{}  ({}, {})",
                entry.name,
                entry.size,
                entry.modified_display()
            )?;
        }
    }
    Ok(())
}

/// Writes totals and the per-extension breakdown.
pub fn render_stats(out: &mut impl Write, stats: &ScanStatistics) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Statistics")?;
    writeln!(out, "==========")?;
    writeln!(out, "Files:      {}", stats.files)?;
    writeln!(out, "Folders:    {}", stats.folders)?;
    writeln!(out, "Total size: {}", format_size(stats.total_size()))?;

    let breakdown = stats.breakdown();
    if breakdown.is_empty() {
        return Ok(());
    }

    let ext_width = breakdown
        .iter()
        .map(|row| row.extension.chars().count())
        .max()
        .unwrap_or(0)
        .max("EXTENSION".len());

    writeln!(out)?;
    writeln!(
        out,
        "{:<ext_width$}  {:>7}  {:>10}  {:>10}",
        "EXTENSION", "COUNT", "TOTAL", "AVERAGE"
    )?;
    for row in &breakdown {
        writeln!(
            out,
            "{:<ext_width$}  {:>7}  {:>10}  {:>10}",
            row.extension,
            row.count,
            format_size(row.total_size),
            format_size(row.average_size)
        )?;
    }
    Ok(())
}

/// One-line completion notice.
pub fn render_summary(
    out: &mut impl Write,
    outcome: &ScanOutcome,
    diagnostics: usize,
) -> io::Result<()> {
    let status = if outcome.was_cancelled {
        "Scan stopped"
    } else {
        "Scan complete"
    };
    write!(
        out,
        "{status}: {} files, {} folders in {}",
        outcome.stats.files,
        outcome.stats.folders,
        format_duration(outcome.elapsed)
    )?;
    if diagnostics > 0 {
        write!(out, " ({diagnostics} entries could not be read)")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::{EntrySize, SortColumn};

    fn sample() -> Vec<DirectoryEntry> {
        let file = |segments: &[&str], size| {
            DirectoryEntry::file(
                RelativePath::from_segments(segments.iter().copied()),
                EntrySize::Bytes(size),
                None,
            )
        };
        vec![
            file(&["b.txt"], 10),
            file(&["a.md"], 2048),
            file(&["src", "lib.rs"], 5),
            file(&["src", "util", "x.rs"], 1),
            DirectoryEntry::directory(RelativePath::from_segments(["src", "util"]), None),
            DirectoryEntry::directory(RelativePath::from_segments(["src"]), None),
        ]
    }

    fn render(view: View, sort: SortState) -> String {
        let mut out = Vec::new();
        render_view(&mut out, view, "root", &sample(), sort).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tree_view() {
        let expected = "\
root
├── b.txt  (10 B, unknown)
├── a.md  (2.0 KB, unknown)
└── src/
    ├── lib.rs  (5 B, unknown)
    └── util/
        └── x.rs  (1 B, unknown)
";
        assert_eq!(render(View::Tree, SortState::default()), expected);
    }

    #[test]
    fn test_tree_view_sorted_siblings() {
        let out = render(View::Tree, SortState::by(SortColumn::Name));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "├── a.md  (2.0 KB, unknown)");
        assert_eq!(lines[2], "├── b.txt  (10 B, unknown)");
    }

    #[test]
    fn test_detail_view_excludes_directories() {
        let out = render(View::Detail, SortState::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("PATH"));
        assert!(lines[0].ends_with("EXTENSION"));
        assert!(lines[1].starts_with("b.txt "));
        assert!(lines[1].ends_with(".txt"));
        assert!(!out.contains("directory"));
    }

    #[test]
    fn test_list_view_sorted_by_size_descending() {
        let sort = SortState {
            column: Some(SortColumn::Size),
            descending: true,
        };
        let out = render(View::List, sort);
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("file   | a.md"));
        assert!(first.contains("2.0 KB"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_stats_table() {
        let mut stats = ScanStatistics::new();
        stats.record_file(Some(".rs"), Some(1024));
        stats.record_file(Some(".rs"), Some(3072));
        stats.record_file(None, Some(1));
        stats.record_folder();

        let mut out = Vec::new();
        render_stats(&mut out, &stats).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Files:      3"));
        assert!(text.contains("Total size: 4.0 KB"));
        let rs_line = text.lines().find(|l| l.starts_with(".rs")).unwrap();
        assert!(rs_line.contains("2.0 KB"));
        assert!(text.lines().any(|l| l.starts_with("no-extension")));
    }
}
