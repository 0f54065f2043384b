//! Offline preparation of the dashboard input: merge every raw CSV export in a
//! directory into one table and write a single-department subset.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

const DEPARTMENT_COLUMN: &str = "School/Department";

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge raw bidding CSV exports into one table", long_about = None)]
struct Args {
    /// Directory holding the raw CSV exports
    #[arg(default_value = "data", value_hint = clap::ValueHint::DirPath)]
    data_dir: PathBuf,

    /// Merged output file name (inside the data directory)
    #[arg(long, default_value = "boss_merge.csv")]
    output: String,

    /// Department kept in the subset file
    #[arg(long, default_value = "SIS")]
    department: String,

    /// Subset output file name (inside the data directory)
    #[arg(long, default_value = "sis_only.csv")]
    subset: String,

    /// Text encoding of the raw exports
    #[arg(long, value_enum, default_value_t = Encoding::Latin1)]
    encoding: Encoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Encoding {
    Latin1,
    Utf8,
}

impl Encoding {
    fn decode(self, bytes: &[u8]) -> String {
        match self {
            // Every Latin-1 byte maps to the code point of the same value.
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// Rows of several files aligned on the union of their headers.
#[derive(Debug, Default)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Append a file's rows; new columns are added, missing cells stay empty.
    fn append(&mut self, headers: &[String], rows: Vec<Vec<String>>) {
        let mapping: Vec<usize> = headers
            .iter()
            .map(|h| match self.headers.iter().position(|existing| existing == h) {
                Some(i) => i,
                None => {
                    self.headers.push(h.clone());
                    self.headers.len() - 1
                }
            })
            .collect();
        for row in rows {
            let mut aligned = vec![String::new(); self.headers.len()];
            for (cell, &target) in row.into_iter().zip(&mapping) {
                aligned[target] = cell;
            }
            self.rows.push(aligned);
        }
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// `(value, count)` for a column, most frequent first, ties by value.
    fn value_counts(&self, column: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &self.rows {
            *counts.entry(row[column].as_str()).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> =
            counts.into_iter().map(|(v, n)| (v.to_string(), n)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    fn write(&self, path: &Path, keep: impl Fn(&[String]) -> bool) -> Result<usize> {
        let mut writer =
            csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(&self.headers)?;
        let mut written = 0;
        for row in self.rows.iter().filter(|r| keep(r)) {
            writer.write_record(row)?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }
}

/// CSV files in `dir`, sorted by name, minus the utility's own outputs.
fn list_inputs(dir: &Path, exclude: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && name.ends_with(".csv") && !exclude.contains(&name) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_csv(path: &Path, encoding: Encoding) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader
        .byte_headers()
        .with_context(|| format!("reading headers of {}", path.display()))?
        .iter()
        .map(|h| encoding.decode(h))
        .collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("{} row {row_no}", path.display()))?;
        rows.push(record.iter().map(|c| encoding.decode(c)).collect());
    }
    Ok((headers, rows))
}

fn merge(args: &Args) -> Result<Option<Table>> {
    let inputs = list_inputs(&args.data_dir, &[args.output.as_str(), args.subset.as_str()])?;
    if inputs.is_empty() {
        return Ok(None);
    }
    let mut table = Table::default();
    for path in &inputs {
        let (headers, rows) = read_csv(path, args.encoding)?;
        log::info!("{}: {} rows", path.display(), rows.len());
        table.append(&headers, rows);
    }
    let output = args.data_dir.join(&args.output);
    table.write(&output, |_| true)?;
    println!(
        "Merged {} CSV files into {}",
        inputs.len(),
        output.display()
    );
    Ok(Some(table))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let Some(table) = merge(&args)? else {
        println!("No CSV files found to merge.");
        return Ok(());
    };

    let column = table
        .column(DEPARTMENT_COLUMN)
        .with_context(|| format!("merged table has no '{DEPARTMENT_COLUMN}' column"))?;
    for (value, count) in table.value_counts(column) {
        println!("{value:<30} {count}");
    }

    let subset = args.data_dir.join(&args.subset);
    let kept = table.write(&subset, |row| row[column] == args.department)?;
    log::info!("{kept} '{}' rows written to {}", args.department, subset.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &Path) -> Args {
        Args {
            data_dir: dir.to_path_buf(),
            output: "boss_merge.csv".into(),
            department: "SIS".into(),
            subset: "sis_only.csv".into(),
            encoding: Encoding::Latin1,
        }
    }

    #[test]
    fn latin1_bytes_decode_to_matching_code_points() {
        assert_eq!(Encoding::Latin1.decode(b"Caf\xe9"), "Café");
        assert_eq!(Encoding::Utf8.decode("Café".as_bytes()), "Café");
    }

    #[test]
    fn columns_are_aligned_by_name() {
        let mut table = Table::default();
        table.append(
            &["A".to_string(), "B".to_string()],
            vec![vec!["1".into(), "2".into()]],
        );
        table.append(
            &["B".to_string(), "C".to_string()],
            vec![vec!["3".into(), "4".into()]],
        );
        assert_eq!(table.headers, ["A", "B", "C"]);
        assert_eq!(table.rows[0], ["1", "2", ""]);
        assert_eq!(table.rows[1], ["", "3", "4"]);
    }

    #[test]
    fn value_counts_are_most_frequent_first() {
        let mut table = Table::default();
        let rows = ["SOE", "SIS", "SIS", "SOB", "SOB", "SIS"]
            .iter()
            .map(|d| vec![d.to_string()])
            .collect();
        table.append(&[DEPARTMENT_COLUMN.to_string()], rows);
        assert_eq!(
            table.value_counts(0),
            [("SIS".to_string(), 3), ("SOB".to_string(), 2), ("SOE".to_string(), 1)]
        );
    }

    #[test]
    fn merge_skips_outputs_and_writes_subset_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("2022.csv"),
            "School/Department,Course Code,Median Bid\nSIS,IS111,20\nSOE,CS102,50\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("2023.csv"),
            b"Course Code,School/Department,Instructor\nIS112,SIS,M\xdcLLER\n".as_slice(),
        )
        .unwrap();
        fs::write(dir.path().join("boss_merge.csv"), "stale\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();

        let args = args(dir.path());
        let table = merge(&args).unwrap().unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.headers,
            ["School/Department", "Course Code", "Median Bid", "Instructor"]
        );
        assert_eq!(table.rows[2], ["SIS", "IS112", "", "MÜLLER"]);

        let merged = fs::read_to_string(dir.path().join("boss_merge.csv")).unwrap();
        assert!(merged.starts_with("School/Department,Course Code,Median Bid,Instructor\n"));
        assert_eq!(merged.lines().count(), 4);

        let col = table.column(DEPARTMENT_COLUMN).unwrap();
        let subset = dir.path().join(&args.subset);
        assert_eq!(table.write(&subset, |r| r[col] == "SIS").unwrap(), 2);
        let written = fs::read_to_string(&subset).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            [
                "School/Department,Course Code,Median Bid,Instructor",
                "SIS,IS111,20,",
                "SIS,IS112,,MÜLLER",
            ]
        );
        assert!(!written.contains("SOE"));
    }

    #[test]
    fn empty_directory_merges_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(merge(&args(dir.path())).unwrap().is_none());
    }
}
