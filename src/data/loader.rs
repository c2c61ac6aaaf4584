use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::model::Table;
use super::schema::ColumnSchema;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`        – comma-separated fields, optional header row of schema names
/// * anything else – whitespace-separated fields, as written by the simulation
pub fn load_file(path: &Path, schema: &ColumnSchema) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, schema)?,
        _ => load(path, schema)?,
    };

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.width(),
        path.display()
    );
    if table.is_empty() {
        log::warn!("{} contains no data rows", path.display());
    }
    Ok(table)
}

/// Load a whitespace-delimited table, assigning the i-th field of every row
/// to the i-th schema column.
pub fn load(path: &Path, schema: &ColumnSchema) -> Result<Table> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(BufReader::new(file), schema, path)
}

/// Same as [`load`], over any buffered reader.
pub fn read_table<R: BufRead>(reader: R, schema: &ColumnSchema) -> Result<Table> {
    parse_rows(reader, schema, Path::new("<input>"))
}

// ---------------------------------------------------------------------------
// Whitespace loader
// ---------------------------------------------------------------------------

/// Layout, one row per line:
///   `0\t1\t1\t0\t0\t0\t0\t0`
///   `1.5e1   3.0e2   ...`
/// Blank lines are skipped and `#` starts a comment, like numpy's `loadtxt`.
/// Lines are read as bytes so an undecodable field reports its line number.
fn parse_rows<R: BufRead>(reader: R, schema: &ColumnSchema, origin: &Path) -> Result<Table> {
    let mut table = Table::with_schema(schema.clone());
    let mut row: Vec<f64> = Vec::with_capacity(schema.len());

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| Error::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let line = line.strip_suffix(b"\r").unwrap_or(line.as_slice());

        let data = strip_comment(line);
        let tokens: Vec<&[u8]> = data
            .split(u8::is_ascii_whitespace)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            if data.len() != line.len() {
                log::debug!("line {line_no}: comment skipped");
            }
            continue;
        }

        check_width(tokens.len(), schema, line_no)?;

        row.clear();
        for (&bytes, column) in tokens.iter().zip(schema.names()) {
            let token = std::str::from_utf8(bytes).map_err(|_| Error::Parse {
                line: line_no,
                column: column.to_string(),
                token: String::from_utf8_lossy(bytes).into_owned(),
            })?;
            row.push(parse_field(token, column, line_no)?);
        }
        table.push_row(&row);
    }

    Ok(table)
}

fn strip_comment(line: &[u8]) -> &[u8] {
    match line.iter().position(|&b| b == b'#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn check_width(found: usize, schema: &ColumnSchema, line: usize) -> Result<()> {
    if found != schema.len() {
        return Err(Error::MalformedRow {
            line,
            expected: schema.len(),
            found,
        });
    }
    Ok(())
}

fn parse_field(token: &str, column: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| Error::Parse {
        line,
        column: column.to_string(),
        token: token.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: one row per record, fields in schema order.
/// A first record equal to the schema names is taken as a header and skipped.
fn load_csv(path: &Path, schema: &ColumnSchema) -> Result<Table> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file, schema)
}

fn read_csv<R: std::io::Read>(input: R, schema: &ColumnSchema) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input);

    let mut table = Table::with_schema(schema.clone());
    let mut row: Vec<f64> = Vec::with_capacity(schema.len());

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line_no = record
            .position()
            .map_or(idx + 1, |pos| pos.line() as usize);

        if idx == 0 && is_header(&record, schema) {
            log::debug!("line {line_no}: CSV header skipped");
            continue;
        }

        check_width(record.len(), schema, line_no)?;

        row.clear();
        for (token, column) in record.iter().zip(schema.names()) {
            row.push(parse_field(token, column, line_no)?);
        }
        table.push_row(&row);
    }

    Ok(table)
}

fn is_header(record: &csv::StringRecord, schema: &ColumnSchema) -> bool {
    record
        .iter()
        .eq(schema.names().iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::data::schema::Layout;

    fn species(text: &str) -> Result<Table> {
        read_table(text.as_bytes(), &Layout::Species.schema())
    }

    #[test]
    fn single_row_fills_every_column() {
        let table = species("1.0 100 50 10 5 3 2 1\n").unwrap();

        assert_eq!(table.width(), 8);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("depth"), Some(&[1.0][..]));
        assert_eq!(table.column("particles"), Some(&[100.0][..]));
        assert_eq!(table.column("nuclei"), Some(&[50.0][..]));
        assert_eq!(table.column("pions"), Some(&[10.0][..]));
        assert_eq!(table.column("electrons"), Some(&[5.0][..]));
        assert_eq!(table.column("photons"), Some(&[3.0][..]));
        assert_eq!(table.column("muons"), Some(&[2.0][..]));
        assert_eq!(table.column("neutrinos"), Some(&[1.0][..]));
    }

    #[test]
    fn synthetic_rows_read_back() {
        let schema = Layout::EnergyDeposit.schema();
        let rows: Vec<Vec<f64>> = (0..25)
            .map(|r| {
                (0..schema.len())
                    .map(|c| (r as f64 + 1.0) * 1.5e3 + c as f64 / 7.0)
                    .collect()
            })
            .collect();

        let text: String = rows
            .iter()
            .map(|row| {
                let fields: Vec<String> = row.iter().map(|v| format!("{v:e}")).collect();
                fields.join("\t") + "\n"
            })
            .collect();

        let table = read_table(text.as_bytes(), &schema).unwrap();
        assert_eq!(table.width(), schema.len());
        for (c, (_, values)) in table.columns().enumerate() {
            assert_eq!(values.len(), rows.len());
            for (r, &value) in values.iter().enumerate() {
                assert_approx_eq!(f64, value, rows[r][c], ulps = 2);
            }
        }
    }

    #[test]
    fn short_row_is_malformed() {
        let err = species("1 2 3 4 5 6 7 8\n1 2 3 4 5 6 7\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow {
                line: 2,
                expected: 8,
                found: 7
            }
        ));
    }

    #[test]
    fn long_row_is_malformed() {
        let err = species("1 2 3 4 5 6 7 8 9\n").unwrap_err();
        assert!(matches!(err, Error::MalformedRow { found: 9, .. }));
    }

    #[test]
    fn non_numeric_token_is_parse_error() {
        let err = species("1 2 3 abc 5 6 7 8\n").unwrap_err();
        match err {
            Error::Parse {
                line,
                column,
                token,
            } => {
                assert_eq!(line, 1);
                assert_eq!(column, "pions");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mixed_whitespace_and_scientific_notation() {
        let table = species("0\t1e0   2.5E+1 \t 3 4 5 6 7.5e-3\n").unwrap();
        assert_eq!(table.column("particles"), Some(&[1.0][..]));
        assert_eq!(table.column("nuclei"), Some(&[25.0][..]));
        assert_approx_eq!(f64, table.column("neutrinos").unwrap()[0], 7.5e-3);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let text = "# depth particles ...\n\n1 2 3 4 5 6 7 8  # first\n   \n2 3 4 5 6 7 8 9\n";
        let table = species(text).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("depth"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn line_numbers_count_skipped_lines() {
        let err = species("# header\n\n1 2 3 4 5 6 7\n").unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn empty_input_gives_empty_columns() {
        let table = species("").unwrap();
        assert_eq!(table.width(), 8);
        assert!(table.is_empty());
        assert!(table.columns().all(|(_, values)| values.is_empty()));
    }

    #[test]
    fn csv_with_header() {
        let schema = Layout::Collapsed.schema();
        let text = "depth,particles,pions,electrons,photons,muons,neutrinos,energy\n\
                    0, 1, 0, 0, 0, 0, 0, 1e11\n\
                    10, 4, 1, 1, 1, 0, 1, 9.5e10\n";
        let table = read_csv(text.as_bytes(), &schema).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("energy"), Some(&[1e11, 9.5e10][..]));
    }

    #[test]
    fn csv_reports_bad_rows() {
        let schema = Layout::Collapsed.schema();

        let err = read_csv("0,1,2,3,4,5,6\n".as_bytes(), &schema).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 1, found: 7, .. }));

        let err = read_csv("0,1,2,3,4,5,6,7\n0,1,x,3,4,5,6,7\n".as_bytes(), &schema).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("does/not/exist.txt"), &Layout::Species.schema()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));

        let err = load_file(Path::new("does/not/exist.csv"), &Layout::Species.schema()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn undecodable_field_reports_its_line() {
        let err = read_table(
            &b"0 1 2 3 4 5 6 7\n1 2 3 \xff 5 6 7 8\n"[..],
            &Layout::Species.schema(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, ref column, .. } if column == "pions"));
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let table = species("1 2 3 4 5 6 7 8\r\n2 3 4 5 6 7 8 9\r\n").unwrap();
        assert_eq!(table.column("neutrinos"), Some(&[8.0, 9.0][..]));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let schema = Layout::Collapsed.schema();
        let csv = NamedTempFile::new("table.csv").unwrap();
        csv.write_str(
            "depth,particles,pions,electrons,photons,muons,neutrinos,energy\n\
             0,6,1,2,1,1,1,1e15\n\
             10,12,2,4,2,2,2,8e14\n",
        )
        .unwrap();
        let dat = NamedTempFile::new("table.dat").unwrap();
        dat.write_str("0\t6\t1\t2\t1\t1\t1\t1e15\n10 12 2 4 2 2 2 8e14\n")
            .unwrap();

        let from_csv = load_file(csv.path(), &schema).unwrap();
        let from_dat = load_file(dat.path(), &schema).unwrap();
        assert_eq!(from_csv.row_count(), 2);
        assert_eq!(from_csv, from_dat);

        // A header row is only understood by the CSV loader.
        let dat_with_header = NamedTempFile::new("header.dat").unwrap();
        dat_with_header
            .write_str("depth particles pions electrons photons muons neutrinos energy\n")
            .unwrap();
        assert!(matches!(
            load_file(dat_with_header.path(), &schema).unwrap_err(),
            Error::Parse { line: 1, .. }
        ));
    }
}
