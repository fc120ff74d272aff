use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use calamine::{DataType, Reader, Xlsx};
use chrono::{Duration, NaiveDateTime, Timelike};

use crate::error::{AppError, Result};

/// Decodes the first sheet of an xlsx workbook and writes its rows, in order, as
/// comma-separated lines to `dest`. Cells are taken as text; formulas are not evaluated.
/// Date and time cells are written the way the sheet displays them, not as serial numbers.
///
/// Returns the number of rows written, header included.
pub fn convert<R, W>(source: R, dest: W) -> Result<usize>
where
    R: Read + Seek,
    W: Write,
{
    let mut workbook: Xlsx<R> = Xlsx::new(source)?;

    if workbook.sheet_names().is_empty() {
        return Err(AppError::NoSheets);
    }

    // first by position, whatever its name
    let range = workbook.worksheet_range_at(0).ok_or(AppError::NoSheets)??;

    let mut writer = csv::Writer::from_writer(dest);
    let mut written = 0;
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(|cell| cell_to_string(Some(cell))).collect();
        writer.write_record(&cells)?;
        written += 1;
    }
    writer.flush()?;

    tracing::debug!(rows = written, "Converted first sheet to rows");
    Ok(written)
}

/// Path-based variant of [`convert`].
pub fn convert_path(source: &Path, dest: &Path) -> Result<usize> {
    let input = BufReader::new(File::open(source)?);
    let output = BufWriter::new(File::create(dest)?);
    convert(input, output)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(cell @ DataType::DateTime(serial)) => cell
            .as_datetime()
            .map(|value| datetime_text(*serial, value))
            .unwrap_or_else(|| cell.to_string()),
        Some(cell @ DataType::Duration(_)) => cell
            .as_duration()
            .map(duration_text)
            .unwrap_or_else(|| cell.to_string()),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// A serial below one day is a bare time of day; a whole serial is a bare date.
fn datetime_text(serial: f64, value: NaiveDateTime) -> String {
    // serials carry float noise below the second
    let value = value + Duration::milliseconds(500);
    let value = value.with_nanosecond(0).unwrap_or(value);

    let time = if value.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
    if serial < 1.0 {
        value.format(time).to_string()
    } else if value.num_seconds_from_midnight() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format(&format!("%Y-%m-%d {time}")).to_string()
    }
}

/// Elapsed time as `[h]:mm`, hours not wrapping at a day.
fn duration_text(value: Duration) -> String {
    let secs = (value.num_milliseconds() + 500).div_euclid(1000);
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if seconds == 0 {
        format!("{hours}:{minutes:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::tempdir;

    fn workbook_bytes(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).expect("sheet named");
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    sheet
                        .write_string(r as u32, c as u16, value.to_string())
                        .expect("cell written");
                }
            }
        }
        workbook.save_to_buffer().expect("workbook saved")
    }

    fn convert_to_string(bytes: Vec<u8>) -> Result<String> {
        let mut out = Vec::new();
        convert(Cursor::new(bytes), &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn writes_rows_in_order_with_quoting() {
        let bytes = workbook_bytes(&[(
            "Leave",
            vec![vec!["name", "room"], vec!["Chen, Wei", "A101"], vec!["Lin", "B\"2\""]],
        )]);

        let text = convert_to_string(bytes).expect("converted");
        assert_eq!(text, "name,room\n\"Chen, Wei\",A101\nLin,\"B\"\"2\"\"\"\n");
    }

    #[test]
    fn reads_the_first_sheet_by_position_not_name() {
        let bytes = workbook_bytes(&[
            ("Zeta", vec![vec!["first"]]),
            ("Alpha", vec![vec!["second"]]),
        ]);

        let text = convert_to_string(bytes).expect("converted");
        assert_eq!(text, "first\n");
    }

    #[test]
    fn numbers_are_written_as_text() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "id").expect("cell written");
        sheet.write_number(1, 0, 11012345.0).expect("cell written");
        sheet.write_number(2, 0, 2.5).expect("cell written");
        let bytes = workbook.save_to_buffer().expect("workbook saved");

        let text = convert_to_string(bytes).expect("converted");
        assert_eq!(text, "id\n11012345\n2.5\n");
    }

    #[test]
    fn date_and_time_cells_keep_their_display_text() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let cells = [
            (0.4236111, "hh:mm"),
            (45566.0, "yyyy-mm-dd"),
            (45566.75, "yyyy-mm-dd hh:mm"),
            (1.5, "[h]:mm"),
        ];
        for (c, (serial, format)) in cells.into_iter().enumerate() {
            sheet
                .write_number_with_format(0, c as u16, serial, &Format::new().set_num_format(format))
                .expect("cell written");
        }
        let bytes = workbook.save_to_buffer().expect("workbook saved");

        let text = convert_to_string(bytes).expect("converted");
        assert_eq!(text, "10:10,2024-10-01,2024-10-01 18:00,36:00\n");
    }

    #[test]
    fn garbage_input_is_a_format_error() {
        let err = convert_to_string(b"not a workbook".to_vec()).expect_err("rejected");
        assert!(matches!(err, AppError::Spreadsheet(_)));
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }
        }

        let bytes = workbook_bytes(&[("Leave", vec![vec!["a", "b"]])]);
        let err = convert(Cursor::new(bytes), Broken).expect_err("write failed");
        assert!(matches!(err, AppError::Io(_) | AppError::Intermediate(_)));
    }

    #[test]
    fn path_variant_round_trips_through_files() {
        let dir = tempdir().expect("temporary directory");
        let xlsx = dir.path().join("uploaded.xlsx");
        let csv = dir.path().join("uploaded.csv");
        std::fs::write(&xlsx, workbook_bytes(&[("Leave", vec![vec!["h1", "h2"], vec!["v1", "v2"]])]))
            .expect("workbook written");

        let rows = convert_path(&xlsx, &csv).expect("converted");
        assert_eq!(rows, 2);
        assert_eq!(std::fs::read_to_string(&csv).expect("csv read"), "h1,h2\nv1,v2\n");
    }

    #[test]
    fn missing_source_file_is_an_io_error() {
        let dir = tempdir().expect("temporary directory");
        let err = convert_path(&dir.path().join("absent.xlsx"), &dir.path().join("out.csv"))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
