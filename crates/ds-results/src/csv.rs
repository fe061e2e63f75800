//! CSV rendering of a [`ResultSet`].
//!
//! One row per concentration, `concentration` first and then every record
//! column in declared order. Absent values are empty cells.

use crate::types::{ResultSet, concentration_key};
use crate::{ResultsError, ResultsResult};
use ds_extract::{DetonationRecord, RecordField};

pub fn header() -> String {
    let mut columns = vec!["concentration".to_string()];
    columns.extend(RecordField::all().map(|f| f.name()));
    columns.join(",")
}

pub fn to_csv(results: &ResultSet) -> String {
    let mut csv = header();
    csv.push('\n');
    for (concentration, record) in results.iter() {
        let mut cells = vec![concentration_key(concentration)];
        cells.extend(
            RecordField::all().map(|f| f.get(record).map(|v| v.to_string()).unwrap_or_default()),
        );
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }
    csv
}

pub fn from_csv(content: &str) -> ResultsResult<ResultSet> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Ok(ResultSet::new());
    };
    let columns: Vec<&str> = header_line.split(',').map(str::trim).collect();
    if columns.first() != Some(&"concentration") {
        return Err(ResultsError::Csv {
            line: 1,
            message: "first column must be 'concentration'".to_string(),
        });
    }
    let fields: Vec<Option<RecordField>> = columns[1..]
        .iter()
        .map(|name| RecordField::from_name(name))
        .collect();

    let mut results = ResultSet::new();
    for (index, line) in lines {
        let line_no = index + 1;
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() != columns.len() {
            return Err(ResultsError::Csv {
                line: line_no,
                message: format!("expected {} cells, found {}", columns.len(), cells.len()),
            });
        }

        let concentration = parse_cell(cells[0], line_no)?.ok_or_else(|| ResultsError::Csv {
            line: line_no,
            message: "empty concentration".to_string(),
        })?;

        let mut record = DetonationRecord::default();
        for (field, cell) in fields.iter().zip(&cells[1..]) {
            if let Some(field) = field {
                field.set(&mut record, parse_cell(cell, line_no)?);
            }
        }
        results.insert(concentration, record)?;
    }
    Ok(results)
}

fn parse_cell(cell: &str, line: usize) -> ResultsResult<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| ResultsError::Csv {
            line,
            message: format!("not a number: '{cell}'"),
        })
}
