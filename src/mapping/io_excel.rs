// Reading of candidate rows from Excel workbooks.

use crate::mapping::io_common::row_layout;
use crate::mapping::*;

use calamine::{open_workbook, DataType, Reader, Xlsx};

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Counts are often stored as floats.
        DataType::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        DataType::Empty => "".to_string(),
        x => x.to_string(),
    }
}

/// Reads the candidate rows of a worksheet, by default the first one. The
/// first row is the header.
pub fn read_excel_rows(
    path: &str,
    worksheet_name: Option<&str>,
) -> BMapResult<Vec<ingest::CandidateRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    }
    .context(OpeningExcelSnafu { path })?;

    let mut rows = wrange.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };
    let layout = row_layout(&header, path)?;
    debug!("read_excel_rows: header: {:?} layout: {:?}", header, layout);

    let mut res: Vec<ingest::CandidateRow> = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        res.push(layout.candidate_row(&cells));
    }
    info!("read_excel_rows: {} rows read from {}", res.len(), path);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(1200.0)), "1200");
        assert_eq!(cell_to_string(&DataType::Int(7)), "7");
        assert_eq!(cell_to_string(&DataType::Empty), "");
        assert_eq!(
            cell_to_string(&DataType::String("Le Flore".to_string())),
            "Le Flore"
        );
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_excel_rows("/nonexistent/results.xlsx", None).map_err(|e| *e),
            Err(MapError::OpeningExcel { .. })
        ));
    }
}
