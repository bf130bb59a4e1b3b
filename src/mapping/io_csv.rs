// Primitives for reading CSV files.

use crate::mapping::io_common::row_layout;
use crate::mapping::*;

/// Reads the candidate rows of a CSV file. The first line is the header.
pub fn read_csv_rows(path: &str) -> BMapResult<Vec<ingest::CandidateRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { path, lineno: 1_usize })?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };
    let layout = row_layout(&header, path)?;
    debug!("read_csv_rows: header: {:?} layout: {:?}", header, layout);

    let mut res: Vec<ingest::CandidateRow> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        res.push(layout.candidate_row(&cells));
    }
    info!("read_csv_rows: {} rows read from {}", res.len(), path);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_rows() {
        let rows = read_csv_rows(&test_file("ok_2022.csv")).unwrap();
        assert_eq!(rows.len(), 9);
        assert_eq!(
            rows[0],
            ingest::CandidateRow {
                county: "Adair".to_string(),
                office: "Governor".to_string(),
                candidate: "Joy Hofmeister".to_string(),
                party: "DEM".to_string(),
                votes: 1200,
            }
        );
        // Quoted count with a thousands separator.
        assert_eq!(rows[1].votes, 5700);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_rows("/nonexistent/results.csv").map_err(|e| *e),
            Err(MapError::CsvOpen { .. })
        ));
    }
}
