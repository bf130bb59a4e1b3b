// Helpers shared by the readers of candidate-level sheets.

use crate::mapping::*;

/// Positions of the columns of a candidate-level sheet.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RowLayout {
    pub county: usize,
    pub office: usize,
    pub candidate: usize,
    pub party: Option<usize>,
    pub votes: usize,
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header.iter().position(|h| {
        let h = h.trim().to_lowercase();
        names.iter().any(|n| *n == h)
    })
}

fn required_column(header: &[String], names: &[&str], path: &str) -> MapResult<usize> {
    find_column(header, names).context(MissingColumnSnafu {
        column: names[0],
        path,
    })
}

/// Finds the columns by name in the header row, regardless of case and order.
/// Only the party column is optional.
pub fn row_layout(header: &[String], path: &str) -> MapResult<RowLayout> {
    Ok(RowLayout {
        county: required_column(header, &["county"], path)?,
        office: required_column(header, &["office", "contest"], path)?,
        candidate: required_column(header, &["candidate"], path)?,
        party: find_column(header, &["party"]),
        votes: required_column(header, &["votes", "total_votes"], path)?,
    })
}

/// Vote counts as they appear in published sheets: `1,234`, `"56"` or blank.
/// Anything that is not a count is read as zero.
pub fn parse_votes(s: &str) -> u64 {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && *c != '"' && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<u64>()
        .ok()
        .or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        })
        .unwrap_or(0)
}

impl RowLayout {
    /// Builds a row from the cells of one line. Missing cells are empty.
    pub fn candidate_row(&self, cells: &[String]) -> ingest::CandidateRow {
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        ingest::CandidateRow {
            county: cell(self.county),
            office: cell(self.office),
            candidate: cell(self.candidate),
            party: self.party.map(cell).unwrap_or_default(),
            votes: parse_votes(&cell(self.votes)),
        }
    }
}
