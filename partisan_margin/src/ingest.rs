/*!
Assembly of county results from candidate-level rows.

Official results are often published as one row per candidate, office and
county. This module turns such rows into the per-county tallies used by the
rest of the crate.
*/

use log::{debug, info};

use std::collections::BTreeMap;

use crate::config::*;
use crate::normalize::normalize_county_label;

/// One line of a candidate-level result sheet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateRow {
    pub county: String,
    pub office: String,
    pub candidate: String,
    pub party: String,
    pub votes: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum PartyLabel {
    Dem,
    Rep,
    Other,
}

fn party_label(party: &str) -> PartyLabel {
    match party.trim().to_uppercase().as_str() {
        "DEM" | "D" | "DEMOCRAT" | "DEMOCRATIC" => PartyLabel::Dem,
        "REP" | "R" | "REPUBLICAN" => PartyLabel::Rep,
        _ => PartyLabel::Other,
    }
}

/// Offices kept when building results, matched as substrings of the lower
/// case office name.
const PARTISAN_OFFICES: [&str; 19] = [
    "president",
    "u.s. senate",
    "us senate",
    "governor",
    "lieutenant governor",
    "lt governor",
    "ltgov",
    "attorney general",
    "state auditor",
    "auditor",
    "state treasurer",
    "treasurer",
    "superintendent of public instruction",
    "superintendent",
    "commissioner of labor",
    "labor commissioner",
    "insurance commissioner",
    "corporation commissioner",
    "corp commissioner",
];

/// Judicial, local and ballot-measure races, dropped even when they mention a
/// partisan office.
const EXCLUDED_OFFICE_TERMS: [&str; 15] = [
    "supreme court",
    "court of",
    "judge",
    "justice",
    "proposition",
    "state question",
    "for county",
    "for mayor",
    "for council",
    "city of",
    "town of",
    "for board member",
    "fire",
    "ward",
    "district no.",
];

/// True for the statewide partisan offices shown on the map.
pub fn is_partisan_office(office: &str) -> bool {
    let office = office.to_lowercase();
    !EXCLUDED_OFFICE_TERMS.iter().any(|t| office.contains(t))
        && PARTISAN_OFFICES.iter().any(|t| office.contains(t))
}

// Lines that are not votes for a candidate.
fn is_bookkeeping(row: &CandidateRow) -> bool {
    let candidate = row.candidate.to_lowercase();
    candidate.contains("over votes")
        || candidate.contains("under votes")
        || row.office.to_lowercase().contains("straight party")
}

/// Margin over the two-party total, rounded to 2 decimals.
fn two_party_margin_pct(dem: u64, rep: u64) -> f64 {
    let two_party = dem as f64 + rep as f64;
    if two_party == 0.0 {
        return 0.0;
    }
    let pct = dem.abs_diff(rep) as f64 / two_party * 100.0;
    (pct * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Default)]
struct CountyAccumulator {
    // Candidates in order of first appearance, with their party and votes.
    candidates: Vec<(String, PartyLabel, u64)>,
}

impl CountyAccumulator {
    fn add(&mut self, candidate: &str, party: PartyLabel, votes: u64) {
        match self.candidates.iter_mut().find(|(name, _, _)| name == candidate) {
            Some((_, _, count)) => *count += votes,
            None => self.candidates.push((candidate.to_string(), party, votes)),
        }
    }

    fn first_of(&self, label: PartyLabel) -> Option<&(String, PartyLabel, u64)> {
        self.candidates.iter().find(|(_, p, _)| *p == label)
    }

    fn tally(&self) -> VoteTally {
        let dem = self.first_of(PartyLabel::Dem);
        let rep = self.first_of(PartyLabel::Rep);
        let dem_votes = dem.map(|c| c.2).unwrap_or(0);
        let rep_votes = rep.map(|c| c.2).unwrap_or(0);
        VoteTally {
            dem_votes: Some(dem_votes),
            rep_votes: Some(rep_votes),
            total_votes: Some(self.candidates.iter().map(|c| c.2).sum()),
            margin: None,
            margin_pct: Some(two_party_margin_pct(dem_votes, rep_votes)),
            dem_name: dem.map(|c| c.0.clone()),
            rep_name: rep.map(|c| c.0.clone()),
        }
    }
}

/// Builds the results of one year from candidate rows.
///
/// Rows without a county, office or candidate, rows with no votes,
/// bookkeeping lines (over/under votes, straight-party tickets) and offices
/// that are not statewide partisan races are ignored.
/// The democratic and republican counts are those of the first candidate of
/// each party; the total includes every candidate. The margin percentage is
/// taken over the two-party total.
pub fn build_year(rows: &[CandidateRow]) -> YearResults {
    let mut acc: BTreeMap<(String, String), CountyAccumulator> = BTreeMap::new();
    let mut skipped: usize = 0;
    for row in rows.iter() {
        let county = normalize_county_label(&row.county);
        let office = row.office.trim();
        let candidate = row.candidate.trim();
        if county.is_empty()
            || office.is_empty()
            || candidate.is_empty()
            || row.votes == 0
            || is_bookkeeping(row)
            || !is_partisan_office(office)
        {
            debug!("build_year: skipping row {:?}", row);
            skipped += 1;
            continue;
        }
        acc.entry((county, office.to_string()))
            .or_default()
            .add(candidate, party_label(&row.party), row.votes);
    }

    let mut res = YearResults::new();
    for ((county, office), county_acc) in acc.iter() {
        res.entry(county.clone())
            .or_default()
            .insert(office.clone(), county_acc.tally());
    }
    info!(
        "build_year: {} rows, {} skipped, {} counties",
        rows.len(),
        skipped,
        res.len()
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(county: &str, office: &str, candidate: &str, party: &str, votes: u64) -> CandidateRow {
        CandidateRow {
            county: county.to_string(),
            office: office.to_string(),
            candidate: candidate.to_string(),
            party: party.to_string(),
            votes,
        }
    }

    #[test]
    fn aggregates_candidates() {
        let rows = vec![
            row("Adair ", "President", "Smith", "DEM", 100),
            row("adair", "President", "Jones", "REP", 300),
            row("ADAIR", "President", "Green", "IND", 25),
            // Second reporting unit of the same county.
            row("Adair", "President", "Smith", "dem", 50),
            row("Adair", "President", "Over Votes", "", 7),
            row("Adair", "Straight Party", "Democratic", "DEM", 70),
            row("Adair", "President", "Nobody", "LIB", 0),
            row("", "President", "Smith", "DEM", 3),
        ];
        let year = build_year(&rows);
        assert_eq!(year.len(), 1);
        let tally = &year["ADAIR"]["President"];
        assert_eq!(tally.dem_votes, Some(150));
        assert_eq!(tally.rep_votes, Some(300));
        assert_eq!(tally.total_votes, Some(475));
        assert_eq!(tally.dem_name.as_deref(), Some("Smith"));
        assert_eq!(tally.rep_name.as_deref(), Some("Jones"));
        assert_eq!(tally.margin, None);
        // 150 over 450 two-party votes.
        assert_eq!(tally.margin_pct, Some(33.33));
    }

    #[test]
    fn uncontested_race() {
        let rows = vec![row("Beaver", "State Treasurer", "Brown", "REPUBLICAN", 900)];
        let year = build_year(&rows);
        let tally = &year["BEAVER"]["State Treasurer"];
        assert_eq!(tally.dem_votes, Some(0));
        assert_eq!(tally.rep_votes, Some(900));
        assert_eq!(tally.dem_name, None);
        assert_eq!(crate::classify(tally).category.name(), "Annihilation Republican");
    }

    #[test]
    fn third_parties_do_not_dilute_the_margin() {
        let rows = vec![
            row("Kay", "Governor", "Smith", "DEM", 45),
            row("Kay", "Governor", "Jones", "REP", 55),
            row("Kay", "Governor", "Green", "LIB", 20),
        ];
        let year = build_year(&rows);
        let tally = &year["KAY"]["Governor"];
        assert_eq!(tally.total_votes, Some(120));
        assert_eq!(tally.margin_pct, Some(10.0));
        let c = crate::classify(tally);
        assert_eq!(c.margin, -10);
        assert_eq!(c.total_votes, 120);
        assert_eq!(c.category.name(), "Safe Republican");
    }

    #[test]
    fn only_partisan_offices_are_kept() {
        let rows = vec![
            row("Kay", "Governor", "Smith", "DEM", 45),
            row("Kay", "District Judge", "Brown", "", 80),
            row("Kay", "Sheriff", "White", "REP", 60),
            row("Kay", "Justice of the Supreme Court", "Black", "", 30),
            row("Kay", "Council Member Ward 2", "Gray", "DEM", 12),
            row("Kay", "Lieutenant Governor", "Reed", "REP", 70),
        ];
        let year = build_year(&rows);
        let offices: Vec<&String> = year["KAY"].keys().collect();
        assert_eq!(offices, vec!["Governor", "Lieutenant Governor"]);
        assert!(is_partisan_office("U.S. Senate"));
        assert!(is_partisan_office("STATE AUDITOR AND INSPECTOR"));
        assert!(!is_partisan_office("Court of Civil Appeals"));
        assert!(!is_partisan_office("State Question 820"));
    }

    #[test]
    fn empty_two_party_total() {
        assert_eq!(two_party_margin_pct(0, 0), 0.0);
        assert_eq!(two_party_margin_pct(2, 1), 33.33);
        assert_eq!(two_party_margin_pct(1, 2), 33.33);
    }
}
