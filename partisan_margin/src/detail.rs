use crate::classify;
use crate::config::*;
use crate::resolver::resolve_county_contest;

/// The details of one county for one contest, as shown when a county is
/// selected on the map.
#[derive(PartialEq, Debug, Clone)]
pub struct CountyDetail {
    pub county: String,
    pub year: String,
    pub contest: String,
    pub dem_name: String,
    pub rep_name: String,
    pub dem_votes: u64,
    pub rep_votes: u64,
    pub dem_pct: f64,
    pub rep_pct: f64,
    pub classification: Classification,
}

impl CountyDetail {
    pub fn from_tally(county: &str, year: &str, contest: &str, tally: &VoteTally) -> CountyDetail {
        let classification = classify(tally);
        let total = classification.total_votes;
        let share = |votes: u64| {
            if total > 0 {
                votes as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        };
        CountyDetail {
            county: county.to_string(),
            year: year.to_string(),
            contest: contest.to_string(),
            dem_name: tally
                .dem_name
                .clone()
                .unwrap_or_else(|| Party::Democratic.name().to_string()),
            rep_name: tally
                .rep_name
                .clone()
                .unwrap_or_else(|| Party::Republican.name().to_string()),
            dem_votes: tally.dem(),
            rep_votes: tally.rep(),
            dem_pct: share(tally.dem()),
            rep_pct: share(tally.rep()),
            classification,
        }
    }

    pub fn total_votes(&self) -> u64 {
        self.classification.total_votes
    }

    /// Absolute difference of votes between the two parties.
    pub fn vote_margin(&self) -> u64 {
        self.classification.margin.unsigned_abs()
    }

    /// For example `D+12.34%`, or `0.00%` for a tie.
    pub fn margin_text(&self) -> String {
        let prefix = match self.classification.winner {
            Party::Democratic => "D+",
            Party::Republican => "R+",
            Party::Tie => "",
        };
        format!("{}{:.2}%", prefix, self.classification.margin_pct)
    }

    /// The winning candidate with the party initial, or `Tie`.
    pub fn winner_label(&self) -> String {
        match self.classification.winner {
            Party::Democratic => format!("{} (D)", self.dem_name),
            Party::Republican => format!("{} (R)", self.rep_name),
            Party::Tie => Party::Tie.name().to_string(),
        }
    }
}

/// Builds the details of a county for the selected contest.
pub fn county_detail(
    raw: &RawElectionData,
    year: &str,
    county: &str,
    contest: &str,
) -> Result<CountyDetail, LookupError> {
    let tally = resolve_county_contest(raw, year, county, contest)?;
    Ok(CountyDetail::from_tally(county, year, contest, tally))
}
