// Reading of the nested JSON results (year -> county -> contest -> tally).

use crate::mapping::*;

use serde::Deserialize;
use std::fs;

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct TallyJs {
    dem_votes: Option<u64>,
    rep_votes: Option<u64>,
    total_votes: Option<u64>,
    margin: Option<i64>,
    margin_pct: Option<f64>,
    dem_name: Option<String>,
    rep_name: Option<String>,
    // Older files name the candidates this way. The `*_name` fields win when
    // both are present.
    dem_candidate: Option<String>,
    rep_candidate: Option<String>,
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl From<TallyJs> for VoteTally {
    fn from(t: TallyJs) -> VoteTally {
        VoteTally {
            dem_votes: t.dem_votes,
            rep_votes: t.rep_votes,
            total_votes: t.total_votes,
            margin: t.margin,
            margin_pct: t.margin_pct,
            dem_name: non_empty(t.dem_name).or_else(|| non_empty(t.dem_candidate)),
            rep_name: non_empty(t.rep_name).or_else(|| non_empty(t.rep_candidate)),
        }
    }
}

fn as_object<'a>(js: &'a JSValue, what: &str, path: &str) -> MapResult<&'a JSMap<String, JSValue>> {
    js.as_object().with_context(|| JsonLayoutSnafu {
        path,
        message: format!("expected an object for {}", what),
    })
}

/// Reads the results from a JSON file.
///
/// The years may be wrapped in a top-level `results` object. Entries that
/// cannot be read as a tally are skipped with a warning.
pub fn read_election_json(path: &str) -> BMapResult<RawElectionData> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    Ok(parse_election_json(&js, path)?)
}

fn parse_election_json(js: &JSValue, path: &str) -> MapResult<RawElectionData> {
    let top = as_object(js, "the results", path)?;
    let years = match top.get("results") {
        Some(results) => as_object(results, "results", path)?,
        None => top,
    };

    let mut raw = RawElectionData::new();
    let mut skipped: usize = 0;
    for (year, counties_js) in years.iter() {
        let counties = as_object(counties_js, &format!("year {}", year), path)?;
        let year_results = raw.entry(year.clone()).or_default();
        for (county, contests_js) in counties.iter() {
            let contests = match contests_js.as_object() {
                Some(x) => x,
                None => {
                    warn!("read_election_json: {} {}: not an object, skipping", year, county);
                    skipped += 1;
                    continue;
                }
            };
            let county_results = year_results.entry(county.clone()).or_default();
            for (contest, tally_js) in contests.iter() {
                match serde_json::from_value::<TallyJs>(tally_js.clone()) {
                    Ok(t) => {
                        county_results.insert(contest.clone(), t.into());
                    }
                    Err(e) => {
                        warn!(
                            "read_election_json: {} {} {}: skipping entry: {}",
                            year, county, contest, e
                        );
                        skipped += 1;
                    }
                }
            }
        }
    }
    info!(
        "read_election_json: {} years read from {}, {} entries skipped",
        raw.len(),
        path,
        skipped
    );
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_results() {
        let raw = read_election_json(&test_file("tn_results.json")).unwrap();
        let keys: Vec<&String> = raw.keys().collect();
        assert_eq!(keys, vec!["2016", "2020"]);
        let t = &raw["2020"]["Davidson"]["U.S. Senate"];
        assert_eq!(t.dem_votes, Some(60000));
        assert_eq!(t.total_votes, Some(100000));
        assert_eq!(t.dem_name.as_deref(), Some("Jane Doe"));
        assert_eq!(t.rep_name, None);
    }

    #[test]
    fn bare_years_and_bad_entries() {
        let js = json!({
            "2018": {
                "Adair": {
                    "Governor": {"dem_votes": 10, "rep_votes": 20, "dem_candidate": "A", "rep_candidate": ""},
                    "Sheriff": {"dem_votes": "many"},
                    "Judge": {}
                },
                "Beaver": 12
            }
        });
        let raw = parse_election_json(&js, "inline").unwrap();
        let adair = &raw["2018"]["Adair"];
        assert_eq!(adair.len(), 2);
        assert_eq!(adair["Governor"].dem_name.as_deref(), Some("A"));
        assert_eq!(adair["Governor"].rep_name, None);
        assert_eq!(adair["Judge"], VoteTally::default());
        assert!(!raw["2018"].contains_key("Beaver"));
    }

    #[test]
    fn both_name_spellings() {
        let js = json!({
            "2018": {
                "Adair": {
                    "Governor": {"dem_votes": 10, "rep_votes": 20, "dem_name": "A", "dem_candidate": "B",
                                 "rep_name": "", "rep_candidate": "C"}
                }
            }
        });
        let raw = parse_election_json(&js, "inline").unwrap();
        let adair = &raw["2018"]["Adair"];
        assert_eq!(adair.len(), 1);
        assert_eq!(adair["Governor"].dem_name.as_deref(), Some("A"));
        assert_eq!(adair["Governor"].rep_name.as_deref(), Some("C"));
        assert_eq!(adair["Governor"].rep_votes, Some(20));
    }

    #[test]
    fn not_an_object() {
        assert!(matches!(
            parse_election_json(&json!([1, 2]), "inline"),
            Err(MapError::JsonLayout { .. })
        ));
        assert!(matches!(
            parse_election_json(&json!({"results": {"2020": []}}), "inline"),
            Err(MapError::JsonLayout { .. })
        ));
    }
}
