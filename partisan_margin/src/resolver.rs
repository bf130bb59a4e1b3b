// Lookup of a (year, contest) selection in the nested election data.

use log::{debug, info, warn};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;

use crate::config::*;
use crate::normalize::normalize_name;

/// A selection of a contest in a given year, as presented to users.
///
/// The textual form is `year|contest`, for example `2004|President`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct ContestKey {
    pub year: String,
    pub contest: String,
}

impl ContestKey {
    pub fn new(year: &str, contest: &str) -> ContestKey {
        ContestKey {
            year: year.to_string(),
            contest: contest.to_string(),
        }
    }

    /// Splits on the first `|`. Returns None if there is no separator.
    pub fn parse(value: &str) -> Option<ContestKey> {
        value
            .split_once('|')
            .map(|(year, contest)| ContestKey::new(year, contest))
    }
}

impl Display for ContestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.year, self.contest)
    }
}

/// Several contest names of the same county that normalize to the same key.
///
/// Only the `kept` one is visible through the lookups.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ContestCollision {
    pub year: String,
    pub county: String,
    pub normalized: String,
    pub kept: String,
    pub shadowed: Vec<String>,
}

/// Finds the contest of a county that matches the normalized name.
///
/// When several names match, the smallest one in lexicographic order is used.
pub fn find_contest<'a>(
    contests: &'a CountyContests,
    normalized: &str,
) -> Option<(&'a String, &'a VoteTally)> {
    contests
        .iter()
        .find(|(name, _)| normalize_name(name) == normalized)
}

fn county_collisions(year: &str, county: &str, contests: &CountyContests) -> Vec<ContestCollision> {
    let mut groups: BTreeMap<String, Vec<&String>> = BTreeMap::new();
    for name in contests.keys() {
        groups.entry(normalize_name(name)).or_default().push(name);
    }
    groups
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(normalized, names)| ContestCollision {
            year: year.to_string(),
            county: county.to_string(),
            normalized,
            kept: names[0].clone(),
            shadowed: names[1..].iter().map(|n| (*n).clone()).collect(),
        })
        .collect()
}

/// Gathers the result of a contest for all the counties of a year.
///
/// Counties that did not hold this contest are left out of the result. The
/// county names are kept as they appear in the data.
pub fn resolve_year_contest(
    raw: &RawElectionData,
    year: &str,
    contest: &str,
) -> Result<CountyResults, LookupError> {
    let counties = raw.get(year).ok_or_else(|| LookupError::NoDataForYear {
        year: year.to_string(),
    })?;
    let normalized = normalize_name(contest);
    let mut res = CountyResults::new();
    for (county, contests) in counties.iter() {
        if let Some((name, tally)) = find_contest(contests, &normalized) {
            debug!(
                "resolve_year_contest: {} {}: using contest {:?}",
                year, county, name
            );
            res.insert(county.clone(), tally.clone());
        }
    }
    info!(
        "resolve_year_contest: found {} of {} counties for {} {}",
        res.len(),
        counties.len(),
        contest,
        year
    );
    Ok(res)
}

/// Looks up the result of a contest in a single county.
///
/// The county is first looked up by its exact name, then by its normalized
/// name.
pub fn resolve_county_contest<'a>(
    raw: &'a RawElectionData,
    year: &str,
    county: &str,
    contest: &str,
) -> Result<&'a VoteTally, LookupError> {
    let counties = raw.get(year).ok_or_else(|| LookupError::NoDataForYear {
        year: year.to_string(),
    })?;
    let contests = match counties.get(county) {
        Some(contests) => contests,
        None => {
            let normalized_county = normalize_name(county);
            counties
                .iter()
                .find(|(name, _)| normalize_name(name) == normalized_county)
                .map(|(_, contests)| contests)
                .ok_or_else(|| LookupError::NoDataForCounty {
                    year: year.to_string(),
                    county: county.to_string(),
                })?
        }
    };
    find_contest(contests, &normalize_name(contest))
        .map(|(_, tally)| tally)
        .ok_or_else(|| LookupError::ContestNotFound {
            year: year.to_string(),
            contest: contest.to_string(),
            county: Some(county.to_string()),
        })
}

/// All the distinct (year, contest) pairs found in the data, sorted by their
/// textual form.
pub fn contest_catalog(raw: &RawElectionData) -> Vec<ContestKey> {
    let mut keys: Vec<ContestKey> = raw
        .iter()
        .flat_map(|(year, counties)| {
            counties
                .values()
                .flat_map(move |contests| contests.keys().map(move |c| ContestKey::new(year, c)))
        })
        .collect::<BTreeSet<ContestKey>>()
        .into_iter()
        .collect();
    keys.sort_by_key(|k| k.to_string());
    keys
}

/// A precomputed view of the data, keyed by year and normalized contest name.
///
/// It is built once when the data is loaded and never modified afterwards.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ContestIndex {
    entries: BTreeMap<(String, String), CountyResults>,
    years: BTreeSet<String>,
    collisions: Vec<ContestCollision>,
}

impl ContestIndex {
    pub fn build(raw: &RawElectionData) -> ContestIndex {
        let mut entries: BTreeMap<(String, String), CountyResults> = BTreeMap::new();
        let mut collisions: Vec<ContestCollision> = Vec::new();
        for (year, counties) in raw.iter() {
            for (county, contests) in counties.iter() {
                for (name, tally) in contests.iter() {
                    let key = (year.clone(), normalize_name(name));
                    let by_county = entries.entry(key).or_default();
                    // Names are visited in order: the first one is kept.
                    if !by_county.contains_key(county) {
                        by_county.insert(county.clone(), tally.clone());
                    }
                }
                collisions.extend(county_collisions(year, county, contests));
            }
        }
        for c in collisions.iter() {
            warn!(
                "ContestIndex: {} {}: {:?} shadows {:?}",
                c.year, c.county, c.kept, c.shadowed
            );
        }
        info!(
            "ContestIndex: {} years, {} contests, {} collisions",
            raw.len(),
            entries.len(),
            collisions.len()
        );
        ContestIndex {
            entries,
            years: raw.keys().cloned().collect(),
            collisions,
        }
    }

    /// The per-county results of a contest.
    ///
    /// Unlike `resolve_year_contest`, a contest held nowhere in that year is
    /// reported as not found.
    pub fn lookup(&self, year: &str, contest: &str) -> Result<&CountyResults, LookupError> {
        if !self.years.contains(year) {
            return Err(LookupError::NoDataForYear {
                year: year.to_string(),
            });
        }
        self.entries
            .get(&(year.to_string(), normalize_name(contest)))
            .ok_or_else(|| LookupError::ContestNotFound {
                year: year.to_string(),
                contest: contest.to_string(),
                county: None,
            })
    }

    pub fn years(&self) -> impl Iterator<Item = &String> {
        self.years.iter()
    }

    pub fn collisions(&self) -> &[ContestCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The association of result counties with the names of the map features.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct GeometryMatch {
    /// (result county, feature name), in result order. Unmatched counties
    /// are kept under their own name.
    pub pairs: Vec<(String, String)>,
    pub missing: Vec<String>,
}

/// Matches result county names with the authoritative list of feature names.
///
/// Both sides are compared on their normalized form. A county without a
/// matching feature is reported as missing but still forwarded as is.
pub fn match_geometry<'a, I>(counties: I, geometry_names: &[String]) -> GeometryMatch
where
    I: IntoIterator<Item = &'a String>,
{
    // Later duplicates win, as for any keyed lookup built from a list.
    let by_normalized: HashMap<String, &String> = geometry_names
        .iter()
        .map(|name| (normalize_name(name), name))
        .collect();
    let mut res = GeometryMatch::default();
    for county in counties {
        match by_normalized.get(&normalize_name(county)) {
            Some(feature) => res.pairs.push((county.clone(), (*feature).clone())),
            None => {
                res.pairs.push((county.clone(), county.clone()));
                res.missing.push(county.clone());
            }
        }
    }
    if !res.missing.is_empty() {
        warn!(
            "match_geometry: counties in results but not in the geometry: {:?}",
            res.missing
        );
    }
    res
}
