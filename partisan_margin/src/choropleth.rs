use log::{info, warn};

use std::collections::HashSet;

use crate::classify;
use crate::config::*;
use crate::resolver::match_geometry;

/// The fill of one map feature.
#[derive(PartialEq, Debug, Clone)]
pub struct FillEntry {
    /// The name of the feature to paint: the geometry name when the county
    /// was matched, the result name otherwise.
    pub feature: String,
    pub county: String,
    pub classification: Classification,
}

/// Everything needed to paint a county map for one contest.
#[derive(PartialEq, Debug, Clone)]
pub struct Choropleth {
    pub entries: Vec<FillEntry>,
    pub default_color: &'static str,
    /// Number of entries that were matched with a feature.
    pub colored: usize,
    pub geometry_count: usize,
    pub missing: Vec<String>,
}

impl Choropleth {
    /// (feature name, color) pairs, in the order of the entries.
    pub fn colors(&self) -> Vec<(&str, &'static str)> {
        self.entries
            .iter()
            .map(|e| (e.feature.as_str(), e.classification.color))
            .collect()
    }
}

/// Classifies all the counties of a contest and attaches them to the map
/// features.
///
/// A feature receives at most one color: if two result counties resolve to
/// the same feature, the first one is used.
pub fn build_choropleth(results: &CountyResults, geometry_names: &[String]) -> Choropleth {
    let matches = match_geometry(results.keys(), geometry_names);
    let missing: HashSet<&String> = matches.missing.iter().collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries: Vec<FillEntry> = Vec::new();
    let mut colored: usize = 0;
    for (county, feature) in matches.pairs.iter() {
        if !seen.insert(feature.clone()) {
            warn!(
                "build_choropleth: feature {} already painted, ignoring county {}",
                feature, county
            );
            continue;
        }
        // Every pair comes from a key of the results.
        let tally = match results.get(county) {
            Some(t) => t,
            None => continue,
        };
        if !missing.contains(county) {
            colored += 1;
        }
        entries.push(FillEntry {
            feature: feature.clone(),
            county: county.clone(),
            classification: classify(tally),
        });
    }

    info!(
        "build_choropleth: coloring {} of {} counties",
        colored,
        geometry_names.len()
    );
    Choropleth {
        entries,
        default_color: NO_DATA_COLOR,
        colored,
        geometry_count: geometry_names.len(),
        missing: matches.missing,
    }
}
