mod choropleth;
mod config;
mod detail;
pub mod ingest;
pub mod manual;
mod normalize;
mod resolver;

use log::{debug, info, warn};

use std::ops::AddAssign;

pub use crate::choropleth::*;
pub use crate::config::*;
pub use crate::detail::*;
pub use crate::normalize::*;
pub use crate::resolver::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    part / whole * 100.0
}

fn category_for(tier: Tier, winner: Party) -> Category {
    match (tier, winner) {
        (Tier::Tossup, _) => Category::Tossup,
        (tier, Party::Democratic) => Category::Leading(tier, Side::Democratic),
        (tier, Party::Republican) => Category::Leading(tier, Side::Republican),
        (tier, Party::Tie) => {
            // Only reachable with a precomputed margin that disagrees with the
            // precomputed percentage.
            warn!(
                "category_for: tied margin with a {} percentage, reporting a tossup",
                tier.name()
            );
            Category::Tossup
        }
    }
}

/// Classifies the result of one contest in one county.
///
/// The precomputed fields of the tally take precedence over the values
/// derived from the vote counts. The category is read on the magnitude of the
/// margin percentage, with inclusive lower bounds:
///
/// ```
/// use partisan_margin::*;
///
/// let c = classify(&VoteTally::new(60000, 40000).with_total(100000));
/// assert_eq!(c.winner, Party::Democratic);
/// assert_eq!(c.category.name(), "Stronghold Democratic");
/// assert_eq!(c.color, "#3182bd");
/// ```
pub fn classify(tally: &VoteTally) -> Classification {
    let dem = tally.dem();
    let rep = tally.rep();
    // Saturates instead of wrapping for counts beyond the range of i64.
    let diff = (dem as i128 - rep as i128).clamp(i64::MIN as i128, i64::MAX as i128) as i64;

    let total_votes = tally.total_votes.unwrap_or(dem.saturating_add(rep));
    let margin = tally.margin.unwrap_or(diff);
    let margin_pct = match tally.margin_pct {
        Some(pct) => pct.abs(),
        None if total_votes > 0 => percentage(dem.abs_diff(rep) as f64, total_votes as f64),
        None => 0.0,
    };

    let winner = if margin > 0 {
        Party::Democratic
    } else if margin < 0 {
        Party::Republican
    } else {
        Party::Tie
    };

    let category = category_for(Tier::from_margin_pct(margin_pct), winner);
    debug!(
        "classify: dem: {} rep: {} total: {} margin: {} margin_pct: {} -> {}",
        dem, rep, total_votes, margin, margin_pct, category
    );
    Classification {
        winner,
        category,
        color: category.color(),
        total_votes,
        margin,
        margin_pct,
    }
}

/// Sums the results of all the counties of a contest.
///
/// Only the counties that report both party counts contribute, even when the
/// counts are zero. The percentages are computed over the two-party total.
pub fn aggregate_statewide(results: &CountyResults) -> Result<StatewideSummary, LookupError> {
    let mut dem_total = VoteCount::EMPTY;
    let mut rep_total = VoteCount::EMPTY;
    let mut counties_counted: usize = 0;
    let mut counties_excluded: usize = 0;

    for (county, tally) in results.iter() {
        match (tally.dem_votes, tally.rep_votes) {
            (Some(dem), Some(rep)) => {
                dem_total += VoteCount(dem);
                rep_total += VoteCount(rep);
                counties_counted += 1;
            }
            _ => {
                debug!(
                    "aggregate_statewide: county {} lacks a party count, skipping",
                    county
                );
                counties_excluded += 1;
            }
        }
    }

    let total_votes = dem_total.0 + rep_total.0;
    if total_votes == 0 {
        return Err(LookupError::NoStatewideData);
    }

    let dem_pct = percentage(dem_total.0 as f64, total_votes as f64);
    let rep_pct = percentage(rep_total.0 as f64, total_votes as f64);
    let margin_pct = (dem_pct - rep_pct).abs();
    let winner = if dem_pct > rep_pct {
        Party::Democratic
    } else if rep_pct > dem_pct {
        Party::Republican
    } else {
        Party::Tie
    };
    let category = category_for(Tier::from_margin_pct(margin_pct), winner);

    info!(
        "aggregate_statewide: {} counties ({} excluded): {} D, {} R -> {}",
        counties_counted, counties_excluded, dem_total.0, rep_total.0, category
    );
    Ok(StatewideSummary {
        dem_total: dem_total.0,
        rep_total: rep_total.0,
        total_votes,
        dem_pct,
        rep_pct,
        margin_pct,
        winner,
        category,
        counties_counted,
        counties_excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn tally_pct(dem: u64, rep: u64, margin_pct: f64) -> VoteTally {
        VoteTally {
            margin_pct: Some(margin_pct),
            ..VoteTally::new(dem, rep)
        }
    }

    #[test]
    fn stronghold_example() {
        init();
        let c = classify(&VoteTally::new(60000, 40000).with_total(100000));
        assert_eq!(c.margin, 20000);
        assert_eq!(c.margin_pct, 20.0);
        assert_eq!(c.winner, Party::Democratic);
        assert_eq!(c.category.name(), "Stronghold Democratic");
        assert_eq!(c.color, "#3182bd");
    }

    #[test]
    fn even_split_is_tossup() {
        init();
        let c = classify(&VoteTally::new(10, 10));
        assert_eq!(c.total_votes, 20);
        assert_eq!(c.margin, 0);
        assert_eq!(c.margin_pct, 0.0);
        assert_eq!(c.winner, Party::Tie);
        assert_eq!(c.category, Category::Tossup);
        assert_eq!(c.color, "#f7f7f7");
    }

    #[test]
    fn ties_are_always_tossups() {
        for votes in [0, 1, 7, 1000, 123_456_789] {
            let c = classify(&VoteTally::new(votes, votes));
            assert_eq!(c.winner, Party::Tie);
            assert_eq!(c.category, Category::Tossup);
        }
    }

    #[test]
    fn margin_pct_is_a_magnitude() {
        let pairs = [(0, 5), (5, 0), (40, 60), (60, 40), (1, 1000), (999, 1)];
        for (dem, rep) in pairs {
            let c = classify(&VoteTally::new(dem, rep));
            assert!(c.margin_pct >= 0.0, "{} {} -> {}", dem, rep, c.margin_pct);
        }
        let c = classify(&tally_pct(100, 300, -50.0));
        assert_eq!(c.margin_pct, 50.0);
        assert_eq!(c.category.name(), "Annihilation Republican");
    }

    #[test]
    fn republican_side() {
        let c = classify(&VoteTally::new(20, 80));
        assert_eq!(c.margin, -60);
        assert_eq!(c.winner, Party::Republican);
        assert_eq!(c.category.name(), "Annihilation Republican");
        assert_eq!(c.color, "#67000d");
    }

    #[test]
    fn ladder_lower_bounds_are_inclusive() {
        let expected = [
            (40.0, "Annihilation Democratic", "Dominant Democratic"),
            (30.0, "Dominant Democratic", "Stronghold Democratic"),
            (20.0, "Stronghold Democratic", "Safe Democratic"),
            (10.0, "Safe Democratic", "Likely Democratic"),
            (5.5, "Likely Democratic", "Lean Democratic"),
            (1.0, "Lean Democratic", "Tilt Democratic"),
            (0.5, "Tilt Democratic", "Tossup"),
        ];
        for (bound, at, below) in expected {
            let c = classify(&tally_pct(2, 1, bound));
            assert_eq!(c.category.name(), at);
            let c = classify(&tally_pct(2, 1, bound - 1e-9));
            assert_eq!(c.category.name(), below);
        }
    }

    #[test]
    fn precomputed_fields_take_precedence() {
        let tally = VoteTally {
            total_votes: Some(1000),
            margin: Some(-12),
            ..VoteTally::new(500, 400)
        };
        let c = classify(&tally);
        assert_eq!(c.total_votes, 1000);
        assert_eq!(c.margin, -12);
        assert_eq!(c.winner, Party::Republican);
        // Computed from the counts and the supplied total: 100 / 1000.
        assert_eq!(c.margin_pct, 10.0);
        assert_eq!(c.category.name(), "Safe Republican");
    }

    #[test]
    fn tie_with_inconsistent_percentage_is_tossup() {
        init();
        let tally = VoteTally {
            margin: Some(0),
            margin_pct: Some(12.0),
            ..VoteTally::new(55, 45)
        };
        let c = classify(&tally);
        assert_eq!(c.winner, Party::Tie);
        assert_eq!(c.category, Category::Tossup);
        assert_eq!(c.color, "#f7f7f7");
    }

    #[test]
    fn missing_counts_are_zero() {
        let c = classify(&VoteTally::default());
        assert_eq!(c.total_votes, 0);
        assert_eq!(c.margin_pct, 0.0);
        assert_eq!(c.category, Category::Tossup);

        let only_rep = VoteTally {
            rep_votes: Some(10),
            ..VoteTally::default()
        };
        let c = classify(&only_rep);
        assert_eq!(c.winner, Party::Republican);
        assert_eq!(c.margin_pct, 100.0);
    }

    #[test]
    fn classify_is_idempotent() {
        let tally = VoteTally::new(5321, 4987).with_total(10500);
        assert_eq!(classify(&tally), classify(&tally));
    }

    #[test]
    fn every_category_has_its_own_color() {
        for (category, (name, color)) in Category::ALL.iter().zip(CATEGORY_COLORS.iter()) {
            assert_eq!(category.name(), *name);
            assert_eq!(category.color(), *color);
        }
        let codes: Vec<String> = Category::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes[0], "R_ANNIHILATION");
        assert_eq!(codes[7], "TOSSUP");
        assert_eq!(codes[14], "D_ANNIHILATION");
        assert_eq!(Category::ALL[3].range_label(), "R+10-20%");
        assert_eq!(Category::ALL[7].range_label(), "±0.5%");
    }

    #[test]
    fn statewide_counts_zero_counties() {
        init();
        let mut results = CountyResults::new();
        results.insert("A".to_string(), VoteTally::new(100, 50));
        results.insert("B".to_string(), VoteTally::new(0, 0).with_total(0));
        let s = aggregate_statewide(&results).unwrap();
        assert_eq!(s.dem_total, 100);
        assert_eq!(s.rep_total, 50);
        assert_eq!(s.total_votes, 150);
        assert_eq!(s.counties_counted, 2);
        assert_eq!(s.counties_excluded, 0);
        assert_eq!(s.winner, Party::Democratic);
        assert_eq!(s.category.name(), "Dominant Democratic");
        assert_eq!(s.margin_text(), "Democratic +33.3%");
    }

    #[test]
    fn statewide_skips_partial_counties() {
        let mut results = CountyResults::new();
        results.insert("A".to_string(), VoteTally::new(42, 58));
        results.insert(
            "B".to_string(),
            VoteTally {
                dem_votes: Some(1000),
                ..VoteTally::default()
            },
        );
        let s = aggregate_statewide(&results).unwrap();
        assert_eq!(s.dem_total, 42);
        assert_eq!(s.rep_total, 58);
        assert_eq!(s.counties_excluded, 1);
        assert_eq!(s.winner, Party::Republican);
        assert!((s.winner_pct() - 58.0).abs() < 1e-9);
        assert!((s.loser_pct() - 42.0).abs() < 1e-9);
        assert_eq!(s.category.name(), "Safe Republican");
    }

    #[test]
    fn statewide_without_votes() {
        let mut results = CountyResults::new();
        results.insert("A".to_string(), VoteTally::new(0, 0));
        assert_eq!(
            aggregate_statewide(&results),
            Err(LookupError::NoStatewideData)
        );
        assert_eq!(
            aggregate_statewide(&CountyResults::new()),
            Err(LookupError::NoStatewideData)
        );
    }

    #[test]
    fn statewide_exact_tie() {
        let mut results = CountyResults::new();
        results.insert("A".to_string(), VoteTally::new(30, 20));
        results.insert("B".to_string(), VoteTally::new(20, 30));
        let s = aggregate_statewide(&results).unwrap();
        assert_eq!(s.winner, Party::Tie);
        assert_eq!(s.category, Category::Tossup);
        assert_eq!(s.margin_text(), "Tie +0.0%");
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let c = classify(&VoteTally::new(u64::MAX, 0));
        assert_eq!(c.winner, Party::Democratic);
        assert_eq!(c.margin, i64::MAX);
        assert_eq!(c.total_votes, u64::MAX);
        assert_eq!(c.category.name(), "Annihilation Democratic");

        let c = classify(&VoteTally::new(u64::MAX, u64::MAX - 1));
        assert_eq!(c.margin, 1);
        assert_eq!(c.total_votes, u64::MAX);
        assert_eq!(c.category, Category::Tossup);

        let c = classify(&VoteTally::new(0, u64::MAX));
        assert_eq!(c.winner, Party::Republican);
        assert_eq!(c.margin, i64::MIN);
    }
}
