// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The result of one contest in one county, as found in the source data.
///
/// All the fields except the vote counts are optional and are derived from the
/// counts when missing. A missing count is treated as zero when classifying,
/// but it excludes the county from the statewide totals.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct VoteTally {
    pub dem_votes: Option<u64>,
    pub rep_votes: Option<u64>,
    pub total_votes: Option<u64>,
    /// Democratic minus republican votes.
    pub margin: Option<i64>,
    /// Percentage in [-100, 100]. Only the magnitude is used for the category.
    pub margin_pct: Option<f64>,
    pub dem_name: Option<String>,
    pub rep_name: Option<String>,
}

impl VoteTally {
    /// A tally with only the two party counts filled in.
    pub fn new(dem_votes: u64, rep_votes: u64) -> VoteTally {
        VoteTally {
            dem_votes: Some(dem_votes),
            rep_votes: Some(rep_votes),
            ..VoteTally::default()
        }
    }

    pub fn with_total(self, total_votes: u64) -> VoteTally {
        VoteTally {
            total_votes: Some(total_votes),
            ..self
        }
    }

    pub fn dem(&self) -> u64 {
        self.dem_votes.unwrap_or(0)
    }

    pub fn rep(&self) -> u64 {
        self.rep_votes.unwrap_or(0)
    }
}

/// County name -> tally, for a single contest.
pub type CountyResults = BTreeMap<String, VoteTally>;

/// Literal contest name -> tally, for a single county.
pub type CountyContests = BTreeMap<String, VoteTally>;

/// County name -> contests, for a single year.
pub type YearResults = BTreeMap<String, CountyContests>;

/// Year -> county -> literal contest name -> tally.
///
/// The names are kept exactly as they appear in the source: they are not
/// consistent across counties or years.
pub type RawElectionData = BTreeMap<String, YearResults>;

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Party {
    Democratic,
    Republican,
    Tie,
}

impl Party {
    pub fn name(&self) -> &'static str {
        match self {
            Party::Democratic => "Democratic",
            Party::Republican => "Republican",
            Party::Tie => "Tie",
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            Party::Democratic => "D",
            Party::Republican => "R",
            Party::Tie => "T",
        }
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The rungs of the competitiveness ladder, from the most lopsided to the
/// closest.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Tier {
    Annihilation,
    Dominant,
    Stronghold,
    Safe,
    Likely,
    Lean,
    Tilt,
    Tossup,
}

impl Tier {
    /// Inclusive lower bounds on the margin percentage, checked in order.
    pub const LADDER: [(f64, Tier); 7] = [
        (40.0, Tier::Annihilation),
        (30.0, Tier::Dominant),
        (20.0, Tier::Stronghold),
        (10.0, Tier::Safe),
        (5.5, Tier::Likely),
        (1.0, Tier::Lean),
        (0.5, Tier::Tilt),
    ];

    pub fn from_margin_pct(margin_pct: f64) -> Tier {
        Tier::LADDER
            .iter()
            .find(|(lower, _)| margin_pct >= *lower)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Tossup)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Annihilation => "Annihilation",
            Tier::Dominant => "Dominant",
            Tier::Stronghold => "Stronghold",
            Tier::Safe => "Safe",
            Tier::Likely => "Likely",
            Tier::Lean => "Lean",
            Tier::Tilt => "Tilt",
            Tier::Tossup => "Tossup",
        }
    }

    fn range_label(&self) -> &'static str {
        match self {
            Tier::Annihilation => "40%+",
            Tier::Dominant => "30-40%",
            Tier::Stronghold => "20-30%",
            Tier::Safe => "10-20%",
            Tier::Likely => "5.5-10%",
            Tier::Lean => "1-5.5%",
            Tier::Tilt => "0.5-1%",
            Tier::Tossup => "0.5%",
        }
    }
}

/// A competitiveness category: a tier and, except for tossups, the side
/// that leads.
///
/// There are exactly 15 of them, listed in `Category::ALL` from the darkest
/// red to the darkest blue.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Category {
    Tossup,
    Leading(Tier, Side),
}

/// The side of a non-tossup category. A tie never leads a category.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Side {
    Democratic,
    Republican,
}

impl Side {
    pub fn party(&self) -> Party {
        match self {
            Side::Democratic => Party::Democratic,
            Side::Republican => Party::Republican,
        }
    }
}

/// The fixed diverging palette, from republican dominance to democratic
/// dominance.
pub const CATEGORY_COLORS: [(&str, &str); 15] = [
    ("Annihilation Republican", "#67000d"),
    ("Dominant Republican", "#a50f15"),
    ("Stronghold Republican", "#cb181d"),
    ("Safe Republican", "#ef3b2c"),
    ("Likely Republican", "#fb6a4a"),
    ("Lean Republican", "#fcae91"),
    ("Tilt Republican", "#fee8c8"),
    ("Tossup", "#f7f7f7"),
    ("Tilt Democratic", "#e1f5fe"),
    ("Lean Democratic", "#c6dbef"),
    ("Likely Democratic", "#9ecae1"),
    ("Safe Democratic", "#6baed6"),
    ("Stronghold Democratic", "#3182bd"),
    ("Dominant Democratic", "#08519c"),
    ("Annihilation Democratic", "#08306b"),
];

/// Fill color of the features that have no result.
pub const NO_DATA_COLOR: &str = "#e0e7ef";

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Leading(Tier::Annihilation, Side::Republican),
        Category::Leading(Tier::Dominant, Side::Republican),
        Category::Leading(Tier::Stronghold, Side::Republican),
        Category::Leading(Tier::Safe, Side::Republican),
        Category::Leading(Tier::Likely, Side::Republican),
        Category::Leading(Tier::Lean, Side::Republican),
        Category::Leading(Tier::Tilt, Side::Republican),
        Category::Tossup,
        Category::Leading(Tier::Tilt, Side::Democratic),
        Category::Leading(Tier::Lean, Side::Democratic),
        Category::Leading(Tier::Likely, Side::Democratic),
        Category::Leading(Tier::Safe, Side::Democratic),
        Category::Leading(Tier::Stronghold, Side::Democratic),
        Category::Leading(Tier::Dominant, Side::Democratic),
        Category::Leading(Tier::Annihilation, Side::Democratic),
    ];

    pub fn tier(&self) -> Tier {
        match self {
            Category::Tossup => Tier::Tossup,
            Category::Leading(tier, _) => *tier,
        }
    }

    /// The display name, for example `Safe Republican` or `Tossup`.
    pub fn name(&self) -> String {
        match self {
            Category::Tossup => Tier::Tossup.name().to_string(),
            Category::Leading(tier, side) => format!("{} {}", tier.name(), side.party().name()),
        }
    }

    pub fn color(&self) -> &'static str {
        let position = Category::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(7);
        CATEGORY_COLORS[position].1
    }

    /// Short machine code, for example `R_SAFE` or `TOSSUP`.
    pub fn code(&self) -> String {
        match self {
            Category::Tossup => "TOSSUP".to_string(),
            Category::Leading(tier, side) => format!(
                "{}_{}",
                side.party().short(),
                tier.name().to_uppercase()
            ),
        }
    }

    /// Legend label, for example `R+10-20%`.
    pub fn range_label(&self) -> String {
        match self {
            Category::Tossup => format!("±{}", Tier::Tossup.range_label()),
            Category::Leading(tier, side) => {
                format!("{}+{}", side.party().short(), tier.range_label())
            }
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The outcome of classifying one tally.
#[derive(PartialEq, Debug, Clone)]
pub struct Classification {
    pub winner: Party,
    pub category: Category,
    pub color: &'static str,
    pub total_votes: u64,
    pub margin: i64,
    pub margin_pct: f64,
}

/// Statewide totals for one contest, for a results banner.
#[derive(PartialEq, Debug, Clone)]
pub struct StatewideSummary {
    pub dem_total: u64,
    pub rep_total: u64,
    pub total_votes: u64,
    pub dem_pct: f64,
    pub rep_pct: f64,
    pub margin_pct: f64,
    pub winner: Party,
    pub category: Category,
    pub counties_counted: usize,
    pub counties_excluded: usize,
}

impl StatewideSummary {
    pub fn winner_pct(&self) -> f64 {
        self.dem_pct.max(self.rep_pct)
    }

    pub fn loser_pct(&self) -> f64 {
        self.dem_pct.min(self.rep_pct)
    }

    /// Banner text, for example `Republican +12.3%`.
    pub fn margin_text(&self) -> String {
        format!("{} +{:.1}%", self.winner, self.margin_pct)
    }
}

/// Conditions that prevent a lookup from producing a result.
///
/// None of them are fatal: the caller decides how to present the missing data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LookupError {
    NoDataForYear { year: String },
    NoDataForCounty { year: String, county: String },
    ContestNotFound { year: String, contest: String, county: Option<String> },
    NoStatewideData,
}

impl Error for LookupError {}

impl Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NoDataForYear { year } => write!(f, "No data for year {}", year),
            LookupError::NoDataForCounty { year, county } => {
                write!(f, "No data for county {} in {}", county, year)
            }
            LookupError::ContestNotFound {
                year,
                contest,
                county: Some(county),
            } => write!(
                f,
                "No contest \"{}\" found for {} in {}",
                contest, county, year
            ),
            LookupError::ContestNotFound {
                year,
                contest,
                county: None,
            } => write!(f, "No contest \"{}\" found in {}", contest, year),
            LookupError::NoStatewideData => {
                write!(f, "No statewide data available for this contest")
            }
        }
    }
}
