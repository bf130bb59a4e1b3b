use log::{debug, info, warn};

use partisan_margin::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::mapping::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_geojson;
mod io_json;

/// Opacity of the county fill on the map.
const FILL_OPACITY: f64 = 0.38;

#[derive(Debug, Snafu)]
pub enum MapError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON from {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing JSON output"))]
    RenderingJson { source: serde_json::Error },
    #[snafu(display("Error writing output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unexpected layout in {path}: {message}"))]
    JsonLayout { path: String, message: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Missing column {column} in the header of {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Unknown input type {provider}, expected one of json, csv, xlsx"))]
    UnknownInputType { provider: String },
    #[snafu(display("No election data: pass --data or add dataSources to the configuration"))]
    MissingData {},
    #[snafu(display("A year is required to read the rows of {path}"))]
    MissingYear { path: String },
    #[snafu(display("No contest selected: pass --contest or use --list-contests"))]
    MissingContest {},
    #[snafu(display("Cannot understand the contest {value:?}: expected 'year|contest' or --year"))]
    InvalidSelection { value: String },
    #[snafu(display("Missing parent directory for {path}"))]
    MissingParentDir { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MapResult<T> = Result<T, MapError>;
pub type BMapResult<T> = Result<T, Box<MapError>>;

/// Reads all the data sources and merges them into a single data set.
///
/// When two sources have results for the same county and contest, the last
/// one wins.
fn read_sources(sources: &[DataSource]) -> BMapResult<RawElectionData> {
    if sources.is_empty() {
        return Err(Box::new(MapError::MissingData {}));
    }
    let mut raw = RawElectionData::new();
    for source in sources.iter() {
        info!(
            "Attempting to read {} file {:?}",
            source.provider, source.file_path
        );
        match source.provider.as_str() {
            "json" => {
                let data = io_json::read_election_json(&source.file_path)?;
                for (year, counties) in data {
                    merge_year(&mut raw, &year, counties);
                }
            }
            "csv" | "xlsx" => {
                let year = source.year.clone().context(MissingYearSnafu {
                    path: source.file_path.clone(),
                })?;
                let rows = if source.provider == "csv" {
                    io_csv::read_csv_rows(&source.file_path)?
                } else {
                    io_excel::read_excel_rows(
                        &source.file_path,
                        source.excel_worksheet_name.as_deref(),
                    )?
                };
                merge_year(&mut raw, &year, ingest::build_year(&rows));
            }
            x => {
                return Err(Box::new(MapError::UnknownInputType {
                    provider: x.to_string(),
                }));
            }
        }
    }
    Ok(raw)
}

fn merge_year(raw: &mut RawElectionData, year: &str, counties: YearResults) {
    let target = raw.entry(year.to_string()).or_default();
    for (county, contests) in counties {
        let target_contests = target.entry(county.clone()).or_default();
        for (contest, tally) in contests {
            if target_contests.insert(contest.clone(), tally).is_some() {
                debug!(
                    "merge_year: {} {} {}: replaced by a later source",
                    year, county, contest
                );
            }
        }
    }
}

fn classification_to_json(c: &Classification) -> JSValue {
    json!({
        "winner": c.winner.name(),
        "category": c.category.name(),
        "code": c.category.code(),
        "color": c.color,
        "totalVotes": c.total_votes,
        "margin": c.margin,
        "marginPct": c.margin_pct,
    })
}

fn statewide_to_json(results: &CountyResults) -> JSValue {
    match aggregate_statewide(results) {
        Ok(s) => json!({
            "demVotes": s.dem_total,
            "repVotes": s.rep_total,
            "totalVotes": s.total_votes,
            "demPct": s.dem_pct,
            "repPct": s.rep_pct,
            "marginPct": s.margin_pct,
            "winner": s.winner.name(),
            "category": s.category.name(),
            "color": s.category.color(),
            "marginText": s.margin_text(),
            "details": format!("{:.1}% vs {:.1}% • {}", s.winner_pct(), s.loser_pct(), s.category),
            "countiesCounted": s.counties_counted,
            "countiesExcluded": s.counties_excluded,
        }),
        Err(e) => {
            warn!("statewide: {}", e);
            json!({ "noData": e.to_string() })
        }
    }
}

/// The paint rule of the county layer, in the expression language of the
/// usual web map libraries.
fn choropleth_to_json(c: &Choropleth, name_property: &str) -> JSValue {
    let mut expr: Vec<JSValue> = vec![json!("match"), json!(["get", name_property])];
    for (feature, color) in c.colors() {
        expr.push(json!(feature));
        expr.push(json!(color));
    }
    expr.push(json!(c.default_color));
    json!({
        "paint": {
            "fill-color": expr,
            "fill-opacity": FILL_OPACITY,
        },
        "coloredCount": c.colored,
        "geometryCount": c.geometry_count,
        "missing": c.missing,
    })
}

fn detail_to_json(d: &CountyDetail) -> JSValue {
    json!({
        "county": d.county,
        "year": d.year,
        "contest": d.contest,
        "totalVotes": d.total_votes(),
        "winner": d.winner_label(),
        "marginText": d.margin_text(),
        "voteMargin": d.vote_margin(),
        "candidates": [
            {"name": d.dem_name, "party": "D", "votes": d.dem_votes, "pct": d.dem_pct},
            {"name": d.rep_name, "party": "R", "votes": d.rep_votes, "pct": d.rep_pct},
        ],
        "competitiveness": classification_to_json(&d.classification),
    })
}

fn collisions_to_json(collisions: &[ContestCollision]) -> JSValue {
    let l: Vec<JSValue> = collisions
        .iter()
        .map(|c| {
            json!({
                "year": c.year,
                "county": c.county,
                "kept": c.kept,
                "shadowed": c.shadowed,
            })
        })
        .collect();
    JSValue::Array(l)
}

fn legend_to_json() -> JSValue {
    let l: Vec<JSValue> = Category::ALL
        .iter()
        .map(|c| json!({"category": c.name(), "range": c.range_label(), "color": c.color()}))
        .collect();
    JSValue::Array(l)
}

fn catalog_to_json(raw: &RawElectionData) -> JSValue {
    let contests: Vec<JSValue> = contest_catalog(raw)
        .iter()
        .map(|k| json!({"value": k.to_string(), "label": format!("{} - {}", k.year, k.contest)}))
        .collect();
    json!({ "contests": contests })
}

/// Builds the full output for the contest selected in the configuration.
pub fn build_contest_js(config: &MapConfig, raw: &RawElectionData) -> BMapResult<JSValue> {
    let selection = config.selection.contest_key()?;
    let index = ContestIndex::build(raw);

    let mut res: JSMap<String, JSValue> = JSMap::new();
    res.insert(
        "selection".to_string(),
        json!({"year": selection.year, "contest": selection.contest}),
    );
    res.insert(
        "collisions".to_string(),
        collisions_to_json(index.collisions()),
    );

    let results = match index.lookup(&selection.year, &selection.contest) {
        Ok(results) => results,
        Err(e) => {
            warn!("{}", e);
            res.insert("noData".to_string(), json!(e.to_string()));
            return Ok(JSValue::Object(res));
        }
    };
    info!(
        "Processing {} counties for {} {}",
        results.len(),
        selection.contest,
        selection.year
    );

    let mut counties: JSMap<String, JSValue> = JSMap::new();
    for (county, tally) in results.iter() {
        counties.insert(county.clone(), classification_to_json(&classify(tally)));
    }
    res.insert("counties".to_string(), JSValue::Object(counties));
    res.insert("statewide".to_string(), statewide_to_json(results));
    res.insert("legend".to_string(), legend_to_json());

    if let Some(geometry) = &config.geometry {
        let names = io_geojson::read_geometry_names(&geometry.file_path, geometry.name_property())?;
        let choropleth = build_choropleth(results, &names);
        res.insert(
            "map".to_string(),
            choropleth_to_json(&choropleth, geometry.name_property()),
        );
    }

    if let Some(county) = &config.selection.county {
        let detail_js = match county_detail(raw, &selection.year, county, &selection.contest) {
            Ok(d) => detail_to_json(&d),
            Err(e) => {
                warn!("{}", e);
                json!({"county": county, "noData": e.to_string()})
            }
        };
        res.insert("county".to_string(), detail_js);
    }

    Ok(JSValue::Object(res))
}

fn write_output(js: &JSValue, out: Option<&str>) -> BMapResult<String> {
    let pretty = serde_json::to_string_pretty(js).context(RenderingJsonSnafu {})?;
    match out {
        None | Some("stdout") => println!("{}", pretty),
        Some(path) => {
            fs::write(path, &pretty).context(WritingOutputSnafu { path })?;
            info!("Output written to {}", path);
        }
    }
    Ok(pretty)
}

fn check_reference(pretty: &str, reference_path: &str) -> MapResult<()> {
    let contents =
        fs::read_to_string(reference_path).context(OpeningJsonSnafu { path: reference_path })?;
    let reference: JSValue =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path: reference_path })?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(RenderingJsonSnafu {})?;
    if pretty_reference != pretty {
        warn!("Found differences with the reference file {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty, "\n");
        whatever!("Difference detected between the output and the reference output")
    }
    Ok(())
}

pub fn run_map(args: &Args) -> BMapResult<()> {
    let config = resolve_config(args)?;
    info!("config: {:?}", config);

    let raw = read_sources(&config.data_sources)?;
    info!("Read {} years of results", raw.len());

    let js = if args.list_contests {
        catalog_to_json(&raw)
    } else {
        build_contest_js(&config, &raw)?
    };

    let pretty = write_output(&js, config.output_settings.output_path.as_deref())?;

    if let Some(reference) = &args.reference {
        check_reference(&pretty, reference)?;
    }
    Ok(())
}

/// Location of the test files, from the root of the repository.
#[cfg(test)]
fn test_file(name: &str) -> String {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
        .display()
        .to_string()
}
