use crate::args::Args;
use crate::mapping::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The feature property holding the county name, unless configured.
pub const DEFAULT_NAME_PROPERTY: &str = "NAME";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Selection {
    pub year: Option<String>,
    pub contest: Option<String>,
    pub county: Option<String>,
}

impl Selection {
    /// The contest to display.
    ///
    /// A contest written as `year|contest` carries its own year, otherwise
    /// the year of the selection is used.
    pub fn contest_key(&self) -> BMapResult<ContestKey> {
        let contest = self.contest.as_ref().context(MissingContestSnafu {})?;
        if let Some(key) = ContestKey::parse(contest) {
            return Ok(key);
        }
        let year = self
            .year
            .as_ref()
            .context(InvalidSelectionSnafu { value: contest })?;
        Ok(ContestKey::new(year, contest))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "nameProperty")]
    pub name_property: Option<String>,
}

impl GeometrySource {
    pub fn name_property(&self) -> &str {
        self.name_property.as_deref().unwrap_or(DEFAULT_NAME_PROPERTY)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// The year of all the rows, for the candidate-level providers.
    pub year: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub selection: Selection,
    pub geometry: Option<GeometrySource>,
    #[serde(rename = "dataSources", default)]
    pub data_sources: Vec<DataSource>,
}

fn resolve_path(root: &Path, path: &str) -> String {
    let p = Path::new(path);
    if p.is_absolute() {
        path.to_string()
    } else {
        root.join(p).display().to_string()
    }
}

/// Reads a configuration file. The paths it contains are taken relative to
/// the directory of the file.
pub fn read_config(config_path: &str) -> BMapResult<MapConfig> {
    let config_str = fs::read_to_string(config_path).context(OpeningJsonSnafu { path: config_path })?;
    let mut config: MapConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu { path: config_path })?;

    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu { path: config_path })?;
    for source in config.data_sources.iter_mut() {
        source.file_path = resolve_path(root_p, &source.file_path);
    }
    if let Some(geometry) = config.geometry.as_mut() {
        geometry.file_path = resolve_path(root_p, &geometry.file_path);
    }
    if let Some(out) = config.output_settings.output_path.clone() {
        if out != "stdout" {
            config.output_settings.output_path = Some(resolve_path(root_p, &out));
        }
    }
    Ok(config)
}

/// The configuration to run with: the configuration file if any, with the
/// options of the command line applied on top of it.
pub fn resolve_config(args: &Args) -> BMapResult<MapConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => MapConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_sources = vec![DataSource {
            provider: args
                .input_type
                .clone()
                .unwrap_or_else(|| "json".to_string()),
            file_path: data.clone(),
            year: args.year.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }];
    }
    if args.year.is_some() {
        config.selection.year = args.year.clone();
    }
    if args.contest.is_some() {
        config.selection.contest = args.contest.clone();
    }
    if args.county.is_some() {
        config.selection.county = args.county.clone();
    }
    if let Some(geometry) = &args.geometry {
        config.geometry = Some(GeometrySource {
            file_path: geometry.clone(),
            name_property: None,
        });
    }
    if let Some(name_property) = &args.name_property {
        match config.geometry.as_mut() {
            Some(geometry) => geometry.name_property = Some(name_property.clone()),
            None => warn!(
                "resolve_config: --name-property {} ignored, no geometry file is configured",
                name_property
            ),
        }
    }
    if args.out.is_some() {
        config.output_settings.output_path = args.out.clone();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_relative_to_the_config() {
        let path = test_file("ok_config.json");
        let config = read_config(&path).unwrap();
        let root = Path::new(&path).parent().unwrap();
        assert_eq!(config.data_sources.len(), 2);
        assert_eq!(config.data_sources[1].provider, "csv");
        assert_eq!(config.data_sources[1].year.as_deref(), Some("2022"));
        assert_eq!(
            config.data_sources[0].file_path,
            root.join("ok_results.json").display().to_string()
        );
        assert_eq!(config.selection.contest.as_deref(), Some("Governor"));
        assert_eq!(config.output_settings.output_path.as_deref(), Some("stdout"));
        assert!(config.geometry.is_none());
    }

    #[test]
    fn command_line_takes_precedence() {
        let args = Args {
            config: Some(test_file("ok_config.json")),
            data: Some("other.csv".to_string()),
            input_type: Some("csv".to_string()),
            year: Some("2018".to_string()),
            contest: None,
            county: Some("Adair".to_string()),
            geometry: Some("ok.geojson".to_string()),
            name_property: Some("COUNTY".to_string()),
            list_contests: false,
            out: None,
            reference: None,
            excel_worksheet_name: None,
            verbose: false,
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(
            config.data_sources,
            vec![DataSource {
                provider: "csv".to_string(),
                file_path: "other.csv".to_string(),
                year: Some("2018".to_string()),
                excel_worksheet_name: None,
            }]
        );
        assert_eq!(config.selection.year.as_deref(), Some("2018"));
        assert_eq!(config.selection.contest.as_deref(), Some("Governor"));
        assert_eq!(config.selection.county.as_deref(), Some("Adair"));
        assert_eq!(config.geometry.unwrap().name_property(), "COUNTY");
    }

    #[test]
    fn name_property_without_geometry() {
        let args = Args {
            config: None,
            data: Some("results.json".to_string()),
            input_type: None,
            year: None,
            contest: Some("2020|Governor".to_string()),
            county: None,
            geometry: None,
            name_property: Some("COUNTY".to_string()),
            list_contests: false,
            out: None,
            reference: None,
            excel_worksheet_name: None,
            verbose: false,
        };
        let config = resolve_config(&args).unwrap();
        assert!(config.geometry.is_none());
        assert_eq!(config.data_sources[0].provider, "json");
    }

    #[test]
    fn contest_selection() {
        let s = Selection {
            year: Some("2016".to_string()),
            contest: Some("2004|President|Vice President".to_string()),
            county: None,
        };
        assert_eq!(
            s.contest_key().unwrap(),
            ContestKey::new("2004", "President|Vice President")
        );
        let s = Selection {
            contest: Some("President".to_string()),
            ..s
        };
        assert_eq!(s.contest_key().unwrap(), ContestKey::new("2016", "President"));
        let s = Selection {
            contest: None,
            ..s
        };
        assert!(matches!(
            s.contest_key().map_err(|e| *e),
            Err(MapError::MissingContest {})
        ));
    }
}
