use clap::Parser;

/// Colors county election results by partisan margin.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. All the other options can be given in this file.
    /// Options passed on the command line take precedence over the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The file containing the election results. It overrides the data sources of the
    /// configuration file.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (default json) The type of the data file: json, csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The year of the contest. Also the year of all the rows of a csv or xlsx data file.
    #[clap(short, long, value_parser)]
    pub year: Option<String>,

    /// The contest to display, either as a name (with --year) or as 'year|contest'.
    /// Spelling, case and punctuation do not need to match the data exactly.
    #[clap(long, value_parser)]
    pub contest: Option<String>,

    /// (optional) A county for which to output the detailed results.
    #[clap(long, value_parser)]
    pub county: Option<String>,

    /// (file path, optional) A GeoJSON file with the county shapes. When provided, the output contains
    /// a fill rule for the map and the list of counties that could not be matched.
    #[clap(short, long, value_parser)]
    pub geometry: Option<String>,

    /// (default NAME) The property of the GeoJSON features holding the county name.
    #[clap(long, value_parser)]
    pub name_property: Option<String>,

    /// If passed as an argument, lists all the contests found in the data instead of coloring one.
    #[clap(long, takes_value = false)]
    pub list_contests: bool,

    /// (file path, 'stdout' or empty) Where to write the JSON output. Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected output in JSON format. If provided, marginmap will
    /// check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
