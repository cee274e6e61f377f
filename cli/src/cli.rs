use std::path::PathBuf;

/// Accessibility and access-equity views over precomputed national datasets
#[derive(clap::Parser, Debug)]
#[command(name = "accessatlas", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the upstream data files (and optionally accessatlas.json)
    #[arg(short, long, default_value = ".", global = true, value_hint = clap::ValueHint::DirPath)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the selectable areas
    Areas(AreasArgs),

    /// Cumulative share of the 7-17-year-old population reaching the nearest educational facility
    Curves(CurvesArgs),

    /// Choropleth of the number of opportunities reachable from each grid cell
    AccessMap(AccessMapArgs),

    /// Palma ratio ranking and map per municipality
    Palma(PalmaArgs),

    /// Count and locate opportunities by type
    Opportunities(OpportunitiesArgs),
}

#[derive(clap::Args, Debug)]
pub struct AreasArgs {
    /// List the municipalities of the curve page instead of the access map areas
    #[arg(long)]
    pub curves: bool,

    /// List the opportunity types instead of areas
    #[arg(long, conflicts_with = "curves")]
    pub opportunity_types: bool,
}

#[derive(clap::Args, Debug)]
pub struct CurvesArgs {
    /// Municipality to include (repeatable); none means all municipalities
    #[arg(short, long = "municipality")]
    pub municipalities: Vec<String>,

    /// Second selection to compare against (repeatable)
    #[arg(long = "compare")]
    pub compare: Vec<String>,

    /// Upper bound of the travel-time axis, in minutes
    #[arg(long, default_value_t = 60)]
    pub max_minutes: u32,

    /// Output curve table, defaults to "./curves.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct AccessMapArgs {
    /// "Finland" or a municipality name
    #[arg(long)]
    pub area: Option<String>,

    /// transit or cycling
    #[arg(long)]
    pub mode: Option<String>,

    /// Opportunity type, by label or abbreviation
    #[arg(long)]
    pub opportunity: Option<String>,

    /// Travel-time cutoff in minutes (30, 45 or 60)
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Bin by the selected cutoff instead of the 60 minute class intervals
    #[arg(long)]
    pub own_intervals: bool,

    /// Output GeoJSON, defaults to "./access_map.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also render the map as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PalmaArgs {
    /// transit or cycling
    #[arg(long)]
    pub mode: Option<String>,

    /// Opportunity type, by label or abbreviation
    #[arg(long)]
    pub opportunity: Option<String>,

    /// Travel-time cutoff in minutes (30, 45 or 60)
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Leave out zero and infinite ratios instead of flagging them
    #[arg(long)]
    pub drop_degenerate: bool,

    /// Color ratios over 0-2 instead of 0-10
    #[arg(long)]
    pub narrow_scale: bool,

    /// Output ranking table, defaults to "./palma_ranking.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the flagged (zero/infinite) municipalities
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub flagged: Option<PathBuf>,

    /// Also write the municipality map as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,

    /// Also render the municipality map as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct OpportunitiesArgs {
    /// Opportunity type to include (repeatable)
    #[arg(short, long = "type")]
    pub types: Vec<String>,

    /// "Finland" (default) or a municipality name
    #[arg(long)]
    pub area: Option<String>,

    /// Output count table, defaults to "./opportunities.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the opportunity points as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,

    /// Also render the points as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,
}
