use std::path::PathBuf;

use clap::ValueHint;
use districtscope::DistrictType;

/// Census district explorer CLI
#[derive(clap::Parser, Debug)]
#[command(name = "districtscope", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON configuration file; built-in defaults are used when absent
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory holding the district shapefiles (overrides the config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Geocoding API key (overrides the config)
    #[arg(long, global = true, env = "DISTRICTSCOPE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the view for one district type to an SVG file
    Render(RenderArgs),

    /// Resolve an address to coordinates and a district number
    Lookup(LookupArgs),

    /// Interactive session: reads commands from stdin and re-renders on every change
    Explore(ExploreArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// District type: us_house, state_house, state_senate
    #[arg(short = 't', long = "type")]
    pub district_type: Option<DistrictType>,

    /// Highlight and zoom to this district, e.g. 7 or TX-10
    #[arg(long)]
    pub focus: Option<String>,

    /// Output SVG file, defaults to "./view.svg"
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// Street address, e.g. "1100 Congress Ave, Austin, TX"
    pub address: String,

    /// District type to resolve the district number for
    #[arg(short = 't', long = "type", default_value = "us_house")]
    pub district_type: DistrictType,
}

#[derive(clap::Args, Debug)]
pub struct ExploreArgs {
    /// Output SVG file rewritten on every change, defaults to "./view.svg"
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
