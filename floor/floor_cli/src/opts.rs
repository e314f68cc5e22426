use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::parsers::{RankSpecParser, point_parser};
use inventory::RankSpec;
use math::Point;

#[derive(Parser, Debug)]
#[command(name = "floor_cli")]
#[command(bin_name = "floor_cli")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    #[command(subcommand)]
    pub(crate) command: FloorCommand,

    /// Viewer configuration file, with inventory options, view palette and job palette
    #[arg(long, value_name = "CONFIG_FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Trace log file
    #[arg(long, num_args = 0..=1, default_missing_value = "trace.log")]
    pub(crate) trace: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Args)]
pub(crate) struct LayoutArgs {
    /// Layout file
    #[arg(long, value_name = "LAYOUT_FILE")]
    pub(crate) layout: PathBuf,

    /// Name of the layout view, defaults to the first view
    #[arg(long, value_name = "VIEW")]
    pub(crate) view: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct FeedArgs {
    /// Feed file, applied in the order given
    #[arg(long = "feed", value_name = "FEED_FILE", action = clap::ArgAction::Append)]
    pub(crate) feeds: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct ZoomArgs {
    /// Zoom level, an index into the layout's zoom scales.  Defaults to the layout's initial zoom
    #[arg(long, value_name = "LEVEL", conflicts_with = "rack")]
    pub(crate) zoom: Option<usize>,

    /// Show a single rack, at the layout's rack scale
    #[arg(long, value_name = "RACK")]
    pub(crate) rack: Option<String>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum FloorCommand {
    /// Render a floor, or a single rack, to an SVG file
    Render {
        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        feeds: FeedArgs,

        #[command(flatten)]
        zoom: ZoomArgs,

        /// Output SVG file
        #[arg(long, value_name = "SVG_FILE")]
        output: PathBuf,
    },
    /// Print per-rack error and missing counts, the compute state key and the active jobs
    Summary {
        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        feeds: FeedArgs,
    },
    /// Print the hardware under a point of the zoomed view
    Locate {
        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        feeds: FeedArgs,

        #[command(flatten)]
        zoom: ZoomArgs,

        /// Point in drawing units, e.g. 'x=10,y=2.5'
        #[arg(long, value_name = "POINT", value_parser = point_parser)]
        point: Point,
    },
    /// Rankspec tools
    Rankspec {
        #[command(subcommand)]
        command: RankSpecCommand,
    },
}

#[derive(Debug, Subcommand)]
#[command(arg_required_else_help(true))]
pub(crate) enum RankSpecCommand {
    /// Print each rank a rankspec marks, with its character
    Decode {
        /// Rankspec, e.g. '2-3+'
        #[arg(value_parser = RankSpecParser::default())]
        spec: RankSpec,
    },
    /// Encode a list of compute locations as a rankspec
    Encode {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Whitespace separated locations, e.g. 'R0-CH0-CN0 R0-CH0-CN1'
        #[arg(long, value_name = "LOCATIONS")]
        locations: String,
    },
}
