use clap::Parser;

use crate::config::ViewerConfig;
use crate::opts::{FloorCommand, Opts, RankSpecCommand};

mod config;
mod core;
mod opts;

fn main() -> anyhow::Result<()> {
    let args = argfile::expand_args(argfile::parse_fromfile, argfile::PREFIX)?;

    let opts = Opts::parse_from(args);

    cli::tracing::configure_tracing(opts.trace.clone(), opts.verbose.clone())?;

    let config = ViewerConfig::load(opts.config.as_deref())?;

    match opts.command {
        FloorCommand::Render {
            layout,
            feeds,
            zoom,
            output,
        } => core::render(&config, &layout, &feeds.feeds, &zoom, &output),
        FloorCommand::Summary {
            layout,
            feeds,
        } => core::summary(&config, &layout, &feeds.feeds),
        FloorCommand::Locate {
            layout,
            feeds,
            zoom,
            point,
        } => core::locate(&config, &layout, &feeds.feeds, &zoom, point),
        FloorCommand::Rankspec {
            command,
        } => match command {
            RankSpecCommand::Decode {
                spec,
            } => core::decode_rankspec(&spec),
            RankSpecCommand::Encode {
                layout,
                locations,
            } => core::encode_rankspec(&config, &layout, &locations),
        },
    }
}
