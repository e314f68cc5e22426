use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use floorview::{Canvas, FloorView, SvgCanvas};
use inventory::feed::Feed;
use inventory::{FloorLayout, HardwareSet, JobSet, LayoutView, RankSpec, Session};
use itertools::Itertools;
use math::Point;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::opts::{LayoutArgs, ZoomArgs};

/// A layout view together with the inventory built from it.
struct Floor {
    name: String,
    layout: LayoutView,
    session: Session,
}

impl Floor {
    fn load(config: &ViewerConfig, args: &LayoutArgs) -> anyhow::Result<Self> {
        let document: FloorLayout = inventory::file::load(&args.layout)
            .with_context(|| format!("Error loading layout. file: {}", args.layout.display()))?;

        let (name, layout) = document.view(args.view.as_deref())?;
        let hardware = HardwareSet::from_layout(layout, config.options.clone())?;
        let session = Session::new(hardware, JobSet::new(config.job_palette.clone()));

        info!(
            "Loaded layout. file: {}, view: '{}', elements: {}",
            args.layout.display(),
            name,
            session.hardware().len()
        );

        Ok(Self {
            name: name.to_string(),
            layout: layout.clone(),
            session,
        })
    }

    fn apply_feeds(&mut self, feeds: &[PathBuf]) -> anyhow::Result<()> {
        for path in feeds {
            let feed: Feed = inventory::file::load(path)
                .with_context(|| format!("Error loading feed. file: {}", path.display()))?;
            let report = self.session.apply_feed(feed);
            info!(
                "Applied feed. file: {}, applied: {}, skipped: {}",
                path.display(),
                report.applied,
                report.errors.len()
            );
        }
        Ok(())
    }

    fn view<C: Canvas>(&self, config: &ViewerConfig, zoom: &ZoomArgs, canvas: C) -> anyhow::Result<FloorView<C>> {
        let hardware = self.session.hardware();
        let palette = config.palette.clone();

        let view = match &zoom.rack {
            Some(rack) => {
                let mut view = FloorView::rack_view(&self.name, &self.layout, hardware, rack, canvas, palette)?;
                view.apply_rack_zoom();
                view
            }
            None => {
                let mut view = FloorView::from_layout(&self.name, &self.layout, hardware, canvas, palette)?;
                view.apply_zoom(zoom.zoom.unwrap_or(self.layout.initzoom))?;
                view
            }
        };
        Ok(view)
    }
}

pub(crate) fn render(
    config: &ViewerConfig,
    layout: &LayoutArgs,
    feeds: &[PathBuf],
    zoom: &ZoomArgs,
    output: &Path,
) -> anyhow::Result<()> {
    let mut floor = Floor::load(config, layout)?;
    floor.apply_feeds(feeds)?;

    let mut view = floor.view(config, zoom, SvgCanvas::new())?;
    view.draw(floor.session.hardware());

    let canvas = view.into_canvas();
    fs::write(output, canvas.to_svg())
        .with_context(|| format!("Error writing SVG. file: {}", output.display()))?;

    info!(
        "Rendered floor. view: '{}', size: {}, shapes: {}, file: {}",
        floor.name,
        canvas.size(),
        canvas.shape_count(),
        output.display()
    );
    Ok(())
}

pub(crate) fn summary(config: &ViewerConfig, layout: &LayoutArgs, feeds: &[PathBuf]) -> anyhow::Result<()> {
    let mut floor = Floor::load(config, layout)?;
    floor.apply_feeds(feeds)?;

    let hardware = floor.session.hardware();
    println!("Floor '{}': {} racks", floor.name, hardware.racks().len());
    for rack in hardware.racks() {
        let element = &hardware[*rack];
        let counters = element.counters().copied().unwrap_or_default();
        println!(
            "{}: {} in error, {} missing",
            element.location(),
            counters.errors,
            counters.missing
        );
    }

    let compute_type = &hardware.options().compute_type;
    let states = hardware
        .state_counts(compute_type)
        .into_iter()
        .map(|(state, count)| format!("{} ({}): {}", state.name(), state.code(), count))
        .join(", ");
    println!("{} states: {}", compute_type, states);

    let jobs = floor.session.jobs();
    println!("Active jobs: {}", jobs.active_jobs().count());
    for job in jobs.active_jobs() {
        let job = job.borrow();
        let info = job.info();
        println!(
            "{} '{}' user: {}, state: {}, nodes: {}",
            job.id(),
            info.name,
            info.user,
            info.state,
            job.node_count()
        );
    }
    Ok(())
}

pub(crate) fn locate(
    config: &ViewerConfig,
    layout: &LayoutArgs,
    feeds: &[PathBuf],
    zoom: &ZoomArgs,
    point: Point,
) -> anyhow::Result<()> {
    let mut floor = Floor::load(config, layout)?;
    floor.apply_feeds(feeds)?;

    let view = floor.view(config, zoom, SvgCanvas::new())?;
    match view
        .view_at(point)
        .and_then(|id| view.hover_text(floor.session.hardware(), id))
    {
        Some(text) => println!("{}", text),
        None => println!("No hardware at {}", point),
    }
    Ok(())
}

pub(crate) fn decode_rankspec(spec: &RankSpec) -> anyhow::Result<()> {
    let count = spec.decode(|rank, value| println!("{} {}", rank, value));
    debug!("Decoded rankspec. rankspec: '{}', ranks: {}", spec, count);
    Ok(())
}

pub(crate) fn encode_rankspec(config: &ViewerConfig, layout: &LayoutArgs, locations: &str) -> anyhow::Result<()> {
    let floor = Floor::load(config, layout)?;
    let hardware = floor.session.hardware();

    let Some(spec) = hardware.locations_to_rankspec(locations) else {
        bail!(
            "No {} locations in list. locations: '{}'",
            hardware.options().compute_type,
            locations
        );
    };
    println!("{}", spec);
    Ok(())
}
