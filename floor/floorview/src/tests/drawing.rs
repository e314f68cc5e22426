use inventory::job::Job;
use inventory::testing::{definition, item};
use inventory::{Color, HardwareState, JobId, JobInfo, JobPalette, JobSet, JobState};
use math::Point;
use rstest::rstest;

use super::{Fixture, view_of};
use crate::canvas::{Font, TextOrientation};
use crate::floor::ViewError;
use crate::recording::DrawCall;

const BACKGROUND: Color = Color::rgb(0xfb, 0xfb, 0xfb);
const BORDER: Color = Color::rgb(0xdd, 0xdd, 0xdd);
const MISSING_NODE: Color = Color::rgb(0x00, 0x0d, 0x1a);
const ACTIVE_CHASSIS: Color = Color::rgb(0xf5, 0xf5, 0xf5);

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "actual: {}, expected: {}", actual, expected);
}

#[test]
fn test_views_mirror_the_hardware_tree() {
    // given
    let fixture = Fixture::new(&["R0", "R1"]);

    // when
    let floor = fixture.floor();

    // then
    assert_eq!(floor.views().count(), 22);
    assert_eq!(floor.racks().len(), 2);
    assert_eq!(floor.grid_size(), Point::new(12.0, 10.0));
    assert_eq!(floor.description(), Some("The test floor"));
    assert_eq!(floor.zoom_level(), 0);
    assert_eq!(floor.scale(), None);

    let node = floor.view(view_of(&floor, &fixture, "R1-CH1-CN2")).unwrap();
    assert_eq!(node.name(), "CN2");
    assert_eq!(node.relative_pos(), Point::new(0.0, 2.0));
    assert_eq!(node.grid_pos(), Point::new(6.0, 7.0));
    assert!(!node.is_rack());

    let rack = floor.view(floor.racks()[1]).unwrap();
    assert_eq!(rack.element(), fixture.key("R1"));
    assert_eq!(rack.grid_pos(), Point::new(6.0, 0.0));
    assert!(rack.is_obscured());
}

#[test]
fn test_missing_hardware_fails_construction() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let layout = inventory::testing::compute_layout(&["R0", "R1"]);

    // when
    let result = crate::FloorView::from_layout(
        "Full",
        &layout,
        &fixture.hardware,
        crate::recording::RecordingCanvas::default(),
        crate::ViewPalette::default(),
    );

    // then
    assert_eq!(result.err(), Some(ViewError::MissingHardware("R1".to_string())));
}

#[test]
fn test_apply_zoom() {
    // given
    let fixture = Fixture::new(&["R0", "R1", "R2"]);
    let mut floor = fixture.floor();

    // when
    floor.apply_zoom(1).unwrap();

    // then
    assert_eq!(floor.zoom_level(), 1);
    assert_eq!(floor.draw_size(), Point::new(72.0, 40.0));
    assert_eq!(floor.canvas().calls, vec![DrawCall::Resize(Point::new(72.0, 40.0))]);

    let node = floor.view(view_of(&floor, &fixture, "R1-CH1-CN2")).unwrap();
    assert_eq!(node.draw_pos(), Point::new(24.0, 28.0));
    assert_eq!(node.draw_size(), Point::new(20.0, 4.0));
    assert_eq!(node.fill_size(), Point::new(19.0, 3.0));

    let rack = floor.view(floor.racks()[2]).unwrap();
    assert_eq!(rack.draw_pos(), Point::new(48.0, 0.0));
    assert_eq!(rack.fill_size(), Point::new(20.0, 40.0));
}

#[test]
fn test_unknown_zoom_level_changes_nothing() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let mut floor = fixture.floor();

    // when
    let result = floor.apply_zoom(2).map(|floor| floor.zoom_level());

    // then
    assert_eq!(result, Err(ViewError::UnknownZoomLevel {
        level: 2,
        levels: 2,
    }));
    assert_eq!(floor.scale(), None);
    assert!(floor.canvas().calls.is_empty());
}

#[test]
fn test_nothing_is_drawn_before_zoom() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let mut floor = fixture.floor();

    // when
    floor.draw(&fixture.hardware);

    // then
    assert!(floor.canvas().calls.is_empty());
}

#[test]
fn test_draw_rack() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let mut floor = fixture.floor();
    floor.apply_zoom(1).unwrap();
    floor.canvas_mut().clear();

    // when
    floor.draw(&fixture.hardware);

    // then
    let rects = floor.canvas().rects();
    // background, 2 chassis and 8 nodes, 4 border edges
    assert_eq!(rects.len(), 15);
    assert_eq!(rects[0], (Point::new(0.0, 0.0), Point::new(20.0, 40.0), BACKGROUND));
    // content is drawn in layout order, CH1 first
    assert_eq!(rects[1], (Point::new(0.0, 20.0), Point::new(19.0, 15.0), ACTIVE_CHASSIS));
    assert_eq!(rects[2], (Point::new(0.0, 20.0), Point::new(19.0, 3.0), MISSING_NODE));
    assert_eq!(rects[6], (Point::new(0.0, 0.0), Point::new(19.0, 15.0), ACTIVE_CHASSIS));
    assert_eq!(&rects[11..], &[
        (Point::new(-1.0, -1.0), Point::new(22.0, 1.0), BORDER),
        (Point::new(-1.0, 40.0), Point::new(22.0, 1.0), BORDER),
        (Point::new(-1.0, -1.0), Point::new(1.0, 42.0), BORDER),
        (Point::new(20.0, -1.0), Point::new(1.0, 42.0), BORDER),
    ]);

    let annotations: Vec<_> = floor.canvas().annotations().collect();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].name, "R0");
    assert!(annotations[0].attention);
    assert!(!annotations[0].highlight);
    assert_eq!(annotations[0].size, Point::new(20.0, 40.0));
}

#[test]
fn test_tall_rack_gets_vertical_label() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let mut floor = fixture.floor();
    floor.apply_zoom(1).unwrap();

    // when
    floor.draw(&fixture.hardware);

    // then
    let texts = floor.canvas().texts();
    assert_eq!(texts.len(), 1);
    let (text, position, font, orientation, color) = texts[0];
    assert_eq!(text, "R0");
    assert_eq!(orientation, TextOrientation::Vertical);
    assert_eq!(font, Font::new(13.0, true));
    assert_eq!(color, Color::rgba(0, 0, 0, 0.12));

    // centred on the rack height, text width is 2 glyphs of 13px
    let width = 2.0 * 13.0 * 0.6;
    assert_close(position.x, 13.0);
    assert_close(position.y, ((40.0 - width) / 2.0_f64).floor() + width);
}

#[rstest]
#[case(1, Font::new(1.0, true), Point::new(2.0, 1.0))]
#[case(2, Font::new(15.0, true), Point::new(21.0, 15.0))]
fn test_wide_rack_gets_horizontal_label(#[case] zoom: usize, #[case] expected_font: Font, #[case] expected_position: Point) {
    // given
    let mut layout = inventory::testing::compute_layout(&[]);
    layout.zoomscales = vec![0.5, 1.0, 10.0];
    layout
        .definitions
        .insert("cdu".to_string(), definition("Cooling Unit", 8.0, 4.0, false, vec![]));
    layout
        .floor
        .content
        .push(item("CDU1", "cdu", 0.0, 0.0));
    let fixture = Fixture::from_layout(layout);
    let mut floor = fixture.floor();
    floor.apply_zoom(zoom).unwrap();

    // when
    floor.draw(&fixture.hardware);

    // then
    let texts = floor.canvas().texts();
    let (text, position, font, orientation, _color) = texts[0];
    assert_eq!(text, "CDU1");
    assert_eq!(orientation, TextOrientation::Horizontal);
    assert_eq!(font, expected_font);
    assert_close(position.x, expected_position.x);
    assert_close(position.y, expected_position.y);

    // a drawn rack fills itself in its state color
    let rects = floor.canvas().rects();
    assert_eq!(rects[1].2, floor.palette().fallback);
}

#[test]
fn test_label_too_small_to_draw_is_skipped() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let mut floor = fixture.floor();
    let mut layout = fixture.layout.clone();
    layout.zoomscales = vec![0.25];
    let mut small = crate::FloorView::from_layout(
        "Full",
        &layout,
        &fixture.hardware,
        crate::recording::RecordingCanvas::default(),
        crate::ViewPalette::default(),
    )
    .unwrap();
    floor.apply_zoom(0).unwrap();
    small.apply_zoom(0).unwrap();

    // when
    floor.draw(&fixture.hardware);
    small.draw(&fixture.hardware);

    // then
    assert_eq!(floor.canvas().texts()[0].2, Font::new(3.0, true));
    assert!(small.canvas().texts().is_empty());
    assert_eq!(small.canvas().annotated_racks(), vec!["R0"]);
}

#[test]
fn test_fill_color_priority() {
    // given
    let mut fixture = Fixture::new(&["R0"]);
    let mut jobs = JobSet::new(JobPalette::default());
    let rankspec = fixture
        .hardware
        .locations_to_rankspec("R0-CH0-CN0 R0-CH0-CN1");
    let info = JobInfo {
        state: JobState::Running,
        ..JobInfo::default()
    };
    let job = jobs.add_job(Job::new(JobId::from("1"), info, rankspec, &fixture.hardware).unwrap());
    let job_color = job.borrow().color().unwrap();
    fixture.hardware.assign_job(&job);

    let node_0 = fixture.key("R0-CH0-CN0");
    let node_2 = fixture.key("R0-CH0-CN2");
    fixture.hardware.change_selected(node_0, true);
    fixture
        .hardware
        .change_state(node_2, HardwareState::Error);

    let mut floor = fixture.floor();
    floor.apply_zoom(0).unwrap();

    // when
    floor.draw(&fixture.hardware);

    // then
    let color_at = |location: &str| {
        let view = floor.view(view_of(&floor, &fixture, location)).unwrap();
        floor
            .canvas()
            .rects()
            .into_iter()
            .find(|(origin, size, _color)| *origin == view.draw_pos() && *size == view.fill_size())
            .map(|(_origin, _size, color)| color)
            .unwrap()
    };
    assert_eq!(color_at("R0-CH0-CN0"), Color::GREEN);
    assert_eq!(color_at("R0-CH0-CN1"), job_color);
    assert_eq!(color_at("R0-CH0-CN2"), Color::RED);
    assert_eq!(color_at("R0-CH0-CN3"), MISSING_NODE);
}

#[test]
fn test_rack_view_labels_components() {
    // given
    let fixture = Fixture::new(&["R0", "R1"]);
    let mut rack = fixture.rack("R1");

    // when
    rack.apply_rack_zoom()
        .draw(&fixture.hardware);

    // then
    assert_eq!(rack.description(), Some("Rack R1"));
    assert!(rack.labels_components());
    assert_eq!(rack.racks().len(), 1);
    assert_eq!(rack.draw_size(), Point::new(40.0, 80.0));
    assert_eq!(rack.view(rack.racks()[0]).unwrap().draw_pos(), Point::new(0.0, 0.0));

    let texts: Vec<_> = rack
        .canvas()
        .texts()
        .into_iter()
        .map(|(text, position, font, _orientation, color)| (text, position, font, color))
        .collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], ("CH1", Point::new(2.0, 48.0), Font::new(8.0, false), Color::GRAY));
    assert_eq!(texts[1], ("CH0", Point::new(2.0, 8.0), Font::new(8.0, false), Color::GRAY));
    assert_eq!(texts[2].0, "R1");
    assert_eq!(texts[2].3, Color::rgba(0, 0, 0, 0.07));
}

#[test]
fn test_rack_view_of_unknown_rack_fails() {
    // given
    let fixture = Fixture::new(&["R0"]);

    // when
    let result = crate::FloorView::rack_view(
        "Full",
        &fixture.layout,
        &fixture.hardware,
        "R9",
        crate::recording::RecordingCanvas::default(),
        crate::ViewPalette::default(),
    );

    // then
    assert_eq!(
        result.err(),
        Some(ViewError::Layout(inventory::layout::LayoutError::UnknownRack("R9".to_string())))
    );
}

#[test]
fn test_draw_racks_rejects_views_that_are_not_its_racks() {
    // given
    let fixture = Fixture::new(&["R0", "R1"]);
    let floor = fixture.floor();
    let mut rack = fixture.rack("R0");
    rack.apply_rack_zoom();
    rack.canvas_mut().clear();

    // and
    let other_floors_rack = floor.racks()[1];
    let node = view_of(&rack, &fixture, "R0-CH0-CN0");

    // when
    let foreign = rack.draw_racks(&fixture.hardware, &[rack.racks()[0], other_floors_rack]);
    let not_a_rack = rack.draw_racks(&fixture.hardware, &[node]);

    // then
    assert!(matches!(foreign, Err(ViewError::UnknownRackView(_))));
    assert!(matches!(not_a_rack, Err(ViewError::UnknownRackView(_))));
    assert!(rack.canvas().calls.is_empty());
    assert!(rack.view(other_floors_rack).is_none());

    // and
    let own_racks = rack.racks().to_vec();
    rack.draw_racks(&fixture.hardware, &own_racks)
        .unwrap();
    assert_eq!(rack.canvas().annotated_racks(), vec!["R0"]);
}
