use inventory::HardwareState;
use math::Point;
use rstest::rstest;

use super::{Fixture, view_of};

#[rstest]
#[case(Point::new(0.0, 0.0), Some("R0"))]
#[case(Point::new(25.0, 10.0), Some("R1"))]
#[case(Point::new(19.5, 39.5), Some("R0"))]
#[case(Point::new(21.0, 10.0), None)]
#[case(Point::new(20.0, 0.0), None)]
#[case(Point::new(50.0, 40.0), None)]
#[case(Point::new(-1.0, 5.0), None)]
fn test_floor_view_resolves_racks(#[case] point: Point, #[case] expected: Option<&str>) {
    // given
    let fixture = Fixture::new(&["R0", "R1", "R2"]);
    let mut floor = fixture.floor();
    floor.apply_zoom(1).unwrap();

    // when
    let element = floor.element_at(point);

    // then
    let location = element.map(|key| fixture.hardware[key].location());
    assert_eq!(location, expected);
}

#[rstest]
#[case(Point::new(5.0, 9.0), "R1-CH0-CN1")]
#[case(Point::new(39.5, 0.0), "R1-CH0-CN0")]
#[case(Point::new(5.0, 71.0), "R1-CH1-CN3")]
// between the chassis
#[case(Point::new(5.0, 36.0), "R1")]
#[case(Point::new(5.0, 79.0), "R1")]
fn test_rack_view_resolves_innermost_component(#[case] point: Point, #[case] expected: &str) {
    // given
    let fixture = Fixture::new(&["R0", "R1"]);
    let mut rack = fixture.rack("R1");
    rack.apply_rack_zoom();

    // when
    let element = rack.element_at(point).unwrap();

    // then
    assert_eq!(fixture.hardware[element].location(), expected);
}

#[test]
fn test_hit_testing_uses_unshrunk_size() {
    // given
    let fixture = Fixture::new(&["R0"]);
    let mut rack = fixture.rack("R0");
    rack.apply_rack_zoom();
    let node = rack.view(view_of(&rack, &fixture, "R0-CH0-CN0")).unwrap();

    // when
    // inside the drawn size, outside the filled box
    let point = Point::new(39.5, 7.5);

    // then
    assert!(point.x > node.fill_size().x);
    assert_eq!(rack.element_at(point), Some(fixture.key("R0-CH0-CN0")));
}

#[test]
fn test_hover_text() {
    // given
    let mut fixture = Fixture::new(&["R0"]);
    fixture
        .hardware
        .change_state(fixture.key("R0-CH0-CN1"), HardwareState::Active);
    fixture
        .hardware
        .change_state(fixture.key("R0-CH1-CN1"), HardwareState::Error);
    let floor = fixture.rack("R0");

    // when
    let rack = floor.hover_text(&fixture.hardware, floor.racks()[0]);
    let node = floor.hover_text(&fixture.hardware, view_of(&floor, &fixture, "R0-CH0-CN1"));
    let chassis = floor.hover_text(&fixture.hardware, view_of(&floor, &fixture, "R0-CH1"));

    // then
    assert_eq!(
        rack.as_deref(),
        Some("Rack R0   Compute Rack\n1 locations in error\n6 locations marked missing")
    );
    assert_eq!(node.as_deref(), Some("R0-CH0-CN1    Compute Node\nState: Active (A)"));
    assert_eq!(chassis.as_deref(), Some("R0-CH1    Compute Chassis\nState: Active (A)"));
}

#[test]
fn test_hover_text_for_rack_without_problems() {
    // given
    let mut fixture = Fixture::new(&["R0"]);
    let nodes = fixture
        .hardware
        .elements_of_type("compute-node")
        .to_vec();
    for node in nodes {
        fixture
            .hardware
            .change_state(node, HardwareState::Active);
    }
    let floor = fixture.floor();

    // expect
    assert_eq!(
        floor
            .hover_text(&fixture.hardware, floor.racks()[0])
            .as_deref(),
        Some("Rack R0   Compute Rack")
    );
}
