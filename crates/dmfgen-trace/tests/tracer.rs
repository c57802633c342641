use approx::assert_abs_diff_eq;
use dmfgen_core::Point;
use dmfgen_geometry::Polygon;
use dmfgen_trace::{
    label_polygons, trace_peripheral, trace_polygons, Arc, Line, Primitive, SequentialLabels,
    TraceError, TraceOptions,
};

fn line(a: (f64, f64), b: (f64, f64)) -> Primitive {
    Primitive::Line(Line {
        start: a.into(),
        end: b.into(),
    })
}

fn unit_square_lines() -> Vec<Primitive> {
    vec![
        line((0.0, 0.0), (1.0, 0.0)),
        line((1.0, 1.0), (0.0, 1.0)),
        line((1.0, 0.0), (1.0, 1.0)),
        line((0.0, 1.0), (0.0, 0.0)),
    ]
}

#[test]
fn scrambled_segments_close_into_a_square() {
    let polygons = trace_polygons(&unit_square_lines(), &TraceOptions::default()).unwrap();
    assert_eq!(polygons.len(), 1);
    let p = &polygons[0];
    assert_eq!(p.len(), 4);
    assert_abs_diff_eq!(p.area(), 1.0, epsilon = 1e-9);
    assert!(p.signed_area() > 0.0);
}

#[test]
fn nearly_coincident_endpoints_merge_within_tolerance() {
    let jitter = 2e-8;
    let primitives = vec![
        line((0.0, 0.0), (1.0, 0.0)),
        line((1.0 + jitter, 0.0 - jitter), (1.0, 1.0)),
        line((1.0 - jitter, 1.0 + jitter), (0.0, 1.0)),
        line((0.0, 1.0 - jitter), (0.0, 0.0)),
    ];
    let polygons = trace_polygons(&primitives, &TraceOptions::default()).unwrap();
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].len(), 4);
}

#[test]
fn multiple_loops_come_out_in_input_order() {
    let mut primitives = unit_square_lines();
    // A second, bigger square further out.
    primitives.extend([
        line((10.0, 0.0), (12.0, 0.0)),
        line((12.0, 0.0), (12.0, 2.0)),
        line((12.0, 2.0), (10.0, 2.0)),
        line((10.0, 2.0), (10.0, 0.0)),
    ]);
    let polygons = trace_polygons(&primitives, &TraceOptions::default()).unwrap();
    assert_eq!(polygons.len(), 2);
    assert_abs_diff_eq!(polygons[0].area(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(polygons[1].area(), 4.0, epsilon = 1e-9);
}

#[test]
fn arcs_tessellate_and_close_with_lines() {
    // Stadium shape: two horizontal lines capped by semicircular arcs.
    let primitives = vec![
        line((0.0, 0.0), (4.0, 0.0)),
        Primitive::Arc(Arc {
            center: Point::new(4.0, 1.0),
            radius: 1.0,
            start_angle_deg: -90.0,
            end_angle_deg: 90.0,
        }),
        line((4.0, 2.0), (0.0, 2.0)),
        Primitive::Arc(Arc {
            center: Point::new(0.0, 1.0),
            radius: 1.0,
            start_angle_deg: 90.0,
            end_angle_deg: 270.0,
        }),
    ];
    let polygons = trace_polygons(&primitives, &TraceOptions::default()).unwrap();
    assert_eq!(polygons.len(), 1);
    let p = &polygons[0];
    // 2 line endpoints per side plus tessellation interior points.
    assert!(p.len() > 8);
    // Area sits between the bare rectangle and the rectangle plus a full
    // circle (tessellation under-approximates the caps).
    assert!(p.area() > 8.0);
    assert!(p.area() < 8.0 + std::f64::consts::PI);
}

#[test]
fn open_chain_is_malformed() {
    let primitives = vec![
        line((0.0, 0.0), (1.0, 0.0)),
        line((1.0, 0.0), (1.0, 1.0)),
        line((1.0, 1.0), (0.0, 1.0)),
    ];
    let err = trace_polygons(&primitives, &TraceOptions::default()).unwrap_err();
    let TraceError::MalformedGeometry { reason, .. } = err;
    assert!(reason.contains("open endpoint"));
}

#[test]
fn junction_names_an_incident_primitive() {
    let mut primitives = unit_square_lines();
    // A dangling diagonal out of the corner creates a degree-3 node (and
    // its far end a degree-1 node; either is malformed).
    primitives.push(line((0.0, 0.0), (-1.0, -1.0)));
    let err = trace_polygons(&primitives, &TraceOptions::default()).unwrap_err();
    let TraceError::MalformedGeometry { primitive, .. } = err;
    assert!(primitive < primitives.len());
}

#[test]
fn sequential_labels_follow_trace_order() {
    let mut primitives = unit_square_lines();
    primitives.extend([
        line((10.0, 0.0), (12.0, 0.0)),
        line((12.0, 0.0), (12.0, 2.0)),
        line((12.0, 2.0), (10.0, 2.0)),
        line((10.0, 2.0), (10.0, 0.0)),
    ]);
    let labeled =
        trace_peripheral(&primitives, &TraceOptions::default(), &mut SequentialLabels).unwrap();
    assert_eq!(labeled.len(), 2);
    assert_eq!(labeled[0].0, "A");
    assert_eq!(labeled[1].0, "B");
    assert!(labeled[0].1.area() < labeled[1].1.area());
}

#[test]
fn unlabeled_polygons_are_dropped_not_fatal() {
    let polygons = trace_polygons(&unit_square_lines(), &TraceOptions::default()).unwrap();
    let mut skip_all = |polys: &[Polygon]| vec![None; polys.len()];
    let labeled = label_polygons(polygons, &mut skip_all);
    assert!(labeled.is_empty());
}

#[test]
fn short_label_lists_drop_the_tail() {
    let mut primitives = unit_square_lines();
    primitives.extend([
        line((10.0, 0.0), (12.0, 0.0)),
        line((12.0, 0.0), (12.0, 2.0)),
        line((12.0, 2.0), (10.0, 2.0)),
        line((10.0, 2.0), (10.0, 0.0)),
    ]);
    let polygons = trace_polygons(&primitives, &TraceOptions::default()).unwrap();
    let mut first_only = |_: &[Polygon]| vec![Some("IN".to_string())];
    let labeled = label_polygons(polygons, &mut first_only);
    assert_eq!(labeled.len(), 1);
    assert_eq!(labeled[0].0, "IN");
}

#[test]
fn primitive_list_round_trips_through_json() {
    let primitives = vec![
        line((0.0, 0.0), (1.5, 0.0)),
        Primitive::Arc(Arc {
            center: Point::new(1.5, 1.0),
            radius: 1.0,
            start_angle_deg: -90.0,
            end_angle_deg: 90.0,
        }),
    ];
    let json = serde_json::to_string(&primitives).unwrap();
    let back: Vec<Primitive> = serde_json::from_str(&json).unwrap();
    assert_eq!(primitives, back);
}
