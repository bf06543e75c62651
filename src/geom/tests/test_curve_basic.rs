use crate::geom::{
    Arc3, Curve3, CurveEnd, GridCurve, Line3, Point3, Polyline3, Tolerance, Vec3,
};

#[test]
fn arc_tessellation_starts_and_ends_on_the_arc() {
    let arc = Arc3::new(
        Point3::ORIGIN,
        Vec3::X,
        Vec3::Y,
        2.0,
        0.0,
        std::f64::consts::FRAC_PI_2,
    );
    let pts = arc.tessellate().unwrap();
    let tol = Tolerance::DEFAULT;
    assert!(pts.len() > 2);
    assert!(tol.approx_eq_point3(pts[0], Point3::new(2.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(*pts.last().unwrap(), Point3::new(0.0, 2.0, 0.0)));
    assert!(pts.iter().all(|p| (p.to_vec3().length() - 2.0).abs() < 1e-12));
    assert!(tol.approx_eq_point3(arc.end_point(CurveEnd::End1), Point3::new(0.0, 2.0, 0.0)));
}

#[test]
fn arc_with_zero_radius_has_no_tessellation() {
    let arc = Arc3::new(Point3::ORIGIN, Vec3::X, Vec3::Y, 0.0, 0.0, 1.0);
    assert!(arc.tessellate().is_none());
}

#[test]
fn polyline_is_parameterized_by_arc_length() {
    let polyline = Polyline3::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 0.0, 0.0),
        Point3::new(3.0, 4.0, 0.0),
    ])
    .unwrap();
    assert_eq!(polyline.length(), 7.0);
    assert_eq!(polyline.point_at(0.5), Point3::new(3.0, 0.5, 0.0));
    assert_eq!(polyline.point_at(1.0), Point3::new(3.0, 4.0, 0.0));
    assert_eq!(polyline.point_at(-2.0), Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn polyline_rejects_short_or_non_finite_input() {
    assert!(Polyline3::new(vec![Point3::ORIGIN]).is_err());
    assert!(Polyline3::new(vec![Point3::ORIGIN, Point3::new(f64::NAN, 0.0, 0.0)]).is_err());
}

#[test]
fn grid_curve_variants() {
    let line = Line3::new(Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, 5.0, 0.0));
    let grid: GridCurve = line.into();
    assert!(grid.is_line());
    assert_eq!(grid.as_line(), Some(line));
    assert_eq!(grid.chord(), line);
    assert!(!grid.is_degenerate(Tolerance::DEFAULT));

    let arc: GridCurve = Arc3::new(Point3::ORIGIN, Vec3::X, Vec3::Y, 1.0, 0.0, 1.0).into();
    assert!(arc.as_line().is_none());
    assert!(Tolerance::DEFAULT.approx_eq_point3(arc.chord().start, Point3::new(1.0, 0.0, 0.0)));

    let dot: GridCurve = Line3::new(Point3::ORIGIN, Point3::ORIGIN).into();
    assert!(dot.is_degenerate(Tolerance::DEFAULT));
}

#[test]
fn bounded_line_enforces_minimum_length() {
    assert!(Line3::bounded(Point3::ORIGIN, Point3::new(1e-5, 0.0, 0.0), 1e-4).is_none());
    let line = Line3::bounded(Point3::ORIGIN, Point3::new(0.0, 2.0, 0.0), 1e-4).unwrap();
    assert_eq!(line.reversed().start, Point3::new(0.0, 2.0, 0.0));
    assert_eq!(line.unit_direction(), Some(Vec3::Y));
}

#[test]
fn arc_tessellation_is_bounded_for_huge_sweeps() {
    for sweep in [1e12, -1e300] {
        let arc = Arc3::new(Point3::ORIGIN, Vec3::X, Vec3::Y, 1.0, 0.0, sweep);
        let pts = arc.tessellate().unwrap();
        assert_eq!(pts.len(), 1025);
        assert!(pts.iter().all(|p| p.is_finite()));
    }
}

#[test]
fn polyline_deserialization_goes_through_validation() {
    let empty: Result<GridCurve, _> = serde_json::from_str(r#"{"Polyline":[]}"#);
    assert!(empty.is_err());
    let raw_fields: Result<GridCurve, _> =
        serde_json::from_str(r#"{"Polyline":{"points":[],"cumulative_lengths":[]}}"#);
    assert!(raw_fields.is_err());

    let grid: GridCurve =
        serde_json::from_str(r#"{"Polyline":[{"x":0,"y":0,"z":0},{"x":0,"y":4,"z":0}]}"#).unwrap();
    assert_eq!(grid.point_at(0.5), Point3::new(0.0, 2.0, 0.0));
    let json = serde_json::to_string(&grid).unwrap();
    assert_eq!(serde_json::from_str::<GridCurve>(&json).unwrap(), grid);
}
