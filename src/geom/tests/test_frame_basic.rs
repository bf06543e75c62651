use crate::geom::{Frame, Point2, Point3, Tolerance, Transform, Vec3};

fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn to_world_matches_lift() {
    let frame = Frame::new(
        Point3::new(5.0, -2.0, 3.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    )
    .unwrap();
    let uv = Point2::new(2.5, -4.0);
    let lifted = frame.lift(uv);
    let via_transform = frame.to_world().apply_point(Point3::new(uv.x, uv.y, 0.0));
    assert!(Tolerance::DEFAULT.approx_eq_point3(lifted, via_transform));
}

#[test]
fn rotated_frame_projects_onto_its_axes() {
    let frame = Frame::new(Point3::ORIGIN, Vec3::Y, -Vec3::X).unwrap();
    let p = frame.project(Point3::new(3.0, 4.0, 0.0));
    assert!(approx_eq(p.x, 4.0, 1e-12));
    assert!(approx_eq(p.y, -3.0, 1e-12));
    assert!(Tolerance::DEFAULT.approx_eq_vec3(frame.normal(), Vec3::Z));
}

#[test]
fn vertical_section_frame() {
    // A section plane facing +Y: right = +X, up = +Z.
    let frame = Frame::new(Point3::new(0.0, 10.0, 0.0), Vec3::X, Vec3::Z).unwrap();
    let p = frame.project(Point3::new(2.0, 50.0, 7.0));
    assert_eq!(p, Point2::new(2.0, 7.0));
    assert_eq!(frame.lift(p), Point3::new(2.0, 10.0, 7.0));
}

#[test]
fn non_finite_origin_is_rejected() {
    assert!(Frame::new(Point3::new(f64::NAN, 0.0, 0.0), Vec3::X, Vec3::Y).is_none());
}

#[test]
fn transform_applies_rows() {
    let t = Transform::from_rows(
        [0.0, -1.0, 0.0, 1.0],
        [1.0, 0.0, 0.0, 2.0],
        [0.0, 0.0, 1.0, 3.0],
    );
    assert_eq!(t.apply_point(Point3::new(1.0, 0.0, 0.0)), Point3::new(1.0, 3.0, 3.0));
    assert_eq!(t.apply_vec(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
    assert!(t.is_finite());
    assert_eq!(t.as_matrix()[3], [0.0, 0.0, 0.0, 1.0]);
}
