use super::*;
use crate::config::{BezelConfig, PaddingFractions};
use crate::foundation::core::Viewport;
use crate::geometry::viewport::ViewportObserver;
use kurbo::{PathEl, Shape};

fn geometry(w: f64, h: f64, radius: f64) -> BezelGeometry {
    ViewportObserver::new(Viewport::logical(w, h), PaddingFractions::default(), radius).measure()
}

fn polyline(path: &BezPath) -> Vec<Point> {
    let mut pts = Vec::new();
    kurbo::flatten(path.elements().iter().copied(), 0.05, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => pts.push(p),
        _ => {}
    });
    pts
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);
    d1 * d2 < -1e-9 && d3 * d4 < -1e-9
}

fn assert_simple_closed(pts: &[Point]) {
    let n = pts.len();
    for i in 0..n {
        let (a0, a1) = (pts[i], pts[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b0, b1) = (pts[j], pts[(j + 1) % n]);
            assert!(
                !segments_cross(a0, a1, b0, b1),
                "segments {i} and {j} intersect"
            );
        }
    }
}

#[test]
fn reference_viewport_cutout_bounds() {
    let g = ViewportObserver::from_config(Viewport::logical(1000.0, 800.0), &BezelConfig::default())
        .measure();
    let fp = PathBuilder::default().build(&g, 1000.0, 800.0);
    assert_eq!(fp.outer(), Rect::new(0.0, 0.0, 1000.0, 800.0));

    let c = fp.cutout();
    assert!((c.x0 - 75.0).abs() < 1e-9 && (c.y0 - 72.0).abs() < 1e-9);
    assert!((c.x1 - 925.0).abs() < 1e-9 && (c.y1 - 728.0).abs() < 1e-9);

    let bb = fp.cutout_subpath().bounding_box();
    assert!((bb.x0 - c.x0).abs() < 1e-6 && (bb.y1 - c.y1).abs() < 1e-6);
}

#[test]
fn subpaths_are_wound_oppositely() {
    let fp = PathBuilder::default().build(&geometry(400.0, 300.0, 20.0), 400.0, 300.0);
    let outer = fp.outer_subpath().area();
    let inner = fp.cutout_subpath().area();
    assert!(outer != 0.0 && inner != 0.0);
    assert!(outer.signum() != inner.signum());
    assert!((outer.abs() - 400.0 * 300.0).abs() < 1e-6);
}

#[test]
fn cutout_area_accounts_for_rounded_corners() {
    let g = geometry(400.0, 300.0, 20.0);
    let fp = PathBuilder::default().build(&g, 400.0, 300.0);
    let c = fp.cutout();
    let r = fp.radius();
    let expected = c.area() - (4.0 - std::f64::consts::PI) * r * r;
    assert!((fp.cutout_subpath().area().abs() - expected).abs() < 2.0);
}

#[test]
fn oversize_radius_is_clamped_before_construction() {
    let mut g = geometry(200.0, 100.0, 20.0);
    g.screen_radius = 1_000.0;
    let fp = PathBuilder::default().build(&g, 200.0, 100.0);
    let c = fp.cutout();
    assert!((fp.radius() - c.height() / 2.0).abs() < 1e-9);
    assert_simple_closed(&polyline(&fp.cutout_subpath()));
}

#[test]
fn zero_radius_is_a_plain_rectangle() {
    let fp = PathBuilder::default().build(&geometry(300.0, 200.0, 0.0), 300.0, 200.0);
    let inner = fp.cutout_subpath();
    assert!(
        inner
            .elements()
            .iter()
            .all(|el| !matches!(el, PathEl::CurveTo(..) | PathEl::QuadTo(..)))
    );
    let c = fp.cutout();
    assert!((inner.area().abs() - c.area()).abs() < 1e-9);
    for corner in [
        Point::new(c.x0, c.y0),
        Point::new(c.x1, c.y0),
        Point::new(c.x1, c.y1),
        Point::new(c.x0, c.y1),
    ] {
        assert!(inner.elements().iter().any(|el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => *p == corner,
            _ => false,
        }));
    }
}

#[test]
fn cutout_is_strictly_interior_and_simple_across_geometries() {
    for &(w, h) in &[(64.0, 48.0), (320.0, 240.0), (1000.0, 800.0), (390.0, 844.0)] {
        for &radius in &[0.0, 1.0, 8.0, 20.0, 75.0, 10_000.0] {
            let g = geometry(w, h, radius);
            let fp = PathBuilder::default().build(&g, w, h);
            assert!(fp.has_cutout());

            let outer = fp.outer();
            let bb = fp.cutout_subpath().bounding_box();
            assert!(bb.x0 > outer.x0 && bb.y0 > outer.y0, "{w}x{h} r={radius}");
            assert!(bb.x1 < outer.x1 && bb.y1 < outer.y1, "{w}x{h} r={radius}");

            let c = fp.cutout();
            assert!(fp.radius() <= c.width().min(c.height()) / 2.0 + 1e-9);
            assert_simple_closed(&polyline(&fp.cutout_subpath()));
        }
    }
}

#[test]
fn empty_cutout_emits_outer_only() {
    let g = geometry(0.0, 0.0, 20.0);
    let fp = PathBuilder::default().build(&g, 0.0, 0.0);
    assert!(!fp.has_cutout());
    assert_eq!(fp.cutout_subpath().elements().len(), 0);
}
