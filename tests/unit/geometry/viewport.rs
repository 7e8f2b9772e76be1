use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn observer(w: f64, h: f64) -> ViewportObserver<Viewport> {
    ViewportObserver::from_config(Viewport::logical(w, h), &BezelConfig::default())
}

#[test]
fn measure_1000x800_matches_reference_padding() {
    let g = observer(1000.0, 800.0).measure();
    assert!(approx(g.padding_top, 72.0));
    assert!(approx(g.padding_bottom, 72.0));
    assert!(approx(g.padding_left, 75.0));
    assert!(approx(g.padding_right, 75.0));
    assert!(approx(g.screen_radius, 20.0));

    let c = g.cutout(1000.0, 800.0);
    assert!(approx(c.x0, 75.0) && approx(c.y0, 72.0));
    assert!(approx(c.x1, 925.0) && approx(c.y1, 728.0));
    assert!(approx(c.width(), 850.0) && approx(c.height(), 656.0));
}

#[test]
fn padding_scales_linearly_with_viewport() {
    let a = observer(640.0, 480.0).measure();
    let b = observer(1280.0, 960.0).measure();
    assert!(approx(b.padding_top, 2.0 * a.padding_top));
    assert!(approx(b.padding_left, 2.0 * a.padding_left));
    assert!(approx(b.padding_right, 2.0 * a.padding_right));
    assert!(approx(b.padding_bottom, 2.0 * a.padding_bottom));
    assert_eq!(a.screen_radius, b.screen_radius);
}

#[test]
fn density_does_not_change_logical_geometry() {
    let cfg = BezelConfig::default();
    let g1 = ViewportObserver::from_config(Viewport::new(800.0, 600.0, 1.0), &cfg).measure();
    let g2 = ViewportObserver::from_config(Viewport::new(800.0, 600.0, 3.0), &cfg).measure();
    assert_eq!(g1, g2);
}

#[test]
fn radius_is_clamped_to_half_the_shorter_cutout_side() {
    let obs = ViewportObserver::new(
        Viewport::logical(100.0, 60.0),
        PaddingFractions::default(),
        500.0,
    );
    let g = obs.measure();
    let c = g.cutout(100.0, 60.0);
    assert!(approx(g.screen_radius, c.height() / 2.0));
}

#[test]
fn zero_viewport_yields_zero_geometry() {
    let g = observer(0.0, 0.0).measure();
    assert_eq!(g.padding_top, 0.0);
    assert_eq!(g.padding_left, 0.0);
    assert_eq!(g.screen_radius, 0.0);
}
