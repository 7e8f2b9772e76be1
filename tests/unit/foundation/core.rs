use super::*;

#[test]
fn viewport_sanitizes_host_values() {
    let v = Viewport::new(-10.0, f64::NAN, 0.0);
    assert_eq!(v.width, 0.0);
    assert_eq!(v.height, 0.0);
    assert_eq!(v.pixel_density, 1.0);

    let v = Viewport::new(800.0, 600.0, f64::INFINITY);
    assert_eq!(v.pixel_density, 1.0);
}

#[test]
fn viewport_device_size_scales_and_rounds() {
    assert_eq!(Viewport::new(1000.0, 800.0, 1.0).device_size(), (1000, 800));
    assert_eq!(Viewport::new(1000.0, 800.0, 2.0).device_size(), (2000, 1600));
    assert_eq!(Viewport::new(333.0, 101.0, 1.5).device_size(), (500, 152));
}

#[test]
fn color_premultiplies_unit_alpha() {
    let c = Color::rgba(71, 66, 61, 0.4).to_premul();
    assert_eq!(c.a, 102);
    assert_eq!(c.r, ((71u16 * 102 + 127) / 255) as u8);

    let opaque = Color::rgb(0xb0, 0xab, 0xa5).to_premul();
    assert_eq!(opaque.to_array(), [0xb0, 0xab, 0xa5, 255]);
}

#[test]
fn color_alpha_defaults_to_opaque_in_json() {
    let c: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));
}
