use super::*;

#[test]
fn over_in_place_transparent_src_keeps_dst() {
    let mut dst = vec![10, 20, 30, 255];
    over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn over_in_place_opaque_src_replaces_dst() {
    let mut dst = vec![10, 20, 30, 255];
    over_in_place(&mut dst, &[200, 100, 50, 255]).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255]);
}

#[test]
fn over_in_place_half_alpha_blends() {
    let mut dst = vec![0, 0, 200, 255];
    over_in_place(&mut dst, &[128, 0, 0, 128]).unwrap();
    assert_eq!(dst[0], 128);
    assert_eq!(dst[2], 100);
    assert_eq!(dst[3], 255);
}

#[test]
fn over_in_place_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn tint_coverage_uses_alpha_as_weight() {
    let mut buf = vec![255, 255, 255, 255, 255, 255, 255, 0, 0, 0, 0, 128];
    tint_coverage_in_place(&mut buf, Rgba8Premul::from_straight_rgba(100, 0, 0, 255));
    assert_eq!(&buf[0..4], &[100, 0, 0, 255]);
    assert_eq!(&buf[4..8], &[0, 0, 0, 0]);
    assert_eq!(&buf[8..12], &[50, 0, 0, 128]);
}

#[test]
fn inverted_coverage_is_white_outside_the_shape() {
    let mut buf = vec![255, 255, 255, 255, 0, 0, 0, 0, 64, 64, 64, 64];
    invert_coverage_in_place(&mut buf);
    assert_eq!(buf, vec![0, 0, 0, 0, 255, 255, 255, 255, 191, 191, 191, 191]);
}

#[test]
fn shift_into_translates_and_clears_uncovered() {
    // 3x1 row: A B C
    let src = vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3];
    let mut dst = Vec::new();

    shift_into(&src, &mut dst, 3, 1, 1, 0);
    assert_eq!(dst, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);

    shift_into(&src, &mut dst, 3, 1, -2, 0);
    assert_eq!(dst, vec![3, 3, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0]);

    shift_into(&src, &mut dst, 3, 1, 0, 1);
    assert!(dst.iter().all(|&b| b == 0));

    shift_into(&src, &mut dst, 3, 1, 5, 0);
    assert!(dst.iter().all(|&b| b == 0));
}

#[test]
fn crop_into_copies_the_window() {
    // 3x3 buffer whose pixel value is its index.
    let src: Vec<u8> = (0u8..9).flat_map(|i| [i; 4]).collect();
    let mut dst = Vec::new();
    crop_into(&src, 3, 1, 1, &mut dst, 2, 2).unwrap();
    assert_eq!(dst, [[4u8; 4], [5; 4], [7; 4], [8; 4]].concat());

    assert!(crop_into(&src, 3, 2, 0, &mut dst, 2, 1).is_err());
    assert!(crop_into(&src, 3, 0, 2, &mut dst, 1, 2).is_err());
}
