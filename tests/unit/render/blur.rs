use super::*;

#[test]
fn blur_sigma_0_is_identity() {
    let mut buf = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let mut tmp = Vec::new();
    gaussian_blur_in_place(&mut buf, &mut tmp, 1, 2, 0.0).unwrap();
    assert_eq!(buf, vec![1u8, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (7u32, 5u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let mut buf = src.clone();
    let mut tmp = Vec::new();
    gaussian_blur_in_place(&mut buf, &mut tmp, w, h, 9.0).unwrap();
    assert_eq!(buf, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (21u32, 21u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    let center = ((10 * w + 10) * 4) as usize;
    buf[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    let mut tmp = Vec::new();

    gaussian_blur_in_place(&mut buf, &mut tmp, w, h, 1.5).unwrap();

    let nonzero = buf.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let center_a = buf[center + 3];
    assert!(center_a < 255 && center_a > 0);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    let mut buf = vec![0u8; 12];
    let mut tmp = Vec::new();
    assert!(gaussian_blur_in_place(&mut buf, &mut tmp, 2, 2, 1.0).is_err());
}

#[test]
fn box_radii_grow_with_sigma() {
    let small = box_radii_for_gauss(1.0);
    let large = box_radii_for_gauss(45.0);
    assert!(large.iter().sum::<usize>() > small.iter().sum::<usize>());
    for pair in large.windows(2) {
        assert!(pair[0] <= pair[1]);
        assert!(pair[1] - pair[0] <= 1);
    }
}

#[test]
fn blur_hard_edge_becomes_ramp() {
    let (w, h) = (64u32, 1u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    for x in 0..32usize {
        buf[x * 4..x * 4 + 4].copy_from_slice(&[255, 255, 255, 255]);
    }
    let mut tmp = Vec::new();
    gaussian_blur_in_place(&mut buf, &mut tmp, w, h, 4.0).unwrap();

    let alphas: Vec<u8> = buf.chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alphas[0], 255);
    assert_eq!(alphas[63], 0);
    for pair in alphas.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    assert!(alphas[31] > 64 && alphas[31] < 192);
}
