//! Gaussian blur over premultiplied RGBA8 buffers.
//!
//! Three successive box blurs approximate the Gaussian, so cost does not grow with sigma. Edges
//! clamp to the nearest pixel.

use crate::foundation::error::{BezelError, BezelResult};

/// Blur `buf` in place with standard deviation `sigma` (device px). `tmp` is scratch space.
pub(crate) fn gaussian_blur_in_place(
    buf: &mut [u8],
    tmp: &mut Vec<u8>,
    width: u32,
    height: u32,
    sigma: f64,
) -> BezelResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BezelError::surface("blur buffer size overflow"))?;
    if buf.len() != expected_len {
        return Err(BezelError::surface(
            "gaussian_blur_in_place expects buf matching width*height*4",
        ));
    }
    if !sigma.is_finite() || sigma <= 0.0 || expected_len == 0 {
        return Ok(());
    }

    tmp.resize(expected_len, 0);
    let (w, h) = (width as usize, height as usize);
    for r in box_radii_for_gauss(sigma) {
        if r == 0 {
            continue;
        }
        horizontal_pass(buf, tmp, w, h, r);
        vertical_pass(tmp, buf, w, h, r);
    }
    Ok(())
}

/// Radii of three box filters whose convolution approximates a Gaussian of `sigma`.
pub(crate) fn box_radii_for_gauss(sigma: f64) -> [usize; 3] {
    const N: f64 = 3.0;
    let var12 = 12.0 * sigma * sigma;
    let w_ideal = (var12 / N + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal = (var12 - N * wlf * wlf - 4.0 * N * wlf - 3.0 * N) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round() as i64;

    let mut out = [0usize; 3];
    for (i, r) in out.iter_mut().enumerate() {
        let width = if (i as i64) < m { wl } else { wu };
        *r = ((width - 1) / 2) as usize;
    }
    out
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, r: usize) {
    let div = (2 * r + 1) as u32;
    let half = div / 2;
    let last = w as isize - 1;
    let at = |x: isize| -> usize { x.clamp(0, last) as usize };

    for y in 0..h {
        let row = y * w * 4;
        let mut acc = [0u32; 4];
        for i in -(r as isize)..=(r as isize) {
            let idx = row + at(i) * 4;
            for c in 0..4 {
                acc[c] += u32::from(src[idx + c]);
            }
        }
        for x in 0..w {
            let out_idx = row + x * 4;
            for c in 0..4 {
                dst[out_idx + c] = ((acc[c] + half) / div) as u8;
            }
            let old = row + at(x as isize - r as isize) * 4;
            let new = row + at(x as isize + r as isize + 1) * 4;
            for c in 0..4 {
                acc[c] = acc[c] + u32::from(src[new + c]) - u32::from(src[old + c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, r: usize) {
    let div = (2 * r + 1) as u32;
    let half = div / 2;
    let last = h as isize - 1;
    let at = |y: isize| -> usize { y.clamp(0, last) as usize };
    let stride = w * 4;

    for x in 0..w {
        let col = x * 4;
        let mut acc = [0u32; 4];
        for i in -(r as isize)..=(r as isize) {
            let idx = at(i) * stride + col;
            for c in 0..4 {
                acc[c] += u32::from(src[idx + c]);
            }
        }
        for y in 0..h {
            let out_idx = y * stride + col;
            for c in 0..4 {
                dst[out_idx + c] = ((acc[c] + half) / div) as u8;
            }
            let old = at(y as isize - r as isize) * stride + col;
            let new = at(y as isize + r as isize + 1) * stride + col;
            for c in 0..4 {
                acc[c] = acc[c] + u32::from(src[new + c]) - u32::from(src[old + c]);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
