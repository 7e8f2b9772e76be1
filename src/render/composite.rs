//! Per-pixel operations on premultiplied RGBA8 buffers.

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{BezelError, BezelResult};
use crate::foundation::math::mul_div255_u8;

/// Source-over `src` onto `dst`.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8]) -> BezelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BezelError::surface(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - sa;
        for c in 0..4 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
    Ok(())
}

/// Replace a coverage buffer's color with `color`, keeping coverage as the alpha weight.
pub(crate) fn tint_coverage_in_place(buf: &mut [u8], color: Rgba8Premul) {
    let c = color.to_array();
    for px in buf.chunks_exact_mut(4) {
        let cov = u16::from(px[3]);
        for i in 0..4 {
            px[i] = mul_div255_u8(u16::from(c[i]), cov);
        }
    }
}

/// Turn a white coverage buffer into the coverage of its complement.
pub(crate) fn invert_coverage_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        px.fill(255 - px[3]);
    }
}

/// Copy `src` into `dst` translated by `(dx, dy)`; uncovered pixels become transparent.
pub(crate) fn shift_into(src: &[u8], dst: &mut Vec<u8>, width: u32, height: u32, dx: i32, dy: i32) {
    dst.clear();
    dst.resize(src.len(), 0);
    if dx == 0 && dy == 0 {
        dst.copy_from_slice(src);
        return;
    }

    let (w, h) = (width as i64, height as i64);
    let (dx, dy) = (i64::from(dx), i64::from(dy));
    let x_lo = dx.clamp(0, w);
    let x_hi = (w + dx).clamp(0, w);
    if x_lo >= x_hi {
        return;
    }
    let row_bytes = ((x_hi - x_lo) * 4) as usize;
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        let s = ((sy * w + (x_lo - dx)) * 4) as usize;
        let d = ((y * w + x_lo) * 4) as usize;
        dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
    }
}

/// Copy the `width` x `height` window at `(x0, y0)` of a `src_width`-wide buffer into `dst`.
pub(crate) fn crop_into(
    src: &[u8],
    src_width: u32,
    x0: u32,
    y0: u32,
    dst: &mut Vec<u8>,
    width: u32,
    height: u32,
) -> BezelResult<()> {
    let (sw, x0, y0) = (src_width as usize, x0 as usize, y0 as usize);
    let (w, h) = (width as usize, height as usize);
    if x0 + w > sw || (y0 + h) * sw * 4 > src.len() {
        return Err(BezelError::surface("crop window exceeds the source buffer"));
    }
    dst.clear();
    dst.reserve(w * h * 4);
    for row in src.chunks_exact(sw * 4).skip(y0).take(h) {
        dst.extend_from_slice(&row[x0 * 4..(x0 + w) * 4]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
