//! Thin wrapper over a reusable `vello_cpu` render context.
//!
//! Every call resets the context and sets paint, transform, and fill rule explicitly, so no
//! drawing state carries over between passes or frames.

use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Color, Rect};
use crate::foundation::error::{BezelError, BezelResult};

/// Fill rule for coverage passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    fn to_cpu(self) -> vello_cpu::peniko::Fill {
        match self {
            Self::NonZero => vello_cpu::peniko::Fill::NonZero,
            Self::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
        }
    }
}

/// What a fill paints with.
#[derive(Clone, Debug)]
pub(crate) enum Paint {
    Solid(Color),
    /// Image sampled one texel per device pixel from the target origin, under a global opacity.
    Image {
        image: vello_cpu::Image,
        opacity: f32,
    },
}

/// Wrap premultiplied RGBA8 bytes as a nearest-sampled image paint.
///
/// `repeat` tiles the image on both axes; otherwise edge pixels are extended.
pub(crate) fn image_paint(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
    repeat: bool,
) -> BezelResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BezelError::texture("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BezelError::texture("image height exceeds u16"))?;
    if w == 0 || h == 0 || rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(BezelError::texture("image has no pixels or a length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);

    let extend = if repeat {
        vello_cpu::peniko::Extend::Repeat
    } else {
        vello_cpu::peniko::Extend::Pad
    };
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
    .with_extend(extend)
    .with_quality(vello_cpu::peniko::ImageQuality::Low))
}

#[derive(Default)]
pub(crate) struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    target: Option<vello_cpu::Pixmap>,
}

impl Rasterizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fill `path` (logical units, mapped through `transform`) into `out` as premultiplied RGBA8.
    ///
    /// Image paints ignore `transform` and stay in device pixels.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn fill_path(
        &mut self,
        width: u32,
        height: u32,
        path: &BezPath,
        transform: Affine,
        rule: FillRule,
        paint: &Paint,
        out: &mut Vec<u8>,
    ) -> BezelResult<()> {
        let cpu_path = bezpath_to_cpu(path);
        self.render(width, height, out, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_fill_rule(rule.to_cpu());
            match paint {
                Paint::Solid(color) => {
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.fill_path(&cpu_path);
                }
                Paint::Image { image, opacity } => {
                    ctx.set_paint_transform(affine_to_cpu(transform.inverse()));
                    ctx.set_paint(image.clone());
                    if *opacity < 1.0 {
                        ctx.push_opacity_layer(*opacity);
                    }
                    ctx.fill_path(&cpu_path);
                    if *opacity < 1.0 {
                        ctx.pop_layer();
                    }
                }
            }
        })
    }

    /// Fill an axis-aligned rect (logical units, mapped through `transform`) into `out`.
    pub(crate) fn fill_rect(
        &mut self,
        width: u32,
        height: u32,
        rect: Rect,
        transform: Affine,
        color: Color,
        out: &mut Vec<u8>,
    ) -> BezelResult<()> {
        self.render(width, height, out, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_fill_rule(FillRule::NonZero.to_cpu());
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        })
    }

    fn render(
        &mut self,
        width: u32,
        height: u32,
        out: &mut Vec<u8>,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> BezelResult<()> {
        let w: u16 = width
            .try_into()
            .map_err(|_| BezelError::surface("raster width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| BezelError::surface("raster height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(BezelError::surface("raster target has no area"));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let mut target = match self.target.take() {
            Some(pm) if pm.width() == w && pm.height() == h => pm,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        target.data_as_u8_slice_mut().fill(0);

        draw(&mut ctx);
        ctx.flush();
        ctx.render_to_pixmap(&mut target);

        out.clear();
        out.extend_from_slice(target.data_as_u8_slice());

        self.ctx = Some(ctx);
        self.target = Some(target);
        Ok(())
    }
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    let a = crate::foundation::math::unit_to_u8(c.alpha);
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
