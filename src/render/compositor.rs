//! Paints the layer stack onto a provisioned [`Surface`].

use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::texture::TextureState;
use crate::config::{LayerStyle, ShadowSpec};
use crate::foundation::core::{Affine, BezPath, Color, Rect};
use crate::foundation::error::{BezelError, BezelResult};
use crate::geometry::path::FramePath;
use crate::render::blur::gaussian_blur_in_place;
use crate::render::composite::{
    crop_into, invert_coverage_in_place, over_in_place, shift_into, tint_coverage_in_place,
};
use crate::render::layers::{Layer, PassKind, edge_rect, layer_stack};
use crate::render::raster::{FillRule, Paint, Rasterizer, image_paint};
use crate::render::surface::Surface;

const COVERAGE: Color = Color::rgb(255, 255, 255);

/// Passes executed by one [`LayerCompositor::composite`] call, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CompositeReport {
    /// Executed passes; each shadow counts once.
    pub passes: Vec<PassKind>,
}

impl CompositeReport {
    /// Whether at least one pass of `kind` ran.
    pub fn contains(&self, kind: PassKind) -> bool {
        self.passes.contains(&kind)
    }

    /// Number of passes of `kind` that ran.
    pub fn count(&self, kind: PassKind) -> usize {
        self.passes.iter().filter(|&&k| k == kind).count()
    }
}

/// Full-repaint compositor. Scratch buffers are reused across draws.
pub struct LayerCompositor {
    layers: Vec<Layer>,
    base_color: Color,
    coverage: Vec<u8>,
    scratch: Scratch,
    grain: GrainPaint,
}

impl LayerCompositor {
    /// Compositor painting `style`.
    pub fn new(style: &LayerStyle) -> Self {
        Self {
            layers: layer_stack(style),
            base_color: style.base_color,
            coverage: Vec::new(),
            scratch: Scratch::default(),
            grain: GrainPaint::default(),
        }
    }

    /// Layers in paint order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Clear `surface` and repaint every applicable layer for `frame`.
    ///
    /// The surface must have been provisioned; `frame` is in logical px and is scaled by the
    /// surface's pixel density. Grain is skipped unless `texture` is ready; edge lighting is
    /// skipped when the surface has no blur filter or the frame has no cutout. Screen insets
    /// also need a cutout.
    #[tracing::instrument(skip_all, fields(layers = self.layers.len()))]
    pub fn composite(
        &mut self,
        surface: &mut Surface,
        frame: &FramePath,
        texture: &TextureState,
    ) -> BezelResult<CompositeReport> {
        let viewport = surface
            .viewport()
            .ok_or_else(|| BezelError::surface("surface was never provisioned"))?;
        let caps = surface.caps();
        let pixmap = surface
            .pixmap_mut()
            .ok_or_else(|| BezelError::surface("surface has no backing store"))?;
        let (w, h) = (u32::from(pixmap.width()), u32::from(pixmap.height()));
        let dst = pixmap.data_as_u8_slice_mut();
        dst.fill(0);

        let density = viewport.pixel_density;
        let transform = viewport.device_transform();
        let scratch = &mut self.scratch;
        scratch.raster.fill_path(
            w,
            h,
            frame.path(),
            transform,
            FillRule::EvenOdd,
            &Paint::Solid(COVERAGE),
            &mut self.coverage,
        )?;

        let mut report = CompositeReport::default();
        for layer in &self.layers {
            match layer {
                Layer::Underlay(color) => {
                    let all = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
                    scratch
                        .raster
                        .fill_rect(w, h, all, Affine::IDENTITY, *color, &mut scratch.layer)?;
                    over_in_place(dst, &scratch.layer)?;
                    report.passes.push(PassKind::Underlay);
                }
                Layer::Shadow(spec) => {
                    shift_into(
                        &self.coverage,
                        &mut scratch.layer,
                        w,
                        h,
                        device_offset(spec.offset_x, density),
                        device_offset(spec.offset_y, density),
                    );
                    let sigma = spec.blur * 0.5 * density;
                    if sigma > 0.0 {
                        gaussian_blur_in_place(
                            &mut scratch.layer,
                            &mut scratch.blur_tmp,
                            w,
                            h,
                            sigma,
                        )?;
                    }
                    tint_coverage_in_place(&mut scratch.layer, spec.color.to_premul());
                    over_in_place(dst, &scratch.layer)?;

                    // The cast shadow is drawn with the frame itself, like a canvas fill.
                    paint_fill(&self.coverage, &mut scratch.layer, self.base_color, dst)?;
                    report.passes.push(PassKind::OuterShadow);
                }
                Layer::BaseFill(color) => {
                    paint_fill(&self.coverage, &mut scratch.layer, *color, dst)?;
                    report.passes.push(PassKind::BaseFill);
                }
                Layer::Grain { alpha } => {
                    let Some(img) = texture.image() else {
                        tracing::trace!("grain skipped: texture not ready");
                        continue;
                    };
                    let paint = Paint::Image {
                        image: self.grain.image_for(img)?,
                        opacity: *alpha,
                    };
                    scratch.raster.fill_path(
                        w,
                        h,
                        frame.path(),
                        transform,
                        FillRule::EvenOdd,
                        &paint,
                        &mut scratch.layer,
                    )?;
                    over_in_place(dst, &scratch.layer)?;
                    report.passes.push(PassKind::Grain);
                }
                Layer::EdgeLighting { blur, edges } => {
                    if !caps.blur_filter {
                        tracing::debug!("edge lighting skipped: surface has no blur filter");
                        continue;
                    }
                    if !frame.has_cutout() {
                        continue;
                    }
                    let sigma = blur * density;
                    for edge in edges {
                        scratch.raster.fill_rect(
                            w,
                            h,
                            edge_rect(frame.cutout(), edge),
                            transform,
                            edge.color,
                            &mut scratch.layer,
                        )?;
                        if sigma > 0.0 {
                            gaussian_blur_in_place(
                                &mut scratch.layer,
                                &mut scratch.blur_tmp,
                                w,
                                h,
                                sigma,
                            )?;
                        }
                        let lit = scratch.clip_layer(
                            w,
                            h,
                            frame.path(),
                            transform,
                            FillRule::EvenOdd,
                        )?;
                        over_in_place(dst, lit)?;
                    }
                    report.passes.push(PassKind::EdgeLighting);
                }
                Layer::ScreenInset(specs) => {
                    if !frame.has_cutout() {
                        continue;
                    }
                    let screen = frame.cutout_subpath();
                    for spec in specs {
                        let shade =
                            scratch.inset_shadow(w, h, &screen, transform, density, spec)?;
                        over_in_place(dst, shade)?;
                    }
                    report.passes.push(PassKind::ScreenInset);
                }
                Layer::FrameInset(specs) => {
                    let border = frame.outer_subpath();
                    for spec in specs {
                        let shade =
                            scratch.inset_shadow(w, h, &border, transform, density, spec)?;
                        over_in_place(dst, shade)?;
                    }
                    report.passes.push(PassKind::FrameInset);
                }
            }
        }

        tracing::debug!(width = w, height = h, passes = report.passes.len(), "composited");
        Ok(report)
    }
}

#[derive(Default)]
struct Scratch {
    raster: Rasterizer,
    layer: Vec<u8>,
    shape: Vec<u8>,
    blur_tmp: Vec<u8>,
}

impl Scratch {
    /// Fill `path` with the pixels of `self.layer`, leaving the result in `self.shape`.
    fn clip_layer(
        &mut self,
        width: u32,
        height: u32,
        path: &BezPath,
        transform: Affine,
        rule: FillRule,
    ) -> BezelResult<&[u8]> {
        let paint = Paint::Image {
            image: image_paint(&self.layer, width, height, false)?,
            opacity: 1.0,
        };
        self.raster
            .fill_path(width, height, path, transform, rule, &paint, &mut self.shape)?;
        Ok(&self.shape)
    }

    /// Inner shadow of `shape`: its blurred, offset complement tinted and clipped to `shape`.
    ///
    /// The complement is rasterized with a margin wide enough for the blur and the offset, so
    /// the area beyond the surface edge counts as fully outside.
    fn inset_shadow(
        &mut self,
        width: u32,
        height: u32,
        shape: &BezPath,
        transform: Affine,
        density: f64,
        spec: &ShadowSpec,
    ) -> BezelResult<&[u8]> {
        let dx = device_offset(spec.offset_x, density);
        let dy = device_offset(spec.offset_y, density);
        let sigma = spec.blur * 0.5 * density;
        let margin = ((sigma * 3.0).ceil() as u32)
            .saturating_add(dx.unsigned_abs().max(dy.unsigned_abs()))
            .saturating_add(1);
        let padded_w = width.saturating_add(margin.saturating_mul(2));
        let padded_h = height.saturating_add(margin.saturating_mul(2));

        let m = f64::from(margin);
        self.raster.fill_path(
            padded_w,
            padded_h,
            shape,
            Affine::translate((m, m)) * transform,
            FillRule::NonZero,
            &Paint::Solid(COVERAGE),
            &mut self.shape,
        )?;
        invert_coverage_in_place(&mut self.shape);
        if sigma > 0.0 {
            let (pw, ph) = (padded_w, padded_h);
            gaussian_blur_in_place(&mut self.shape, &mut self.blur_tmp, pw, ph, sigma)?;
        }

        let origin = |d: i32| {
            u32::try_from(i64::from(margin) - i64::from(d))
                .map_err(|_| BezelError::surface("inset offset exceeds its margin"))
        };
        crop_into(
            &self.shape,
            padded_w,
            origin(dx)?,
            origin(dy)?,
            &mut self.layer,
            width,
            height,
        )?;
        tint_coverage_in_place(&mut self.layer, spec.color.to_premul());
        self.clip_layer(width, height, shape, transform, FillRule::NonZero)
    }
}

/// Repeating image paint for the grain texture, rebuilt only when the texture changes.
#[derive(Default)]
struct GrainPaint {
    cached: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl GrainPaint {
    fn image_for(&mut self, img: &PreparedImage) -> BezelResult<vello_cpu::Image> {
        if let Some((source, image)) = &self.cached
            && Arc::ptr_eq(source, &img.rgba8_premul)
        {
            return Ok(image.clone());
        }
        let image = image_paint(&img.rgba8_premul, img.width, img.height, true)?;
        self.cached = Some((Arc::clone(&img.rgba8_premul), image.clone()));
        Ok(image)
    }
}

fn device_offset(logical: f64, density: f64) -> i32 {
    let v = (logical * density).round();
    v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

fn paint_fill(
    coverage: &[u8],
    scratch: &mut Vec<u8>,
    color: Color,
    dst: &mut [u8],
) -> BezelResult<()> {
    scratch.clear();
    scratch.extend_from_slice(coverage);
    tint_coverage_in_place(scratch, color.to_premul());
    over_in_place(dst, scratch)
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new(&LayerStyle::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
