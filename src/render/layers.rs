//! The ordered layer stack painted on every draw.

use crate::config::{EdgeLightSpec, EdgeSide, LayerStyle, ShadowSpec};
use crate::foundation::core::{Color, Rect};

/// One compositing pass kind, in paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// Opaque backdrop under the whole surface.
    Underlay,
    /// Blurred drop shadow cast by the frame.
    OuterShadow,
    /// Opaque bezel material.
    BaseFill,
    /// Tiled grain texture.
    Grain,
    /// Blurred recess shading and rim highlights along the cutout.
    EdgeLighting,
    /// Inset shadows inside the screen cutout.
    ScreenInset,
    /// Inset shadows along the surface border.
    FrameInset,
}

/// A configured layer, ready to be composited.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    /// Solid fill of the whole surface.
    Underlay(Color),
    /// Drop shadow of the frame path.
    Shadow(ShadowSpec),
    /// Solid fill of the frame path.
    BaseFill(Color),
    /// Grain texture clipped to the frame path; skipped unless the texture is ready.
    Grain {
        /// Global opacity of the texture.
        alpha: f32,
    },
    /// Edge rectangles clipped to the frame path; skipped without blur support.
    EdgeLighting {
        /// Gaussian sigma, logical px.
        blur: f64,
        /// Rectangles in draw order.
        edges: Vec<EdgeLightSpec>,
    },
    /// Inset shadows of the rounded cutout, clipped to it; skipped when there is no cutout.
    ScreenInset(Vec<ShadowSpec>),
    /// Inset shadows of the outer rectangle.
    FrameInset(Vec<ShadowSpec>),
}

impl Layer {
    /// Pass kind this layer belongs to.
    pub fn kind(&self) -> PassKind {
        match self {
            Self::Underlay(_) => PassKind::Underlay,
            Self::Shadow(_) => PassKind::OuterShadow,
            Self::BaseFill(_) => PassKind::BaseFill,
            Self::Grain { .. } => PassKind::Grain,
            Self::EdgeLighting { .. } => PassKind::EdgeLighting,
            Self::ScreenInset(_) => PassKind::ScreenInset,
            Self::FrameInset(_) => PassKind::FrameInset,
        }
    }
}

/// Expand a style into its layers.
///
/// Order: underlay, shadows, base fill, grain, edge lighting, screen insets, frame insets.
/// Optional layers with nothing configured are left out.
pub fn layer_stack(style: &LayerStyle) -> Vec<Layer> {
    let mut out: Vec<Layer> = style.underlay.into_iter().map(Layer::Underlay).collect();
    out.extend(style.shadows.iter().copied().map(Layer::Shadow));
    out.push(Layer::BaseFill(style.base_color));
    out.push(Layer::Grain {
        alpha: style.grain_alpha,
    });
    out.push(Layer::EdgeLighting {
        blur: style.edge_blur,
        edges: style.edges.clone(),
    });
    if !style.screen_insets.is_empty() {
        out.push(Layer::ScreenInset(style.screen_insets.clone()));
    }
    if !style.frame_insets.is_empty() {
        out.push(Layer::FrameInset(style.frame_insets.clone()));
    }
    out
}

/// Rectangle drawn for one edge light, logical px.
///
/// The rectangle runs along the edge extended by `extend` at both ends; `overhang` of its
/// `thickness` lies on the bezel side and the rest reaches into the cutout.
pub fn edge_rect(cutout: Rect, spec: &EdgeLightSpec) -> Rect {
    let (ext, thick, over) = (spec.extend, spec.thickness, spec.overhang);
    match spec.side {
        EdgeSide::Top => Rect::new(
            cutout.x0 - ext,
            cutout.y0 - over,
            cutout.x1 + ext,
            cutout.y0 - over + thick,
        ),
        EdgeSide::Bottom => Rect::new(
            cutout.x0 - ext,
            cutout.y1 + over - thick,
            cutout.x1 + ext,
            cutout.y1 + over,
        ),
        EdgeSide::Left => Rect::new(
            cutout.x0 - over,
            cutout.y0 - ext,
            cutout.x0 - over + thick,
            cutout.y1 + ext,
        ),
        EdgeSide::Right => Rect::new(
            cutout.x1 + over - thick,
            cutout.y0 - ext,
            cutout.x1 + over,
            cutout.y1 + ext,
        ),
    }
}
