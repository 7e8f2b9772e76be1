use std::path::Path;

use anyhow::Context as _;

use crate::assets::texture::TextureKey;
use crate::foundation::core::Color;
use crate::foundation::error::{BezelError, BezelResult};

/// Default address of the tileable grain image.
pub const DEFAULT_TEXTURE_URL: &str = "image/device-texture.webp";

/// Default inner screen corner radius in logical pixels.
pub const DEFAULT_SCREEN_RADIUS: f64 = 20.0;

/// Bezel padding as fractions of the viewport: top/bottom of height, left/right of width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaddingFractions {
    /// Fraction of viewport height above the cutout.
    pub top: f64,
    /// Fraction of viewport height below the cutout.
    pub bottom: f64,
    /// Fraction of viewport width left of the cutout.
    pub left: f64,
    /// Fraction of viewport width right of the cutout.
    pub right: f64,
}

impl Default for PaddingFractions {
    fn default() -> Self {
        Self {
            top: 0.09,
            bottom: 0.09,
            left: 0.075,
            right: 0.075,
        }
    }
}

/// One blurred, offset shadow: cast outward by the frame, or inward for inset overlays.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowSpec {
    /// Canvas-style shadow blur (sigma is half of this), logical px.
    pub blur: f64,
    /// Horizontal offset, logical px.
    pub offset_x: f64,
    /// Vertical offset, logical px.
    pub offset_y: f64,
    /// Shadow color.
    pub color: Color,
}

/// Cutout edge an edge-lighting rectangle hugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSide {
    /// Top edge of the cutout.
    Top,
    /// Left edge of the cutout.
    Left,
    /// Bottom edge of the cutout.
    Bottom,
    /// Right edge of the cutout.
    Right,
}

/// A blurred directional rectangle along one cutout edge.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeLightSpec {
    /// Which cutout edge the rectangle follows.
    pub side: EdgeSide,
    /// Fill color (dark for recess shading, light for rim highlights).
    pub color: Color,
    /// Extension beyond each end of the edge, logical px.
    #[serde(default = "default_edge_extend")]
    pub extend: f64,
    /// Thickness across the edge, logical px.
    #[serde(default = "default_edge_thickness")]
    pub thickness: f64,
    /// Portion of the thickness lying on the bezel side of the edge, logical px.
    #[serde(default = "default_edge_overhang")]
    pub overhang: f64,
}

fn default_edge_extend() -> f64 {
    40.0
}

fn default_edge_thickness() -> f64 {
    50.0
}

fn default_edge_overhang() -> f64 {
    10.0
}

impl EdgeLightSpec {
    fn new(side: EdgeSide, color: Color) -> Self {
        Self {
            side,
            color,
            extend: default_edge_extend(),
            thickness: default_edge_thickness(),
            overhang: default_edge_overhang(),
        }
    }
}

/// Visual parameters of the layer stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    /// Bezel material color.
    pub base_color: Color,
    /// Outer drop shadows, drawn in order.
    pub shadows: Vec<ShadowSpec>,
    /// Opacity of the tiled grain texture.
    pub grain_alpha: f32,
    /// Blur radius (sigma) of the edge-lighting rectangles, logical px.
    pub edge_blur: f64,
    /// Edge-lighting rectangles, drawn in order.
    pub edges: Vec<EdgeLightSpec>,
    /// Opaque backdrop under every other layer, cutout included. Off by default.
    pub underlay: Option<Color>,
    /// Inset shadows inside the rounded screen cutout, clipped to it.
    pub screen_insets: Vec<ShadowSpec>,
    /// Inset shadows along the surface border, painted over everything else.
    pub frame_insets: Vec<ShadowSpec>,
}

const SHADOW_RGB: (u8, u8, u8) = (47, 47, 47);
const DARK_RGB: (u8, u8, u8) = (71, 66, 61);
const LIGHT_RGB: (u8, u8, u8) = (245, 240, 245);

impl Default for LayerStyle {
    fn default() -> Self {
        let shadow = |blur: f64, offset_x: f64, offset_y: f64, alpha: f32| ShadowSpec {
            blur,
            offset_x,
            offset_y,
            color: Color::rgba(SHADOW_RGB.0, SHADOW_RGB.1, SHADOW_RGB.2, alpha),
        };
        let dark = |alpha: f32| Color::rgba(DARK_RGB.0, DARK_RGB.1, DARK_RGB.2, alpha);
        let light = |alpha: f32| Color::rgba(LIGHT_RGB.0, LIGHT_RGB.1, LIGHT_RGB.2, alpha);

        Self {
            base_color: Color::rgb(0xb0, 0xab, 0xa5),
            shadows: vec![
                shadow(90.0, 0.0, 0.0, 0.33),
                shadow(30.0, 4.0, 12.0, 0.5),
                shadow(5.0, 0.0, 0.0, 0.33),
            ],
            grain_alpha: 0.6,
            edge_blur: 30.0,
            edges: vec![
                EdgeLightSpec::new(EdgeSide::Top, dark(0.4)),
                EdgeLightSpec::new(EdgeSide::Left, dark(0.2)),
                EdgeLightSpec::new(EdgeSide::Bottom, light(0.3)),
                EdgeLightSpec::new(EdgeSide::Right, light(0.15)),
            ],
            underlay: None,
            screen_insets: Vec::new(),
            frame_insets: Vec::new(),
        }
    }
}

impl LayerStyle {
    /// The default stack plus the monitor overlays: recess shading and a rim highlight inside
    /// the screen, and edge darkening around the surface border.
    pub fn monitor() -> Self {
        let inset = |offset_x: f64, offset_y: f64, blur: f64, color: Color| ShadowSpec {
            blur,
            offset_x,
            offset_y,
            color,
        };
        let black = |alpha: f32| Color::rgba(0, 0, 0, alpha);
        let white = |alpha: f32| Color::rgba(255, 255, 255, alpha);

        Self {
            screen_insets: vec![
                inset(0.0, 6.0, 24.0, black(0.25)),
                inset(0.0, -4.0, 16.0, black(0.15)),
                inset(6.0, 0.0, 20.0, black(0.18)),
                inset(-6.0, 0.0, 20.0, black(0.18)),
                inset(0.0, 0.0, 50.0, black(0.08)),
                inset(0.0, 1.0, 0.0, white(0.4)),
            ],
            frame_insets: vec![
                inset(0.0, 4.0, 20.0, black(0.6)),
                inset(0.0, -4.0, 20.0, black(0.4)),
                inset(4.0, 0.0, 16.0, black(0.35)),
                inset(-4.0, 0.0, 16.0, black(0.35)),
                inset(0.0, 0.0, 60.0, black(0.3)),
                inset(0.0, 1.0, 0.0, white(0.05)),
            ],
            ..Self::default()
        }
    }
}

/// Backdrop color behind the monitor bezel, `#292929`.
pub const MONITOR_UNDERLAY: Color = Color::rgb(0x29, 0x29, 0x29);

/// How a mounted frame turns queued triggers into repaints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedrawPolicy {
    /// One full repaint per trigger.
    #[default]
    Immediate,
    /// All triggers drained in one pump share a single repaint.
    Coalesced,
}

/// Complete bezel configuration. Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BezelConfig {
    /// Padding fractions of the viewport.
    pub padding: PaddingFractions,
    /// Inner screen corner radius, logical px.
    pub screen_radius: f64,
    /// Address handed to the texture fetcher.
    pub texture_url: String,
    /// Layer parameters.
    pub style: LayerStyle,
    /// Redraw scheduling policy.
    pub redraw: RedrawPolicy,
}

impl Default for BezelConfig {
    fn default() -> Self {
        Self {
            padding: PaddingFractions::default(),
            screen_radius: DEFAULT_SCREEN_RADIUS,
            texture_url: DEFAULT_TEXTURE_URL.to_owned(),
            style: LayerStyle::default(),
            redraw: RedrawPolicy::default(),
        }
    }
}

impl BezelConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> BezelResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| BezelError::serde(format!("parse bezel config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_path(path: &Path) -> BezelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read bezel config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check ranges of every numeric parameter.
    pub fn validate(&self) -> BezelResult<()> {
        let p = &self.padding;
        for (name, v) in [
            ("padding.top", p.top),
            ("padding.bottom", p.bottom),
            ("padding.left", p.left),
            ("padding.right", p.right),
        ] {
            if !v.is_finite() || !(0.0..0.5).contains(&v) {
                return Err(BezelError::validation(format!(
                    "{name} must be in [0, 0.5), got {v}"
                )));
            }
        }
        if p.top + p.bottom >= 1.0 || p.left + p.right >= 1.0 {
            return Err(BezelError::validation(
                "opposite paddings must leave a non-empty cutout",
            ));
        }
        finite_non_negative("screen_radius", self.screen_radius)?;
        if self.texture_url.trim().is_empty() {
            return Err(BezelError::validation("texture_url must be non-empty"));
        }
        self.texture_url.parse::<TextureKey>()?;

        let s = &self.style;
        opaque("style.base_color", s.base_color)?;
        if let Some(underlay) = s.underlay {
            opaque("style.underlay", underlay)?;
        }
        unit_alpha("style.grain_alpha", s.grain_alpha)?;
        finite_non_negative("style.edge_blur", s.edge_blur)?;
        for (list, shadows) in [
            ("shadows", &s.shadows),
            ("screen_insets", &s.screen_insets),
            ("frame_insets", &s.frame_insets),
        ] {
            for (i, sh) in shadows.iter().enumerate() {
                shadow(&format!("style.{list}[{i}]"), sh)?;
            }
        }
        for (i, e) in s.edges.iter().enumerate() {
            finite_non_negative(&format!("style.edges[{i}].extend"), e.extend)?;
            finite_non_negative(&format!("style.edges[{i}].thickness"), e.thickness)?;
            finite_non_negative(&format!("style.edges[{i}].overhang"), e.overhang)?;
            unit_alpha(&format!("style.edges[{i}].color.alpha"), e.color.alpha)?;
        }
        Ok(())
    }
}

fn finite_non_negative(name: &str, v: f64) -> BezelResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(BezelError::validation(format!(
            "{name} must be finite and >= 0, got {v}"
        )));
    }
    Ok(())
}

fn shadow(name: &str, sh: &ShadowSpec) -> BezelResult<()> {
    finite_non_negative(&format!("{name}.blur"), sh.blur)?;
    if !sh.offset_x.is_finite() || !sh.offset_y.is_finite() {
        return Err(BezelError::validation(format!("{name} offset must be finite")));
    }
    unit_alpha(&format!("{name}.color.alpha"), sh.color.alpha)
}

fn opaque(name: &str, c: Color) -> BezelResult<()> {
    if c.alpha != 1.0 {
        return Err(BezelError::validation(format!(
            "{name} must be opaque (alpha 1), got alpha {}",
            c.alpha
        )));
    }
    Ok(())
}

fn unit_alpha(name: &str, v: f32) -> BezelResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(BezelError::validation(format!(
            "{name} must be in [0, 1], got {v}"
        )));
    }
    Ok(())
}
