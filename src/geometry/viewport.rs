use crate::config::{BezelConfig, PaddingFractions};
use crate::foundation::core::{Rect, Viewport};

/// Anything that can report the current host viewport.
pub trait ViewportSource {
    /// Read the viewport as it is right now.
    fn viewport(&self) -> Viewport;
}

/// A fixed viewport reports itself.
impl ViewportSource for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

/// Bezel padding and screen radius in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BezelGeometry {
    /// Distance from the top of the surface to the cutout.
    pub padding_top: f64,
    /// Distance from the cutout to the bottom of the surface.
    pub padding_bottom: f64,
    /// Distance from the left of the surface to the cutout.
    pub padding_left: f64,
    /// Distance from the cutout to the right of the surface.
    pub padding_right: f64,
    /// Corner radius of the cutout, already clamped to half the shorter cutout side.
    pub screen_radius: f64,
}

impl BezelGeometry {
    /// Derive geometry for `viewport` from padding fractions and a corner radius.
    ///
    /// Padding is never negative and the radius never exceeds half of the shorter cutout side.
    pub fn from_viewport(
        viewport: Viewport,
        padding: PaddingFractions,
        screen_radius: f64,
    ) -> Self {
        let pad = |frac: f64, dim: f64| -> f64 {
            let v = frac * dim;
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        };

        let mut g = Self {
            padding_top: pad(padding.top, viewport.height),
            padding_bottom: pad(padding.bottom, viewport.height),
            padding_left: pad(padding.left, viewport.width),
            padding_right: pad(padding.right, viewport.width),
            screen_radius: 0.0,
        };
        g.screen_radius = g.clamp_radius(screen_radius, viewport.width, viewport.height);
        g
    }

    /// Cutout rectangle inside a `width x height` surface.
    pub fn cutout(&self, width: f64, height: f64) -> Rect {
        let x0 = self.padding_left;
        let y0 = self.padding_top;
        let x1 = (width - self.padding_right).max(x0);
        let y1 = (height - self.padding_bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }

    /// Clamp `radius` into `[0, min(cutout_w, cutout_h) / 2]` for a `width x height` surface.
    pub fn clamp_radius(&self, radius: f64, width: f64, height: f64) -> f64 {
        let c = self.cutout(width, height);
        let max = c.width().min(c.height()) / 2.0;
        if !radius.is_finite() {
            return 0.0;
        }
        radius.clamp(0.0, max.max(0.0))
    }
}

/// Measures the host window and derives bezel geometry from fixed fractions.
pub struct ViewportObserver<S> {
    source: S,
    padding: PaddingFractions,
    screen_radius: f64,
}

impl<S: ViewportSource> ViewportObserver<S> {
    /// Observer with explicit fractions and radius.
    pub fn new(source: S, padding: PaddingFractions, screen_radius: f64) -> Self {
        Self {
            source,
            padding,
            screen_radius,
        }
    }

    /// Observer using the geometry section of `config`.
    pub fn from_config(source: S, config: &BezelConfig) -> Self {
        Self::new(source, config.padding, config.screen_radius)
    }

    /// Current host viewport.
    pub fn viewport(&self) -> Viewport {
        self.source.viewport()
    }

    /// Read the window and return the bezel geometry for it.
    pub fn measure(&self) -> BezelGeometry {
        self.geometry_for(self.viewport())
    }

    /// Geometry for an already-read viewport.
    pub fn geometry_for(&self, viewport: Viewport) -> BezelGeometry {
        BezelGeometry::from_viewport(viewport, self.padding, self.screen_radius)
    }

    /// Access the underlying viewport source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/viewport.rs"]
mod tests;
