use crate::foundation::math::unit_to_u8;

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Host viewport as reported by the window: logical size plus device scale factor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
    /// Ratio of physical to logical pixels.
    pub pixel_density: f64,
}

impl Viewport {
    /// Build a viewport, sanitizing host-reported values.
    ///
    /// Negative or non-finite sizes become `0`; a non-finite or non-positive density becomes `1`.
    pub fn new(width: f64, height: f64, pixel_density: f64) -> Self {
        fn size(v: f64) -> f64 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }

        let pixel_density = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };

        Self {
            width: size(width),
            height: size(height),
            pixel_density,
        }
    }

    /// Viewport at nominal scale (density 1).
    pub fn logical(width: f64, height: f64) -> Self {
        Self::new(width, height, 1.0)
    }

    /// Backing-store size in device pixels (`logical * density`, rounded).
    pub fn device_size(self) -> (u32, u32) {
        let px = |v: f64| -> u32 {
            (v * self.pixel_density)
                .round()
                .clamp(0.0, f64::from(u32::MAX)) as u32
        };
        (px(self.width), px(self.height))
    }

    /// Logical-to-device transform for drawing.
    pub fn device_transform(self) -> Affine {
        Affine::scale(self.pixel_density)
    }
}

/// Straight-alpha color as written in configuration: 8-bit channels plus unit alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    #[serde(default = "opaque")]
    pub alpha: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Color with explicit unit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// Premultiplied RGBA8 equivalent.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, unit_to_u8(self.alpha))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
