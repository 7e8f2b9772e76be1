use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, BezPath, Point, Rect, Vec2};

use crate::geometry::viewport::BezelGeometry;

/// The frame's draw path: full-surface rectangle plus an oppositely wound rounded cutout.
///
/// Filled with the even-odd rule it paints everything except the cutout.
#[derive(Clone, Debug)]
pub struct FramePath {
    path: BezPath,
    outer: Rect,
    cutout: Rect,
    radius: f64,
    outer_len: usize,
}

impl FramePath {
    /// Combined path (outer subpath followed by the cutout subpath).
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Rectangle covering the whole surface, logical px.
    pub fn outer(&self) -> Rect {
        self.outer
    }

    /// Cutout bounds, logical px.
    pub fn cutout(&self) -> Rect {
        self.cutout
    }

    /// Effective corner radius after clamping.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Outer rectangle subpath on its own.
    pub fn outer_subpath(&self) -> BezPath {
        BezPath::from_vec(self.path.elements()[..self.outer_len].to_vec())
    }

    /// Rounded cutout subpath on its own (empty when the cutout has no area).
    pub fn cutout_subpath(&self) -> BezPath {
        BezPath::from_vec(self.path.elements()[self.outer_len..].to_vec())
    }

    /// `true` when the cutout subpath was emitted.
    pub fn has_cutout(&self) -> bool {
        self.path.elements().len() > self.outer_len
    }
}

/// Builds [`FramePath`]s from bezel geometry.
#[derive(Clone, Copy, Debug)]
pub struct PathBuilder {
    /// Flattening tolerance for the corner arcs.
    pub tolerance: f64,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self { tolerance: 0.1 }
    }
}

impl PathBuilder {
    /// Construct the frame path for a `surface_width x surface_height` logical surface.
    ///
    /// The outer rectangle is wound counter-clockwise on screen (y down) and the cutout
    /// clockwise, so both the even-odd and the non-zero rule leave the cutout open.
    pub fn build(
        &self,
        geometry: &BezelGeometry,
        surface_width: f64,
        surface_height: f64,
    ) -> FramePath {
        let outer = Rect::new(0.0, 0.0, surface_width.max(0.0), surface_height.max(0.0));
        let cutout = geometry.cutout(outer.width(), outer.height());
        let r = geometry.clamp_radius(geometry.screen_radius, outer.width(), outer.height());

        let mut path = BezPath::new();
        path.move_to((outer.x0, outer.y0));
        path.line_to((outer.x0, outer.y1));
        path.line_to((outer.x1, outer.y1));
        path.line_to((outer.x1, outer.y0));
        path.close_path();
        let outer_len = path.elements().len();

        if cutout.width() > 0.0 && cutout.height() > 0.0 {
            self.push_cutout(&mut path, cutout, r);
        }

        FramePath {
            path,
            outer,
            cutout,
            radius: r,
            outer_len,
        }
    }

    fn push_cutout(&self, path: &mut BezPath, c: Rect, r: f64) {
        let (x0, y0, x1, y1) = (c.x0, c.y0, c.x1, c.y1);

        path.move_to((x0 + r, y0));
        path.line_to((x1 - r, y0));
        self.corner(path, Point::new(x1 - r, y0 + r), r, -FRAC_PI_2);
        path.line_to((x1, y1 - r));
        self.corner(path, Point::new(x1 - r, y1 - r), r, 0.0);
        path.line_to((x0 + r, y1));
        self.corner(path, Point::new(x0 + r, y1 - r), r, FRAC_PI_2);
        path.line_to((x0, y0 + r));
        self.corner(path, Point::new(x0 + r, y0 + r), r, PI);
        path.close_path();
    }

    // Quarter arc sweeping clockwise on screen from `start_angle`.
    fn corner(&self, path: &mut BezPath, center: Point, r: f64, start_angle: f64) {
        if r <= 0.0 {
            return;
        }
        let arc = Arc::new(center, Vec2::new(r, r), start_angle, FRAC_PI_2, 0.0);
        arc.to_cubic_beziers(self.tolerance, |p1, p2, p3| {
            path.curve_to(p1, p2, p3);
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
