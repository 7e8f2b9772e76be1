use crate::foundation::core::Viewport;
use crate::foundation::error::{BezelError, BezelResult};

/// What the render target can do. Feature-detected effects are skipped when absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceCaps {
    /// Whether blur filtering is available (gates the edge-lighting pass).
    pub blur_filter: bool,
}

impl Default for SurfaceCaps {
    fn default() -> Self {
        Self { blur_filter: true }
    }
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`; transparent outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in 0..3 {
                px[c] = ((u16::from(px[c]) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// The single 2D drawing surface covering the viewport.
///
/// Backing store is a `vello_cpu` pixmap in device pixels, re-provisioned on every draw.
pub struct Surface {
    caps: SurfaceCaps,
    attached: bool,
    pixmap: Option<vello_cpu::Pixmap>,
    viewport: Option<Viewport>,
}

impl Surface {
    /// Attached surface with the given capabilities.
    pub fn new(caps: SurfaceCaps) -> Self {
        Self {
            caps,
            attached: true,
            pixmap: None,
            viewport: None,
        }
    }

    /// Surface whose host element does not exist yet; draws abort until [`Self::attach`].
    pub fn detached(caps: SurfaceCaps) -> Self {
        Self {
            attached: false,
            ..Self::new(caps)
        }
    }

    /// Mark the host element as present.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Mark the host element as gone. Existing pixels are kept.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Whether the surface can currently be drawn to.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Capabilities of this surface.
    pub fn caps(&self) -> SurfaceCaps {
        self.caps
    }

    /// Viewport of the last successful provision.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Resize the backing store to `viewport` in device pixels and clear it.
    ///
    /// On error nothing changes, so the previous contents stay visible.
    pub fn provision(&mut self, viewport: Viewport) -> BezelResult<()> {
        if !self.attached {
            return Err(BezelError::surface("surface is not attached"));
        }
        let (w, h) = viewport.device_size();
        if w == 0 || h == 0 {
            return Err(BezelError::surface(format!(
                "surface has no area ({w}x{h} device px)"
            )));
        }
        let w16: u16 = w
            .try_into()
            .map_err(|_| BezelError::surface(format!("surface width exceeds u16: {w}")))?;
        let h16: u16 = h
            .try_into()
            .map_err(|_| BezelError::surface(format!("surface height exceeds u16: {h}")))?;

        match self.pixmap.as_mut() {
            Some(pm) if pm.width() == w16 && pm.height() == h16 => {
                pm.data_as_u8_slice_mut().fill(0);
            }
            _ => self.pixmap = Some(vello_cpu::Pixmap::new(w16, h16)),
        }
        self.viewport = Some(viewport);
        Ok(())
    }

    pub(crate) fn pixmap_mut(&mut self) -> Option<&mut vello_cpu::Pixmap> {
        self.pixmap.as_mut()
    }

    /// Copy of the current pixels (premultiplied), if anything was ever provisioned.
    pub fn frame(&self) -> Option<FrameRGBA> {
        let pm = self.pixmap.as_ref()?;
        Some(FrameRGBA {
            width: u32::from(pm.width()),
            height: u32::from(pm.height()),
            data: pm.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceCaps::default())
    }
}
