use std::sync::Arc;

use crate::assets::texture::TextureCache;
use crate::config::BezelConfig;
use crate::geometry::path::PathBuilder;
use crate::geometry::viewport::{ViewportObserver, ViewportSource};
use crate::render::compositor::{CompositeReport, LayerCompositor};
use crate::render::layers::PassKind;
use crate::render::surface::Surface;

/// Result of one [`RedrawScheduler::draw`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The surface was fully repainted.
    Painted(CompositeReport),
    /// Nothing was painted. An unavailable surface keeps its previous pixels; a composite that
    /// failed part way leaves the surface cleared or partly painted.
    Skipped,
}

impl DrawOutcome {
    pub fn is_painted(&self) -> bool {
        matches!(self, Self::Painted(_))
    }
}

/// Counters over the lifetime of a scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DrawStats {
    /// Full repaints.
    pub painted: u64,
    /// Draws aborted by an unavailable surface or a compositing error.
    pub skipped: u64,
    /// Repaints that included the grain layer.
    pub with_grain: u64,
}

impl DrawStats {
    /// Every draw attempt, painted or skipped.
    pub fn draws(&self) -> u64 {
        self.painted + self.skipped
    }
}

/// Ties measurement, path construction and compositing into a single full redraw.
pub struct RedrawScheduler<S> {
    observer: ViewportObserver<S>,
    builder: PathBuilder,
    surface: Surface,
    compositor: LayerCompositor,
    textures: Arc<TextureCache>,
    texture_url: String,
    stats: DrawStats,
}

impl<S: ViewportSource> RedrawScheduler<S> {
    pub fn new(
        observer: ViewportObserver<S>,
        surface: Surface,
        compositor: LayerCompositor,
        textures: Arc<TextureCache>,
        texture_url: impl Into<String>,
    ) -> Self {
        Self {
            observer,
            builder: PathBuilder::default(),
            surface,
            compositor,
            textures,
            texture_url: texture_url.into(),
            stats: DrawStats::default(),
        }
    }

    /// Scheduler wired from `config`. The config is assumed to be validated.
    pub fn from_config(
        source: S,
        surface: Surface,
        textures: Arc<TextureCache>,
        config: &BezelConfig,
    ) -> Self {
        Self::new(
            ViewportObserver::from_config(source, config),
            surface,
            LayerCompositor::new(&config.style),
            textures,
            config.texture_url.clone(),
        )
    }

    /// Resize the surface to the current viewport and repaint every layer.
    ///
    /// Never fails: an unavailable surface or a compositing error is logged and reported as
    /// [`DrawOutcome::Skipped`].
    #[tracing::instrument(skip(self))]
    pub fn draw(&mut self) -> DrawOutcome {
        let viewport = self.observer.viewport();
        if let Err(e) = self.surface.provision(viewport) {
            tracing::debug!(error = %e, "draw skipped");
            self.stats.skipped += 1;
            return DrawOutcome::Skipped;
        }

        let geometry = self.observer.geometry_for(viewport);
        let frame = self.builder.build(&geometry, viewport.width, viewport.height);
        let texture = self.textures.state(&self.texture_url);

        match self.compositor.composite(&mut self.surface, &frame, &texture) {
            Ok(report) => {
                self.stats.painted += 1;
                if report.contains(PassKind::Grain) {
                    self.stats.with_grain += 1;
                }
                DrawOutcome::Painted(report)
            }
            Err(e) => {
                tracing::warn!(error = %e, "composite failed; draw skipped");
                self.stats.skipped += 1;
                DrawOutcome::Skipped
            }
        }
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn observer(&self) -> &ViewportObserver<S> {
        &self.observer
    }

    pub fn texture_url(&self) -> &str {
        &self.texture_url
    }

    pub fn textures(&self) -> &Arc<TextureCache> {
        &self.textures
    }
}
