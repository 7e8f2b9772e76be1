//! Procedural monitor bezel.
//!
//! A bezel is drawn as a full-viewport frame path with a rounded-rectangle cutout, painted on a
//! CPU surface in four ordered passes: drop shadows, base fill, tiled grain texture and blurred
//! edge lighting. [`LayerStyle::monitor`] adds inset shadow overlays inside the screen and along
//! the surface border; an opaque underlay can be configured beneath everything. The public API
//! is frame-oriented:
//!
//! - Describe a [`HostWindow`] and a [`Surface`]
//! - [`BezelFrame::mount`] a frame, which draws immediately and starts the texture load
//! - [`MountedFrame::pump`] resize and texture-ready triggers into full redraws
//!
//! The lower-level pieces ([`ViewportObserver`], [`PathBuilder`], [`LayerCompositor`],
//! [`RedrawScheduler`], [`TextureCache`]) are public for callers driving redraws themselves.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
/// Serde wire types of the terminal chat proxy.
pub mod chat;
/// Configuration documents and reference constants.
pub mod config;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod render;

pub use crate::foundation::core::{
    Affine, BezPath, Color, Point, Rect, Rgba8Premul, Vec2, Viewport,
};
pub use crate::foundation::error::{BezelError, BezelResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::texture::{
    FsFetcher, TextureCache, TextureFetcher, TextureKey, TextureState,
};
pub use crate::config::{
    BezelConfig, EdgeLightSpec, EdgeSide, LayerStyle, MONITOR_UNDERLAY, PaddingFractions,
    RedrawPolicy, ShadowSpec,
};
pub use crate::frame::mounted::{BezelFrame, MountedFrame};
pub use crate::frame::scheduler::{DrawOutcome, DrawStats, RedrawScheduler};
pub use crate::geometry::path::{FramePath, PathBuilder};
pub use crate::geometry::viewport::{BezelGeometry, ViewportObserver, ViewportSource};
pub use crate::host::events::FrameEvent;
pub use crate::host::window::{HostWindow, ResizeSubscription};
pub use crate::render::compositor::{CompositeReport, LayerCompositor};
pub use crate::render::layers::{Layer, PassKind};
pub use crate::render::surface::{FrameRGBA, Surface, SurfaceCaps};
