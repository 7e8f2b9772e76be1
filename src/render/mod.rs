pub(crate) mod blur;
pub(crate) mod composite;
pub mod compositor;
pub mod layers;
pub(crate) mod raster;
pub mod surface;
