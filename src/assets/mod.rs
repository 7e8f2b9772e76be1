pub mod decode;
pub mod texture;
