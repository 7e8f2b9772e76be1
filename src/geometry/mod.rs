pub mod path;
pub mod viewport;
