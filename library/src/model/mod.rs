pub mod geometry;
pub mod media;
pub mod options;
