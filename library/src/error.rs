use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg_next::Error),
    #[error("Probe error: {0}")]
    Probe(String),
    #[error("Conversion error: {0}")]
    Conversion(String),
    #[error("Invalid media: {0}")]
    InvalidMedia(String),
}
