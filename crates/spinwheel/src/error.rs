use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported asset scheme in '{0}'")]
    UnsupportedScheme(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] gdk_pixbuf::glib::Error),
    #[error("Decoder produced no image")]
    Empty,
}
