use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum CardError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode or encode the image
    Image(#[from] image::ImageError),

    /// A caller-supplied parameter failed validation. Nothing has been drawn
    /// when this is returned
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The supplied citizen ID number failed structural, date, or checksum
    /// validation
    #[error("invalid ID number: {0}")]
    InvalidIdNumber(String),
}
