use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    /// A font family was referenced that was never registered on the document
    #[error("no font family named {family:?} is registered on this document")]
    UnknownFontFamily { family: String },

    /// A page listed in the page order was missing from the page store
    #[error("a page referenced by the document is missing")]
    PageMissing,
}
