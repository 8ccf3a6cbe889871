//! Error types for XML display.

use xmlview_highlight::HighlightError;
use xmlview_tree::{InputError, ParseError};

use crate::template::TemplateError;

/// Error while building or rendering an [`XmlDisplay`](crate::XmlDisplay).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DisplayError {
    /// Input is not an accepted representation.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Input text or bytes are not well-formed XML.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Highlighting failed or the style is unknown.
    #[error(transparent)]
    Highlight(#[from] HighlightError),

    /// Template could not be filled.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}
