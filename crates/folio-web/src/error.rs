#![forbid(unsafe_code)]

use folio_core::ConfigError;

/// Failure while booting the page host.
///
/// Interaction handlers never fail; these only surface from startup, where
/// the page is left unenhanced but intact.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("no global `window`")]
    NoWindow,
    #[error("no `document` on window")]
    NoDocument,
    #[error("{context}: {message}")]
    Dom {
        context: &'static str,
        message: String,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WebError {
    #[must_use]
    pub fn dom(context: &'static str, message: impl Into<String>) -> Self {
        Self::Dom {
            context,
            message: message.into(),
        }
    }
}
