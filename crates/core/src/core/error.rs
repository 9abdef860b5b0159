use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

/// Everything that can go wrong while wiring behavior onto a page.
///
/// Missing optional markup is *not* an error: controllers skip the feature and
/// log at debug level. These variants are reserved for conditions that make a
/// startup step impossible.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window (not running in a browser?)")]
    MissingWindow,

    #[error("window has no document")]
    MissingDocument,

    #[error("required element not found: {selector}")]
    MissingElement { selector: String },

    #[error("invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[cfg(feature = "serde")]
    #[error("config parse failed: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl SiteError {
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }

    pub fn js(message: impl Into<String>) -> Self {
        Self::Js(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_selector() {
        let err = SiteError::missing("#navbar");
        assert_eq!(err.to_string(), "required element not found: #navbar");

        let err = SiteError::InvalidSelector {
            selector: "[[".to_string(),
        };
        assert_eq!(err.to_string(), "invalid selector: [[");
    }
}
