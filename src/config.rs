//! Decoder configuration
//!
//! Build a [`DecodeConfig`] to pass caller-side context into a decode:
//!
//! ```
//! use zedqr::DecodeConfig;
//!
//! let config = DecodeConfig::new().charset_hint("ISO-8859-1");
//! # let _ = config;
//! ```

/// Options influencing how a symbol's payload is interpreted.
#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    charset_hint: Option<String>,
}

impl DecodeConfig {
    /// Default configuration: no charset hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the charset to assume for byte segments that carry no ECI
    /// designator. The label is resolved through the WHATWG registry; an
    /// unknown label falls back to content classification.
    pub fn charset_hint(mut self, label: impl Into<String>) -> Self {
        self.charset_hint = Some(label.into());
        self
    }

    pub(crate) fn charset_hint_label(&self) -> Option<&str> {
        self.charset_hint.as_deref().filter(|label| !label.is_empty())
    }
}
