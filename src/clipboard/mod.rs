//! Inbound clipboard filtering.
//!
//! Pasting is best-effort salvage: the text is normalized, then everything
//! outside the whitelist is dropped. Nothing a paste contains can make it
//! fail. Payloads that are not text are handed back unchanged.

use crate::normalizer::Normalizer;
use crate::whitelist::WhitelistValidator;

/// What the host clipboard offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    /// Plain text.
    Text(String),
    /// Anything else (images, rich text), identified by MIME type.
    Other {
        /// MIME type as reported by the clipboard.
        mime: String,
        /// Raw bytes.
        data: Vec<u8>,
    },
}

/// `extract_safe(normalize(text))` over borrowed pipeline components.
#[derive(Debug, Clone, Copy)]
pub struct ClipboardFilter<'a> {
    normalizer: &'a Normalizer,
    validator: &'a WhitelistValidator,
}

impl<'a> ClipboardFilter<'a> {
    /// Borrow the normalizer and validator to filter with.
    pub fn new(normalizer: &'a Normalizer, validator: &'a WhitelistValidator) -> Self {
        Self {
            normalizer,
            validator,
        }
    }

    /// Salvage the whitelisted remnants of pasted text.
    pub fn filter_paste(&self, raw: &str) -> String {
        let normalized = self.normalizer.normalize(raw);
        let safe = self.validator.extract_safe(&normalized);
        if safe.len() != normalized.len() {
            tracing::debug!(
                dropped = normalized.len() - safe.len(),
                "paste filtered"
            );
        }
        safe
    }

    /// Filter text payloads; pass every other payload through untouched.
    pub fn filter_payload(&self, payload: ClipboardPayload) -> ClipboardPayload {
        match payload {
            ClipboardPayload::Text(text) => ClipboardPayload::Text(self.filter_paste(&text)),
            other => other,
        }
    }
}
