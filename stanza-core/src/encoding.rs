//! Character encoding applied to context files, template files and outputs.

use std::fmt;

use encoding_rs::Encoding;

use crate::error::ContextError;

/// A character set, resolved from a WHATWG label such as `utf-8` or `windows-1252`.
///
/// The same encoding is used for every read and write of one invocation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    pub fn utf8() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }

    /// Look up an encoding by label (case-insensitive, surrounding whitespace ignored).
    ///
    /// Encodings that cannot be written back in the same charset (UTF-16LE,
    /// UTF-16BE, `replacement`) are rejected.
    pub fn from_label(label: &str) -> Result<Self, ContextError> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            ContextError::UnknownEncoding {
                label: label.to_string(),
            }
        })?;
        if encoding.output_encoding() != encoding {
            return Err(ContextError::UnsupportedEncoding {
                label: label.to_string(),
                encoding: encoding.name(),
            });
        }
        Ok(TextEncoding(encoding))
    }

    /// Resolve an optional label, falling back to the platform default (UTF-8).
    pub fn resolve(label: Option<&str>) -> Result<Self, ContextError> {
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => Self::from_label(label),
            None => {
                tracing::warn!(
                    "encoding has not been set, using platform encoding UTF-8; \
                     output is platform dependent"
                );
                Ok(Self::utf8())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn is_utf8(&self) -> bool {
        self.0 == encoding_rs::UTF_8
    }

    /// Decode raw bytes. Malformed sequences become U+FFFD and are logged.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, had_errors) = self.0.decode(bytes);
        if had_errors {
            tracing::warn!(
                encoding = self.name(),
                "malformed input replaced while decoding"
            );
        }
        text.into_owned()
    }

    /// Encode text. Unmappable characters become numeric character references.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = self.0.encode(text);
        if had_errors {
            tracing::warn!(
                encoding = self.name(),
                "unmappable characters replaced while encoding"
            );
        }
        bytes.into_owned()
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
