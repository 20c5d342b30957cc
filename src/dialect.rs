//! Dialect configuration: the parsing rules applied by the tokenizer

use crate::error::{CsvError, Result};

/// Default quote character, also used when the quote is configured as absent
pub const DEFAULT_QUOTE: u8 = b'"';

/// Default size of the look-ahead buffer wrapped around the byte source (64 KiB)
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Validated, immutable set of parsing rules
///
/// Build one with [`Dialect::builder`]. Invalid combinations are rejected by
/// [`DialectBuilder::build`], so a tokenizer never runs under an ambiguous
/// rule set.
///
/// # Examples
///
/// ```
/// use fastcsv::Dialect;
///
/// let dialect = Dialect::builder()
///     .delimiter(b';')
///     .comment(Some(b'#'))
///     .null_sentinel(Some("\\N"))
///     .trim_leading(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(dialect.delimiter(), b';');
/// assert_eq!(dialect.quote(), Some(b'"'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    delimiter: u8,
    quote: u8,
    quoting: bool,
    comment: Option<u8>,
    null_sentinel: Option<String>,
    trim_leading: bool,
    buffer_capacity: usize,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            delimiter: b',',
            quote: DEFAULT_QUOTE,
            quoting: true,
            comment: None,
            null_sentinel: None,
            trim_leading: false,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl Dialect {
    /// Start building a dialect from the defaults (comma, double quote)
    pub fn builder() -> DialectBuilder {
        DialectBuilder::default()
    }

    /// Field delimiter byte
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Quote byte, or `None` when quoting was explicitly turned off
    pub fn quote(&self) -> Option<u8> {
        self.quoting.then_some(self.quote)
    }

    /// Comment byte, if comment lines are enabled
    pub fn comment(&self) -> Option<u8> {
        self.comment
    }

    /// String that is read back as an empty field when matched exactly
    pub fn null_sentinel(&self) -> Option<&str> {
        self.null_sentinel.as_deref()
    }

    /// Whether leading spaces and tabs of unquoted fields are dropped
    pub fn trim_leading(&self) -> bool {
        self.trim_leading
    }

    /// Capacity of the buffered reader wrapped around the source
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    #[inline]
    pub(crate) fn is_quote(&self, byte: u8) -> bool {
        self.quoting && byte == self.quote
    }

    #[inline]
    pub(crate) fn is_comment(&self, byte: u8) -> bool {
        self.comment == Some(byte)
    }

    /// Builder pre-filled with this dialect's settings
    pub fn to_builder(&self) -> DialectBuilder {
        DialectBuilder {
            delimiter: self.delimiter,
            quote: Some(self.quote),
            quoting: self.quoting,
            comment: self.comment,
            null_sentinel: self.null_sentinel.clone(),
            trim_leading: self.trim_leading,
            buffer_capacity: self.buffer_capacity,
        }
    }
}

/// Unvalidated dialect settings
///
/// Setters follow the builder pattern; nothing is checked until
/// [`build`](DialectBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DialectBuilder {
    delimiter: u8,
    quote: Option<u8>,
    quoting: bool,
    comment: Option<u8>,
    null_sentinel: Option<String>,
    trim_leading: bool,
    buffer_capacity: usize,
}

impl Default for DialectBuilder {
    fn default() -> Self {
        Dialect::default().to_builder()
    }
}

impl DialectBuilder {
    /// Set the field delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    ///
    /// `None` (or `Some(0)`) does not disable quoting: the quote falls back
    /// to `"`. Use [`quoting(false)`](DialectBuilder::quoting) to read quote
    /// bytes as plain data.
    pub fn quote(mut self, quote: Option<u8>) -> Self {
        self.quote = quote;
        self
    }

    /// Turn quote handling on or off
    pub fn quoting(mut self, enabled: bool) -> Self {
        self.quoting = enabled;
        self
    }

    /// Set the comment character; `None` disables comment lines
    pub fn comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Set the null sentinel; `None` or an empty string disables it
    pub fn null_sentinel<S: Into<String>>(mut self, sentinel: Option<S>) -> Self {
        self.null_sentinel = sentinel.map(Into::into);
        self
    }

    /// Drop leading spaces and tabs from unquoted fields
    pub fn trim_leading(mut self, trim: bool) -> Self {
        self.trim_leading = trim;
        self
    }

    /// Size of the buffered reader wrapped around the source
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Validate the settings and produce a [`Dialect`]
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Config`] when the delimiter collides with the
    /// quote or the comment character, when the comment collides with the
    /// quote, when a control byte is not ASCII or is a line terminator, or
    /// when the buffer capacity is zero.
    pub fn build(self) -> Result<Dialect> {
        let quote = match self.quote {
            Some(q) if q != 0 => q,
            _ => {
                tracing::debug!("quote character not set, falling back to '\"'");
                DEFAULT_QUOTE
            }
        };
        let comment = self.comment.filter(|&c| c != 0);
        let null_sentinel = self.null_sentinel.filter(|s| !s.is_empty());

        check_byte("delimiter", self.delimiter)?;
        check_byte("quote", quote)?;
        if let Some(c) = comment {
            check_byte("comment", c)?;
        }

        if self.delimiter == quote {
            return Err(CsvError::config(format!(
                "delimiter and quote must be distinct (both {:?})",
                self.delimiter as char
            )));
        }
        if let Some(c) = comment {
            if c == self.delimiter {
                return Err(CsvError::config(format!(
                    "delimiter and comment must be distinct (both {:?})",
                    c as char
                )));
            }
            if c == quote {
                return Err(CsvError::config(format!(
                    "quote and comment must be distinct (both {:?})",
                    c as char
                )));
            }
        }
        if self.buffer_capacity == 0 {
            return Err(CsvError::config("buffer capacity must be non-zero"));
        }

        Ok(Dialect {
            delimiter: self.delimiter,
            quote,
            quoting: self.quoting,
            comment,
            null_sentinel,
            trim_leading: self.trim_leading,
            buffer_capacity: self.buffer_capacity,
        })
    }
}

fn check_byte(name: &str, byte: u8) -> Result<()> {
    if !byte.is_ascii() {
        return Err(CsvError::config(format!(
            "{} must be an ASCII character, got 0x{:02x}",
            name, byte
        )));
    }
    if byte == b'\n' || byte == b'\r' {
        return Err(CsvError::config(format!(
            "{} cannot be a line terminator",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let d = Dialect::default();
        assert_eq!(d.delimiter(), b',');
        assert_eq!(d.quote(), Some(b'"'));
        assert_eq!(d.comment(), None);
        assert_eq!(d.null_sentinel(), None);
        assert!(!d.trim_leading());
        assert_eq!(d.buffer_capacity(), 64 * 1024);
        assert_eq!(Dialect::builder().build().unwrap(), d);
    }

    #[test]
    fn test_delimiter_equals_quote() {
        let err = Dialect::builder().delimiter(b'"').build().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("delimiter and quote"));
    }

    #[test]
    fn test_delimiter_equals_comment() {
        let err = Dialect::builder()
            .comment(Some(b','))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("delimiter and comment"));
    }

    #[test]
    fn test_quote_equals_comment() {
        let err = Dialect::builder()
            .comment(Some(b'"'))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("quote and comment"));
    }

    #[test]
    fn test_absent_quote_forced_to_default() {
        let d = Dialect::builder().quote(None).build().unwrap();
        assert_eq!(d.quote(), Some(b'"'));

        let d = Dialect::builder().quote(Some(0)).build().unwrap();
        assert_eq!(d.quote(), Some(b'"'));
    }

    #[test]
    fn test_absent_quote_still_collides_with_delimiter() {
        // The forced default takes part in validation
        let err = Dialect::builder()
            .delimiter(b'"')
            .quote(None)
            .build()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_quoting_disabled() {
        let d = Dialect::builder().quoting(false).build().unwrap();
        assert_eq!(d.quote(), None);
        assert!(!d.is_quote(b'"'));
    }

    #[test]
    fn test_empty_sentinel_disabled() {
        let d = Dialect::builder().null_sentinel(Some("")).build().unwrap();
        assert_eq!(d.null_sentinel(), None);
    }

    #[test]
    fn test_zero_comment_disabled() {
        let d = Dialect::builder().comment(Some(0)).build().unwrap();
        assert_eq!(d.comment(), None);
    }

    #[test]
    fn test_rejects_terminator_and_non_ascii() {
        assert!(Dialect::builder().delimiter(b'\n').build().is_err());
        assert!(Dialect::builder().comment(Some(b'\r')).build().is_err());
        assert!(Dialect::builder().delimiter(0xC3).build().is_err());
        assert!(Dialect::builder().buffer_capacity(0).build().is_err());
    }

    #[test]
    fn test_to_builder_roundtrip() {
        let d = Dialect::builder()
            .delimiter(b'\t')
            .comment(Some(b';'))
            .null_sentinel(Some("NULL"))
            .trim_leading(true)
            .build()
            .unwrap();
        assert_eq!(d.to_builder().build().unwrap(), d);
    }
}
