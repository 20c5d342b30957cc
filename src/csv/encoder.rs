//! CSV field encoding matching a [`Dialect`]

use crate::dialect::Dialect;

/// CSV encoder producing text that tokenizes back to the same fields
///
/// Fields are quoted when they contain the delimiter, the quote, CR or LF,
/// when they start with the comment character, or when they start with
/// whitespace that trimming would otherwise drop. Quotes inside a quoted
/// field are doubled.
///
/// Two values cannot survive a round trip: fields equal to the null
/// sentinel (always read back as empty), and any field needing quotes when
/// the dialect has quoting turned off.
pub struct CsvEncoder {
    delimiter: u8,
    quote_char: Option<u8>,
    comment: Option<u8>,
    trim_leading: bool,
}

impl CsvEncoder {
    /// Create an encoder for the given dialect
    pub fn from_dialect(dialect: &Dialect) -> Self {
        Self {
            delimiter: dialect.delimiter(),
            quote_char: dialect.quote(),
            comment: dialect.comment(),
            trim_leading: dialect.trim_leading(),
        }
    }

    /// Encode entire row into buffer, without a line terminator
    pub fn encode_row<S: AsRef<str>>(&self, fields: &[S], buffer: &mut Vec<u8>) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            self.encode_field(field.as_ref(), buffer);
        }
    }

    /// Encode single field with proper quoting/escaping
    pub fn encode_field(&self, field: &str, buffer: &mut Vec<u8>) {
        match self.quote_char {
            Some(quote) if self.needs_quoting(field, quote) => {
                buffer.push(quote);
                for byte in field.bytes() {
                    if byte == quote {
                        // Escape quotes by doubling: " -> ""
                        buffer.push(quote);
                    }
                    buffer.push(byte);
                }
                buffer.push(quote);
            }
            _ => buffer.extend_from_slice(field.as_bytes()),
        }
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str, quote: u8) -> bool {
        let bytes = field.as_bytes();
        let leading = match bytes.first() {
            Some(&first) => {
                Some(first) == self.comment
                    || (self.trim_leading && (first == b' ' || first == b'\t'))
            }
            None => false,
        };
        leading
            || bytes
                .iter()
                .any(|&b| b == self.delimiter || b == quote || b == b'\n' || b == b'\r')
    }
}
