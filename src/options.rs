//! Options for the text codec.

/// Default set of characters that separate the fields of a text line.
pub(crate) const DEFAULT_FIELD_SEPARATOR: &str = "\t ";

/// Options controlling how symbol tables are read from and written to text.
///
/// # Examples
///
/// ```
/// # use fst_symbols::TextOptions;
/// // Tab or space separated, non-negative keys only.
/// let opts = TextOptions::default();
/// assert!(!opts.allow_negative_labels);
/// assert_eq!(Some('\t'), opts.output_separator());
///
/// let opts = TextOptions::default()
///     .with_negative_labels(true)
///     .with_field_separator(",");
/// assert_eq!(Some(','), opts.output_separator());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Accept negative keys when reading. When `false`, writing a negative
    /// key logs one warning per table but still writes the line.
    pub allow_negative_labels: bool,

    /// Every character in this string separates fields when reading. The
    /// first character is used when writing.
    ///
    /// Default: tab and space.
    pub field_separator: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            allow_negative_labels: false,
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
        }
    }
}

impl TextOptions {
    /// Sets whether negative keys are permitted.
    #[must_use]
    pub fn with_negative_labels(mut self, allow: bool) -> Self {
        self.allow_negative_labels = allow;
        self
    }

    /// Replaces the set of field separator characters.
    #[must_use]
    pub fn with_field_separator(mut self, separator: impl Into<String>) -> Self {
        self.field_separator = separator.into();
        self
    }

    /// Returns the character written between a symbol and its key, or `None`
    /// if the separator set is empty.
    #[must_use]
    pub fn output_separator(&self) -> Option<char> {
        self.field_separator.chars().next()
    }

    pub(crate) fn is_separator(&self, ch: char) -> bool {
        ch == '\n' || self.field_separator.contains(ch)
    }
}
