use std::borrow::Cow;

/// Quotes `value` for a delimited file if it needs it.
///
/// Values containing the delimiter, a double quote, or a line break are
/// wrapped in double quotes with inner quotes doubled. Anything else is
/// returned unchanged.
pub(super) fn field(value: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = value
        .chars()
        .any(|c| c == delimiter || matches!(c, '"' | '\n' | '\r'));

    if needs_quotes {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
