use std::string::FromUtf8Error;

/// Form-encode a payload parameter (`application/x-www-form-urlencoded`),
/// the same rule macro links use for their arguments.
///
/// - `A-Z a-z 0-9 . - * _` pass through
/// - space becomes `+`
/// - every other UTF-8 byte becomes `%XX` (uppercase hex), `~` included
///
/// Delimiters like `;`, `,` or `"` therefore never reach the script runtime
/// unescaped.
pub fn encode_parameter(raw: &str) -> String {
    // urlencoding leaves `~` alone and escapes `*` and space; the form rule
    // differs on exactly those three. Every `%` in its output starts a
    // triplet, so the replacements cannot match across escapes.
    urlencoding::encode(raw)
        .replace("%20", "+")
        .replace("%2A", "*")
        .replace('~', "%7E")
}

/// Inverse of [`encode_parameter`]
pub fn decode_parameter(encoded: &str) -> Result<String, FromUtf8Error> {
    // A literal `+` was encoded as `%2B`, so any `+` left is a space
    urlencoding::decode(&encoded.replace('+', " ")).map(|decoded| decoded.into_owned())
}
