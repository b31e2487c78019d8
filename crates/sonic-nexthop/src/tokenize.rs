//! Delimiter-based splitting of key strings.

/// Splits `s` on `delim`.
///
/// Behaves like reading delimited records from a stream: an empty string
/// yields no tokens and a single trailing delimiter does not produce a final
/// empty token. Interior empty tokens are kept.
///
/// ```
/// use sonic_nexthop::tokenize;
///
/// assert_eq!(tokenize("10.0.0.1@Ethernet0", '@'), vec!["10.0.0.1", "Ethernet0"]);
/// assert_eq!(tokenize("10.0.0.1@", '@'), vec!["10.0.0.1"]);
/// assert!(tokenize("", '@').is_empty());
/// ```
pub fn tokenize(s: &str, delim: char) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split(delim).collect();
    if tokens.last() == Some(&"") {
        tokens.pop();
    }
    tokens
}
