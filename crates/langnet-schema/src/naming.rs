//! Field name conversions.

/// Converts a declared field name to its JSON name.
///
/// Underscores are dropped and the following character is upper-cased, so
/// `results_per_page` becomes `resultsPerPage`. Other characters are kept.
pub fn to_json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
