//! Key-to-label formatting.
//!
//! Labels derive from raw keys by splitting on underscores, dashes, and
//! lower-to-upper camel-case boundaries, then capitalizing each word.
//! A schema label override bypasses this entirely.

/// Turn a raw key into a human-readable label.
///
/// `first_name` → `First Name`, `maxValue` → `Max Value`, `x` → `X`.
pub fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        } else if ch.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
            current.push(ch);
            prev_lower = false;
        } else {
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Label for the array item at `index` (1-based for display).
pub fn item_label(index: usize) -> String {
    format!("Item {}", index + 1)
}

/// Uppercase the first character, leave the rest alone.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
