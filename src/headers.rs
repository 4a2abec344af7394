//! Header deduplication for sheets that repeat column titles.

use std::collections::HashMap;

/// Suffixes repeated header names so every position can be addressed by name.
///
/// The first occurrence of a name is kept as-is and the n-th repeat becomes
/// `name_n`. Output length and order always match the input. Suffixed names
/// are not re-checked against names already present in the sheet, so a
/// literal `X_1` column may still collide with a renamed repeat of `X`.
pub fn dedupe<S: AsRef<str>>(raw_headers: &[S]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(raw_headers.len());
    raw_headers
        .iter()
        .map(|header| {
            let name = header.as_ref();
            match seen.get_mut(name) {
                Some(count) => {
                    *count += 1;
                    format!("{name}_{count}")
                }
                None => {
                    seen.insert(name, 0);
                    name.to_string()
                }
            }
        })
        .collect()
}
