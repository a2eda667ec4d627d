//! Turning scene titles into output file names.

/// File name used when the title yields nothing usable.
pub const FALLBACK_STEM: &str = "viscene";

/// Remove a trailing `.ext` from the last path component, if any.
#[must_use]
pub fn strip_file_suffix(name: &str) -> &str {
    let component_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match name[component_start..].rfind('.') {
        Some(dot) if dot > 0 => &name[..component_start + dot],
        _ => name,
    }
}

/// Replace every character that is not ASCII alphanumeric, `-`, `_` or `.`
/// with `_`.
#[must_use]
pub fn condition_as_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Output file name for `title` with extension `ext` (no dot): suffix
/// stripped, conditioned, and falling back to [`FALLBACK_STEM`] for an
/// empty title.
#[must_use]
pub fn output_name(title: &str, ext: &str) -> String {
    let stem = strip_file_suffix(title.trim());
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    condition_as_filename(&format!("{stem}.{ext}"))
}
