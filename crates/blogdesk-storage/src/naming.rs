//! Stored filename generation for uploads.

/// Build the on-disk name for an upload: the original base name with
/// non-word runs collapsed to `-`, lowercased, then `-<millis><.ext>`.
pub fn stored_filename(original: &str, timestamp_millis: i64) -> String {
    let name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], name[idx..].to_ascii_lowercase()),
        _ => (name, String::new()),
    };

    let mut base = String::with_capacity(stem.len());
    let mut in_run = false;
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            base.push(ch.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            base.push('-');
            in_run = true;
        }
    }
    let base = if base.trim_matches('-').is_empty() {
        "file".to_string()
    } else {
        base
    };

    format!("{base}-{timestamp_millis}{ext}")
}

/// Lowercase extension of `name` without the dot, if any.
pub fn extension_of(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => Some(name[idx + 1..].to_ascii_lowercase()),
        _ => None,
    }
}
