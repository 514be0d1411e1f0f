use std::path::Path;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 10;

/// Builds a storage name for an uploaded file: a random UUID plus the
/// original extension when that extension is short and alphanumeric.
///
/// Nothing else from `original` survives, so directory components and
/// unusual characters never reach the file store.
pub fn unique_filename(original: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match safe_extension(original) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Storage name for a freshly generated PDF.
pub fn unique_pdf_filename() -> String {
    format!("{}.pdf", Uuid::new_v4().simple())
}

/// Names accepted by the file store: ASCII alphanumerics, `-`, `_` and `.`,
/// not starting with a dot.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn safe_extension(original: &str) -> Option<String> {
    // Windows-style separators are not separators on unix; strip them by hand.
    let last_component = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let ext = Path::new(last_component).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}
