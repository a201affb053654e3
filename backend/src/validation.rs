//! Filename checks applied before anything touches disk.

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Checks whether a declared filename carries an allowed extension.
///
/// A name without a `.` is never allowed; otherwise the text after the
/// last `.` is compared case-insensitively against the allow-set.
pub fn allowed_file(filename: &str, allowed_extensions: &[&str]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, extension)) => allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension)),
        None => false,
    }
}

/// Reduces a client-supplied filename to a single safe path component.
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading/trailing `.`/`_` are trimmed
/// so the result can never climb out of its destination directory.
pub fn sanitize_filename(filename: &str) -> String {
    let mut cleaned = String::with_capacity(filename.len());
    for ch in filename.chars() {
        match ch {
            '/' | '\\' => cleaned.push('_'),
            c if c.is_whitespace() => cleaned.push('_'),
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => cleaned.push(c),
            _ => {}
        }
    }

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}
