use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(input: &str) -> PathBuf {
    expand_tilde_internal(input, dirs::home_dir())
}

fn expand_tilde_internal(input: &str, home: Option<PathBuf>) -> PathBuf {
    match (input.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if input == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(input)),
        _ => PathBuf::from(input),
    }
}

/// Interpret text pasted into the terminal as a dropped file.
///
/// Terminals paste dropped files as a path that may be quoted, carry a
/// `file://` prefix or backslash-escape spaces. Returns the path only when it
/// names an existing file.
pub fn parse_dropped_path(pasted: &str) -> Option<PathBuf> {
    let trimmed = pasted.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }

    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let unescaped = without_scheme.replace("\\ ", " ");

    let path = expand_tilde(&unescaped);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/home/alice/exports/summary.txt");
        assert_eq!(format_path_with_tilde_internal(&path, Some("/home/alice")), "~/exports/summary.txt");
        assert_eq!(format_path_with_tilde_internal(&path, Some("/home/bob")), "/home/alice/exports/summary.txt");
    }

    #[test]
    fn test_expand_tilde() {
        let home = Some(PathBuf::from("/home/alice"));
        assert_eq!(expand_tilde_internal("~/notes.txt", home.clone()), PathBuf::from("/home/alice/notes.txt"));
        assert_eq!(expand_tilde_internal("/abs/notes.txt", home.clone()), PathBuf::from("/abs/notes.txt"));
        assert_eq!(expand_tilde_internal("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn test_parse_dropped_path_variants() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("my notes.txt");
        std::fs::write(&file, "hello").unwrap();
        let plain = file.to_string_lossy().to_string();

        assert_eq!(parse_dropped_path(&plain), Some(file.clone()));
        assert_eq!(parse_dropped_path(&format!("'{plain}'")), Some(file.clone()));
        assert_eq!(parse_dropped_path(&format!("\"{plain}\"\n")), Some(file.clone()));
        assert_eq!(parse_dropped_path(&format!("file://{plain}")), Some(file.clone()));
        assert_eq!(parse_dropped_path(&plain.replace(' ', "\\ ")), Some(file));
    }

    #[test]
    fn test_parse_dropped_path_rejects_text() {
        assert_eq!(parse_dropped_path("just some pasted prose"), None);
        assert_eq!(parse_dropped_path(""), None);
        assert_eq!(parse_dropped_path("line one\nline two"), None);
    }

    #[test]
    fn test_parse_dropped_path_rejects_directories() {
        let dir = TempDir::new().unwrap();
        assert_eq!(parse_dropped_path(&dir.path().to_string_lossy()), None);
    }
}
