//! Catalog path normalization
//!
//! Paths arrive from the server and from user input in whatever shape the
//! scanning host produced them (`C:\Comics\`, `/mnt/books//`, ...). Every
//! comparison and map key goes through these helpers first.

/// Normalize separators and collapse redundant slashes
///
/// - Backslashes become forward slashes
/// - Runs of slashes collapse to one, except a leading `//` (UNC share)
/// - Trailing slashes are dropped unless the path is `/` or a drive root like `C:/`
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_path("C:\\Comics\\"), "C:/Comics");
/// assert_eq!(normalize_path("/mnt//books/"), "/mnt/books");
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");

    let (prefix, rest) = match path.strip_prefix("//") {
        Some(rest) => ("//", rest),
        None => ("", path.as_str()),
    };

    let mut out = String::with_capacity(path.len());
    out.push_str(prefix);
    let mut last_was_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        out.push(c);
    }

    while out.len() > 1 && out.ends_with('/') && out != "//" && !is_drive_root(&out) {
        out.pop();
    }
    out
}

// `C:/`
fn is_drive_root(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// Normalized, case-folded form used as a lookup key
pub fn path_key(path: &str) -> String {
    normalize_path(path).to_lowercase()
}

/// Case-insensitive equality after normalization
pub fn same_path(a: &str, b: &str) -> bool {
    path_key(a) == path_key(b)
}

/// Parent directory of a path, or `None` at the top level
///
/// The result is itself normalized: the parent of `C:/a` is `C:/`.
pub fn parent_dir(path: &str) -> Option<String> {
    let normalized = normalize_path(path);
    if is_drive_root(&normalized) {
        return None;
    }
    match normalized.rfind('/') {
        Some(idx) if idx > 0 => Some(normalize_path(&normalized[..=idx])),
        _ => None,
    }
}

/// Last path segment, used when an album has no display name
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(normalize_path("C:\\Comics\\Saga"), "C:/Comics/Saga");
    }

    #[test]
    fn test_normalize_trailing_and_repeated() {
        assert_eq!(normalize_path("/mnt//books///"), "/mnt/books");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("D:\\"), "D:/");
        assert_eq!(normalize_path("D:\\\\"), "D:/");
    }

    #[test]
    fn test_normalize_keeps_unc_prefix() {
        assert_eq!(normalize_path("\\\\nas\\share\\\\comics\\"), "//nas/share/comics");
    }

    #[test]
    fn test_path_key_case_folds() {
        assert_eq!(path_key("C:\\Comics\\SAGA\\"), "c:/comics/saga");
        assert!(same_path("/Books/Vol 1", "/books/vol 1/"));
        assert!(!same_path("/books/vol 1", "/books/vol 2"));
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/a/b/c"), Some("/a/b".to_string()));
        assert_eq!(parent_dir("C:\\a\\b\\"), Some("C:/a".to_string()));
        assert_eq!(parent_dir("/a"), None);
        assert_eq!(parent_dir("relative"), None);
    }

    #[test]
    fn test_parent_dir_of_drive_child_is_drive_root() {
        assert_eq!(parent_dir("C:/a"), Some("C:/".to_string()));
        assert_eq!(parent_dir("c:\\Comics\\"), Some("c:/".to_string()));
        assert_eq!(parent_dir("C:\\"), None);

        let parent = parent_dir("D:/Comics").unwrap();
        assert_eq!(normalize_path(&parent), parent);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/a/b/Vol 01.zip"), "Vol 01.zip");
        assert_eq!(file_name("C:\\a\\folder\\"), "folder");
        assert_eq!(file_name("plain"), "plain");
    }
}
