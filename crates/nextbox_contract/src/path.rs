//! Storage path helpers shared by the adapter and the in-memory storage.

/// Collapses runs of `/` into a single separator.
pub fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(ch);
    }
    out
}

/// Joins a directory path and an element name with a single separator.
pub fn join_storage_path(parent: &str, name: &str) -> String {
    collapse_separators(&format!("{parent}/{name}"))
}

/// Returns the parent directory of `path`, or `/` for top-level entries.
pub fn parent_storage_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_collapses_repeated_separators() {
        let cases = [
            ("/a", "b.txt", "/a/b.txt"),
            ("/a/", "b.txt", "/a/b.txt"),
            ("//a//", "/b.txt", "/a/b.txt"),
            ("", "b.txt", "/b.txt"),
        ];
        for (parent, name, expected) in cases {
            assert_eq!(join_storage_path(parent, name), expected, "parent={parent:?}");
        }
    }

    #[test]
    fn parent_of_nested_and_top_level_paths() {
        assert_eq!(parent_storage_path("/a/b/c.txt"), "/a/b");
        assert_eq!(parent_storage_path("/a"), "/");
        assert_eq!(parent_storage_path("/a/b/"), "/a");
        assert_eq!(parent_storage_path("a"), "/");
    }
}
