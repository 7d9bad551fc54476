//! Registry entries

use serde::{Deserialize, Serialize};

/// A known repository, identified by its exact URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    pub url: String,
    /// Local clone location, absent until the repository has been cloned
    #[serde(default)]
    pub path: Option<String>,
}

impl RepoRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>, path: Option<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            path,
        }
    }

    /// Record named after the URL's last path segment
    pub fn from_url(url: impl Into<String>, path: Option<String>) -> Self {
        let url = url.into();
        Self {
            name: repo_name_from_url(&url),
            url,
            path,
        }
    }

    /// Record as produced by the legacy one-URL-per-line file
    pub fn from_legacy_line(url: &str) -> Self {
        Self::new(url, url, None)
    }

    /// Path if set and not blank
    pub fn local_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Derives a display name from a clone URL
///
/// `https://host/owner/project.git` and `git@host:owner/project.git` both
/// yield `project`. Falls back to the whole URL.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .rsplit(['/', ':'])
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_https_url() {
        assert_eq!(repo_name_from_url("https://github.com/me/dotfiles.git"), "dotfiles");
        assert_eq!(repo_name_from_url("https://github.com/me/dotfiles/"), "dotfiles");
    }

    #[test]
    fn test_name_from_scp_like_url() {
        assert_eq!(repo_name_from_url("git@github.com:me/tools.git"), "tools");
        assert_eq!(repo_name_from_url("host:project"), "project");
    }

    #[test]
    fn test_name_falls_back_to_url() {
        assert_eq!(repo_name_from_url("/"), "/");
        assert_eq!(repo_name_from_url(""), "");
    }

    #[test]
    fn test_legacy_record_uses_url_as_name() {
        let record = RepoRecord::from_legacy_line("https://example.com/a.git");
        assert_eq!(record.name, "https://example.com/a.git");
        assert_eq!(record.url, "https://example.com/a.git");
        assert_eq!(record.path, None);
    }

    #[test]
    fn test_missing_path_key_deserializes_as_none() {
        let record: RepoRecord =
            serde_json::from_str(r#"{"name":"a","url":"u"}"#).expect("valid record");
        assert_eq!(record.path, None);
    }

    #[test]
    fn test_null_path_serializes_as_null() {
        let json = serde_json::to_string(&RepoRecord::new("a", "u", None)).expect("serialize");
        assert_eq!(json, r#"{"name":"a","url":"u","path":null}"#);
    }

    #[test]
    fn test_blank_path_is_not_a_local_path() {
        assert_eq!(RepoRecord::new("a", "u", Some(" ".to_string())).local_path(), None);
        assert_eq!(
            RepoRecord::new("a", "u", Some("/src/a".to_string())).local_path(),
            Some("/src/a")
        );
    }
}
