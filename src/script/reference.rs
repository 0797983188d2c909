//! Script reference classification
//!
//! Turns a raw reference (`./tool`, `https://host/tool.swift`,
//! `owner/repo,branch:dev`, ...) into a [`ScriptSource`].
//!
//! Grammar of a reference:
//!
//! ```text
//! reference := primary ("," modifier)*
//! modifier  := ws* "branch:" name
//! ```

use crate::error::{MarathonError, MarathonResult};
use crate::script::identifier::SCRIPT_EXTENSION;
use std::path::{Path, PathBuf};
use tracing::debug;

const REPOSITORY_SUFFIX: &str = ".git";
const BRANCH_MODIFIER: &str = "branch:";

/// Where a script comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// A file on the local filesystem (absolute, canonical path)
    LocalFile { path: PathBuf },

    /// A URL pointing directly at a source file
    DirectUrl { url: String },

    /// A git repository, optionally at a branch
    Repository { url: String, branch: Option<String> },
}

/// Inputs the classifier needs besides the reference itself
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Directory relative paths are resolved against
    pub cwd: PathBuf,

    /// Whether URLs and repository shorthands are accepted
    pub allow_remote: bool,

    /// Host used to expand `owner/name` shorthands
    pub git_host: String,
}

/// Classify a raw reference string.
pub fn classify(reference: &str, options: &ClassifyOptions) -> MarathonResult<ScriptSource> {
    if let Some(path) = existing_local_file(reference, &options.cwd) {
        debug!("Reference '{}' is a local file: {}", reference, path.display());
        return Ok(ScriptSource::LocalFile { path });
    }

    let (primary, branch) = parse_modifiers(reference)?;

    if primary.starts_with("http") || primary.starts_with("git@") {
        if !options.allow_remote {
            return Err(MarathonError::RemoteScriptNotAllowed(reference.to_string()));
        }

        if !is_valid_url(primary) {
            return Err(MarathonError::ScriptNotFound(reference.to_string()));
        }

        if primary.ends_with(REPOSITORY_SUFFIX) {
            return Ok(ScriptSource::Repository {
                url: primary.to_string(),
                branch,
            });
        }

        if branch.is_some() {
            debug!("Ignoring branch modifier for direct script URL {}", primary);
        }
        return Ok(ScriptSource::DirectUrl {
            url: primary.to_string(),
        });
    }

    if primary.contains('.') {
        return Err(MarathonError::ScriptNotFound(reference.to_string()));
    }

    if !options.allow_remote {
        return Err(MarathonError::RemoteScriptNotAllowed(reference.to_string()));
    }

    let segments: Vec<&str> = primary.split('/').collect();
    match segments.as_slice() {
        [owner, name] if is_shorthand_segment(owner) && is_shorthand_segment(name) => {
            Ok(ScriptSource::Repository {
                url: format!(
                    "https://{}/{}/{}{}",
                    options.git_host, owner, name, REPOSITORY_SUFFIX
                ),
                branch,
            })
        }
        _ => Err(MarathonError::ScriptNotFound(reference.to_string())),
    }
}

/// Resolve `reference` (with `.swift` appended if missing) to an existing file.
fn existing_local_file(reference: &str, cwd: &Path) -> Option<PathBuf> {
    if reference.is_empty() {
        return None;
    }

    let with_extension = if reference.ends_with(SCRIPT_EXTENSION) {
        reference.to_string()
    } else {
        format!("{}{}", reference, SCRIPT_EXTENSION)
    };

    let candidate = expand_path(&with_extension, cwd);
    if !candidate.is_file() {
        return None;
    }

    Some(std::fs::canonicalize(&candidate).unwrap_or(candidate))
}

/// Expand `~` and make a path absolute against `cwd`.
pub fn expand_path(path: &str, cwd: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Split the primary reference from its modifiers.
fn parse_modifiers(reference: &str) -> MarathonResult<(&str, Option<String>)> {
    let mut parts = reference.split(',');
    let primary = parts.next().unwrap_or_default().trim();
    let mut branch = None;

    for modifier in parts {
        let modifier = modifier.trim_start();
        match modifier.strip_prefix(BRANCH_MODIFIER) {
            Some(name) if !name.trim().is_empty() => branch = Some(name.trim().to_string()),
            _ => {
                return Err(MarathonError::InvalidReferenceModifier {
                    reference: reference.to_string(),
                    modifier: modifier.to_string(),
                })
            }
        }
    }

    Ok((primary, branch))
}

fn is_shorthand_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Loose URL validation: a scheme with a host, or an scp-like `git@host:path`.
pub(crate) fn is_valid_url(url: &str) -> bool {
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return false;
    }

    if let Some(rest) = url.strip_prefix("git@") {
        return match rest.split_once(':') {
            Some((host, path)) => !host.is_empty() && !path.is_empty(),
            None => false,
        };
    }

    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or_default();
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
                && (!host.is_empty() || scheme == "file")
        }
        None => false,
    }
}

/// Rewrite GitHub `blob` page URLs to the raw file they display.
pub fn raw_download_url(url: &str) -> String {
    match url.strip_prefix("https://github.com/") {
        Some(rest) if rest.contains("/blob/") => format!(
            "https://raw.githubusercontent.com/{}",
            rest.replacen("/blob/", "/", 1)
        ),
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(cwd: &Path, allow_remote: bool) -> ClassifyOptions {
        ClassifyOptions {
            cwd: cwd.to_path_buf(),
            allow_remote,
            git_host: "github.com".to_string(),
        }
    }

    #[test]
    fn existing_file_without_extension_is_local() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("script.swift"), "print(1)").unwrap();

        let source = classify("./script", &options(temp.path(), false)).unwrap();
        let expected = std::fs::canonicalize(temp.path().join("script.swift")).unwrap();
        assert_eq!(source, ScriptSource::LocalFile { path: expected });
    }

    #[test]
    fn same_file_through_different_paths_is_equal() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("dir")).unwrap();
        std::fs::write(temp.path().join("script.swift"), "").unwrap();

        let direct = classify("script.swift", &options(temp.path(), false)).unwrap();
        let roundabout = classify("dir/../script", &options(temp.path(), false)).unwrap();
        assert_eq!(direct, roundabout);
    }

    #[test]
    fn git_url_is_repository() {
        let temp = TempDir::new().unwrap();
        let source = classify("https://host/a.git", &options(temp.path(), true)).unwrap();
        assert_eq!(
            source,
            ScriptSource::Repository {
                url: "https://host/a.git".to_string(),
                branch: None
            }
        );
    }

    #[test]
    fn swift_url_is_direct() {
        let temp = TempDir::new().unwrap();
        let source = classify("https://host/a.swift", &options(temp.path(), true)).unwrap();
        assert_eq!(
            source,
            ScriptSource::DirectUrl {
                url: "https://host/a.swift".to_string()
            }
        );
    }

    #[test]
    fn ssh_url_with_branch() {
        let temp = TempDir::new().unwrap();
        let source = classify(
            "git@github.com:owner/repo.git, branch:release",
            &options(temp.path(), true),
        )
        .unwrap();
        assert_eq!(
            source,
            ScriptSource::Repository {
                url: "git@github.com:owner/repo.git".to_string(),
                branch: Some("release".to_string())
            }
        );
    }

    #[test]
    fn shorthand_with_branch() {
        let temp = TempDir::new().unwrap();
        let source = classify("user/repo,branch:dev", &options(temp.path(), true)).unwrap();
        assert_eq!(
            source,
            ScriptSource::Repository {
                url: "https://github.com/user/repo.git".to_string(),
                branch: Some("dev".to_string())
            }
        );
    }

    #[test]
    fn shorthand_uses_configured_host() {
        let temp = TempDir::new().unwrap();
        let mut opts = options(temp.path(), true);
        opts.git_host = "gitlab.com".to_string();
        let source = classify("user/repo", &opts).unwrap();
        assert!(matches!(
            source,
            ScriptSource::Repository { ref url, .. } if url == "https://gitlab.com/user/repo.git"
        ));
    }

    #[test]
    fn shorthand_without_remote_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = classify("user/repo", &options(temp.path(), false)).unwrap_err();
        assert!(matches!(err, MarathonError::RemoteScriptNotAllowed(_)));
    }

    #[test]
    fn url_without_remote_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = classify("https://host/a.swift", &options(temp.path(), false)).unwrap_err();
        assert!(matches!(err, MarathonError::RemoteScriptNotAllowed(_)));
    }

    #[test]
    fn dotted_missing_path_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = classify("not/a/real.path", &options(temp.path(), true)).unwrap_err();
        assert!(matches!(err, MarathonError::ScriptNotFound(_)));
    }

    #[test]
    fn malformed_url_is_not_found() {
        let temp = TempDir::new().unwrap();
        for reference in ["https://", "http host/a.swift", "git@nohostpath"] {
            let err = classify(reference, &options(temp.path(), true)).unwrap_err();
            assert!(
                matches!(err, MarathonError::ScriptNotFound(_)),
                "{reference} should be not found"
            );
        }
    }

    #[test]
    fn shorthand_with_wrong_shape_is_not_found() {
        let temp = TempDir::new().unwrap();
        for reference in ["justone", "a/b/c", "/repo"] {
            let err = classify(reference, &options(temp.path(), true)).unwrap_err();
            assert!(matches!(err, MarathonError::ScriptNotFound(_)));
        }
    }

    #[test]
    fn unknown_modifier_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = classify("user/repo,tag:1.0", &options(temp.path(), true)).unwrap_err();
        assert!(matches!(
            err,
            MarathonError::InvalidReferenceModifier { ref modifier, .. } if modifier == "tag:1.0"
        ));

        let err = classify("user/repo,branch:", &options(temp.path(), true)).unwrap_err();
        assert!(matches!(err, MarathonError::InvalidReferenceModifier { .. }));
    }

    #[test]
    fn url_validation() {
        assert!(is_valid_url("https://github.com/a/b.git"));
        assert!(is_valid_url("git@github.com:a/b.git"));
        assert!(is_valid_url("file:///tmp/package"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("github.com/a/b"));
    }

    #[test]
    fn github_blob_urls_become_raw() {
        assert_eq!(
            raw_download_url("https://github.com/owner/repo/blob/main/Scripts/tool.swift"),
            "https://raw.githubusercontent.com/owner/repo/main/Scripts/tool.swift"
        );
        assert_eq!(
            raw_download_url("https://example.com/tool.swift"),
            "https://example.com/tool.swift"
        );
    }
}
