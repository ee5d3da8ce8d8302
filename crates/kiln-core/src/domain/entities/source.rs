//! Where a template tree comes from.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// A parsed template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    /// A directory on the local filesystem.
    Local(PathBuf),
    /// A git repository, optionally pinned to a branch or tag.
    Git {
        url: String,
        reference: Option<String>,
    },
}

impl SourceLocator {
    /// Parse a source string.
    ///
    /// - `file:///abs/path` and plain paths are local. Relative paths are
    ///   resolved against `base_dir` when one is given.
    /// - `https://`, `http://`, `ssh://`, `git://`, `git@host:` and anything
    ///   ending in `.git` is a git repository. A `git+` prefix forces git.
    /// - A trailing `#ref` on a git URL selects the branch or tag.
    pub fn parse(raw: &str, base_dir: Option<&Path>) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid(raw, "source cannot be empty"));
        }

        if let Some(path) = raw.strip_prefix("file://") {
            if path.is_empty() {
                return Err(invalid(raw, "file URL has no path"));
            }
            return Ok(Self::Local(resolve_local(path, base_dir)));
        }

        let (forced_git, rest) = match raw.strip_prefix("git+") {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if forced_git || looks_like_git(rest) {
            return parse_git(raw, rest);
        }

        if let Some((scheme, _)) = rest.split_once("://") {
            return Err(invalid(raw, &format!("unsupported scheme '{scheme}'")));
        }

        Ok(Self::Local(resolve_local(rest, base_dir)))
    }

    pub fn is_git(&self) -> bool {
        matches!(self, Self::Git { .. })
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Git {
                url,
                reference: Some(r),
            } => write!(f, "{url}#{r}"),
            Self::Git {
                url,
                reference: None,
            } => write!(f, "{url}"),
        }
    }
}

fn looks_like_git(s: &str) -> bool {
    const SCHEMES: [&str; 4] = ["https://", "http://", "ssh://", "git://"];
    let without_ref = s.split('#').next().unwrap_or(s);
    SCHEMES.iter().any(|scheme| s.starts_with(scheme))
        || s.starts_with("git@")
        || without_ref.ends_with(".git")
}

fn parse_git(raw: &str, rest: &str) -> Result<SourceLocator, DomainError> {
    let (url, reference) = match rest.split_once('#') {
        Some((url, r)) if r.is_empty() => return Err(invalid(raw, &format!("empty git ref after '{url}#'"))),
        Some((url, r)) => (url, Some(r.to_string())),
        None => (rest, None),
    };
    if url.is_empty() {
        return Err(invalid(raw, "git URL is empty"));
    }
    Ok(SourceLocator::Git {
        url: url.to_string(),
        reference,
    })
}

fn resolve_local(path: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(path);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

fn invalid(locator: &str, reason: &str) -> DomainError {
    DomainError::InvalidSourceLocator {
        locator: locator.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_relative_path_resolves_against_base() {
        let locator = SourceLocator::parse("./skeleton", Some(Path::new("/templates"))).unwrap();
        assert_eq!(locator, SourceLocator::Local(PathBuf::from("/templates/./skeleton")));
    }

    #[test]
    fn absolute_path_ignores_base() {
        let locator = SourceLocator::parse("/srv/tpl", Some(Path::new("/templates"))).unwrap();
        assert_eq!(locator, SourceLocator::Local(PathBuf::from("/srv/tpl")));
    }

    #[test]
    fn file_url_is_local() {
        let locator = SourceLocator::parse("file:///srv/tpl", None).unwrap();
        assert_eq!(locator, SourceLocator::Local(PathBuf::from("/srv/tpl")));
    }

    #[test]
    fn https_url_is_git_with_ref() {
        let locator =
            SourceLocator::parse("https://github.com/acme/tpl.git#v1.2.0", None).unwrap();
        assert_eq!(
            locator,
            SourceLocator::Git {
                url: "https://github.com/acme/tpl.git".into(),
                reference: Some("v1.2.0".into()),
            }
        );
        assert_eq!(locator.to_string(), "https://github.com/acme/tpl.git#v1.2.0");
    }

    #[test]
    fn scp_style_url_is_git() {
        let locator = SourceLocator::parse("git@github.com:acme/tpl.git", None).unwrap();
        assert!(locator.is_git());
    }

    #[test]
    fn git_plus_prefix_forces_git() {
        let locator = SourceLocator::parse("git+file:///srv/repo", None).unwrap();
        assert_eq!(
            locator,
            SourceLocator::Git {
                url: "file:///srv/repo".into(),
                reference: None,
            }
        );
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = SourceLocator::parse("s3://bucket/tpl", None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidSourceLocator { .. }));
    }

    #[test]
    fn empty_source_and_empty_ref_are_rejected() {
        assert!(SourceLocator::parse("   ", None).is_err());
        assert!(SourceLocator::parse("https://host/repo.git#", None).is_err());
    }
}
