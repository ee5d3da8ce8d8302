//! Path guardrails shared by the domain.

use std::path::{Component, Path, PathBuf};

use crate::domain::DomainError;

/// Resolve `relative` against `base`, refusing anything that lands outside `base`.
///
/// Resolution is purely lexical: `.` and `..` are folded without touching the
/// filesystem. An absolute `relative` is accepted only if it already lies
/// inside `base`.
pub fn resolve_within(base: &Path, relative: &Path) -> Result<PathBuf, DomainError> {
    let base = normalize(base);
    let candidate = normalize(&base.join(relative));

    if is_inside(&base, &candidate) {
        Ok(candidate)
    } else {
        Err(DomainError::PathEscapesBase {
            base,
            path: relative.to_path_buf(),
        })
    }
}

/// Both paths are normalized. A base of `.` contains every relative path that
/// does not climb out of it.
fn is_inside(base: &Path, candidate: &Path) -> bool {
    if base == Path::new(".") {
        return candidate.is_relative()
            && !matches!(candidate.components().next(), Some(Component::ParentDir));
    }
    candidate.starts_with(base)
}

/// Lexically fold `.` and `..`. Leading `..` on a relative path are kept.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_relative_path_is_joined() {
        let resolved = resolve_within(Path::new("/ws"), Path::new("service/app")).unwrap();
        assert_eq!(resolved, PathBuf::from("/ws/service/app"));
    }

    #[test]
    fn dot_resolves_to_base() {
        let resolved = resolve_within(Path::new("/ws"), Path::new("./")).unwrap();
        assert_eq!(resolved, PathBuf::from("/ws"));
    }

    #[test]
    fn inner_parent_segments_are_folded() {
        let resolved = resolve_within(Path::new("/ws"), Path::new("./a/../b")).unwrap();
        assert_eq!(resolved, PathBuf::from("/ws/b"));
    }

    #[test]
    fn escaping_parent_segments_are_rejected() {
        let err = resolve_within(Path::new("/ws"), Path::new("../etc")).unwrap_err();
        assert!(matches!(err, DomainError::PathEscapesBase { .. }));

        let err = resolve_within(Path::new("/ws"), Path::new("a/../../x")).unwrap_err();
        assert!(matches!(err, DomainError::PathEscapesBase { .. }));
    }

    #[test]
    fn sibling_with_common_prefix_is_rejected() {
        // "/ws-other" shares a string prefix with "/ws" but is not inside it.
        assert!(resolve_within(Path::new("/ws"), Path::new("../ws-other")).is_err());
    }

    #[test]
    fn absolute_path_inside_base_is_accepted() {
        let resolved = resolve_within(Path::new("/ws"), Path::new("/ws/out")).unwrap();
        assert_eq!(resolved, PathBuf::from("/ws/out"));
        assert!(resolve_within(Path::new("/ws"), Path::new("/etc")).is_err());
    }

    #[test]
    fn current_dir_base_accepts_children() {
        let resolved = resolve_within(Path::new("."), Path::new("svc")).unwrap();
        assert_eq!(resolved, PathBuf::from("svc"));

        let resolved = resolve_within(Path::new("./"), Path::new("./svc/../api")).unwrap();
        assert_eq!(resolved, PathBuf::from("api"));

        assert_eq!(resolve_within(Path::new("."), Path::new(".")).unwrap(), PathBuf::from("."));
        assert!(resolve_within(Path::new("."), Path::new("../svc")).is_err());
        assert!(resolve_within(Path::new("."), Path::new("/etc")).is_err());
    }

    #[test]
    fn relative_base_is_supported() {
        let resolved = resolve_within(Path::new("out"), Path::new("a")).unwrap();
        assert_eq!(resolved, PathBuf::from("out/a"));
        assert!(resolve_within(Path::new("out"), Path::new("../a")).is_err());
    }
}
