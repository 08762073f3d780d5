//! Path resolution for path-valued options.

use std::path::{Component, Path, PathBuf};

/// Turns a raw option value into an absolute path.
///
/// Implementations must be pure string-to-path computations: no filesystem
/// or network access.
pub trait PathResolver {
    fn resolve(&self, raw: &str) -> PathBuf;
}

/// Resolves relative paths against a fixed base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectoryResolver {
    base: PathBuf,
}

impl BaseDirectoryResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl PathResolver for BaseDirectoryResolver {
    fn resolve(&self, raw: &str) -> PathBuf {
        let raw = Path::new(raw);
        if raw.is_absolute() {
            normalize(raw)
        } else {
            normalize(&self.base.join(raw))
        }
    }
}

/// Drop `.` and fold `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => out.push(component),
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_joined_to_base() {
        let resolver = BaseDirectoryResolver::new("/proj");
        assert_eq!(resolver.resolve("build.gradle"), PathBuf::from("/proj/build.gradle"));
        assert_eq!(
            resolver.resolve("gradle/init.gradle"),
            PathBuf::from("/proj/gradle/init.gradle")
        );
    }

    #[test]
    fn test_absolute_kept() {
        let resolver = BaseDirectoryResolver::new("/proj");
        assert_eq!(
            resolver.resolve("/other/settings.gradle"),
            PathBuf::from("/other/settings.gradle")
        );
    }

    #[test]
    fn test_dot_segments_removed() {
        let resolver = BaseDirectoryResolver::new("/proj/sub");
        assert_eq!(resolver.resolve("./a/../b.gradle"), PathBuf::from("/proj/sub/b.gradle"));
        assert_eq!(resolver.resolve("../included"), PathBuf::from("/proj/included"));
    }

    #[test]
    fn test_parent_of_root_stays_at_root() {
        let resolver = BaseDirectoryResolver::new("/");
        assert_eq!(resolver.resolve("../../x"), PathBuf::from("/x"));
    }
}
