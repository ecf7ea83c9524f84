//! Anchor file references found in configuration files to the file they come from.
//!
//! On disk, file references can be relative to the directory of the configuration
//! file that holds them so the configuration stays portable.
//! In memory, references are absolute so they work regardless of the working directory.
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context as _;
use anyhow::Result;

use super::Config;

/// Errors converting file references between relative and absolute forms.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// A relative reference can't be expressed relative to the base without leaving it.
    #[error("path '{path}' requires backsteps from '{base}' and is not absolute")]
    RequiresBacksteps { path: String, base: String },
}

/// Make every non-empty, relative reference absolute by joining it to `base`.
///
/// Absolute and empty references are left untouched.
pub fn resolve_paths<'a>(refs: impl IntoIterator<Item = &'a mut String>, base: &Path) {
    for reference in refs {
        if reference.is_empty() || Path::new(reference.as_str()).is_absolute() {
            continue;
        }
        *reference = base.join(reference.as_str()).to_string_lossy().into_owned();
    }
}

/// Rewrite every non-empty reference relative to `base`.
///
/// References that would need to step out of `base` stay absolute if they already are,
/// while relative references that would need to step out of `base` are an error.
pub fn relativize_paths<'a>(
    refs: impl IntoIterator<Item = &'a mut String>,
    base: &Path,
) -> Result<()> {
    let cwd = std::env::current_dir().context("unable to determine the working directory")?;
    for reference in refs {
        if reference.is_empty() {
            continue;
        }
        let original = Path::new(reference.as_str());
        let relative = make_relative(&cwd, original, base);
        let backsteps = match &relative {
            None => true,
            Some(relative) => matches!(relative.components().next(), Some(Component::ParentDir)),
        };
        if backsteps {
            if original.is_absolute() {
                continue;
            }
            let error = PathError::RequiresBacksteps {
                path: reference.clone(),
                base: base.display().to_string(),
            };
            return Err(anyhow::anyhow!(error));
        }
        if let Some(relative) = relative {
            *reference = relative.to_string_lossy().into_owned();
        }
    }
    Ok(())
}

/// Resolve the file references of every [`AuthInfo`](super::AuthInfo) in the configuration.
///
/// References are anchored to the directory of the file each entry was loaded from.
/// Entries without a known origin are skipped.
pub fn resolve_all(config: &mut Config) -> Result<()> {
    let cwd = std::env::current_dir().context("unable to determine the working directory")?;
    for auth in config.auth_infos.values_mut() {
        if auth.location_of_origin.as_os_str().is_empty() {
            continue;
        }
        let origin = normalise(&cwd.join(&auth.location_of_origin));
        let base = match origin.parent() {
            None => continue,
            Some(base) => base.to_path_buf(),
        };
        resolve_paths(auth.file_references_mut(), &base);
    }
    Ok(())
}

/// Compute the path of `target` relative to `base`, both interpreted from `cwd`.
///
/// Returns `None` when no relative path exists (for example across Windows drives).
pub fn make_relative(cwd: &Path, target: &Path, base: &Path) -> Option<PathBuf> {
    let target = normalise(&cwd.join(target));
    let base = normalise(&cwd.join(base));

    let mut target_parts = target.components().peekable();
    let mut base_parts = base.components().peekable();
    match (target_parts.peek(), base_parts.peek()) {
        (Some(Component::Prefix(left)), Some(Component::Prefix(right))) if left != right => {
            return None
        }
        _ => (),
    }

    while let (Some(left), Some(right)) = (target_parts.peek(), base_parts.peek()) {
        if left != right {
            break;
        }
        target_parts.next();
        base_parts.next();
    }

    let mut relative = PathBuf::new();
    for _ in base_parts {
        relative.push(Component::ParentDir);
    }
    for part in target_parts {
        relative.push(part);
    }
    if relative.as_os_str().is_empty() {
        relative.push(Component::CurDir);
    }
    Some(relative)
}

/// Lexically remove `.` and `..` components from an absolute path.
pub(crate) fn normalise(path: &Path) -> PathBuf {
    let mut normal = PathBuf::new();
    for part in path.components() {
        match part {
            Component::CurDir => (),
            Component::ParentDir => {
                normal.pop();
            }
            part => normal.push(part),
        }
    }
    normal
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use super::make_relative;
    use super::relativize_paths;
    use super::resolve_all;
    use super::resolve_paths;
    use super::PathError;
    use crate::config::AuthInfo;
    use crate::config::Config;

    #[test]
    fn resolve_joins_relative_references() {
        let mut cert = String::from("certs/client.pem");
        let mut key = String::from("/etc/pulsar/client.key");
        let mut empty = String::new();
        resolve_paths(
            [&mut cert, &mut key, &mut empty],
            Path::new("/home/user/.config/pulsar"),
        );
        assert_eq!(cert, "/home/user/.config/pulsar/certs/client.pem");
        assert_eq!(key, "/etc/pulsar/client.key");
        assert_eq!(empty, "");
    }

    #[test]
    fn relativize_inside_base() {
        let mut cert = String::from("/home/user/.config/pulsar/certs/client.pem");
        relativize_paths([&mut cert], Path::new("/home/user/.config/pulsar"))
            .expect("relativize to succeed");
        assert_eq!(cert, "certs/client.pem");
    }

    #[test]
    fn relativize_keeps_absolute_outside_base() {
        let mut cert = String::from("/etc/pulsar/client.pem");
        relativize_paths([&mut cert], Path::new("/home/user/.config/pulsar"))
            .expect("relativize to succeed");
        assert_eq!(cert, "/etc/pulsar/client.pem");
    }

    #[test]
    fn relativize_rejects_relative_outside_base() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let base = tmp.path().join("nested").join("dir");
        let mut cert = String::from("../../../outside.pem");
        let error = relativize_paths([&mut cert], &base)
            .expect_err("relativize to fail")
            .downcast::<PathError>()
            .expect("unexpected error type");
        match error {
            PathError::RequiresBacksteps { path, .. } => assert_eq!(path, "../../../outside.pem"),
        }
    }

    #[test]
    fn relativize_then_resolve_round_trip() {
        let base = Path::new("/srv/pulsar/conf");
        let original = String::from("/srv/pulsar/conf/tokens/admin.jwt");
        let mut reference = original.clone();
        relativize_paths([&mut reference], base).expect("relativize to succeed");
        assert_eq!(reference, "tokens/admin.jwt");
        resolve_paths([&mut reference], base);
        assert_eq!(reference, original);
    }

    #[test]
    fn make_relative_walks_up() {
        let relative = make_relative(
            Path::new("/"),
            Path::new("/a/b/c.pem"),
            Path::new("/a/d/e"),
        );
        assert_eq!(relative, Some(PathBuf::from("../../b/c.pem")));
    }

    #[test]
    fn resolve_all_anchors_to_origin() {
        let mut config = Config::new();
        let mut anchored = AuthInfo {
            client_key: String::from("keys/client.key"),
            token_file: String::from("token"),
            location_of_origin: PathBuf::from("/srv/pulsar/config"),
            ..Default::default()
        };
        anchored.tls_trust_certs_file_path = String::from("/etc/ssl/ca.pem");
        let floating = AuthInfo {
            token_file: String::from("token"),
            ..Default::default()
        };
        config.auth_infos.insert("anchored".into(), anchored);
        config.auth_infos.insert("floating".into(), floating);

        resolve_all(&mut config).expect("resolve to succeed");
        let anchored = &config.auth_infos["anchored"];
        assert_eq!(anchored.client_key, "/srv/pulsar/keys/client.key");
        assert_eq!(anchored.token_file, "/srv/pulsar/token");
        assert_eq!(anchored.tls_trust_certs_file_path, "/etc/ssl/ca.pem");
        assert_eq!(config.auth_infos["floating"].token_file, "token");
    }
}
