use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Identity of a single test invocation, as reported by the test framework.
#[derive(Debug, Clone)]
pub struct TestIdentity<'a> {
    /// Path of the test module file (e.g. `/repo/tests/storage/test_snapshots.rs`).
    pub module_path: &'a Path,
    /// Enclosing test class/group name, if the framework has one.
    pub class_name: Option<&'a str>,
    pub test_name: &'a str,
}

/// Derive and create the output directory for one test invocation:
/// `<base>/<module dir relative to tests_path>/<module stem>/[class]/<test>/<subdirectory>`.
///
/// The `tests_path` segment must appear in the module's path; a module path
/// outside the configured test root is a configuration error and aborts the
/// caller before any collection happens.
pub fn test_data_dir(
    base_directory: &Path,
    tests_path: &str,
    identity: &TestIdentity,
    subdirectory: &str,
) -> anyhow::Result<PathBuf> {
    let module_dir = identity.module_path.parent().unwrap_or(Path::new(""));
    let relative = relative_to_tests_path(module_dir, tests_path).with_context(|| {
        format!(
            "test root '{}' not found in module path {}",
            tests_path,
            identity.module_path.display()
        )
    })?;

    let module_stem = identity
        .module_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut dir = base_directory.to_path_buf();
    if !relative.is_empty() {
        dir.push(relative);
    }
    dir.push(module_stem);
    if let Some(class) = identity.class_name
        && !class.is_empty()
    {
        dir.push(class);
    }
    dir.push(identity.test_name);
    dir.push(subdirectory);

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create test data dir {}", dir.display()))?;
    Ok(dir)
}

/// Strip everything up to and including the last `tests_path` segment. Returns
/// an empty string when the module sits directly inside the test root, so no
/// empty path segment gets inserted.
fn relative_to_tests_path(module_dir: &Path, tests_path: &str) -> Option<String> {
    let dir = module_dir.to_string_lossy();
    // module lives directly inside the test root
    if module_dir.file_name().and_then(|n| n.to_str()) == Some(tests_path) {
        return Some(String::new());
    }
    let needle = format!("/{}/", tests_path);
    if let Some((_, rest)) = dir.rsplit_once(&needle) {
        return Some(rest.to_string());
    }
    let prefix = format!("{}/", tests_path);
    dir.strip_prefix(&prefix).map(String::from)
}
