//! Locating and loading Java sources.

use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::model::CompilationUnit;
use crate::parse::parse_java;
use crate::{Error, Result};

/// Relative source path of a top-level class: `com.example.Foo` → `com/example/Foo.java`.
///
/// Nested (`Outer$Inner`) and empty names have no file of their own.
pub fn class_source_path(class_name: &str) -> Result<PathBuf> {
    let name = class_name.trim();
    if name.is_empty() || name.contains('$') || name.split('.').any(str::is_empty) {
        return Err(Error::InvalidClassName(class_name.to_string()));
    }
    let mut path: PathBuf = name.split('.').collect();
    path.set_extension("java");
    Ok(path)
}

pub fn is_java_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("java")
}

/// Every `.java` file under `root`, in walk order.
pub fn find_java_sources(
    root: &Path,
    exclude_dirs: &[&str],
    respect_gitignore: bool,
) -> Result<Vec<PathBuf>> {
    let mut override_builder = OverrideBuilder::new(root);
    for dir in exclude_dirs {
        let pattern = format!("!{}/", dir);
        if let Err(e) = override_builder.add(&pattern) {
            tracing::warn!("Invalid exclude pattern '{}': {}", pattern, e);
        }
    }
    let overrides = match override_builder.build() {
        Ok(o) => o,
        Err(e) => {
            tracing::warn!("Failed to build overrides: {}", e);
            ignore::overrides::Override::empty()
        }
    };

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore)
        .git_exclude(respect_gitignore)
        .require_git(false)
        .ignore(respect_gitignore)
        .parents(respect_gitignore)
        .overrides(overrides);

    let mut files = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_java_file(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => tracing::warn!("Error walking directory: {}", err),
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse one file.
pub fn load_file(path: &Path) -> Result<CompilationUnit> {
    let source = std::fs::read_to_string(path)?;
    parse_java(path, &source)
}

/// Read and parse the file declaring `class_name` under `source_root`.
pub fn load_unit(source_root: &Path, class_name: &str) -> Result<CompilationUnit> {
    let path = source_root.join(class_source_path(class_name)?);
    if !path.is_file() {
        return Err(Error::ClassNotFound(format!(
            "{} (looked for {})",
            class_name,
            path.display()
        )));
    }
    load_file(&path)
}
