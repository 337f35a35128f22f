// Knowledge-base directory scanner
use crate::error::{CoreError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use licita_config::CoreConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// List the files under `root` selected by the include/exclude globs
///
/// Globs match against the path relative to `root`. Results are sorted so
/// repeated ingestions see files in the same order.
pub fn scan_directory(root: &Path, config: &CoreConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CoreError::InvalidInput(format!(
            "knowledge base directory not found: {}",
            root.display()
        )));
    }

    let include_set = build_globset(if config.include_paths.is_empty() {
        vec!["**/*".to_string()]
    } else {
        config.include_paths.clone()
    });
    let exclude_set = build_globset(config.exclude_paths.clone());

    let mut files = Vec::new();
    for result in WalkBuilder::new(root).build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error scanning path: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let rel_path = path.strip_prefix(root).unwrap_or(path);
        let rel_str = rel_path.to_string_lossy();

        if let Some(set) = &include_set {
            if !set.is_match(rel_str.as_ref()) {
                continue;
            }
        }
        if let Some(set) = &exclude_set {
            if set.is_match(rel_str.as_ref()) {
                debug!("Excluded {}", rel_str);
                continue;
            }
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

pub fn build_globset(patterns: Vec<String>) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        match Glob::new(&pat) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => warn!("Ignoring invalid glob pattern {}: {}", pat, err),
        }
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(err) => {
            warn!("Failed to build globset: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_respects_globs() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("normas/rascunho")).unwrap();
        fs::write(dir.path().join("lei.txt"), "a").unwrap();
        fs::write(dir.path().join("normas/decreto.md"), "b").unwrap();
        fs::write(dir.path().join("normas/rascunho/nota.md"), "c").unwrap();
        fs::write(dir.path().join("planilha.csv"), "d").unwrap();

        let config = CoreConfig {
            exclude_paths: vec!["**/rascunho/**".to_string()],
            ..Default::default()
        };
        let files = scan_directory(dir.path(), &config).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["lei.txt", "normas/decreto.md"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let result = scan_directory(&dir.path().join("nada"), &CoreConfig::default());
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}
