//! `platformed build`: specialize a source tree per target platform.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use platformed_core::{Specializer, SpecializerConfig, Transform};
use tracing::{debug, info};

use super::{dialect_for, module_id};

/// What one target's build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub target: String,
    pub output: PathBuf,
    /// Platformed modules rewritten.
    pub specialized: usize,
    /// Files written unchanged, scripts included.
    pub copied: usize,
    pub diagnostics: usize,
}

/// Build `src_dir` into `<out_dir>/<target>/` for the configured target, or
/// for every known platform with `all_targets`.
pub fn run(
    project_dir: &Path,
    config: &SpecializerConfig,
    src_dir: &Path,
    out_dir: &Path,
    all_targets: bool,
) -> Result<()> {
    if !src_dir.is_dir() {
        bail!(
            "source directory not found: {}. Set [build] src in platformed.toml or pass --src.",
            src_dir.display()
        );
    }

    let configs = if all_targets {
        config
            .registry
            .known()
            .map(|target| -> Result<SpecializerConfig> {
                let registry = config.registry.retarget(target)?;
                Ok(SpecializerConfig {
                    registry,
                    ..config.clone()
                })
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        vec![config.clone()]
    };

    for config in &configs {
        let summary = build_for_target(project_dir, config, src_dir, out_dir)?;
        println!("Target: {}", summary.target);
        println!(
            "  {} specialized, {} copied -> {}",
            summary.specialized,
            summary.copied,
            summary.output.display()
        );
        if summary.diagnostics > 0 {
            println!("  {} warning(s)", summary.diagnostics);
        }
    }
    Ok(())
}

/// Mirror `src_dir` into `<out_dir>/<target>/`, rewriting platformed modules.
///
/// Module ids are paths relative to `project_dir`. The first failing module
/// aborts the build.
pub(crate) fn build_for_target(
    project_dir: &Path,
    config: &SpecializerConfig,
    src_dir: &Path,
    out_dir: &Path,
) -> Result<BuildSummary> {
    let target = config.registry.target().to_string();
    let output = out_dir.join(&target);
    info!(target = %target, output = %output.display(), "building");

    let mut files = Vec::new();
    collect_files(src_dir, out_dir, &mut files)?;

    let mut summary = BuildSummary {
        target,
        output: output.clone(),
        specialized: 0,
        copied: 0,
        diagnostics: 0,
    };
    for file in &files {
        let relative = file.strip_prefix(src_dir).unwrap_or(file);
        let dest = output.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let Some(dialect) = dialect_for(file) else {
            fs::copy(file, &dest).with_context(|| format!("copying {}", file.display()))?;
            summary.copied += 1;
            continue;
        };

        let id = module_id(project_dir, file);
        let code =
            fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        let specializer = Specializer::new(config.clone().with_dialect(dialect));
        let outcome = specializer
            .transform(&code, &id)
            .with_context(|| format!("transforming {id}"))?;
        match &outcome {
            Transform::Unchanged => summary.copied += 1,
            Transform::Rewritten(rewrite) => {
                debug!(module = %id, resolved_calls = rewrite.resolved_calls, "rewrote module");
                summary.specialized += 1;
                summary.diagnostics += rewrite.diagnostics.len();
            }
        }
        fs::write(&dest, outcome.code_or(&code))
            .with_context(|| format!("writing {}", dest.display()))?;
    }
    Ok(summary)
}

/// Files under `dir` in path order, skipping the `skip` subtree.
fn collect_files(dir: &Path, skip: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading {}", dir.display()))?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();
        if path == skip {
            continue;
        }
        if entry.file_type()?.is_dir() {
            collect_files(&path, skip, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformed_core::PlatformRegistry;

    const HEADER: &str = "\
import { platformed } from 'virtual:platformed';
import './Header.ios.css';
import './Header.common.css';

export const inset = platformed({ ios: 20, common: 0 });
";

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("Header")).unwrap();
        fs::write(src.join("Header/Header.platformed.ts"), HEADER).unwrap();
        fs::write(src.join("Header/Header.ios.css"), ".h { top: 20px }\n").unwrap();
        fs::write(src.join("index.js"), "export * from './Header/Header.platformed';\n").unwrap();
        dir
    }

    fn config(target: &str) -> SpecializerConfig {
        SpecializerConfig::new(PlatformRegistry::new(target, ["ios", "android"]).unwrap())
    }

    #[test]
    fn builds_one_target() {
        let dir = project();
        let root = dir.path();
        let summary =
            build_for_target(root, &config("ios"), &root.join("src"), &root.join("dist")).unwrap();
        assert_eq!(summary.specialized, 1);
        assert_eq!(summary.copied, 2);
        assert_eq!(summary.output, root.join("dist/ios"));

        let header = fs::read_to_string(root.join("dist/ios/Header/Header.platformed.ts")).unwrap();
        assert_eq!(
            header,
            "import './Header.ios.css';\n\nexport const inset = 20;\n"
        );
        assert!(root.join("dist/ios/Header/Header.ios.css").is_file());
        let index = fs::read_to_string(root.join("dist/ios/index.js")).unwrap();
        assert_eq!(index, "export * from './Header/Header.platformed';\n");
    }

    #[test]
    fn builds_every_target() {
        let dir = project();
        let root = dir.path();
        run(root, &config("ios"), &root.join("src"), &root.join("dist"), true).unwrap();
        for target in ["ios", "android", "common"] {
            assert!(root.join("dist").join(target).join("index.js").is_file(), "{target}");
        }
        let android =
            fs::read_to_string(root.join("dist/android/Header/Header.platformed.ts")).unwrap();
        assert!(android.contains("import './Header.common.css';"));
        assert!(android.contains("export const inset = 0;"));
    }

    #[test]
    fn output_inside_source_is_skipped() {
        let dir = project();
        let src = dir.path().join("src");
        let out = src.join("dist");
        build_for_target(dir.path(), &config("ios"), &src, &out).unwrap();
        let second = build_for_target(dir.path(), &config("ios"), &src, &out).unwrap();
        assert_eq!(second.specialized + second.copied, 3);
    }

    #[test]
    fn failing_module_names_its_id() {
        let dir = project();
        let root = dir.path();
        fs::write(
            root.join("src/Broken.platformed.js"),
            "import { platformed } from 'virtual:platformed';\nplatformed({ web: 1 });\n",
        )
        .unwrap();
        let err = build_for_target(root, &config("ios"), &root.join("src"), &root.join("dist"))
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("transforming src/Broken.platformed.js"), "{msg}");
    }

    #[test]
    fn missing_source_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let err = run(root, &config("ios"), &root.join("src"), &root.join("dist"), false)
            .unwrap_err();
        assert!(err.to_string().contains("source directory not found"));
    }
}
