//! `platformed init`: write a starter manifest.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{PlatformedManifest, MANIFEST_FILE};

/// Write `platformed.toml` into `dir`, refusing to overwrite one.
pub fn run(dir: &Path) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, PlatformedManifest::template())
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
