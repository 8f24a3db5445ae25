//! `platformed`: build-time platform specialization driver.
//!
//! Reads `platformed.toml` from the working directory or any parent, merges
//! it with flags and the `PLATFORM` environment variable, and runs the
//! specializer over single files or whole source trees.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manifest::{Overrides, PlatformedManifest};

#[derive(Parser)]
#[command(
    name = "platformed",
    version,
    about = "Specialize platformed modules for a target platform at build time"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Platform selection shared by every command that configures a build.
#[derive(Args, Debug, Default)]
struct PlatformArgs {
    /// Target platform (default: manifest target, then "common")
    #[arg(long, env = "PLATFORM")]
    target: Option<String>,
    /// Known platforms, comma-separated (replaces the manifest list)
    #[arg(long, value_delimiter = ',')]
    platforms: Option<Vec<String>>,
    /// Build mode: production or development
    #[arg(long)]
    mode: Option<String>,
}

impl PlatformArgs {
    fn overrides(self) -> Overrides {
        Overrides {
            target: self.target,
            platforms: self.platforms,
            mode: self.mode,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Specialize one file and print the result
    Transform {
        /// Source file
        file: PathBuf,
        /// Module id used for the marker check (default: the file path)
        #[arg(long)]
        id: Option<String>,
        /// Print a report instead of the code ("json")
        #[arg(long)]
        report: Option<String>,
        #[command(flatten)]
        platform: PlatformArgs,
    },
    /// Specialize a source tree into <out>/<platform>/
    Build {
        /// Source directory (default: [build] src, then "src")
        #[arg(long)]
        src: Option<PathBuf>,
        /// Output root (default: [build] out, then "dist")
        #[arg(long)]
        out: Option<PathBuf>,
        /// Build every known platform
        #[arg(long)]
        all_targets: bool,
        #[command(flatten)]
        platform: PlatformArgs,
    },
    /// List known platforms
    Platforms {
        #[command(flatten)]
        platform: PlatformArgs,
    },
    /// Write a starter platformed.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { dir } => commands::init::run(&dir),

        Commands::Transform {
            file,
            id,
            report,
            platform,
        } => {
            let (manifest, _) = load_manifest(&cwd)?;
            let config = manifest.specializer_config(&platform.overrides())?;
            commands::transform::run(&config, &file, id.as_deref(), report.as_deref())
        }

        Commands::Build {
            src,
            out,
            all_targets,
            platform,
        } => {
            let (manifest, project_dir) = load_manifest(&cwd)?;
            let config = manifest.specializer_config(&platform.overrides())?;
            let src_dir = match src {
                Some(src) => cwd.join(src),
                None => project_dir.join(manifest.src_dir()),
            };
            let out_dir = match out {
                Some(out) => cwd.join(out),
                None => project_dir.join(manifest.out_dir()),
            };
            commands::build::run(&project_dir, &config, &src_dir, &out_dir, all_targets)
        }

        Commands::Platforms { platform } => {
            let (manifest, _) = load_manifest(&cwd)?;
            let config = manifest.specializer_config(&platform.overrides())?;
            commands::platforms::run(&config.registry)
        }
    }
}

/// The nearest manifest and its directory, or defaults rooted at `cwd`.
fn load_manifest(cwd: &Path) -> Result<(PlatformedManifest, PathBuf)> {
    Ok(PlatformedManifest::find_and_load(cwd)?
        .unwrap_or_else(|| (PlatformedManifest::default(), cwd.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn platform_flags_parse() {
        let cli = Cli::try_parse_from([
            "platformed",
            "-vv",
            "build",
            "--target",
            "ios",
            "--platforms",
            "ios,android",
            "--all-targets",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Build {
            all_targets,
            platform,
            ..
        } = cli.command
        else {
            panic!("expected build");
        };
        assert!(all_targets);
        let overrides = platform.overrides();
        assert_eq!(overrides.target.as_deref(), Some("ios"));
        assert_eq!(
            overrides.platforms,
            Some(vec!["ios".to_string(), "android".to_string()])
        );
    }
}
