//! ctfc - A static site compiler for CTF challenge platforms.

mod assets;
mod build;
mod cli;
mod config;
mod directives;
mod discover;
mod homepage;
mod logger;
mod meta;
mod serve;
mod template;
mod utils;

use anyhow::{Context, Result, bail};
use build::compile_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use discover::discover_groups;
use homepage::generate_homepage;
use serve::serve_site;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Compile { source, .. } => compile_one(source, config),
        Commands::CompileAll => compile_all(config),
        Commands::Serve { source, .. } => serve_site(source, config),
    }
}

/// Load configuration from `ctfc.toml` (if present) and apply CLI overrides.
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let config_path = cli.root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Compile a single challenge directory into `<output>/<name>/`.
fn compile_one(source: &Path, config: &'static SiteConfig) -> Result<()> {
    let source = resolve_source(source)?;
    let dest = challenge_dest(&source, &config.build.output)?;

    log!("compile"; "{} -> {}", source.display(), dest.display());
    compile_site(&source, &dest, config)?;
    log!("compile"; "done");

    Ok(())
}

/// Discover every challenge under the project root, compile each, then
/// generate the homepage at the output root.
fn compile_all(config: &'static SiteConfig) -> Result<()> {
    let root = resolve_source(&config.root)?;
    let out_root = &config.build.output;

    let groups = discover_groups(&root)?;
    let challenges: Vec<PathBuf> = groups
        .iter()
        .flat_map(|g| g.challenges.iter().cloned())
        .collect();
    if challenges.is_empty() {
        bail!("no challenge directories found under {}", root.display());
    }

    log!(
        "compile";
        "found {} challenge(s) in {} group(s)",
        challenges.len(),
        groups.len()
    );

    for source in &challenges {
        // Output is always flat: dist/<challenge_name>/
        let dest = challenge_dest(source, out_root)?;
        log!("compile"; "{} -> {}", source.display(), dest.display());
        compile_site(source, &dest, config)?;
    }

    generate_homepage(&groups, out_root, config)?;
    log!("compile"; "all done");

    Ok(())
}

/// Canonicalize a source directory, failing if it does not exist.
fn resolve_source(source: &Path) -> Result<PathBuf> {
    let resolved = source
        .canonicalize()
        .with_context(|| format!("source directory {} does not exist", source.display()))?;
    if !resolved.is_dir() {
        bail!("{} is not a directory", resolved.display());
    }
    Ok(resolved)
}

/// Destination directory for a challenge: `<out_root>/<challenge_name>/`.
fn challenge_dest(source: &Path, out_root: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .with_context(|| format!("source {} has no directory name", source.display()))?;
    Ok(out_root.join(name))
}
