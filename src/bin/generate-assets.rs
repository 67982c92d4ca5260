#![forbid(unsafe_code)]

//! Writes shell completions and the man page for `stagetree`.
//!
//! Usage: `generate-assets [OUT_DIR]` (default `dist`). Completions land in
//! `OUT_DIR/completions`, the man page in `OUT_DIR/man`.

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, ValueEnum};
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use stagetree::cli::Args;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dist"));

    let cmd = Args::command();
    let scripts = write_completions(&cmd, &out_dir.join("completions"))?;
    let page = write_man_page(cmd, &out_dir.join("man"))?;

    for path in scripts.iter().chain([&page]) {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

/// One completion script per supported shell, including the `--filter` values.
fn write_completions(cmd: &Command, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("{}: failed to create", dir.display()))?;
    let name = cmd.get_name().to_string();
    Shell::value_variants()
        .iter()
        .map(|shell| {
            let mut cmd = cmd.clone();
            generate_to(*shell, &mut cmd, &name, dir)
                .with_context(|| format!("failed to write {shell} completions"))
        })
        .collect()
}

/// Render the man page as `<name>.1`.
fn write_man_page(cmd: Command, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("{}: failed to create", dir.display()))?;
    let path = dir.join(format!("{}.1", cmd.get_name()));
    let mut buffer = Vec::new();
    Man::new(cmd)
        .render(&mut buffer)
        .context("failed to render man page")?;
    fs::write(&path, buffer).with_context(|| format!("{}: failed to write", path.display()))?;
    Ok(path)
}
