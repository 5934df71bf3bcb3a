use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use clap_complete::{generate, generate_to, Shell};

use gridplan_cli::cli::build_cli_command;

/// Print the completion script, or install it under `out_dir` with the
/// shell's conventional file name.
pub fn handle(shell: Shell, out_dir: Option<&Path>) -> Result<()> {
    let mut cmd = build_cli_command();
    let bin_name = cmd.get_name().to_string();
    let Some(dir) = out_dir else {
        generate(shell, &mut cmd, bin_name, &mut io::stdout());
        return Ok(());
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("creating completion directory '{}'", dir.display()))?;
    let path = generate_to(shell, &mut cmd, bin_name, dir)
        .with_context(|| format!("writing {shell} completion into '{}'", dir.display()))?;
    println!("{}", path.display());
    Ok(())
}
