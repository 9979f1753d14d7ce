use super::EXIT_SUCCESS;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

/// Write the completion script for `shell` to stdout.
pub fn run<C: CommandFactory>(shell: Shell) -> Result<u8, String> {
    let mut script = Vec::new();
    let mut cmd = C::command();
    let bin_name = cmd.get_name().to_owned();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut script);
    std::io::stdout()
        .write_all(&script)
        .map_err(|e| format!("failed to write completions: {e}"))?;
    Ok(EXIT_SUCCESS)
}
