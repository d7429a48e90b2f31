use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Write a completion script for `shell` to stdout
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, cmd, &mut stdout);
    stdout.flush()?;
    Ok(())
}

/// Render the completion script for every subcommand and flag of `cmd`
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!(
        "Generating {} completions for {} ({} subcommands)",
        shell,
        bin_name,
        cmd.get_subcommands().count()
    );
    generate(shell, cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn command() -> Command {
        Command::new("snapstats").subcommand(
            Command::new("analyze").arg(Arg::new("window_ms").long("window-ms")),
        )
    }

    #[test]
    fn test_bash_script_covers_nested_flags() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut command(), &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("complete -F _snapstats"));
        assert!(script.contains("--window-ms"));
    }
}
