use clap::{Parser, Subcommand};

/// hostproc - inspect the `process` object exposed to guest scripts
#[derive(Parser, Debug)]
#[command(name = "hostproc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the guest `process` descriptor for ARGS and print it
    Inspect {
        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// `execPath` source: cwd or exe (default: HOSTPROC_EXEC_PATH or cwd)
        #[arg(long, value_name = "MODE")]
        exec_path: Option<String>,

        /// Guest invocation arguments (`process.argv`)
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the sanitized environment snapshot guests see as `process.env`
    Env {
        /// Print as a JSON object
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List `process` slots present for compatibility but not implemented
    Slots,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_with_trailing_args() {
        let cli = Cli::try_parse_from(["hostproc", "inspect", "--json", "app.js", "--flag"]).unwrap();
        match cli.command {
            Commands::Inspect { json, args, exec_path } => {
                assert!(json);
                assert_eq!(exec_path, None);
                assert_eq!(args, vec!["app.js".to_string(), "--flag".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inspect_without_args() {
        let cli = Cli::try_parse_from(["hostproc", "inspect"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { ref args, json: false, .. } if args.is_empty()));
    }

    #[test]
    fn test_parse_env_and_slots() {
        let cli = Cli::try_parse_from(["hostproc", "env", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Env { json: true }));
        let cli = Cli::try_parse_from(["hostproc", "slots"]).unwrap();
        assert!(matches!(cli.command, Commands::Slots));
    }
}
