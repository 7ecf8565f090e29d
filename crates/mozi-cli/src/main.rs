mod cmd;
mod templates;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mozi",
    about = "Mozi - Cursor Rules & Commands Installer",
    version,
    after_help = "For more information about a command, run:\n  mozi <COMMAND> --help"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install commands and rules to Cursor IDE configuration
    ///
    /// Copies every command from commands/ to <target>/.cursor/commands/ and the
    /// rules each command lists under "Related Rules" to
    /// <target>/.cursor/rules/mozi/<role>/. Existing files that differ prompt
    /// for skip, overwrite, diff, or merge.
    #[command(after_help = "\
TARGET DIRECTORY (priority order):
  1. --dir, -d <path>    Use specified directory
  2. --home, -H          Use home directory (~/.cursor)
  3. (default)           Use current directory (./.cursor)

EXAMPLES:
  mozi install                        # Install to ./.cursor
  mozi install --home                 # Install to ~/.cursor
  mozi install --dir /path/to/config  # Install to /path/to/config/.cursor")]
    Install {
        /// Install to the specified directory (wins over --home)
        #[arg(short = 'd', long = "dir", value_name = "PATH")]
        dir: Option<PathBuf>,

        /// Install to the home directory
        #[arg(short = 'H', long = "home")]
        home: bool,

        /// Editor used for the merge action
        #[arg(long, env = "EDITOR", default_value = mozi_core::tools::DEFAULT_EDITOR)]
        editor: String,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => exit_with_usage(e),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("{}", Cli::command().render_help());
        return;
    };

    let result = match command {
        Commands::Install { dir, home, editor } => {
            cmd::install::run(dir.as_deref(), home, &editor)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Help and version requests exit 0; every other parse failure is a usage
/// error that re-shows the relevant help and exits 1.
fn exit_with_usage(e: clap::Error) -> ! {
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = e.print();
            std::process::exit(0);
        }
        _ => {
            let _ = e.print();
            let mut command = Cli::command();
            command.build();
            let install_help = if std::env::args().nth(1).as_deref() == Some("install") {
                command
                    .find_subcommand_mut("install")
                    .map(|install| install.render_help())
            } else {
                None
            };
            let help = install_help.unwrap_or_else(|| command.render_help());
            eprintln!("\n{help}");
            std::process::exit(1);
        }
    }
}
