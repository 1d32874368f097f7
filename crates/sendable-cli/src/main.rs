//! auto-sendable CLI
//!
//! Command-line interface for the Swift `Sendable` rewriter

mod commands;
mod output;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::Colorize;
use sendable_core::{DeclKind, init_tracing};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "auto-sendable")]
#[command(about = "auto-sendable: add Sendable conformances to Swift declarations")]
#[command(version = sendable_core::VERSION)]
#[command(
    long_about = "auto-sendable rewrites Swift sources in place, adding `Sendable`, `@unchecked Sendable`,\n\
`final` or an attribute wherever a rewrite pass asks for it. Everything else in the file,\n\
comments and formatting included, is left byte for byte as it was.\n\
\n\
Examples:\n  \
auto-sendable sendable Sources/            # Rewrite every Swift file under Sources/\n  \
auto-sendable sendable --check .           # Exit with 1 if anything would change\n  \
auto-sendable sendable --diff Model.swift  # Show the changes without writing\n  \
auto-sendable unchecked Sources/Legacy     # Mark every class @unchecked Sendable\n  \
auto-sendable attribute MainActor --kind class Sources/UI\n  \
auto-sendable config init                  # Write a configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.autosendable.toml/.autosendable.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

/// Arguments shared by every rewriting command
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Files or directories to rewrite
    #[arg(help = "Files or directories to process (default: current directory)")]
    paths: Vec<PathBuf>,

    /// Report files that would change without writing them
    #[arg(long, help = "Exit with 1 if any file would change, without writing")]
    check: bool,

    /// Show a diff of proposed changes without applying them
    #[arg(
        long,
        help = "Show a unified diff of proposed changes",
        conflicts_with = "check"
    )]
    diff: bool,

    /// Include patterns (glob syntax)
    #[arg(
        long,
        help = "Include files matching pattern (can be used multiple times)"
    )]
    include: Vec<String>,

    /// Exclude patterns (glob syntax)
    #[arg(
        long,
        help = "Exclude files matching pattern (can be used multiple times)"
    )]
    exclude: Vec<String>,

    /// Show progress for long-running operations
    #[arg(long, help = "Show progress bar for large projects")]
    progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add Sendable conformances: unchecked marker, plain marker, then final
    Sendable {
        #[command(flatten)]
        run: RunArgs,

        /// Also mark eligible protocols
        #[arg(long, help = "Add the marker to public protocols as a requirement")]
        protocols: bool,

        /// Mark classes without mutable stored state
        #[arg(long, help = "Add the plain marker to classes without stored `var`s")]
        immutable_classes: bool,
    },

    /// Mark every class `@unchecked Sendable`
    Unchecked {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Add an attribute to declarations of the given kinds
    Attribute {
        /// Attribute name, with or without the leading `@`
        #[arg(help = "Attribute to add, e.g. MainActor")]
        name: String,

        /// Declaration kinds that receive the attribute
        #[arg(long = "kind", required = true, value_enum, help = "Declaration kind (repeatable)")]
        kinds: Vec<KindArg>,

        /// Only declarations with one of these visibility modifiers
        #[arg(long, help = "Restrict to a visibility modifier (repeatable)")]
        visibility: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "toml", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show the configuration in effect, defaults filled in
    Show {
        /// Output format
        #[arg(long, default_value = "toml", help = "Output format")]
        format: ConfigFormat,
    },

    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum KindArg {
    Struct,
    Enum,
    Class,
    Actor,
    Protocol,
    Extension,
    Function,
}

impl From<KindArg> for DeclKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Struct => DeclKind::Struct,
            KindArg::Enum => DeclKind::Enum,
            KindArg::Class => DeclKind::Class,
            KindArg::Actor => DeclKind::Actor,
            KindArg::Protocol => DeclKind::Protocol,
            KindArg::Extension => DeclKind::Extension,
            KindArg::Function => DeclKind::Function,
        }
    }
}

/// Log directive for a `-v` count
fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "sendable_core=error,auto_sendable=error",
        1 => "sendable_core=warn,auto_sendable=warn",
        2 => "sendable_core=info,auto_sendable=info",
        3 => "sendable_core=debug,auto_sendable=debug",
        _ => "sendable_core=trace,auto_sendable=trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return ExitCode::SUCCESS;
    }

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    init_tracing(log_directive(cli.verbose));

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        return ExitCode::FAILURE;
    }

    match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("auto-sendable failed: {:#}", e);
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let use_colors = !cli.no_color;
    match cli.command {
        Some(Commands::Sendable {
            run,
            protocols,
            immutable_classes,
        }) => commands::sendable_command(run, protocols, immutable_classes, cli.config, use_colors),

        Some(Commands::Unchecked { run }) => {
            commands::unchecked_command(run, cli.config, use_colors)
        }

        Some(Commands::Attribute {
            name,
            kinds,
            visibility,
            run,
        }) => commands::attribute_command(
            name,
            kinds.into_iter().map(DeclKind::from).collect(),
            visibility,
            run,
            cli.config,
            use_colors,
        ),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Show { format } => commands::config_show_command(format, cli.config),
            ConfigAction::Schema => commands::config_schema_command(),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("auto-sendable {}", sendable_core::VERSION);
                println!("Build information:");
                println!("  Engine: {} {}", sendable_core::NAME, sendable_core::VERSION);
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", sendable_core::VERSION);
            }
            Ok(ExitCode::SUCCESS)
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
