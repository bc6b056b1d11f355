//! CLI definitions for retrace
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages).

use std::path::PathBuf;
use std::sync::LazyLock;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Build clap styles for consistent CLI appearance.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Package version, with the git commit for development builds.
static VERSION: LazyLock<String> = LazyLock::new(|| match option_env!("VERGEN_GIT_SHA") {
    Some(sha) if sha != "unknown" => format!("{} ({})", env!("CARGO_PKG_VERSION"), sha),
    _ => env!("CARGO_PKG_VERSION").to_string(),
});

#[derive(Parser)]
#[command(name = "retrace")]
#[command(about = "De-obfuscate Java/Android stack traces with a ProGuard/R8 mapping file")]
#[command(
    long_about = "retrace - De-obfuscate Java/Android stack traces with a ProGuard/R8 mapping file.

Stack frames, exception names and common exception messages (class casts,
null pointer messages) are translated back to the original class, method
and field names and line numbers recorded in the mapping file.

QUICK START:
    retrace trace mapping.txt crash.txt        Retrace one stack trace
    adb logcat | retrace trace mapping.txt     Retrace from stdin
    retrace batch mapping.txt crashes/*.txt    Retrace many files in parallel
    retrace check tests/fixtures/*.xml         Run XML retrace fixtures

CONFIGURATION:
    ~/.config/retrace/config.toml              See 'retrace config show'"
)]
#[command(version = VERSION.as_str())]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Configuration file (default: ~/.config/retrace/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the commands that retrace.
#[derive(Args, Debug, Clone, Default)]
pub struct RetraceArgs {
    /// Print return types, arguments and field types
    #[arg(long, short)]
    pub verbose: bool,

    /// Also translate class names in lines that don't look like frames
    #[arg(long)]
    pub all_class_names: bool,

    /// Line template replacing the built-in ones
    #[arg(long = "regex", value_name = "TEMPLATE")]
    pub regular_expression: Option<String>,

    /// Template for the second pass over each retraced line
    #[arg(long = "regex2", value_name = "TEMPLATE")]
    pub regular_expression2: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrace a stack trace
    #[command(long_about = "Retrace a stack trace read from a file or stdin.

Lines that match no template, or whose symbols are not in the mapping,
are printed unchanged.

TEMPLATES:
    --regex takes a regular expression with placeholders:
    %c class   %C slashed class   %s source file   %l line number
    %t type    %f field           %m method        %a arguments

EXAMPLES:
    retrace trace mapping.txt crash.txt
    retrace trace mapping.txt crash.txt -o crash.retraced.txt
    retrace trace mapping.txt < crash.txt
    retrace trace mapping.txt crash.txt --verbose
    retrace trace mapping.txt log.txt --regex '.*at %c\\.%m\\(%s:%l\\)'")]
    Trace {
        /// ProGuard/R8 mapping file
        #[arg(help = "ProGuard/R8 mapping file")]
        mapping: PathBuf,

        /// Stack trace file ('-' or omitted reads stdin)
        #[arg(help = "Stack trace file ('-' or omitted reads stdin)")]
        stack_trace: Option<PathBuf>,

        /// Write the result to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        retrace: RetraceArgs,
    },

    /// Retrace many stack traces in parallel
    #[command(long_about = "Retrace many stack trace files in parallel.

Each file is retraced with the same mapping and written next to the input
(or into --out-dir) with the configured suffix appended (default: .retraced).

EXAMPLES:
    retrace batch mapping.txt crashes/*.txt
    retrace batch mapping.txt a.txt b.txt --out-dir retraced/ --jobs 8")]
    Batch {
        /// ProGuard/R8 mapping file
        #[arg(help = "ProGuard/R8 mapping file")]
        mapping: PathBuf,

        /// Stack trace files
        #[arg(required = true, help = "Stack trace files")]
        traces: Vec<PathBuf>,

        /// Directory for the retraced files
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Number of parallel workers (default: batch.workers from config)
        #[arg(long, short)]
        jobs: Option<usize>,

        #[command(flatten)]
        retrace: RetraceArgs,
    },

    /// Run XML retrace fixtures
    #[command(long_about = "Run XML retrace fixtures.

Each fixture holds an obfuscated trace, a mapping and the expected output.
Exits with status 1 if any fixture fails.

EXAMPLES:
    retrace check tests/fixtures/*.xml
    retrace check fixture.xml --verbose-output")]
    Check {
        /// Fixture files
        #[arg(required = true, help = "Fixture files")]
        fixtures: Vec<PathBuf>,

        /// Compare against the verbose expectation
        #[arg(long)]
        verbose_output: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Generate a shell completion script.

EXAMPLES:
    retrace completions bash > ~/.local/share/bash-completion/completions/retrace
    retrace completions zsh > ~/.zfunc/_retrace")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    #[command(long_about = "Display the effective configuration in TOML format.

Values missing from the config file are shown with their defaults.

EXAMPLE:
    retrace config show")]
    Show,
    /// Print the configuration file path
    Path,
}
