//! retrace - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use retrace::cli::{Cli, Commands, ConfigCommands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_override = cli.config.as_deref();

    match cli.command {
        Commands::Trace {
            mapping,
            stack_trace,
            output,
            retrace,
        } => {
            let config = commands::config::load(config_override)?;
            commands::trace::handle(
                &config,
                &mapping,
                stack_trace.as_deref(),
                output.as_deref(),
                &retrace,
            )
        }
        Commands::Batch {
            mapping,
            traces,
            out_dir,
            jobs,
            retrace,
        } => {
            let config = commands::config::load(config_override)?;
            commands::batch::handle(&config, &mapping, &traces, out_dir.as_deref(), jobs, &retrace)
        }
        Commands::Check {
            fixtures,
            verbose_output,
        } => {
            if !commands::check::handle(&fixtures, verbose_output)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => {
                let config = commands::config::load(config_override)?;
                commands::config::handle_show(&config)
            }
            ConfigCommands::Path => commands::config::handle_path(config_override),
        },
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}
