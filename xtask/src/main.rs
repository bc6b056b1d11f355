//! xtask - Build tasks for retrace
//!
//! Run with: cargo xtask <command>
//!
//! Commands:
//! - gen-docs: Generate documentation (man pages, COMMANDS.md)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, Command, CommandFactory, Parser, Subcommand};

use retrace::cli::Cli;

const BIN: &str = "retrace";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build tasks for retrace")]
struct Xtask {
    #[command(subcommand)]
    command: XtaskCommand,
}

#[derive(Subcommand)]
enum XtaskCommand {
    /// Generate documentation from CLI definitions
    #[command(name = "gen-docs")]
    GenDocs {
        /// Output directory (default: docs/)
        #[arg(long, short, default_value = "docs")]
        output: PathBuf,

        /// Generate man pages only
        #[arg(long)]
        man: bool,

        /// Generate COMMANDS.md only
        #[arg(long)]
        markdown: bool,
    },
}

fn main() -> Result<()> {
    let args = Xtask::parse();

    match args.command {
        XtaskCommand::GenDocs {
            output,
            man,
            markdown,
        } => {
            let gen_all = !man && !markdown;
            if gen_all || man {
                generate_man_pages(&output)?;
            }
            if gen_all || markdown {
                generate_markdown(&output)?;
            }
        }
    }

    Ok(())
}

fn render_man(cmd: &Command, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    fs::write(path, buffer).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Generated: {}", path.display());
    Ok(())
}

/// Generate man pages using clap_mangen
fn generate_man_pages(output: &Path) -> Result<()> {
    let man_dir = output.join("man");
    fs::create_dir_all(&man_dir).context("Failed to create man directory")?;

    let cmd = Cli::command();
    render_man(&cmd, &man_dir.join(format!("{}.1", BIN)))?;

    for subcommand in cmd.get_subcommands().filter(|c| !c.is_hide_set()) {
        let name = subcommand.get_name();
        render_man(subcommand, &man_dir.join(format!("{}-{}.1", BIN, name)))?;

        for nested in subcommand.get_subcommands().filter(|c| !c.is_hide_set()) {
            let file = format!("{}-{}-{}.1", BIN, name, nested.get_name());
            render_man(nested, &man_dir.join(file))?;
        }
    }

    Ok(())
}

fn is_builtin(arg: &Arg) -> bool {
    matches!(arg.get_id().as_str(), "help" | "version")
}

fn flag(arg: &Arg) -> Option<String> {
    let long = arg.get_long().map(|l| format!("--{}", l));
    let short = arg.get_short().map(|s| format!("-{}", s));
    match (long, short) {
        (Some(l), Some(s)) => Some(format!("{}, {}", s, l)),
        (Some(l), None) => Some(l),
        (None, Some(s)) => Some(s),
        _ => None,
    }
}

fn push_arguments(markdown: &mut String, cmd: &Command) {
    let args: Vec<_> = cmd.get_arguments().filter(|a| !is_builtin(a)).collect();
    let help = |arg: &Arg| arg.get_help().map(|h| h.to_string()).unwrap_or_default();

    let positional: Vec<_> = args.iter().filter(|a| a.is_positional()).collect();
    if !positional.is_empty() {
        markdown.push_str("### Arguments\n\n");
        for arg in positional {
            let name = arg.get_id().as_str().to_uppercase();
            markdown.push_str(&format!("- `<{}>`: {}\n", name, help(arg)));
        }
        markdown.push('\n');
    }

    let options: Vec<_> = args
        .iter()
        .filter(|a| !a.is_positional())
        .filter_map(|a| flag(a).map(|f| (f, help(a))))
        .collect();
    if !options.is_empty() {
        markdown.push_str("### Options\n\n");
        for (flag, help) in options {
            markdown.push_str(&format!("- `{}`: {}\n", flag, help));
        }
        markdown.push('\n');
    }
}

fn push_command(markdown: &mut String, title: &str, cmd: &Command) {
    markdown.push_str(&format!("## {}\n\n", title));
    if let Some(about) = cmd.get_about() {
        markdown.push_str(&format!("{}\n\n", about));
    }
    push_arguments(markdown, cmd);
    if let Some(long_about) = cmd.get_long_about() {
        markdown.push_str(&format!("```\n{}\n```\n\n", long_about));
    }
}

/// Generate COMMANDS.md markdown documentation
fn generate_markdown(output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let cmd = Cli::command();
    let mut markdown = String::new();

    markdown.push_str("# retrace Command Reference\n\n");
    markdown.push_str("This document is auto-generated from the CLI definitions.\n\n");
    markdown.push_str("## Table of Contents\n\n");
    for subcommand in cmd.get_subcommands().filter(|c| !c.is_hide_set()) {
        let name = subcommand.get_name();
        markdown.push_str(&format!("- [{}](#{}-{})\n", name, BIN, name));
    }
    markdown.push_str("\n---\n\n");

    push_command(&mut markdown, BIN, &cmd);

    for subcommand in cmd.get_subcommands().filter(|c| !c.is_hide_set()) {
        let name = subcommand.get_name();
        push_command(&mut markdown, &format!("{} {}", BIN, name), subcommand);

        for nested in subcommand.get_subcommands().filter(|c| !c.is_hide_set()) {
            let title = format!("{} {} {}", BIN, name, nested.get_name());
            push_command(&mut markdown, &title, nested);
        }
        markdown.push_str("---\n\n");
    }

    markdown.push_str("\n*Generated by `cargo xtask gen-docs`*\n");

    let output_path = output.join("COMMANDS.md");
    fs::write(&output_path, markdown)?;
    println!("Generated: {}", output_path.display());

    Ok(())
}
