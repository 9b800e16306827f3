//! Workspace developer workflow commands (`cargo xtask`).
//!
//! The crate is a small CLI layer over a shared runtime. Command modules own workflow policy
//! while [`runtime`] owns process execution, artifact paths and error reporting.

pub mod cli;
pub mod commands;
pub mod manifest;
pub mod runtime;

use crate::cli::TopLevelCommand;
use crate::commands::package::PackageCommand;
use crate::commands::web::{BuildWebCommand, SetupWebCommand};
use crate::runtime::context::CommandContext;
use crate::runtime::error::XtaskResult;

/// Shared command contract for top-level xtask commands.
///
/// [`XtaskCommand::parse`] translates raw arguments into typed options without side effects;
/// [`XtaskCommand::run`] executes them against the shared runtime.
pub trait XtaskCommand {
    /// Typed options produced by CLI parsing.
    type Options;

    /// Parse command-line arguments into typed options.
    fn parse(args: &[String]) -> XtaskResult<Self::Options>;

    /// Execute the command using the shared runtime context.
    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()>;
}

/// Executes the `xtask` binary using the current process arguments.
pub fn execute_from_env() -> XtaskResult<()> {
    let parsed = cli::parse(std::env::args().skip(1).collect())?;
    let ctx = CommandContext::new()?;

    match parsed {
        TopLevelCommand::SetupWeb(args) => {
            SetupWebCommand::run(&ctx, SetupWebCommand::parse(&args)?)
        }
        TopLevelCommand::BuildWeb(args) => {
            BuildWebCommand::run(&ctx, BuildWebCommand::parse(&args)?)
        }
        TopLevelCommand::Package(args) => PackageCommand::run(&ctx, PackageCommand::parse(&args)?),
        TopLevelCommand::Help => {
            cli::print_usage();
            Ok(())
        }
    }
}

/// Converts an xtask result into a process exit code.
pub fn exit_code(result: XtaskResult<()>) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::from(1)
        }
    }
}
