//! Web toolchain setup and release bundle builds.

use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use crate::XtaskCommand;

const TRUNK_HINT: &str = "Install it with `cargo xtask setup-web` (or `cargo install trunk`)";

/// `cargo xtask setup-web`
pub struct SetupWebCommand;

impl XtaskCommand for SetupWebCommand {
    type Options = ();

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        if args.is_empty() {
            Ok(())
        } else {
            Err(XtaskError::validation(
                "`cargo xtask setup-web` does not accept extra arguments",
            ))
        }
    }

    fn run(ctx: &CommandContext, _: Self::Options) -> XtaskResult<()> {
        if ctx.process().wasm_target_installed() {
            println!("wasm32-unknown-unknown already installed");
        } else {
            ctx.process().add_wasm_target(ctx.root())?;
        }

        if ctx.process().command_available("trunk") {
            println!("trunk already installed");
            return Ok(());
        }

        ctx.process()
            .run(ctx.root(), "cargo", vec!["install", "trunk"])
    }
}

/// `cargo xtask build-web [trunk args]`
pub struct BuildWebCommand;

impl XtaskCommand for BuildWebCommand {
    type Options = Vec<String>;

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        Ok(args.to_vec())
    }

    fn run(ctx: &CommandContext, args: Self::Options) -> XtaskResult<()> {
        trunk_release_build(ctx, args)
    }
}

/// Build the release bundle with trunk from the site crate.
pub(crate) fn trunk_release_build(ctx: &CommandContext, args: Vec<String>) -> XtaskResult<()> {
    ctx.process().ensure_command("trunk", TRUNK_HINT)?;
    let trunk_args = trunk_release_args(ctx.artifacts().trunk_dist_arg(), args);
    ctx.process()
        .run_trunk(&ctx.artifacts().site_dir(), trunk_args)
}

fn trunk_release_args(dist: &str, extra: Vec<String>) -> Vec<String> {
    let mut trunk_args = vec![
        "build".to_string(),
        "index.html".to_string(),
        "--release".to_string(),
    ];
    if !args_specify_dist(&extra) {
        trunk_args.push("--dist".to_string());
        trunk_args.push(dist.to_string());
    }
    trunk_args.extend(extra);
    trunk_args
}

fn args_specify_dist(args: &[String]) -> bool {
    args.iter()
        .any(|arg| arg == "--dist" || arg.starts_with("--dist="))
}
