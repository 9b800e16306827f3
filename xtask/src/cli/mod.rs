//! Top-level CLI parsing and help output.

use crate::runtime::error::{XtaskError, XtaskResult};

/// Top-level `xtask` commands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TopLevelCommand {
    SetupWeb(Vec<String>),
    BuildWeb(Vec<String>),
    Package(Vec<String>),
    Help,
}

/// Parse raw command-line arguments into a top-level command selection.
pub fn parse(args: Vec<String>) -> XtaskResult<TopLevelCommand> {
    let Some(cmd) = args.first().cloned() else {
        return Ok(TopLevelCommand::Help);
    };

    let rest = args[1..].to_vec();
    match cmd.as_str() {
        "setup-web" => Ok(TopLevelCommand::SetupWeb(rest)),
        "build-web" => Ok(TopLevelCommand::BuildWeb(rest)),
        "package" => Ok(TopLevelCommand::Package(rest)),
        "help" | "--help" | "-h" => Ok(TopLevelCommand::Help),
        other => Err(XtaskError::validation(format!(
            "unknown xtask command: {other}"
        ))),
    }
}

/// Print the top-level usage text.
pub fn print_usage() {
    eprintln!(
        "Usage: cargo xtask <command> [args]\n\
         \n\
         Commands:\n\
           setup-web                 Install wasm target and trunk (if missing)\n\
           build-web [trunk args]    Build the release plugin bundle with trunk\n\
           package [--skip-build] [--bundle <dir>] [--out <dir>]\n\
                                    Zip the bundle into a distributable plugin archive\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parse_routes_commands_with_trailing_args() {
        assert_eq!(parse(Vec::new()), Ok(TopLevelCommand::Help));
        assert_eq!(
            parse(args(&["package", "--skip-build"])),
            Ok(TopLevelCommand::Package(args(&["--skip-build"])))
        );
        assert_eq!(
            parse(args(&["build-web"])),
            Ok(TopLevelCommand::BuildWeb(Vec::new()))
        );
    }

    #[test]
    fn unknown_command_is_a_validation_error() {
        let err = parse(args(&["deploy"])).expect_err("unknown");
        assert!(err.to_string().contains("unknown xtask command: deploy"));
    }
}
