use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::layer::Runtime;

#[derive(Parser, Debug)]
#[command(name = "layergen")]
#[command(version)]
#[command(about = "A CLI tool to manage AWS Lambda Layers")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and upload an AWS Lambda Layer
    Create(CreateArgs),
    /// List all AWS Lambda Layers
    List(ListArgs),
    /// Delete an AWS Lambda Layer version
    Delete(DeleteArgs),
    /// Manage layergen configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// The name of the AWS Lambda Layer (letters, numbers, and dashes)
    #[arg(long = "layer-name")]
    pub layer_name: Option<String>,
    /// The runtime environment for the Lambda Layer
    #[arg(long = "runtime", value_enum, ignore_case = true)]
    pub runtime: Option<RuntimeArg>,
    /// Packages to include in the Lambda Layer (space-separated)
    #[arg(long = "packages")]
    pub packages: Option<String>,
    /// AWS region to upload the Lambda Layer to (default: AWS configured region)
    #[arg(long = "region")]
    pub region: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// AWS region to list Lambda layers from (default: AWS configured region)
    #[arg(long = "region")]
    pub region: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct DeleteArgs {
    /// The name of the AWS Lambda Layer to delete
    #[arg(long = "layer-name")]
    pub layer_name: Option<String>,
    /// The version number of the layer to delete
    #[arg(long = "version-number", value_parser = clap::value_parser!(u64).range(1..))]
    pub version_number: Option<u64>,
    /// AWS region to delete the Lambda Layer from (default: AWS configured region)
    #[arg(long = "region")]
    pub region: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuntimeArg {
    Nodejs,
    Python,
}

impl From<RuntimeArg> for Runtime {
    fn from(value: RuntimeArg) -> Self {
        match value {
            RuntimeArg::Nodejs => Runtime::Nodejs,
            RuntimeArg::Python => Runtime::Python,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a key in layergen config (e.g. tools.pip.path or runtimes.python)
    Set(ConfigSetArgs),
    /// Print the config file location
    Path,
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Config key path (e.g. runtimes.nodejs)
    pub key: String,
    /// Value to assign to the key (stored as a string)
    pub value: String,
    /// Override config file path (default: $XDG_CONFIG_HOME/layergen/config.toml)
    #[arg(long = "file")]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn runtime_is_case_insensitive() {
        let cli = Cli::try_parse_from([
            "layergen",
            "create",
            "--layer-name",
            "demo",
            "--runtime",
            "Python",
            "--packages",
            "requests six",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.runtime, Some(RuntimeArg::Python));
        assert_eq!(args.packages.as_deref(), Some("requests six"));
    }

    #[test]
    fn runtime_arg_maps_onto_runtime() {
        assert_eq!(Runtime::from(RuntimeArg::Nodejs), Runtime::Nodejs);
        assert_eq!(Runtime::from(RuntimeArg::Python), Runtime::Python);
    }

    #[test]
    fn version_number_must_be_positive() {
        let parsed = Cli::try_parse_from([
            "layergen",
            "delete",
            "--layer-name",
            "demo",
            "--version-number",
            "0",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn verbosity_is_counted() {
        let cli = Cli::try_parse_from(["layergen", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
