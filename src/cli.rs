use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use hclgen::LabelSource;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terraconf")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Generate resource configuration from recorded infrastructure state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render every resource in a state file as a resource block
    Generate(GenerateArgs),

    /// List the resources recorded in a state file
    List(ListArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Generate
// ============================================================================

#[derive(Parser)]
pub struct GenerateArgs {
    /// State file to read
    pub state: PathBuf,

    /// Overlay config file (defaults and excludes)
    #[arg(short, long, env = "TERRACONF_CONFIG")]
    pub config: Option<String>,

    /// Write config to a file instead of stdout
    #[arg(short, long, conflicts_with = "check")]
    pub output: Option<PathBuf>,

    /// Compare with an existing file instead of writing; fails on drift
    #[arg(long)]
    pub check: Option<PathBuf>,

    /// Only render resources of this type (repeatable)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Exclude an attribute from every resource (repeatable)
    #[arg(short = 'x', long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Number of parallel render jobs
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,

    /// Emit raw block text without formatting
    #[arg(long)]
    pub no_format: bool,

    /// Render unsupported default values as `unknown` instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Leave out empty lists and maps recorded in state
    #[arg(long)]
    pub skip_empty: bool,

    /// Block label source (overrides config)
    #[arg(long, value_enum)]
    pub label: Option<LabelArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LabelArg {
    /// Primary instance identifier
    Id,
    /// Name part of the state address
    Address,
}

impl From<LabelArg> for LabelSource {
    fn from(arg: LabelArg) -> Self {
        match arg {
            LabelArg::Id => LabelSource::Id,
            LabelArg::Address => LabelSource::Address,
        }
    }
}

// ============================================================================
// List
// ============================================================================

#[derive(Parser)]
pub struct ListArgs {
    /// State file to read
    pub state: PathBuf,

    /// Only list resources of this type (repeatable)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "terraconf",
            "-v",
            "generate",
            "terraform.tfstate",
            "--type",
            "aws_instance",
            "-x",
            "arn",
            "-x",
            "tags_all",
            "--label",
            "address",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.state, PathBuf::from("terraform.tfstate"));
        assert_eq!(args.types, vec!["aws_instance".to_string()]);
        assert_eq!(args.exclude, vec!["arn".to_string(), "tags_all".to_string()]);
        assert_eq!(args.jobs, 4);
        assert!(matches!(args.label, Some(LabelArg::Address)));
    }

    #[test]
    fn test_output_conflicts_with_check() {
        let result = Cli::try_parse_from([
            "terraconf",
            "generate",
            "state.json",
            "--output",
            "main.tf",
            "--check",
            "main.tf",
        ]);
        assert!(result.is_err());
    }
}
