//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use few_core::VcsBackend;

/// few - a minimal package manager for AI-first projects
#[derive(Parser, Debug)]
#[command(name = "few")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long = "project", global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// User cache root (defaults to ~/.few)
    #[arg(long, global = true, env = "FEW_HOME", value_name = "DIR")]
    pub cache_root: Option<PathBuf>,

    /// Version control backend
    #[arg(long, global = true, env = "FEW_VCS_BACKEND", value_enum)]
    pub backend: Option<BackendArg>,

    /// git executable used by the cli backend
    #[arg(long, global = true, env = "FEW_GIT", value_name = "PATH", hide = true)]
    pub git: Option<PathBuf>,
}

/// Backend names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// System git executable
    Cli,
    /// Built-in libgit2
    Libgit2,
}

impl From<BackendArg> for VcsBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cli => VcsBackend::Cli,
            BackendArg::Libgit2 => VcsBackend::Libgit2,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Prepare this project, or add a package to it
    ///
    /// Without a package, creates .few/words, few.litany.yaml and PARSEME.md,
    /// adds the LLM notice to README.md, and updates .gitignore.
    ///
    /// Examples:
    ///   few listen                       # Initialize the current project
    ///   few listen demo                  # peterbaileyct/demo from GitHub
    ///   few listen owner/name            # owner/name from GitHub
    ///   few listen https://host/x.git    # Any git remote
    Listen {
        /// Package name, owner/name shorthand, or git URL
        package: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Restore every package declared in few.litany.yaml
    Litany {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
