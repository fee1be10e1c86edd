use clap::Subcommand;
use std::path::PathBuf;

pub mod fs;
pub mod token;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a new delegation token and print its urlString
    FetchToken {
        /// Principal allowed to renew the token (defaults to --renewer)
        #[arg(long)]
        renewer: Option<String>,
    },

    /// Renew a delegation token and print its new expiry
    RenewToken {
        /// Token urlString
        token: String,
    },

    /// Cancel a delegation token
    CancelToken {
        /// Token urlString
        token: String,
    },

    /// Show the status of a path
    Stat { path: String },

    /// List a directory
    #[command(visible_alias = "list")]
    Ls { path: String },

    /// Write a file's contents to stdout
    Cat { path: String },

    /// Upload a local file ("-" reads stdin)
    Put {
        source: PathBuf,
        destination: String,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Create a directory and its parents
    Mkdir { path: String },

    /// Delete a path
    Rm {
        path: String,

        #[arg(short, long)]
        recursive: bool,
    },

    /// Rename a path
    Mv { source: String, destination: String },
}
