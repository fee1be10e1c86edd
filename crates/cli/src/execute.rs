use crate::commands::{fs, token, Commands};
use webfs_client::WebFsClient;
use webfs_core::Result;

impl Commands {
    pub fn execute(self, client: &WebFsClient) -> Result<()> {
        match self {
            Commands::FetchToken { renewer } => {
                let renewer = renewer.or_else(|| client.config().renewer.clone());
                token::fetch(client, renewer.as_deref())
            }
            Commands::RenewToken { token } => token::renew(client, &token),
            Commands::CancelToken { token } => token::cancel(client, &token),

            Commands::Stat { path } => fs::stat(client, &path),
            Commands::Ls { path } => fs::ls(client, &path),
            Commands::Cat { path } => fs::cat(client, &path),
            Commands::Put {
                source,
                destination,
                force,
            } => fs::put(client, &source, &destination, force),
            Commands::Mkdir { path } => fs::mkdir(client, &path),
            Commands::Rm { path, recursive } => fs::rm(client, &path, recursive),
            Commands::Mv {
                source,
                destination,
            } => fs::mv(client, &source, &destination),
        }
    }
}
