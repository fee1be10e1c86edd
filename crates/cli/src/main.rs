use clap::Parser;
use eyre::WrapErr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use webfs_client::WebFsClient;
use webfs_config::{AuthMethod, ClientConfig, ClientConfigBuilder};
use webfs_core::{Token, WEBFS_DELEGATION_TOKEN_VAR, WEBFS_LOG_VAR};
use webfs_security::IdentityContext;

mod commands;
mod execute;

use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "webfs")]
#[command(about = "WebHDFS client with delegation-token management", long_about = None)]
#[command(version)]
struct Cli {
    /// Filesystem URI, e.g. webhdfs://namenode:50070 (default: $WEBFS_URI)
    #[arg(long, global = true)]
    uri: Option<String>,

    /// User to act as
    #[arg(long, global = true)]
    user: Option<String>,

    /// Authentication method (simple or kerberos)
    #[arg(long, global = true)]
    auth: Option<AuthMethod>,

    /// Default renewer for fetched tokens
    #[arg(long, global = true)]
    renewer: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> webfs_core::Result<ClientConfig> {
        let mut builder = ClientConfigBuilder::from_env()?;
        if let Some(uri) = &self.uri {
            builder = builder.uri(uri);
        }
        if let Some(user) = &self.user {
            builder = builder.user(user);
        }
        if let Some(auth) = self.auth {
            builder = builder.auth_method(auth);
        }
        if let Some(renewer) = &self.renewer {
            builder = builder.renewer(renewer);
        }
        builder.build()
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(WEBFS_LOG_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Identity for `config`, seeded with an ambient token from the environment
fn identity(config: &ClientConfig) -> eyre::Result<Arc<IdentityContext>> {
    let identity = Arc::new(IdentityContext::new(config.user.clone(), config.auth_method));
    if let Some(encoded) = std::env::var(WEBFS_DELEGATION_TOKEN_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
    {
        let token = Token::decode_url_string(&encoded)
            .wrap_err_with(|| format!("invalid token in {WEBFS_DELEGATION_TOKEN_VAR}"))?;
        // Tokens without a service are taken to be for this name node.
        let token = if token.service().is_empty() {
            token.with_service(config.token_service())
        } else {
            token
        };
        identity.add_token(Arc::new(token));
    }
    Ok(identity)
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config().wrap_err("failed to load client configuration")?;
    let identity = identity(&config)?;
    let client = WebFsClient::connect(config, identity).wrap_err("failed to create client")?;

    let outcome = cli.command.execute(&client);
    let closed = client.close();
    outcome?;
    closed.wrap_err("failed to release delegation token")?;
    Ok(())
}
