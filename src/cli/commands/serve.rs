//! Serve command - run the HTTP server

use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::error::HeroResult;
use crate::server;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: &Config) -> HeroResult<()> {
    let config = apply_args(args, config);
    server::serve(&config).await
}

fn apply_args(args: ServeArgs, config: &Config) -> Config {
    let mut config = config.clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(prefix) = args.route_prefix {
        config.server.route_prefix = prefix;
    }
    config
}
