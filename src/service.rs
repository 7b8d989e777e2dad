use crate::{dispatcher::Dispatcher, registry::Registry, server::Server, Config, Result};
use log::info;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ServeOptions {
    #[structopt(long)]
    /// port to listen on, overriding the config file
    port: Option<u16>,
}

pub async fn run_serve(config: Config, options: &ServeOptions) -> Result<()> {
    let Config { server, listeners } = config;

    let registry = Registry::from_config(&listeners)?;
    info!(
        "pull_request listeners: {:?}, push listeners: {:?}",
        listeners.pull_request, listeners.push
    );

    let dispatcher = Dispatcher::new(registry);
    let port = options.port.unwrap_or(server.port);
    let addr = ([0, 0, 0, 0], port).into();

    Server::new(dispatcher, server.dispatch_timeout())
        .start(addr)
        .await
}
