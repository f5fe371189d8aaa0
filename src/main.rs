// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use clap::Parser;

use wbemcli::{
    cli::{Cli, Commands, ConnectionCommand},
    commands::{
        connection::{export_connection, list_connections, show_connection},
        shrub::show_shrub,
    },
    config::{expand_tilde, Config},
    utils::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // An explicitly given config file must exist
    if let Some(path) = &cli.config {
        let expanded_path = expand_tilde(path);
        if !expanded_path.exists() {
            anyhow::bail!("Config file not found: {:?}", expanded_path);
        }
    }

    let config = Config::load_with_priority(cli.config.as_deref()).await?;
    let mut server = config.resolve_server(&cli.connection_overrides())?;
    tracing::debug!("Server definition: {:?}", server);

    match &cli.command {
        Commands::Connection(ConnectionCommand::List) => {
            print!("{}", list_connections(&config, Some(&server.name)));
        }
        Commands::Connection(ConnectionCommand::Show) => {
            print!("{}", show_connection(&server));
        }
        Commands::Connection(ConnectionCommand::Export) => {
            print!("{}", export_connection(&server));
        }
        Commands::Shrub(args) => {
            let conn = server.open().await?;
            let output = show_shrub(conn.as_ref(), args, cli.output_format).await?;
            print!("{output}");
        }
    }

    Ok(())
}
