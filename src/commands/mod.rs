pub mod checkout;
pub mod collections;
pub mod comment;
pub mod init;
pub mod list;
pub mod status;

use std::time::Instant;

use tracing::info;

use crate::client::FlowBoardsClient;
use crate::config::{self, Config};
use crate::error::{Result, ResultExt};
use crate::state::StateStore;

/// Loads the config and discovers the organization's API endpoint.
pub async fn connect() -> Result<FlowBoardsClient> {
    let config = Config::load()?;
    let started = Instant::now();
    let client = FlowBoardsClient::connect(&config.auth_key, &config.org_id, &config.user_email)
        .await
        .context("failed to discover API endpoint")?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "connected");
    Ok(client)
}

pub fn state_store() -> Result<StateStore> {
    Ok(StateStore::new(config::state_dir()?))
}
