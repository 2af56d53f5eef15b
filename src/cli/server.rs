//! Remembered catalog server address

use anyhow::{Context, Result};
use dialoguer::Input;
use tracing::{debug, info};

use crate::catalog::CatalogClient;
use crate::config::{ClientConfig, DEFAULT_SERVER_URL};

/// Manages which catalog server the client talks to
pub struct ServerSetup;

impl ServerSetup {
    /// Point the client at a server and remember it
    ///
    /// Prompts for the URL when none is given. Unless `skip_check` is set, the
    /// server must answer its health check before the address is stored.
    pub async fn configure(url: Option<String>, skip_check: bool) -> Result<String> {
        let mut config = ClientConfig::load()?;

        let url = match url {
            Some(url) => url,
            None => Input::new()
                .with_prompt("Catalog server URL")
                .default(
                    config
                        .server_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
                )
                .interact_text()
                .context("Failed to read server URL")?,
        };
        let url = url.trim().trim_end_matches('/').to_string();

        if skip_check {
            debug!("Skipping health check for {}", url);
        } else {
            Self::verify(&url).await?;
        }

        config.server_url = Some(url.clone());
        let path = config.save()?;
        info!("Server address stored in {:?}", path);

        Ok(url)
    }

    /// Connect to a server, failing early with a readable message when it is down
    pub async fn connect(url: &str) -> Result<CatalogClient> {
        let client = CatalogClient::new(url)?;
        client
            .health()
            .await
            .with_context(|| format!("Catalog server at {} is not reachable", url))?;
        Ok(client)
    }

    async fn verify(url: &str) -> Result<()> {
        debug!("Checking catalog server at {}", url);
        Self::connect(url).await?;
        info!("Catalog server answered");
        Ok(())
    }
}
