//! Shared helpers for the CLI commands.

use legboard_core::{Config, HttpProvider, ProviderError};

/// Build the configured HTTP provider, or `None` when no endpoint is set
/// (callers fall back to the synthetic source).
pub fn http_provider(config: &Config) -> Result<Option<HttpProvider>, ProviderError> {
    let Some(base_url) = &config.provider.base_url else {
        return Ok(None);
    };
    let mut provider = HttpProvider::new(base_url, &config.refresh.timezone)?;
    if let (Some(username), Some(password)) =
        (&config.provider.username, &config.provider.password)
    {
        provider = provider.with_credentials(username, password);
    }
    Ok(Some(provider))
}

pub fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}
