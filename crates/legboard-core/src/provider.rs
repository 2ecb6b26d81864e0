//! Snapshot providers.
//!
//! The refresh service is generic over [`SnapshotProvider`]: the live
//! implementation GETs the goal document through the credential-gated proxy,
//! the synthetic one advances the evolution model one step per fetch.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::ProviderError;
use crate::evolve;
use crate::snapshot::Snapshot;

/// A source of scoreboard snapshots.
#[allow(async_fn_in_trait)]
pub trait SnapshotProvider {
    /// Short identifier, e.g. "http", "synthetic".
    fn name(&self) -> &'static str;

    /// Fetch the current snapshot. Failures are transient by contract; the
    /// controller keeps the previous snapshot and retries on the next tick.
    async fn fetch(&mut self) -> Result<Snapshot, ProviderError>;
}

/// Live provider: fetches the snapshot JSON over HTTP.
///
/// Sends the IANA timezone as a query parameter and no-cache headers so no
/// intermediary serves a stale scoreboard. A Basic credential is attached
/// when the proxy in front of the upstream requires one.
#[derive(Debug)]
pub struct HttpProvider {
    client: Client,
    endpoint: Url,
    timezone: String,
    credentials: Option<(String, String)>,
}

impl HttpProvider {
    pub fn new(base_url: &str, timezone: &str) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            timezone: timezone.to_string(),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }
}

impl SnapshotProvider for HttpProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&mut self) -> Result<Snapshot, ProviderError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("tz", self.timezone.as_str())])
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => response
                .json::<Snapshot>()
                .await
                .map_err(|e| ProviderError::Malformed(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ProviderError::Unauthorized),
            status => Err(ProviderError::Status {
                status: status.as_u16(),
            }),
        }
    }
}

/// Synthetic provider: returns the current snapshot, then evolves it so the
/// next fetch sees one more tick of activity.
pub struct SyntheticProvider<R: Rng> {
    current: Snapshot,
    daily_target: u32,
    rng: R,
}

impl<R: Rng> SyntheticProvider<R> {
    pub fn new(initial: Snapshot, daily_target: u32, rng: R) -> Self {
        Self {
            current: initial,
            daily_target,
            rng,
        }
    }

    /// Return the current snapshot and evolve one tick.
    pub fn step(&mut self) -> Snapshot {
        let snapshot = self.current.clone();
        self.current = evolve::next_snapshot(&snapshot, self.daily_target, &mut self.rng);
        snapshot
    }
}

impl SyntheticProvider<StdRng> {
    /// Demo provider starting from the sample snapshot.
    pub fn sample(daily_target: u32) -> Self {
        Self::new(Snapshot::sample(), daily_target, StdRng::from_entropy())
    }
}

impl SyntheticProvider<Pcg64Mcg> {
    /// Fully deterministic provider for tests and reproducible demos.
    pub fn seeded(initial: Snapshot, daily_target: u32, seed: u64) -> Self {
        Self::new(initial, daily_target, Pcg64Mcg::seed_from_u64(seed))
    }
}

impl<R: Rng> SnapshotProvider for SyntheticProvider<R> {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch(&mut self) -> Result<Snapshot, ProviderError> {
        Ok(self.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn synthetic_first_fetch_returns_initial_state() {
        let mut provider = SyntheticProvider::seeded(Snapshot::sample(), 13, 4);
        let first = provider.fetch().await.unwrap();
        assert_eq!(first, Snapshot::sample());
    }

    #[tokio::test]
    async fn synthetic_is_deterministic_per_seed() {
        let mut a = SyntheticProvider::seeded(Snapshot::sample(), 13, 21);
        let mut b = SyntheticProvider::seeded(Snapshot::sample(), 13, 21);
        for _ in 0..20 {
            assert_eq!(a.fetch().await.unwrap(), b.fetch().await.unwrap());
        }
    }

    #[test]
    fn http_provider_rejects_bad_url() {
        let err = HttpProvider::new("not a url", "UTC").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidUrl { .. }));
    }
}
