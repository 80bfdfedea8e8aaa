use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::cache::TtlCache;
use crate::feed::{self, RawMatch};
use crate::history::FixtureContext;

const DEFAULT_BASE_URL: &str = "https://api.betmines.com/betmines/v1/fixtures";
const REQUEST_TIMEOUT_SECS: u64 = 10;
// Livescores move fast, priors and season stats barely at all.
const LIVESCORES_TTL_SECS: u64 = 30;
const FIXTURE_INFO_TTL_SECS: u64 = 300;
const CACHE_CAPACITY: usize = 512;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

/// Upstream collaborator seam: the current live batch plus per-fixture
/// historical/prior context. Implementations own all waiting; the engine
/// itself never suspends.
pub trait LiveFeed: Send + Sync {
    fn live_matches(&self) -> Result<Vec<RawMatch>>;
    fn fixture_context(&self, fixture_id: u64) -> Result<FixtureContext>;
}

/// Blocking HTTP implementation against the livescore API, memoized per
/// URL through injected TTL caches.
pub struct HttpFeed {
    base_url: String,
    livescores: TtlCache<String, String>,
    fixture_info: TtlCache<String, String>,
}

impl HttpFeed {
    /// Environment-configured feed: `GOALCAST_API_BASE_URL`,
    /// `GOALCAST_LIVESCORES_TTL_SECS`, `GOALCAST_INFO_TTL_SECS`.
    pub fn from_env() -> Self {
        let base_url =
            env::var("GOALCAST_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(
            base_url,
            Duration::from_secs(env_secs("GOALCAST_LIVESCORES_TTL_SECS", LIVESCORES_TTL_SECS)),
            Duration::from_secs(env_secs("GOALCAST_INFO_TTL_SECS", FIXTURE_INFO_TTL_SECS)),
        )
    }

    pub fn new(base_url: impl Into<String>, livescores_ttl: Duration, info_ttl: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            livescores: TtlCache::new(livescores_ttl, 4),
            fixture_info: TtlCache::new(info_ttl, CACHE_CAPACITY),
        }
    }

    fn fetch_cached(cache: &TtlCache<String, String>, url: &str) -> Result<String> {
        cache.get_or_fetch(&url.to_string(), || {
            debug!(url, "feed fetch");
            let resp = http_client()?
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .with_context(|| format!("request failed: {url}"))?;
            let status = resp.status();
            let body = resp.text().context("failed reading body")?;
            if !status.is_success() {
                anyhow::bail!("http {status}: {body}");
            }
            Ok(body)
        })
    }
}

impl LiveFeed for HttpFeed {
    fn live_matches(&self) -> Result<Vec<RawMatch>> {
        let url = format!("{}/livescores", self.base_url);
        let body = Self::fetch_cached(&self.livescores, &url)?;
        feed::parse_livescores_json(&body)
    }

    fn fixture_context(&self, fixture_id: u64) -> Result<FixtureContext> {
        let url = format!(
            "{}/info/{fixture_id}?includeSeasonStats=true",
            self.base_url
        );
        let body = Self::fetch_cached(&self.fixture_info, &url)?;
        feed::parse_fixture_info_json(&body)
    }
}
