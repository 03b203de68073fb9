//! Market board price lookup.
//!
//! Fetches current listings from a Universalis-style API with the same
//! discipline the game's data tooling uses: a fixed minimum delay between
//! requests, exponential backoff on HTTP 429/5xx and timeouts, and a
//! bounded TTL'd response cache so repeated lookups do not hit the network.
//! Nothing in the matching or harmony path ever calls this service.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::AppConfig;

/// A fetched market quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub item_id: u32,
    pub world: String,
    /// Cheapest current listing, if any
    pub lowest_listing: Option<u64>,
    /// Rolling average sale price reported by the API
    pub average_price: Option<f64>,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
    /// True when the quote was served from the response cache
    pub cached: bool,
}

/// Error while fetching a market quote.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("market request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("item {item_id} is not listed on {world}")]
    NotListed { item_id: u32, world: String },

    #[error("market API returned HTTP {status} after {attempts} attempts")]
    RetriesExhausted { status: u16, attempts: u32 },

    #[error("failed to parse market response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct MarketResponse {
    #[serde(default)]
    listings: Vec<Listing>,
    #[serde(rename = "currentAveragePrice", default)]
    current_average_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(rename = "pricePerUnit")]
    price_per_unit: u64,
}

struct CachedResponse {
    body: String,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedResponse {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Bounded response cache: TTL expiry plus least-recently-used eviction.
struct ResponseCache {
    entries: HashMap<String, CachedResponse>,
    /// Keys ordered oldest-access first
    order: Vec<String>,
    max_entries: usize,
    ttl: Duration,
}

impl ResponseCache {
    fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            self.entries.remove(key);
            self.order.retain(|k| k != key);
            return None;
        }
        let body = entry.body.clone();
        self.order.retain(|k| k != key);
        self.order.push(key.to_string());
        Some(body)
    }

    fn store(&mut self, key: String, body: String) {
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        }
        while self.entries.len() >= self.max_entries && !self.order.is_empty() {
            let oldest = self.order.remove(0);
            self.entries.remove(&oldest);
            tracing::debug!(key = %oldest, "Price cache evicted oldest entry");
        }
        self.entries.insert(
            key.clone(),
            CachedResponse {
                body,
                cached_at: Instant::now(),
                ttl: self.ttl,
            },
        );
        self.order.push(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Blocking market price client.
pub struct PriceService {
    client: reqwest::blocking::Client,
    base_url: String,
    request_delay: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
    cache: Mutex<ResponseCache>,
    last_request: Mutex<Option<Instant>>,
}

impl PriceService {
    /// Build a client from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self, PriceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("dyematch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.price_api_base.trim_end_matches('/').to_string(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_retries: config.max_retries,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
            cache: Mutex::new(ResponseCache::new(
                config.price_cache_capacity,
                Duration::from_secs(config.price_cache_ttl_secs),
            )),
            last_request: Mutex::new(None),
        })
    }

    /// Fetch the current quote for an item on a world.
    pub fn quote(&self, item_id: u32, world: &str) -> Result<PriceQuote, PriceError> {
        let url = format!("{}/{}/{}", self.base_url, world, item_id);
        let key = cache_key(&url);

        if let Some(body) = lock(&self.cache).get(&key) {
            tracing::debug!(item_id, world, "Price served from cache");
            return parse_quote(&body, item_id, world, true);
        }

        let body = self.fetch_with_retry(&url, item_id, world)?;
        let quote = parse_quote(&body, item_id, world, false)?;
        lock(&self.cache).store(key, body);
        Ok(quote)
    }

    /// Entries currently held in the response cache.
    pub fn cache_len(&self) -> usize {
        lock(&self.cache).len()
    }

    fn fetch_with_retry(
        &self,
        url: &str,
        item_id: u32,
        world: &str,
    ) -> Result<String, PriceError> {
        let mut attempt: u32 = 0;
        loop {
            self.throttle();

            match self.client.get(url).send() {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 404 {
                        return Err(PriceError::NotListed {
                            item_id,
                            world: world.to_string(),
                        });
                    }
                    if status.as_u16() == 429 || status.is_server_error() {
                        if attempt < self.max_retries {
                            self.backoff(attempt, status.as_u16());
                            attempt += 1;
                            continue;
                        }
                        return Err(PriceError::RetriesExhausted {
                            status: status.as_u16(),
                            attempts: attempt + 1,
                        });
                    }
                    let response = response.error_for_status()?;
                    return Ok(response.text()?);
                }
                Err(e) if e.is_timeout() && attempt < self.max_retries => {
                    tracing::warn!(url, attempt, "Price request timed out, retrying");
                    self.backoff(attempt, 0);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Enforce the minimum inter-request delay.
    fn throttle(&self) {
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.request_delay {
                std::thread::sleep(self.request_delay - elapsed);
            }
        }
        *last = Some(Instant::now());
    }

    fn backoff(&self, attempt: u32, status: u16) {
        let wait = self.retry_base_delay * 2u32.saturating_pow(attempt);
        tracing::warn!(status, attempt, wait_ms = wait.as_millis() as u64, "Backing off before retry");
        std::thread::sleep(wait);
    }
}

fn parse_quote(
    body: &str,
    item_id: u32,
    world: &str,
    cached: bool,
) -> Result<PriceQuote, PriceError> {
    let response: MarketResponse = serde_json::from_str(body)?;
    Ok(PriceQuote {
        item_id,
        world: world.to_string(),
        lowest_listing: response.listings.iter().map(|l| l.price_per_unit).min(),
        average_price: response.current_average_price,
        fetched_at: chrono::Utc::now(),
        cached,
    })
}

fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

fn lock(cache: &Mutex<ResponseCache>) -> std::sync::MutexGuard<'_, ResponseCache> {
    match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
