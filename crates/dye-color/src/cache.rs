//! Bounded memoization for the pure conversion functions.
//!
//! [`LruCache`] is a generic fixed-capacity map with strict
//! least-recently-used eviction: a `get` refreshes recency, and inserting
//! beyond capacity evicts exactly the least-recently-used entry.
//!
//! [`ConversionCache`] wraps one independent `LruCache` per conversion
//! function, because each function has its own key shape and hit-rate
//! profile. Keys are always built from *normalized* inputs (uppercase hex
//! without `#`, hue reduced into `[0, 360)`, fixed-decimal rounding of
//! float components), so two spellings of the same color can never occupy
//! two slots. Instances are constructed explicitly and passed where needed;
//! there is no process-wide default.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use crate::color::{Hsl, Hsv, Lab, Oklab, Oklch, Rgb};
use crate::error::ColorError;

/// Default per-function cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// A fixed-capacity map with strict LRU eviction.
///
/// # Example
///
/// ```
/// use dye_color::cache::LruCache;
///
/// let mut cache = LruCache::new(3);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
/// cache.insert("d", 4); // evicts "a", the least recently used
///
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.get(&"d"), Some(4));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: HashMap<K, V>,
    /// Recency order: front is least recently used, back is most recent.
    order: Vec<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self.map.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    /// Insert a key/value pair, evicting the least-recently-used entry if
    /// the cache is full. Re-inserting an existing key replaces its value
    /// and refreshes its recency.
    pub fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        while self.map.len() > self.capacity {
            let evicted = self.order.remove(0);
            self.map.remove(&evicted);
        }
        self.order.push(key);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Remove every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos);
            self.order.push(k);
        }
    }
}

/// Per-function entry counts, for observability tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hex_to_rgb: usize,
    pub rgb_to_hex: usize,
    pub rgb_to_hsv: usize,
    pub hsv_to_rgb: usize,
    pub rgb_to_hsl: usize,
    pub rgb_to_lab: usize,
    pub rgb_to_oklab: usize,
    pub rgb_to_oklch: usize,
}

impl CacheStats {
    /// Total entries across all per-function caches.
    pub fn total(&self) -> usize {
        self.hex_to_rgb
            + self.rgb_to_hex
            + self.rgb_to_hsv
            + self.hsv_to_rgb
            + self.rgb_to_hsl
            + self.rgb_to_lab
            + self.rgb_to_oklab
            + self.rgb_to_oklch
    }
}

/// Fixed-decimal key for an HSV input: hue to 2 decimals in `[0, 360)`,
/// saturation/value to 2 decimals. 359.9999 and 0.0001 round to the same
/// hue key, as required for adjacent angles to share one entry.
fn hsv_key(hsv: Hsv) -> (u32, u32, u32) {
    let h = ((hsv.h.rem_euclid(360.0) * 100.0).round() as u32) % 36000;
    let s = (hsv.s * 100.0).round() as u32;
    let v = (hsv.v * 100.0).round() as u32;
    (h, s, v)
}

/// Memoization layer over the pure color conversions.
///
/// One mutex-guarded [`LruCache`] per conversion function. Shared freely
/// across threads; a `get` under contention returns either nothing or a
/// value previously stored for that exact normalized key.
#[derive(Debug)]
pub struct ConversionCache {
    hex_to_rgb: Mutex<LruCache<String, Rgb>>,
    rgb_to_hex: Mutex<LruCache<u32, String>>,
    rgb_to_hsv: Mutex<LruCache<u32, Hsv>>,
    hsv_to_rgb: Mutex<LruCache<(u32, u32, u32), Rgb>>,
    rgb_to_hsl: Mutex<LruCache<u32, Hsl>>,
    rgb_to_lab: Mutex<LruCache<u32, Lab>>,
    rgb_to_oklab: Mutex<LruCache<u32, Oklab>>,
    rgb_to_oklch: Mutex<LruCache<u32, Oklch>>,
}

impl ConversionCache {
    /// Create caches with the default per-function capacity (1000).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create caches with an explicit per-function capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hex_to_rgb: Mutex::new(LruCache::new(capacity)),
            rgb_to_hex: Mutex::new(LruCache::new(capacity)),
            rgb_to_hsv: Mutex::new(LruCache::new(capacity)),
            hsv_to_rgb: Mutex::new(LruCache::new(capacity)),
            rgb_to_hsl: Mutex::new(LruCache::new(capacity)),
            rgb_to_lab: Mutex::new(LruCache::new(capacity)),
            rgb_to_oklab: Mutex::new(LruCache::new(capacity)),
            rgb_to_oklch: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Memoized hex parse. The key is the uppercase hex string without
    /// `#`, so `#ff5733`, `FF5733`, and `#FF5733` share one entry.
    /// Parse failures are not cached.
    pub fn hex_to_rgb(&self, hex: &str) -> Result<Rgb, ColorError> {
        let key = hex
            .trim()
            .strip_prefix('#')
            .unwrap_or(hex.trim())
            .to_ascii_uppercase();
        if let Some(hit) = lock(&self.hex_to_rgb).get(&key) {
            return Ok(hit);
        }
        let rgb: Rgb = key.parse()?;
        lock(&self.hex_to_rgb).insert(key, rgb);
        Ok(rgb)
    }

    /// Memoized canonical hex formatting (`#RRGGBB`).
    pub fn rgb_to_hex(&self, rgb: Rgb) -> String {
        let key = rgb.packed();
        if let Some(hit) = lock(&self.rgb_to_hex).get(&key) {
            return hit;
        }
        let hex = rgb.to_string();
        lock(&self.rgb_to_hex).insert(key, hex.clone());
        hex
    }

    /// Memoized RGB to HSV conversion.
    pub fn rgb_to_hsv(&self, rgb: Rgb) -> Hsv {
        let key = rgb.packed();
        if let Some(hit) = lock(&self.rgb_to_hsv).get(&key) {
            return hit;
        }
        let hsv = Hsv::from(rgb);
        lock(&self.rgb_to_hsv).insert(key, hsv);
        hsv
    }

    /// Memoized HSV to RGB conversion. The key normalizes hue into
    /// `[0, 360)` and rounds each component to two decimals.
    pub fn hsv_to_rgb(&self, hsv: Hsv) -> Rgb {
        let key = hsv_key(hsv);
        if let Some(hit) = lock(&self.hsv_to_rgb).get(&key) {
            return hit;
        }
        let rgb = Rgb::from(hsv);
        lock(&self.hsv_to_rgb).insert(key, rgb);
        rgb
    }

    /// Memoized RGB to HSL conversion.
    pub fn rgb_to_hsl(&self, rgb: Rgb) -> Hsl {
        let key = rgb.packed();
        if let Some(hit) = lock(&self.rgb_to_hsl).get(&key) {
            return hit;
        }
        let hsl = Hsl::from(rgb);
        lock(&self.rgb_to_hsl).insert(key, hsl);
        hsl
    }

    /// Memoized RGB to LAB conversion.
    pub fn rgb_to_lab(&self, rgb: Rgb) -> Lab {
        let key = rgb.packed();
        if let Some(hit) = lock(&self.rgb_to_lab).get(&key) {
            return hit;
        }
        let lab = Lab::from(rgb);
        lock(&self.rgb_to_lab).insert(key, lab);
        lab
    }

    /// Memoized RGB to OKLab conversion.
    pub fn rgb_to_oklab(&self, rgb: Rgb) -> Oklab {
        let key = rgb.packed();
        if let Some(hit) = lock(&self.rgb_to_oklab).get(&key) {
            return hit;
        }
        let lab = Oklab::from(rgb);
        lock(&self.rgb_to_oklab).insert(key, lab);
        lab
    }

    /// Memoized RGB to OKLCH conversion.
    pub fn rgb_to_oklch(&self, rgb: Rgb) -> Oklch {
        let key = rgb.packed();
        if let Some(hit) = lock(&self.rgb_to_oklch).get(&key) {
            return hit;
        }
        let lch = Oklch::from(rgb);
        lock(&self.rgb_to_oklch).insert(key, lch);
        lch
    }

    /// Per-function entry counts.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hex_to_rgb: lock(&self.hex_to_rgb).len(),
            rgb_to_hex: lock(&self.rgb_to_hex).len(),
            rgb_to_hsv: lock(&self.rgb_to_hsv).len(),
            hsv_to_rgb: lock(&self.hsv_to_rgb).len(),
            rgb_to_hsl: lock(&self.rgb_to_hsl).len(),
            rgb_to_lab: lock(&self.rgb_to_lab).len(),
            rgb_to_oklab: lock(&self.rgb_to_oklab).len(),
            rgb_to_oklch: lock(&self.rgb_to_oklch).len(),
        }
    }

    /// Drop every entry in every per-function cache.
    pub fn clear(&self) {
        lock(&self.hex_to_rgb).clear();
        lock(&self.rgb_to_hex).clear();
        lock(&self.rgb_to_hsv).clear();
        lock(&self.hsv_to_rgb).clear();
        lock(&self.rgb_to_hsl).clear();
        lock(&self.rgb_to_lab).clear();
        lock(&self.rgb_to_oklab).clear();
        lock(&self.rgb_to_oklch).clear();
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a per-function cache, recovering from poisoning: the cached data
/// is pure-function output, so it stays valid even if a writer panicked.
fn lock<'a, K, V>(cache: &'a Mutex<LruCache<K, V>>) -> std::sync::MutexGuard<'a, LruCache<K, V>> {
    match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
