use crate::domain::model::{City, Coordinates};
use crate::domain::ports::{CitySource, Clock};
use crate::utils::text::fold_diacritics;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_CITY_TTL: Duration = Duration::from_secs(5 * 60);

/// Map default when a city cannot be resolved: Bogotá.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    lat: 4.711,
    lon: -74.0721,
};

/// Normalized lookup key: trimmed, lowercase, no diacritics.
pub fn normalize_city_name(name: &str) -> String {
    fold_diacritics(name.trim())
}

/// City part of a picker label such as `"Medellín, Antioquia"`.
///
/// Lookups match exactly, so callers strip the trailing region first.
pub fn city_part(label: &str) -> &str {
    label.split(',').next().unwrap_or_default().trim()
}

/// Major cities used when the remote list cannot be fetched.
pub fn fallback_cities() -> Vec<City> {
    [
        ("Bogotá", "bogota", 4.711, -74.0721, 7_181_000),
        ("Medellín", "medellin", 6.2442, -75.5812, 2_529_000),
        ("Cali", "cali", 3.4516, -76.532, 2_228_000),
        ("Barranquilla", "barranquilla", 10.9685, -74.7813, 1_206_000),
    ]
    .into_iter()
    .map(|(name, normalized, lat, lon, population)| City {
        name: name.to_string(),
        name_normalized: normalized.to_string(),
        lat,
        lon,
        country: "Colombia".to_string(),
        population,
        timezone: "America/Bogota".to_string(),
    })
    .collect()
}

/// Exact match on the normalized display name or the backend's normalized name.
pub fn find_in<'a>(cities: &'a [City], name: &str) -> Option<&'a City> {
    let key = normalize_city_name(name);
    if key.is_empty() {
        return None;
    }
    cities
        .iter()
        .find(|city| normalize_city_name(&city.name) == key || city.name_normalized == key)
}

struct CacheEntry {
    cities: Vec<City>,
    fetched_at: DateTime<Utc>,
}

/// City list with an explicit time-to-live, driven by an injected clock.
pub struct CityCache<C: Clock> {
    clock: C,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl<C: Clock> CityCache<C> {
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            entry: None,
        }
    }

    /// Cached cities if they were stored less than `ttl` ago.
    pub fn get(&self) -> Option<&[City]> {
        let entry = self.entry.as_ref()?;
        // a clock that moved backwards counts as zero elapsed
        let elapsed = (self.clock.now() - entry.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        (elapsed < self.ttl).then_some(entry.cities.as_slice())
    }

    pub fn store(&mut self, cities: Vec<City>) {
        self.entry = Some(CacheEntry {
            cities,
            fetched_at: self.clock.now(),
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

pub struct CityDirectory<S: CitySource, C: Clock> {
    source: S,
    cache: Mutex<CityCache<C>>,
}

impl<S: CitySource, C: Clock> CityDirectory<S, C> {
    pub fn new(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(CityCache::new(clock, ttl)),
        }
    }

    /// Known cities: cached, freshly fetched, or the fallback list.
    /// Only successful fetches are cached; after a failure the next call
    /// asks the source again.
    pub async fn cities(&self) -> Vec<City> {
        let mut cache = self.cache.lock().await;
        if let Some(cities) = cache.get() {
            return cities.to_vec();
        }

        match self.source.fetch_cities().await {
            Ok(cities) => {
                tracing::debug!("Fetched {} cities, cached for {:?}", cities.len(), cache.ttl());
                cache.store(cities.clone());
                cities
            }
            Err(e) => {
                tracing::warn!("City list unavailable, using fallback cities: {}", e);
                fallback_cities()
            }
        }
    }

    pub async fn find_city(&self, name: &str) -> Option<City> {
        let cities = self.cities().await;
        find_in(&cities, name).cloned()
    }

    pub async fn coordinates(&self, name: &str) -> Option<Coordinates> {
        self.find_city(name).await.map(|city| city.coordinates())
    }

    pub async fn coordinates_or_default(&self, name: &str) -> Coordinates {
        match self.coordinates(name).await {
            Some(coordinates) => coordinates,
            None => {
                tracing::debug!("City {:?} not found, using default coordinates", name);
                DEFAULT_COORDINATES
            }
        }
    }

    pub async fn invalidate(&self) {
        self.cache.lock().await.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::utils::error::{AppError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_city_part_drops_region_suffix() {
        assert_eq!(city_part("Medellín, Antioquia"), "Medellín");
        assert_eq!(city_part("  Cali "), "Cali");
        assert_eq!(city_part(", Nariño"), "");
        let fallback = fallback_cities();
        assert!(find_in(&fallback, "Medellín, Antioquia").is_none());
        assert_eq!(
            find_in(&fallback, city_part("Medellín, Antioquia")).map(|c| c.name.as_str()),
            Some("Medellín")
        );
    }

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CitySource for CountingSource {
        async fn fetch_cities(&self) -> Result<Vec<City>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::HttpStatusError {
                    status: 502,
                    context: "city list".to_string(),
                });
            }
            Ok(vec![City {
                name: "Pasto".to_string(),
                name_normalized: "pasto".to_string(),
                lat: 1.2136,
                lon: -77.2811,
                country: "Colombia".to_string(),
                population: 392_000,
                timezone: "America/Bogota".to_string(),
            }])
        }
    }

    #[test]
    fn test_normalize_city_name() {
        assert_eq!(normalize_city_name("  Bogotá "), "bogota");
        assert_eq!(normalize_city_name("SANTA MARTA"), "santa marta");
    }

    #[test]
    fn test_find_in_is_exact() {
        let cities = fallback_cities();
        assert_eq!(find_in(&cities, "medellin").map(|c| c.name.as_str()), Some("Medellín"));
        assert_eq!(find_in(&cities, "MEDELLÍN").map(|c| c.name.as_str()), Some("Medellín"));
        assert!(find_in(&cities, "Medell").is_none());
        assert!(find_in(&cities, "Bogota DC").is_none());
        assert!(find_in(&cities, "").is_none());
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let clock = ManualClock::default();
        let mut cache = CityCache::new(clock.clone(), Duration::from_secs(300));
        assert_eq!(cache.ttl(), Duration::from_secs(300));
        assert!(cache.get().is_none());

        cache.store(fallback_cities());
        clock.advance(Duration::from_secs(299));
        assert!(cache.get().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get().is_none());
    }

    #[tokio::test]
    async fn test_directory_uses_cache_within_ttl() {
        let source = CountingSource::default();
        let clock = ManualClock::default();
        let directory = CityDirectory::new(source.clone(), clock.clone(), DEFAULT_CITY_TTL);

        assert!(directory.coordinates("Pasto").await.is_some());
        clock.advance(Duration::from_secs(120));
        assert!(directory.coordinates("pasto").await.is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(181));
        directory.cities().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = CountingSource::default();
        let directory = CityDirectory::new(source.clone(), ManualClock::default(), DEFAULT_CITY_TTL);

        directory.cities().await;
        directory.cities().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        directory.invalidate().await;
        assert!(directory.find_city("Pasto").await.is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_directory_falls_back_without_caching_failure() {
        let source = CountingSource::default();
        source.failing.store(true, Ordering::SeqCst);
        let directory = CityDirectory::new(source.clone(), ManualClock::default(), DEFAULT_CITY_TTL);

        let cali = directory.coordinates("Cali").await;
        assert_eq!(cali, Some(Coordinates { lat: 3.4516, lon: -76.532 }));
        // Pasto is only known remotely
        assert_eq!(directory.coordinates_or_default("Pasto").await, DEFAULT_COORDINATES);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        source.failing.store(false, Ordering::SeqCst);
        assert!(directory.find_city("Pasto").await.is_some());
    }
}
