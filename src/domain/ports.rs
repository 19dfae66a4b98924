use crate::domain::model::{City, EntityId, MenuItem, Session};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub trait SessionStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Session>> + Send;
    fn save(&self, session: &Session) -> impl std::future::Future<Output = Result<()>> + Send;
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn cities_endpoint(&self) -> &str;
    fn city_cache_ttl(&self) -> Duration;
    fn session_dir(&self) -> &str;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn menu_items(&self, session: &Session, restaurant_id: &EntityId) -> Result<Vec<MenuItem>>;
}

#[async_trait]
pub trait CitySource: Send + Sync {
    async fn fetch_cities(&self) -> Result<Vec<City>>;
}
