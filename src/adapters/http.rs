use crate::adapters::wire::{self, MenuItemRecord, RestaurantRecord};
use crate::domain::model::{
    AuthResponse, City, Credentials, EntityId, MenuItem, MenuItemDraft, NewReview, Notification,
    Promotion, Registration, Restaurant, RestaurantDraft, RestaurantQuery, Review, Session,
    UserProfile,
};
use crate::domain::ports::{CitySource, ConfigProvider, MenuSource};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Typed client for the EatyFy REST backend.
///
/// Every call takes the caller's [`Session`]; authenticated sessions send a
/// bearer token, anonymous ones send no `Authorization` header.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("api.base_url", base_url)?;
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(config.api_base_url())?.with_timeout(config.request_timeout()))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Each segment is percent-encoded on its own, so an id can never
    /// add path levels or a query string.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let invalid = |reason: String| AppError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: self.base_url.clone(),
            reason,
        };
        if let Some(bad) = segments.iter().find(|s| matches!(s.trim(), "" | "." | "..")) {
            return Err(AppError::ValidationError {
                field: "id".to_string(),
                message: format!("{:?} is not a valid identifier", bad),
            });
        }
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: &Session) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(token) = session.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        request
    }

    async fn send(request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{}: response status {}", context, status);

        if status.is_success() {
            return Ok(response);
        }
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::UnauthorizedError {
                status: status.as_u16(),
            },
            StatusCode::NOT_FOUND => AppError::NotFoundError {
                resource: context.to_string(),
            },
            _ => AppError::HttpStatusError {
                status: status.as_u16(),
                context: context.to_string(),
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppError::DecodeError {
            context: context.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &[&str],
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T> {
        let url = self.endpoint(path, query)?;
        let response = Self::send(self.request(Method::GET, url, session), context).await?;
        Self::decode(response, context).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        session: &Session,
        path: &[&str],
        body: &B,
        context: &str,
    ) -> Result<T> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(method, url, session).json(body);
        let response = Self::send(request, context).await?;
        Self::decode(response, context).await
    }

    /// For calls whose response body carries nothing we use.
    async fn send_discarding(
        &self,
        method: Method,
        session: &Session,
        path: &[&str],
        context: &str,
    ) -> Result<()> {
        let url = self.endpoint(path, &[])?;
        Self::send(self.request(method, url, session), context).await?;
        Ok(())
    }

    // Restaurants

    pub async fn search_restaurants(
        &self,
        session: &Session,
        query: &RestaurantQuery,
    ) -> Result<Vec<Restaurant>> {
        let mut params = Vec::new();
        if let Some(city) = query.city.as_deref().filter(|c| !c.trim().is_empty()) {
            params.push(("city", city.trim().to_string()));
        }
        if let Some(budget) = query.budget.filter(|b| *b > Decimal::ZERO) {
            params.push(("budget", budget.normalize().to_string()));
        }

        let records: Vec<RestaurantRecord> = self
            .get_json(session, &["restaurants", "search"], &params, "restaurant search")
            .await?;
        let restaurants = wire::restaurants(records, query.city.as_deref())?;
        tracing::debug!("Search returned {} restaurants", restaurants.len());
        Ok(restaurants)
    }

    pub async fn personalized_recommendations(
        &self,
        session: &Session,
        city: Option<&str>,
        budget: Option<Decimal>,
    ) -> Result<Vec<Restaurant>> {
        let query = RestaurantQuery {
            city: city.map(str::to_string),
            budget,
        };
        self.search_restaurants(session, &query).await
    }

    pub async fn restaurant_details(&self, session: &Session, id: &EntityId) -> Result<Restaurant> {
        let context = format!("restaurant {}", id);
        let record: RestaurantRecord = self
            .get_json(session, &["restaurants", &id.to_string()], &[], &context)
            .await?;
        record.into_restaurant(None)
    }

    pub async fn register_restaurant(
        &self,
        session: &Session,
        draft: &RestaurantDraft,
    ) -> Result<Restaurant> {
        let record: RestaurantRecord = self
            .send_json(Method::POST, session, &["restaurants"], draft, "restaurant registration")
            .await?;
        record.into_restaurant(None)
    }

    pub async fn update_restaurant(
        &self,
        session: &Session,
        id: &EntityId,
        draft: &RestaurantDraft,
    ) -> Result<Restaurant> {
        let context = format!("restaurant {}", id);
        let record: RestaurantRecord = self
            .send_json(Method::PUT, session, &["restaurants", &id.to_string()], draft, &context)
            .await?;
        record.into_restaurant(None)
    }

    pub async fn my_restaurants(&self, session: &Session) -> Result<Vec<Restaurant>> {
        let records: Vec<RestaurantRecord> = self
            .get_json(session, &["restaurants", "my"], &[], "my restaurants")
            .await?;
        wire::restaurants(records, None)
    }

    // Authentication and profile

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.send_json(
            Method::POST,
            &Session::anonymous(),
            &["auth", "login"],
            credentials,
            "login",
        )
        .await
    }

    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let url = self.endpoint(&["auth", "register"], &[])?;
        let request = self
            .request(Method::POST, url, &Session::anonymous())
            .json(registration);
        Self::send(request, "registration").await?;
        Ok(())
    }

    pub async fn user_profile(&self, session: &Session) -> Result<UserProfile> {
        self.get_json(session, &["users", "profile"], &[], "user profile")
            .await
    }

    pub async fn update_user_profile(
        &self,
        session: &Session,
        profile: &UserProfile,
    ) -> Result<UserProfile> {
        self.send_json(Method::PUT, session, &["users", "profile"], profile, "user profile")
            .await
    }

    // Notifications and promotions

    pub async fn notifications(&self, session: &Session) -> Result<Vec<Notification>> {
        self.get_json(session, &["notifications"], &[], "notifications")
            .await
    }

    pub async fn mark_notification_read(&self, session: &Session, id: &EntityId) -> Result<()> {
        self.send_discarding(
            Method::PUT,
            session,
            &["notifications", &id.to_string(), "read"],
            &format!("notification {}", id),
        )
        .await
    }

    /// Never fails; an unavailable endpoint yields no promotions.
    pub async fn promotions(&self, session: &Session, city: Option<&str>) -> Vec<Promotion> {
        let params: Vec<(&str, String)> = city
            .filter(|c| !c.trim().is_empty())
            .map(|c| vec![("city", c.trim().to_string())])
            .unwrap_or_default();

        match self
            .get_json(session, &["promotions"], &params, "promotions")
            .await
        {
            Ok(promotions) => promotions,
            Err(e) => {
                tracing::warn!("Promotions unavailable, returning empty list: {}", e);
                Vec::new()
            }
        }
    }

    // Reviews

    /// Never fails; an unavailable endpoint yields no reviews.
    pub async fn restaurant_reviews(&self, session: &Session, restaurant_id: &EntityId) -> Vec<Review> {
        let id = restaurant_id.to_string();
        match self
            .get_json(session, &["reviews", "restaurant", &id], &[], "restaurant reviews")
            .await
        {
            Ok(reviews) => reviews,
            Err(e) => {
                tracing::warn!(
                    "Reviews for restaurant {} unavailable, returning empty list: {}",
                    restaurant_id,
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn my_reviews(&self, session: &Session) -> Result<Vec<Review>> {
        self.get_json(session, &["reviews", "my"], &[], "my reviews").await
    }

    pub async fn create_review(&self, session: &Session, review: &NewReview) -> Result<Review> {
        self.send_json(Method::POST, session, &["reviews"], review, "review")
            .await
    }

    // Menu items

    pub async fn menu_items(
        &self,
        session: &Session,
        restaurant_id: &EntityId,
    ) -> Result<Vec<MenuItem>> {
        let id = restaurant_id.to_string();
        let records: Vec<MenuItemRecord> = self
            .get_json(session, &["menu-items", "restaurant", &id], &[], "menu items")
            .await?;
        wire::menu_items(records)
    }

    pub async fn create_menu_item(&self, session: &Session, draft: &MenuItemDraft) -> Result<MenuItem> {
        let record: MenuItemRecord = self
            .send_json(Method::POST, session, &["menu-items"], draft, "menu item")
            .await?;
        record.into_menu_item()
    }

    pub async fn update_menu_item(
        &self,
        session: &Session,
        id: &EntityId,
        draft: &MenuItemDraft,
    ) -> Result<MenuItem> {
        let context = format!("menu item {}", id);
        let record: MenuItemRecord = self
            .send_json(Method::PUT, session, &["menu-items", &id.to_string()], draft, &context)
            .await?;
        record.into_menu_item()
    }

    pub async fn delete_menu_item(&self, session: &Session, id: &EntityId) -> Result<()> {
        self.send_discarding(
            Method::DELETE,
            session,
            &["menu-items", &id.to_string()],
            &format!("menu item {}", id),
        )
        .await
    }
}

#[async_trait]
impl MenuSource for ApiClient {
    async fn menu_items(&self, session: &Session, restaurant_id: &EntityId) -> Result<Vec<MenuItem>> {
        ApiClient::menu_items(self, session, restaurant_id).await
    }
}

/// Remote city list, e.g. `http://localhost:8084/api/cities/list`.
#[derive(Debug, Clone)]
pub struct HttpCitySource {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpCitySource {
    pub fn new(endpoint: &str) -> Result<Self> {
        validate_url("cities.endpoint", endpoint)?;
        Ok(Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut source = Self::new(config.cities_endpoint())?;
        source.timeout = config.request_timeout();
        Ok(source)
    }
}

#[async_trait]
impl CitySource for HttpCitySource {
    async fn fetch_cities(&self) -> Result<Vec<City>> {
        tracing::debug!("GET {}", self.endpoint);
        let mut request = self.client.get(&self.endpoint);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = ApiClient::send(request, "city list").await?;
        ApiClient::decode(response, "city list").await
    }
}
