use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier. The REST API mixes numeric and string ids.
///
/// Numeric strings such as `"12"` decode as `Number(12)` so ids compare
/// equal whichever form the backend sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => EntityId::Number(n),
            RawId::Text(s) => EntityId::from(s.as_str()),
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(trimmed.to_string()),
        }
    }
}

pub const UNCATEGORIZED: &str = "Uncategorized";

/// A dish as served by one restaurant. Prices share one currency unit per catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: Option<String>,
}

impl MenuItem {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Display bucket; items without a category are grouped together.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRef {
    pub id: EntityId,
}

/// Payload for creating or updating a menu item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub restaurant: RestaurantRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: EntityId,
    pub name: String,
    pub address: Option<String>,
    pub city: String,
    pub coordinates: Coordinates,
    pub cuisine: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub price_range: String,
    pub opening_hours: Option<String>,
    pub average_price_per_person: Option<Decimal>,
}

/// Payload for registering or updating a restaurant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    pub name: String,
    pub address: String,
    pub cuisine_type: String,
    pub phone: String,
    pub website: String,
    pub opening_hours: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price_per_person: Decimal,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct RestaurantQuery {
    pub city: Option<String>,
    pub budget: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub name_normalized: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub timezone: String,
}

impl City {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Client,
    Restaurant,
    Admin,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPreferences {
    #[serde(default)]
    pub favorite_cuisines: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub dining_frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

/// Profile as returned by the backend. Unknown fields are kept so an update
/// sends the whole profile back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_preferences: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Parsed food preferences; a malformed blob is logged and ignored.
    pub fn preferences(&self) -> Option<FoodPreferences> {
        let raw = self.food_preferences.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                tracing::warn!("Ignoring unreadable food preferences: {}", e);
                None
            }
        }
    }

    pub fn set_preferences(&mut self, prefs: &FoodPreferences) -> serde_json::Result<()> {
        self.food_preferences = Some(serde_json::to_string(prefs)?);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: EntityId,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    pub restaurant: RestaurantRef,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "isRead")]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Per-request authentication context. Anonymous sessions send no
/// `Authorization` header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Session::authenticated(auth.token, auth.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entity_id_from_str() {
        assert_eq!(EntityId::from("42"), EntityId::Number(42));
        assert_eq!(EntityId::from(" abc "), EntityId::Text("abc".to_string()));
        assert_eq!(EntityId::from(7).to_string(), "7");
    }

    #[test]
    fn test_entity_id_decoding() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[12, "12", "r-9"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2], EntityId::Text("r-9".to_string()));
    }

    #[test]
    fn test_category_label_defaults() {
        let item = MenuItem::new(1, "Ajiaco", dec!(18000));
        assert_eq!(item.category_label(), UNCATEGORIZED);
        assert_eq!(item.with_category("Sopas").category_label(), "Sopas");
    }

    #[test]
    fn test_role_decoding() {
        let user: User =
            serde_json::from_str(r#"{"id": 3, "name": "Ana", "email": "a@b.co", "role": "RESTAURANT"}"#)
                .unwrap();
        assert_eq!(user.role, Role::Restaurant);

        let odd: User = serde_json::from_str(r#"{"role": "SUPERVISOR"}"#).unwrap();
        assert_eq!(odd.role, Role::Other);
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 1, "name": "Ana", "email": "a@b.co", "phone": "300123", "foodPreferences": "{\"favoriteCuisines\":[\"Italiana\"]}"}"#,
        )
        .unwrap();
        assert_eq!(profile.extra.get("phone"), Some(&serde_json::json!("300123")));
        assert_eq!(
            profile.preferences().unwrap().favorite_cuisines,
            vec!["Italiana".to_string()]
        );

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["phone"], "300123");
        assert_eq!(back["name"], "Ana");
    }

    #[test]
    fn test_set_preferences_round_trips() {
        let mut profile = UserProfile::default();
        let prefs = FoodPreferences {
            favorite_cuisines: vec!["Mexicana".to_string()],
            dietary_restrictions: vec!["Vegetariana".to_string()],
            ..Default::default()
        };
        profile.set_preferences(&prefs).unwrap();

        assert_eq!(profile.preferences(), Some(prefs));
        let sent = serde_json::to_value(&profile).unwrap();
        assert!(sent["foodPreferences"].as_str().unwrap().contains("Vegetariana"));
    }

    #[test]
    fn test_malformed_preferences_are_ignored() {
        let profile = UserProfile {
            food_preferences: Some("not json".to_string()),
            ..Default::default()
        };
        assert!(profile.preferences().is_none());
    }

    #[test]
    fn test_session_bearer() {
        assert!(!Session::anonymous().is_authenticated());
        let session = Session::authenticated("tok", User::default());
        assert_eq!(session.bearer_token(), Some("tok"));
        assert!(!Session::authenticated("  ", User::default()).is_authenticated());
    }

    #[test]
    fn test_menu_item_draft_serializes_price_as_number() {
        let draft = MenuItemDraft {
            name: "Bandeja paisa".to_string(),
            description: String::new(),
            price: dec!(25000),
            category: "Fuerte".to_string(),
            restaurant: RestaurantRef { id: EntityId::Number(4) },
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["price"], serde_json::json!(25000.0));
        assert_eq!(json["restaurant"]["id"], 4);
    }
}
