//! Backend payload shapes and their conversion into validated domain values.

use crate::core::cities::DEFAULT_COORDINATES;
use crate::domain::model::{Coordinates, EntityId, MenuItem, Restaurant};
use crate::utils::error::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

const DEFAULT_CITY: &str = "Bogotá";
const DEFAULT_PRICE_RANGE: &str = "$$";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(context: &str, message: impl Into<String>) -> AppError {
    AppError::DecodeError {
        context: context.to_string(),
        message: message.into(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRecord {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
}

impl MenuItemRecord {
    pub fn into_menu_item(self) -> Result<MenuItem> {
        let name = non_blank(self.name)
            .ok_or_else(|| invalid("menu item", format!("item {} has no name", self.id)))?;
        let price = self
            .price
            .ok_or_else(|| invalid("menu item", format!("item {} has no price", self.id)))?;
        if price < Decimal::ZERO {
            return Err(invalid(
                "menu item",
                format!("item {} has negative price {}", self.id, price),
            ));
        }

        Ok(MenuItem {
            id: self.id,
            name,
            description: non_blank(self.description),
            price,
            category: non_blank(self.category),
        })
    }
}

pub fn menu_items(records: Vec<MenuItemRecord>) -> Result<Vec<MenuItem>> {
    records
        .into_iter()
        .map(MenuItemRecord::into_menu_item)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub average_price_per_person: Option<Decimal>,
}

impl RestaurantRecord {
    /// `fallback_city` is used when the record carries no city of its own,
    /// typically the city the search was made for.
    pub fn into_restaurant(self, fallback_city: Option<&str>) -> Result<Restaurant> {
        let name = non_blank(self.name)
            .ok_or_else(|| invalid("restaurant", format!("restaurant {} has no name", self.id)))?;

        let coordinates = match (self.lat.or(self.latitude), self.lon.or(self.longitude)) {
            (Some(lat), Some(lon)) => Coordinates { lat, lon },
            _ => DEFAULT_COORDINATES,
        };

        let city = non_blank(self.city)
            .or_else(|| non_blank(fallback_city.map(str::to_string)))
            .unwrap_or_else(|| DEFAULT_CITY.to_string());

        Ok(Restaurant {
            id: self.id,
            name,
            address: non_blank(self.address),
            city,
            coordinates,
            cuisine: non_blank(self.cuisine).or_else(|| non_blank(self.cuisine_type)),
            phone: non_blank(self.phone),
            website: non_blank(self.website),
            price_range: non_blank(self.price_range)
                .unwrap_or_else(|| DEFAULT_PRICE_RANGE.to_string()),
            opening_hours: non_blank(self.opening_hours),
            average_price_per_person: self.average_price_per_person,
        })
    }
}

pub fn restaurants(
    records: Vec<RestaurantRecord>,
    fallback_city: Option<&str>,
) -> Result<Vec<Restaurant>> {
    records
        .into_iter()
        .map(|r| r.into_restaurant(fallback_city))
        .collect()
}
