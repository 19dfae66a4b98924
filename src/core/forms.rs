//! Input checks run before anything is sent to the backend.

use crate::domain::model::{
    Credentials, EntityId, FoodPreferences, MenuItemDraft, NewReview, Registration,
    RestaurantDraft, RestaurantRef, Role,
};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{require_non_empty, require_range};
use rust_decimal::Decimal;
use std::str::FromStr;

fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| AppError::ValidationError {
        field: field.to_string(),
        message: format!("'{}' is not a number", raw.trim()),
    })?;
    if amount < Decimal::ZERO {
        return Err(AppError::ValidationError {
            field: field.to_string(),
            message: "cannot be negative".to_string(),
        });
    }
    Ok(amount)
}

pub fn login_form(email: &str, password: &str) -> Result<Credentials> {
    require_non_empty("email", email)?;
    if !email.contains('@') {
        return Err(AppError::ValidationError {
            field: "email".to_string(),
            message: "is not an email address".to_string(),
        });
    }
    require_non_empty("password", password)?;
    Ok(Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn registration_form(
    name: &str,
    email: &str,
    password: &str,
    preferences: Option<&FoodPreferences>,
    role: Option<Role>,
) -> Result<Registration> {
    require_non_empty("name", name)?;
    let credentials = login_form(email, password)?;
    let food_preferences = preferences.map(serde_json::to_string).transpose()?;

    Ok(Registration {
        name: name.trim().to_string(),
        email: credentials.email,
        password: credentials.password,
        food_preferences,
        role,
    })
}

/// Name and price are mandatory; price must be a non-negative number.
pub fn menu_item_form(
    restaurant_id: &EntityId,
    name: &str,
    price: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> Result<MenuItemDraft> {
    require_non_empty("name", name)?;
    require_non_empty("price", price)?;
    let price = parse_amount("price", price)?;

    Ok(MenuItemDraft {
        name: name.trim().to_string(),
        description: description.unwrap_or_default().trim().to_string(),
        price,
        category: category.unwrap_or_default().trim().to_string(),
        restaurant: RestaurantRef {
            id: restaurant_id.clone(),
        },
    })
}

pub fn review_form(restaurant_id: &EntityId, rating: u8, comment: &str) -> Result<NewReview> {
    require_range("rating", rating, 1, 5)?;
    Ok(NewReview {
        restaurant: RestaurantRef {
            id: restaurant_id.clone(),
        },
        rating,
        comment: comment.trim().to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct RestaurantForm<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub cuisine_type: &'a str,
    pub phone: &'a str,
    pub website: &'a str,
    pub opening_hours: &'a str,
    pub average_price_per_person: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RestaurantForm<'_> {
    pub fn into_draft(self) -> Result<RestaurantDraft> {
        require_non_empty("name", self.name)?;
        require_non_empty("address", self.address)?;
        let average_price_per_person = if self.average_price_per_person.trim().is_empty() {
            Decimal::ZERO
        } else {
            parse_amount("averagePricePerPerson", self.average_price_per_person)?
        };
        if let Some(lat) = self.latitude {
            require_range("latitude", lat, -90.0, 90.0)?;
        }
        if let Some(lon) = self.longitude {
            require_range("longitude", lon, -180.0, 180.0)?;
        }

        Ok(RestaurantDraft {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            cuisine_type: self.cuisine_type.trim().to_string(),
            phone: self.phone.trim().to_string(),
            website: self.website.trim().to_string(),
            opening_hours: self.opening_hours.trim().to_string(),
            average_price_per_person,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}
