use anyhow::Result;
use eatyfy::core::forms;
use eatyfy::domain::model::{Coordinates, RestaurantQuery, UserProfile};
use eatyfy::{ApiClient, AppError, EntityId, Session};
use httpmock::prelude::*;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_search_sends_filters_and_fills_defaults() -> Result<()> {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/restaurants/search")
            .query_param("city", "Pasto")
            .query_param("budget", "40000");
        then.status(200).json_body(serde_json::json!([
            {"id": 1, "name": "La Cabaña", "address": "Calle 18", "lat": 1.2136, "lon": -77.2811, "cuisine": "Nariñense"},
            {"id": "2", "name": "Sulerna", "priceRange": "$$$"}
        ]));
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let query = RestaurantQuery {
        city: Some("Pasto".to_string()),
        budget: Some(dec!(40000)),
    };
    let restaurants = client.search_restaurants(&Session::anonymous(), &query).await?;

    search_mock.assert();
    assert_eq!(restaurants.len(), 2);
    assert_eq!(
        restaurants[0].coordinates,
        Coordinates {
            lat: 1.2136,
            lon: -77.2811
        }
    );
    assert_eq!(restaurants[1].city, "Pasto");
    assert_eq!(restaurants[1].price_range, "$$$");
    assert_eq!(restaurants[1].id, EntityId::Number(2));
    Ok(())
}

#[tokio::test]
async fn test_recommendations_send_token_and_filters() -> Result<()> {
    let server = MockServer::start();
    let recommendations_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/restaurants/search")
            .query_param("city", "Medellín")
            .query_param("budget", "60000")
            .header("Authorization", "Bearer tok");
        then.status(200).json_body(serde_json::json!([
            {"id": 4, "name": "Hatoviejo", "cuisineType": "Paisa", "latitude": 6.2, "longitude": -75.57}
        ]));
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let session = Session::authenticated("tok", Default::default());
    let restaurants = client
        .personalized_recommendations(&session, Some("Medellín"), Some(dec!(60000)))
        .await?;

    recommendations_mock.assert();
    assert_eq!(restaurants[0].cuisine.as_deref(), Some("Paisa"));
    assert_eq!(restaurants[0].city, "Medellín");
    Ok(())
}

#[tokio::test]
async fn test_missing_restaurant_is_not_found() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/restaurants/404");
        then.status(404);
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let err = client
        .restaurant_details(&Session::anonymous(), &EntityId::from(404))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFoundError { ref resource } if resource == "restaurant 404"));
    Ok(())
}

#[tokio::test]
async fn test_login_then_authorized_menu_management() -> Result<()> {
    let server = MockServer::start();
    let login_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/login")
            .header_missing("Authorization")
            .json_body(serde_json::json!({"email": "dueno@eatyfy.co", "password": "secreto"}));
        then.status(200).json_body(serde_json::json!({
            "token": "jwt-123",
            "user": {"id": 5, "name": "Dueño", "email": "dueno@eatyfy.co", "role": "RESTAURANT"}
        }));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/menu-items")
            .header("Authorization", "Bearer jwt-123")
            .json_body_includes(r#"{"name": "Cuy asado", "price": 45000.0, "restaurant": {"id": 3}}"#);
        then.status(201).json_body(serde_json::json!({
            "id": 77, "name": "Cuy asado", "price": 45000, "category": "Típico"
        }));
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/menu-items/77")
            .header("Authorization", "Bearer jwt-123");
        then.status(200).json_body(serde_json::json!({"deleted": true}));
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let credentials = forms::login_form("dueno@eatyfy.co", "secreto")?;
    let session = Session::from(client.login(&credentials).await?);
    assert!(session.is_authenticated());

    let draft = forms::menu_item_form(&EntityId::from(3), "Cuy asado", "45000", None, Some("Típico"))?;
    let created = client.create_menu_item(&session, &draft).await?;
    assert_eq!(created.id, EntityId::Number(77));
    assert_eq!(created.price, dec!(45000));

    client.delete_menu_item(&session, &created.id).await?;

    login_mock.assert();
    create_mock.assert();
    delete_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_soft_endpoints_return_empty_lists() -> Result<()> {
    let server = MockServer::start();
    let promotions_mock = server.mock(|when, then| {
        when.method(GET).path("/api/promotions").query_param("city", "Cali");
        then.status(503);
    });
    let reviews_mock = server.mock(|when, then| {
        when.method(GET).path("/api/reviews/restaurant/9");
        then.status(200).body("<html>oops</html>");
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let session = Session::anonymous();

    assert!(client.promotions(&session, Some("Cali")).await.is_empty());
    assert!(client
        .restaurant_reviews(&session, &EntityId::from(9))
        .await
        .is_empty());

    promotions_mock.assert();
    reviews_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_profile_update_sends_unknown_fields_back() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users/profile");
        then.status(200).json_body(serde_json::json!({
            "id": 5, "name": "Ana", "email": "ana@eatyfy.co", "phone": "3001234567"
        }));
    });
    let update_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/users/profile")
            .json_body_includes(r#"{"name": "Ana María", "phone": "3001234567"}"#);
        then.status(200).json_body(serde_json::json!({
            "id": 5, "name": "Ana María", "email": "ana@eatyfy.co", "phone": "3001234567"
        }));
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let session = Session::authenticated("tok", Default::default());

    let mut profile: UserProfile = client.user_profile(&session).await?;
    profile.name = "Ana María".to_string();
    let updated = client.update_user_profile(&session, &profile).await?;

    update_mock.assert();
    assert_eq!(updated.name, "Ana María");
    Ok(())
}

#[tokio::test]
async fn test_review_creation_and_notifications() -> Result<()> {
    let server = MockServer::start();
    let review_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/reviews")
            .json_body(serde_json::json!({"restaurant": {"id": 2}, "rating": 4, "comment": "Muy rico"}));
        then.status(200).json_body(serde_json::json!({
            "id": 31, "rating": 4, "comment": "Muy rico", "createdAt": "2025-03-01T12:00:00",
            "user": {"id": 5, "name": "Ana", "email": "ana@eatyfy.co"}
        }));
    });
    let read_mock = server.mock(|when, then| {
        when.method(PUT).path("/api/notifications/8/read");
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/notifications");
        then.status(200).json_body(serde_json::json!([
            {"id": 8, "title": "Nueva promo", "description": "2x1", "isRead": true}
        ]));
    });

    let client = ApiClient::new(&server.url("/api"))?;
    let session = Session::authenticated("tok", Default::default());

    let review = forms::review_form(&EntityId::from(2), 4, "Muy rico")?;
    let created = client.create_review(&session, &review).await?;
    assert_eq!(created.user.map(|u| u.name), Some("Ana".to_string()));

    client
        .mark_notification_read(&session, &EntityId::from(8))
        .await?;
    let notifications = client.notifications(&session).await?;
    assert!(notifications[0].read);

    review_mock.assert();
    read_mock.assert();
    Ok(())
}
