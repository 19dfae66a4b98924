use clap::Parser;
use eatyfy::config::cli::{Command, MenuCommand, RestaurantCommand, RestaurantFields};
use eatyfy::core::chat::ChatSession;
use eatyfy::core::cities;
use eatyfy::core::forms::{self, RestaurantForm};
use eatyfy::core::reviews::ReviewSummary;
use eatyfy::core::{ConfigProvider, SessionStore};
use eatyfy::domain::model::{FoodPreferences, Restaurant, RestaurantDraft, RestaurantQuery, Review, Role};
use eatyfy::utils::error::ErrorSeverity;
use eatyfy::utils::text::format_amount;
use eatyfy::utils::{logger, validation::Validate};
use eatyfy::{
    evaluate, ApiClient, AppError, Budget, BudgetOutcome, CliArgs, CityDirectory, EntityId,
    FileSessionStore, HttpCitySource, MenuCatalogLoader, Result, Session, SystemClock, TomlConfig,
};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let mut config = match TomlConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(api_url) = &args.api_url {
        config.api.base_url = api_url.clone();
        tracing::debug!("API base URL overridden to: {}", api_url);
    }
    if let Some(dir) = &args.session_dir {
        config.session.directory = dir.clone();
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let store = FileSessionStore::new(config.session_dir());

    if let Err(e) = run(args.command, &config, &store).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        if e.is_unauthorized() {
            if let Err(clear_err) = store.clear().await {
                tracing::warn!("Could not clear stale session: {}", clear_err);
            }
        }

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn require_login(session: &Session) -> Result<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::UnauthorizedError { status: 401 })
    }
}

fn parse_optional_budget(raw: Option<&str>) -> Result<Option<Budget>> {
    raw.map(|b| {
        Budget::parse(b).ok_or_else(|| AppError::ValidationError {
            field: "budget".to_string(),
            message: "must be a positive number".to_string(),
        })
    })
    .transpose()
}

async fn run(command: Command, config: &TomlConfig, store: &FileSessionStore) -> Result<()> {
    let api = ApiClient::from_config(config)?;
    let session = store.load().await?;

    match command {
        Command::Budget {
            restaurant_id,
            budget,
        } => {
            let loader = MenuCatalogLoader::new(api);
            let catalog = loader
                .load(&session, &EntityId::from(restaurant_id.as_str()))
                .await;
            print_budget_outcome(&evaluate(&budget, &catalog.items));
        }

        Command::Search { city, budget } => {
            let query = RestaurantQuery {
                city: city.as_deref().map(cities::city_part).map(str::to_string),
                budget: parse_optional_budget(budget.as_deref())?.map(|b| b.amount()),
            };
            let restaurants = if session.is_authenticated() {
                api.personalized_recommendations(&session, query.city.as_deref(), query.budget)
                    .await?
            } else {
                api.search_restaurants(&session, &query).await?
            };
            if restaurants.is_empty() {
                println!("No restaurants found.");
            }
            for restaurant in &restaurants {
                print_restaurant_line(restaurant);
            }
        }

        Command::Restaurant { id } => {
            let id = EntityId::from(id.as_str());
            let restaurant = api.restaurant_details(&session, &id).await?;
            let reviews = api.restaurant_reviews(&session, &id).await;
            print_restaurant_details(&restaurant, &reviews);
        }

        Command::Locate { city } => {
            let directory = CityDirectory::new(
                HttpCitySource::from_config(config)?,
                SystemClock,
                config.city_cache_ttl(),
            );
            let city = cities::city_part(&city);
            match directory.find_city(city).await {
                Some(found) => println!("📍 {}: {:.4}, {:.4}", found.name, found.lat, found.lon),
                None => {
                    let fallback = directory.coordinates_or_default(city).await;
                    println!(
                        "City '{}' not found; default map center {:.4}, {:.4}",
                        city, fallback.lat, fallback.lon
                    );
                }
            }
        }

        Command::Login { email, password } => {
            let credentials = forms::login_form(&email, &password)?;
            let auth = api.login(&credentials).await?;
            let session = Session::from(auth);
            store.save(&session).await?;

            let (name, role) = session
                .user()
                .map(|u| (u.name.clone(), u.role.clone()))
                .unwrap_or_default();
            tracing::info!("Logged in as {}", credentials.email);
            println!("✅ Welcome, {}!", if name.is_empty() { &credentials.email } else { &name });
            if role == Role::Restaurant {
                println!("Manage your menu with `eatyfy menu` and `eatyfy restaurants`.");
            }
        }

        Command::Logout => {
            store.clear().await?;
            println!("Logged out.");
        }

        Command::Register {
            name,
            email,
            password,
            cuisines,
            owner,
        } => {
            let preferences = (!cuisines.is_empty()).then(|| FoodPreferences {
                favorite_cuisines: cuisines,
                ..Default::default()
            });
            let role = owner.then_some(Role::Restaurant);
            let registration =
                forms::registration_form(&name, &email, &password, preferences.as_ref(), role)?;
            api.register(&registration).await?;
            println!("✅ Account created. Log in with `eatyfy login {}`.", registration.email);
        }

        Command::Profile {
            name,
            email,
            cuisines,
            restrictions,
        } => {
            require_login(&session)?;
            let mut profile = api.user_profile(&session).await?;
            let edits_preferences = cuisines.is_some() || restrictions.is_some();
            if name.is_some() || email.is_some() || edits_preferences {
                if let Some(name) = name {
                    profile.name = name;
                }
                if let Some(email) = email {
                    profile.email = email;
                }
                if edits_preferences {
                    let mut prefs = profile.preferences().unwrap_or_default();
                    if let Some(cuisines) = cuisines {
                        prefs.favorite_cuisines = cuisines;
                    }
                    if let Some(restrictions) = restrictions {
                        prefs.dietary_restrictions = restrictions;
                    }
                    profile.set_preferences(&prefs)?;
                }
                profile = api.update_user_profile(&session, &profile).await?;
                println!("✅ Profile updated.");
            }
            println!("{} <{}>", profile.name, profile.email);
            if let Some(prefs) = profile.preferences() {
                if !prefs.favorite_cuisines.is_empty() {
                    println!("Favorite cuisines: {}", prefs.favorite_cuisines.join(", "));
                }
                if !prefs.dietary_restrictions.is_empty() {
                    println!("Dietary restrictions: {}", prefs.dietary_restrictions.join(", "));
                }
            }
        }

        Command::Notifications { mark_read } => {
            require_login(&session)?;
            if let Some(id) = mark_read {
                api.mark_notification_read(&session, &EntityId::from(id.as_str()))
                    .await?;
            }
            let notifications = api.notifications(&session).await?;
            if notifications.is_empty() {
                println!("No notifications.");
            }
            for n in notifications {
                let marker = if n.read { " " } else { "•" };
                println!("{} [{}] {} - {}", marker, n.id, n.title, n.description);
            }
        }

        Command::Promotions { city } => {
            let promotions = api
                .promotions(&session, city.as_deref().map(cities::city_part))
                .await;
            if promotions.is_empty() {
                println!("No promotions right now.");
            }
            for p in promotions {
                let city = p.city.as_deref().unwrap_or("todas las ciudades");
                println!("🎉 {} ({}): {}", p.title, city, p.description);
            }
        }

        Command::Reviews {
            restaurant_id,
            mine,
        } => {
            let reviews = if mine {
                require_login(&session)?;
                api.my_reviews(&session).await?
            } else {
                let id = restaurant_id.ok_or_else(|| AppError::ValidationError {
                    field: "restaurant_id".to_string(),
                    message: "is required unless --mine is given".to_string(),
                })?;
                api.restaurant_reviews(&session, &EntityId::from(id.as_str()))
                    .await
            };
            print_reviews(&reviews);
        }

        Command::Review {
            restaurant_id,
            rating,
            comment,
        } => {
            require_login(&session)?;
            let review =
                forms::review_form(&EntityId::from(restaurant_id.as_str()), rating, &comment)?;
            let created = api.create_review(&session, &review).await?;
            println!("✅ Review {} saved ({}★).", created.id, created.rating);
        }

        Command::Menu(menu) => run_menu(menu, &api, &session).await?,

        Command::Restaurants(cmd) => {
            require_login(&session)?;
            match cmd {
                RestaurantCommand::Mine => {
                    let restaurants = api.my_restaurants(&session).await?;
                    if restaurants.is_empty() {
                        println!("You have no registered restaurants.");
                    }
                    for restaurant in &restaurants {
                        print_restaurant_line(restaurant);
                    }
                }
                RestaurantCommand::Add(fields) => {
                    let draft = restaurant_draft(&fields)?;
                    let created = api.register_restaurant(&session, &draft).await?;
                    println!("✅ Registered {} (id {}).", created.name, created.id);
                }
                RestaurantCommand::Update { id, fields } => {
                    let draft = restaurant_draft(&fields)?;
                    let updated = api
                        .update_restaurant(&session, &EntityId::from(id.as_str()), &draft)
                        .await?;
                    println!("✅ Updated {}.", updated.name);
                }
            }
        }

        Command::Chat { message } => {
            let mut chat = ChatSession::new(SystemClock);
            let text = message.join(" ");
            match chat.send(&text) {
                Some(reply) => println!("🤖 {}", reply.content),
                None => println!("🤖 {}", eatyfy::core::chat::GREETING),
            }
        }
    }

    Ok(())
}

async fn run_menu(command: MenuCommand, api: &ApiClient, session: &Session) -> Result<()> {
    match command {
        MenuCommand::List { restaurant_id } => {
            let items = api
                .menu_items(session, &EntityId::from(restaurant_id.as_str()))
                .await?;
            if items.is_empty() {
                println!("This restaurant has no menu configured yet.");
            }
            for item in items {
                println!(
                    "[{}] {} - {} ({})",
                    item.id,
                    item.name,
                    format_amount(item.price),
                    item.category_label()
                );
            }
        }
        MenuCommand::Add {
            restaurant_id,
            name,
            price,
            description,
            category,
        } => {
            require_login(session)?;
            let draft = forms::menu_item_form(
                &EntityId::from(restaurant_id.as_str()),
                &name,
                &price,
                description.as_deref(),
                category.as_deref(),
            )?;
            let created = api.create_menu_item(session, &draft).await?;
            println!("✅ Added {} (id {}).", created.name, created.id);
        }
        MenuCommand::Update {
            item_id,
            restaurant_id,
            name,
            price,
            description,
            category,
        } => {
            require_login(session)?;
            let draft = forms::menu_item_form(
                &EntityId::from(restaurant_id.as_str()),
                &name,
                &price,
                description.as_deref(),
                category.as_deref(),
            )?;
            let updated = api
                .update_menu_item(session, &EntityId::from(item_id.as_str()), &draft)
                .await?;
            println!("✅ Updated {}.", updated.name);
        }
        MenuCommand::Delete { item_id } => {
            require_login(session)?;
            api.delete_menu_item(session, &EntityId::from(item_id.as_str()))
                .await?;
            println!("🗑️  Deleted menu item {}.", item_id);
        }
    }
    Ok(())
}

fn restaurant_draft(fields: &RestaurantFields) -> Result<RestaurantDraft> {
    RestaurantForm {
        name: &fields.name,
        address: &fields.address,
        cuisine_type: &fields.cuisine,
        phone: &fields.phone,
        website: &fields.website,
        opening_hours: &fields.hours,
        average_price_per_person: &fields.average_price,
        latitude: fields.latitude,
        longitude: fields.longitude,
    }
    .into_draft()
}

fn print_budget_outcome(outcome: &BudgetOutcome) {
    match outcome {
        BudgetOutcome::InvalidBudget => {
            println!("Enter a budget greater than zero, e.g. 50000.");
        }
        BudgetOutcome::EmptyCatalog => {
            println!("This restaurant has no menu configured yet. Contact the restaurant for details.");
        }
        BudgetOutcome::Unaffordable { budget } => {
            println!(
                "With {} COP you cannot order any single dish. Consider a larger budget or another restaurant.",
                format_amount(budget.amount())
            );
        }
        BudgetOutcome::Affordable(result) => {
            println!("✅ You can order {} dish(es)!", result.selected.len());
            println!("   Estimated total: {} COP", format_amount(result.total_cost));
            println!("   Remaining budget: {} COP", format_amount(result.remaining));
            for item in &result.selected {
                println!("   🍽️  {} - {} COP", item.name, format_amount(item.price));
                if let Some(description) = &item.description {
                    println!("       {}", description);
                }
            }
        }
    }
}

fn print_restaurant_line(restaurant: &Restaurant) {
    println!(
        "[{}] {} - {} {} {}",
        restaurant.id,
        restaurant.name,
        restaurant.city,
        restaurant.price_range,
        restaurant.cuisine.as_deref().unwrap_or("")
    );
}

fn print_restaurant_details(restaurant: &Restaurant, reviews: &[Review]) {
    println!("{} ({})", restaurant.name, restaurant.city);
    if let Some(address) = &restaurant.address {
        println!("  Address: {}", address);
    }
    if let Some(cuisine) = &restaurant.cuisine {
        println!("  Cuisine: {}", cuisine);
    }
    if let Some(hours) = &restaurant.opening_hours {
        println!("  Hours: {}", hours);
    }
    if let Some(phone) = &restaurant.phone {
        println!("  Phone: {}", phone);
    }
    if let Some(average) = restaurant.average_price_per_person {
        println!("  Average per person: {} COP", format_amount(average));
    }
    println!(
        "  Location: {:.4}, {:.4}",
        restaurant.coordinates.lat, restaurant.coordinates.lon
    );
    print_reviews(reviews);
}

fn print_reviews(reviews: &[Review]) {
    let summary = ReviewSummary::from_reviews(reviews);
    match summary.average {
        Some(average) => println!("  ★ {:.1} from {} review(s)", average, summary.count),
        None => println!("  No reviews yet."),
    }
    for review in reviews {
        let author = review
            .user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or("Anónimo");
        println!("  {}★ {}: {}", review.rating, author, review.comment);
    }
}
