use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "eatyfy")]
#[command(about = "Find restaurants and dishes that fit your budget")]
pub struct CliArgs {
    /// Path to a TOML configuration file (defaults to ./eatyfy.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the backend base URL, e.g. https://host/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override the directory holding the saved session
    #[arg(long, global = true)]
    pub session_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Pick the dishes a budget can pay for, cheapest first
    Budget {
        restaurant_id: String,
        budget: String,
    },
    /// Search restaurants by city and budget
    Search {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        budget: Option<String>,
    },
    /// Show one restaurant with its reviews
    Restaurant { id: String },
    /// Resolve a city name to map coordinates
    Locate { city: String },
    /// Log in and remember the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Create a client or restaurant-owner account
    Register {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_delimiter = ',')]
        cuisines: Vec<String>,
        #[arg(long)]
        owner: bool,
    },
    /// Show or edit the profile of the logged-in user
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Replace favorite cuisines (comma separated)
        #[arg(long, value_delimiter = ',')]
        cuisines: Option<Vec<String>>,
        /// Replace dietary restrictions (comma separated)
        #[arg(long, value_delimiter = ',')]
        restrictions: Option<Vec<String>>,
    },
    /// List notifications, optionally marking one as read
    Notifications {
        #[arg(long)]
        mark_read: Option<String>,
    },
    /// List current promotions
    Promotions {
        #[arg(long)]
        city: Option<String>,
    },
    /// List reviews of a restaurant, or your own with --mine
    Reviews {
        restaurant_id: Option<String>,
        #[arg(long)]
        mine: bool,
    },
    /// Rate a restaurant from 1 to 5
    Review {
        restaurant_id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Manage restaurant menus
    #[command(subcommand)]
    Menu(MenuCommand),
    /// Manage restaurants you own
    #[command(subcommand)]
    Restaurants(RestaurantCommand),
    /// Ask the assistant a question
    Chat { message: Vec<String> },
}

#[derive(Debug, Clone, Subcommand)]
pub enum MenuCommand {
    List {
        restaurant_id: String,
    },
    Add {
        restaurant_id: String,
        name: String,
        price: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Update {
        item_id: String,
        restaurant_id: String,
        name: String,
        price: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        item_id: String,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct RestaurantFields {
    pub name: String,
    pub address: String,
    #[arg(long, default_value = "")]
    pub cuisine: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub website: String,
    #[arg(long, default_value = "")]
    pub hours: String,
    #[arg(long, default_value = "")]
    pub average_price: String,
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RestaurantCommand {
    /// List restaurants owned by the logged-in user
    Mine,
    /// Register a new restaurant
    Add(RestaurantFields),
    /// Replace the details of an existing restaurant
    Update {
        id: String,
        #[command(flatten)]
        fields: RestaurantFields,
    },
}
