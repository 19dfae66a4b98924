pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;
pub use config::TomlConfig;

pub use adapters::clock::SystemClock;
pub use adapters::http::{ApiClient, HttpCitySource};
pub use adapters::session::FileSessionStore;
pub use core::allocator::{allocate, evaluate, AllocationResult, Budget, BudgetOutcome, BudgetQuery};
pub use core::catalog::{Catalog, MenuCatalogLoader};
pub use core::cities::CityDirectory;
pub use domain::model::{EntityId, MenuItem, Session};
pub use utils::error::{AppError, Result};
