pub mod allocator;
pub mod catalog;
pub mod chat;
pub mod cities;
pub mod forms;
pub mod reviews;

pub use crate::domain::model::{City, Coordinates, EntityId, MenuItem, Session};
pub use crate::domain::ports::{CitySource, Clock, ConfigProvider, MenuSource, SessionStore};
pub use crate::utils::error::Result;
