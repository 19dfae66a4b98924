use crate::domain::model::{EntityId, MenuItem, Session};
use crate::domain::ports::MenuSource;

/// Menu snapshot for one restaurant, taken per request.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub restaurant_id: EntityId,
    pub items: Vec<MenuItem>,
    /// False when the source failed and `items` is an empty stand-in.
    pub available: bool,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct MenuCatalogLoader<S: MenuSource> {
    source: S,
}

impl<S: MenuSource> MenuCatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Never fails: an unreachable menu is logged and treated as empty.
    pub async fn load(&self, session: &Session, restaurant_id: &EntityId) -> Catalog {
        match self.source.menu_items(session, restaurant_id).await {
            Ok(items) => {
                tracing::debug!("Loaded {} menu items for restaurant {}", items.len(), restaurant_id);
                Catalog {
                    restaurant_id: restaurant_id.clone(),
                    items,
                    available: true,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Menu for restaurant {} unavailable, using empty catalog: {}",
                    restaurant_id,
                    e
                );
                Catalog {
                    restaurant_id: restaurant_id.clone(),
                    items: Vec::new(),
                    available: false,
                }
            }
        }
    }
}
