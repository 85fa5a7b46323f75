pub mod auth;
pub mod catalog;
pub mod shipment;

use crate::db::{
    catalog_store::CatalogStore, shipment_store::ShipmentStore, user_store::UserStore, DbPool,
};

/// Shared state for all request handlers. Stores are constructed here and
/// injected, never reached through a global client.
#[derive(Clone)]
pub struct AppState {
    pub shipment_store: ShipmentStore,
    pub catalog_store: CatalogStore,
    pub user_store: UserStore,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl AppState {
    pub fn new(pool: DbPool, jwt_secret: String, jwt_expiration_hours: i64) -> Self {
        Self {
            shipment_store: ShipmentStore::new(pool.clone()),
            catalog_store: CatalogStore::new(pool.clone()),
            user_store: UserStore::new(pool),
            jwt_secret,
            jwt_expiration_hours,
        }
    }
}
