use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::shipment::KatalogBarang,
};

/// Catalog store for the reusable item definitions referenced by line items
#[derive(Clone)]
pub struct CatalogStore {
    pool: DbPool,
}

impl CatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List all catalog items, ordered by display name
    pub async fn list(&self) -> Result<Vec<KatalogBarang>> {
        let items = sqlx::query_as::<_, KatalogBarang>(
            "SELECT id, namaBarang FROM katalog_barang ORDER BY namaBarang",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(items)
    }

    /// Get a catalog item by ID
    pub async fn get_by_id(&self, id: i64) -> Result<KatalogBarang> {
        let item = sqlx::query_as::<_, KatalogBarang>(
            "SELECT id, namaBarang FROM katalog_barang WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::CatalogItemNotFound)?;

        Ok(item)
    }

    /// Create a catalog item
    pub async fn create(&self, nama_barang: &str) -> Result<KatalogBarang> {
        if nama_barang.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Missing required fields: namaBarang".to_string(),
            ));
        }

        let result = sqlx::query("INSERT INTO katalog_barang (namaBarang) VALUES (?)")
            .bind(nama_barang)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.get_by_id(result.last_insert_rowid()).await
    }
}
