use std::collections::HashMap;

use sqlx::{FromRow, QueryBuilder};

use crate::{
    db::DbPool,
    error::{AppError, Result},
    listing::{sql, QuerySpec},
    models::shipment::{
        parse_departure, Barang, BarangInput, BarangSummary, Pengiriman, ShipmentDetail,
        ShipmentInput, ShipmentSummary, ValidShipment,
    },
};

/// Child row of the listing query, keyed by parent id for grouping.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct BarangListRow {
    pengiriman_id: i64,
    id: i64,
    nama_barang: String,
    jumlah_barang: i64,
}

/// Shipment store for database operations
#[derive(Clone)]
pub struct ShipmentStore {
    pool: DbPool,
}

impl ShipmentStore {
    /// Create a new ShipmentStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the data query and the count query for one normalized listing
    /// request, then attach each shipment's line items. The two queries are
    /// built from the same predicate logic and issued concurrently; the rows
    /// and the total always agree on which shipments match.
    pub async fn list(&self, spec: &QuerySpec) -> Result<(Vec<ShipmentSummary>, i64)> {
        let mut count_builder = sql::count_query(&spec.predicates);
        let mut data_builder = sql::data_query(spec);

        let count_fut = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool);
        let data_fut = data_builder
            .build_query_as::<Pengiriman>()
            .fetch_all(&self.pool);

        let (total, rows) = tokio::try_join!(count_fut, data_fut).map_err(AppError::Database)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut barang = self.barang_for(&ids).await?;

        let data = rows
            .into_iter()
            .map(|pengiriman| {
                let barang = barang.remove(&pengiriman.id).unwrap_or_default();
                ShipmentSummary { pengiriman, barang }
            })
            .collect();

        Ok((data, total))
    }

    /// Fetch the line items for a page of shipments in one query and group
    /// them by parent id.
    async fn barang_for(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<BarangSummary>>> {
        let mut grouped: HashMap<i64, Vec<BarangSummary>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder = QueryBuilder::new(
            "SELECT barang.pengirimanId, barang.id, katalog_barang.namaBarang, barang.jumlahBarang \
             FROM barang \
             JOIN katalog_barang ON katalog_barang.id = barang.barangId \
             WHERE barang.pengirimanId IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        builder.push(") ORDER BY barang.id");

        let rows = builder
            .build_query_as::<BarangListRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        for row in rows {
            grouped
                .entry(row.pengiriman_id)
                .or_default()
                .push(BarangSummary {
                    id: row.id,
                    nama_barang: row.nama_barang,
                    jumlah_barang: row.jumlah_barang,
                });
        }

        Ok(grouped)
    }

    /// Get a shipment with its line items by ID
    pub async fn get_by_id(&self, id: i64) -> Result<ShipmentDetail> {
        let pengiriman = sqlx::query_as::<_, Pengiriman>(&format!(
            "SELECT {} FROM pengiriman WHERE id = ?",
            sql::SHIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::ShipmentNotFound)?;

        let barang = sqlx::query_as::<_, Barang>(
            "SELECT barang.id, barang.barangId, katalog_barang.namaBarang, \
             barang.jumlahBarang, barang.harga \
             FROM barang \
             JOIN katalog_barang ON katalog_barang.id = barang.barangId \
             WHERE barang.pengirimanId = ? ORDER BY barang.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(ShipmentDetail { pengiriman, barang })
    }

    /// Insert a shipment and all of its line items in one transaction
    pub async fn create(&self, valid: &ValidShipment<'_>) -> Result<ShipmentDetail> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query(
            r#"
            INSERT INTO pengiriman (namaPengirim, alamatPengirim, nohpPengirim,
                namaPenerima, alamatPenerima, nohpPenerima,
                totalHarga, tanggalKeberangkatan)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(valid.nama_pengirim)
        .bind(valid.alamat_pengirim)
        .bind(valid.nohp_pengirim)
        .bind(valid.nama_penerima)
        .bind(valid.alamat_penerima)
        .bind(valid.nohp_penerima)
        .bind(valid.total_harga)
        .bind(valid.tanggal_keberangkatan.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let id = result.last_insert_rowid();
        insert_barang(&mut tx, id, valid.barang).await?;

        tx.commit().await.map_err(AppError::Database)?;

        self.get_by_id(id).await
    }

    /// Update a shipment's fields (partial) and replace its entire line-item
    /// set when a new one is supplied, all in one transaction
    pub async fn update(&self, id: i64, input: &ShipmentInput) -> Result<ShipmentDetail> {
        let existing = self.get_by_id(id).await?.pengiriman;

        let tanggal_keberangkatan = match input.tanggal_keberangkatan.as_deref() {
            Some(raw) => parse_departure(raw)
                .ok_or_else(|| {
                    AppError::BadRequest("tanggalKeberangkatan is not a valid date".to_string())
                })?
                .to_rfc3339(),
            None => existing.tanggal_keberangkatan.clone(),
        };

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            r#"
            UPDATE pengiriman
            SET namaPengirim = ?, alamatPengirim = ?, nohpPengirim = ?,
                namaPenerima = ?, alamatPenerima = ?, nohpPenerima = ?,
                totalHarga = ?, tanggalKeberangkatan = ?,
                updatedAt = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(input.nama_pengirim.as_deref().unwrap_or(&existing.nama_pengirim))
        .bind(input.alamat_pengirim.as_deref().unwrap_or(&existing.alamat_pengirim))
        .bind(input.nohp_pengirim.as_deref().unwrap_or(&existing.nohp_pengirim))
        .bind(input.nama_penerima.as_deref().unwrap_or(&existing.nama_penerima))
        .bind(input.alamat_penerima.as_deref().unwrap_or(&existing.alamat_penerima))
        .bind(input.nohp_penerima.as_deref().unwrap_or(&existing.nohp_penerima))
        .bind(input.total_harga.unwrap_or(existing.total_harga))
        .bind(&tanggal_keberangkatan)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        // Replace-all semantics: the incoming set becomes the whole set.
        if let Some(items) = &input.barang {
            sqlx::query("DELETE FROM barang WHERE pengirimanId = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            insert_barang(&mut tx, id, items).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        self.get_by_id(id).await
    }

    /// Delete a shipment and its line items in one transaction
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM barang WHERE pengirimanId = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM pengiriman WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::ShipmentNotFound);
        }

        tx.commit().await.map_err(AppError::Database)?;

        Ok(())
    }
}

/// Insert one shipment's line items, rejecting unknown catalog references
/// before anything is written.
async fn insert_barang(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    pengiriman_id: i64,
    items: &[BarangInput],
) -> Result<()> {
    for item in items {
        let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM katalog_barang WHERE id = ?")
            .bind(item.barang_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(AppError::Database)?;

        if known == 0 {
            return Err(AppError::BadRequest(format!(
                "barangId {} does not exist in katalog",
                item.barang_id
            )));
        }

        sqlx::query(
            "INSERT INTO barang (pengirimanId, barangId, jumlahBarang, harga) VALUES (?, ?, ?, ?)",
        )
        .bind(pengiriman_id)
        .bind(item.barang_id)
        .bind(item.jumlah_barang)
        .bind(item.harga)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    }

    Ok(())
}
