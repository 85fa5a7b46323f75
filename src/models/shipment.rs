use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, Result};

/// Database shipment model, serialized with the wire field names the grid
/// expects. `tanggal_keberangkatan` is stored and returned as an RFC 3339
/// string in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Pengiriman {
    pub id: i64,
    pub nama_pengirim: String,
    pub alamat_pengirim: String,
    pub nohp_pengirim: String,
    pub nama_penerima: String,
    pub alamat_penerima: String,
    pub nohp_penerima: String,
    pub total_harga: f64,
    pub tanggal_keberangkatan: String,
}

/// Line item as it appears inside the listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangSummary {
    pub id: i64,
    pub nama_barang: String,
    pub jumlah_barang: i64,
}

/// Full line item for the single-shipment endpoints, catalog name resolved
/// by join.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Barang {
    pub id: i64,
    pub barang_id: i64,
    pub nama_barang: String,
    pub jumlah_barang: i64,
    pub harga: f64,
}

/// Catalog item referenced by line items. Independent lifecycle, never
/// owned by a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct KatalogBarang {
    pub id: i64,
    pub nama_barang: String,
}

/// One shipment row of the listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentSummary {
    #[serde(flatten)]
    pub pengiriman: Pengiriman,
    pub barang: Vec<BarangSummary>,
}

/// Single shipment with its full line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentDetail {
    #[serde(flatten)]
    pub pengiriman: Pengiriman,
    pub barang: Vec<Barang>,
}

/// Write payload for create and update. Everything is optional so that
/// updates can be partial; `validated` enforces the create requirements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInput {
    pub nama_pengirim: Option<String>,
    pub alamat_pengirim: Option<String>,
    pub nohp_pengirim: Option<String>,
    pub nama_penerima: Option<String>,
    pub alamat_penerima: Option<String>,
    pub nohp_penerima: Option<String>,
    pub total_harga: Option<f64>,
    pub tanggal_keberangkatan: Option<String>,
    pub barang: Option<Vec<BarangInput>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangInput {
    pub barang_id: i64,
    pub jumlah_barang: i64,
    pub harga: f64,
}

/// A create payload with every required field present.
#[derive(Debug)]
pub struct ValidShipment<'a> {
    pub nama_pengirim: &'a str,
    pub alamat_pengirim: &'a str,
    pub nohp_pengirim: &'a str,
    pub nama_penerima: &'a str,
    pub alamat_penerima: &'a str,
    pub nohp_penerima: &'a str,
    pub total_harga: f64,
    pub tanggal_keberangkatan: DateTime<Utc>,
    pub barang: &'a [BarangInput],
}

impl ShipmentInput {
    /// Checks the create requirements and names every missing field in one
    /// message. The total is the client-computed value and is stored as
    /// supplied, not re-derived from the line items.
    pub fn validated(&self) -> Result<ValidShipment<'_>> {
        let mut missing = Vec::new();

        if is_blank(&self.nama_pengirim) {
            missing.push("namaPengirim");
        }
        if is_blank(&self.alamat_pengirim) {
            missing.push("alamatPengirim");
        }
        if is_blank(&self.nohp_pengirim) {
            missing.push("nohpPengirim");
        }
        if is_blank(&self.nama_penerima) {
            missing.push("namaPenerima");
        }
        if is_blank(&self.alamat_penerima) {
            missing.push("alamatPenerima");
        }
        if is_blank(&self.nohp_penerima) {
            missing.push("nohpPenerima");
        }
        if self.total_harga.is_none() {
            missing.push("totalHarga");
        }
        if is_blank(&self.tanggal_keberangkatan) {
            missing.push("tanggalKeberangkatan");
        }
        if self.barang.as_ref().is_none_or(|items| items.is_empty()) {
            missing.push("barang");
        }

        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let raw_date = self.tanggal_keberangkatan.as_deref().unwrap_or_default();
        let tanggal_keberangkatan = parse_departure(raw_date).ok_or_else(|| {
            AppError::BadRequest("tanggalKeberangkatan is not a valid date".to_string())
        })?;

        Ok(ValidShipment {
            nama_pengirim: self.nama_pengirim.as_deref().unwrap_or_default(),
            alamat_pengirim: self.alamat_pengirim.as_deref().unwrap_or_default(),
            nohp_pengirim: self.nohp_pengirim.as_deref().unwrap_or_default(),
            nama_penerima: self.nama_penerima.as_deref().unwrap_or_default(),
            alamat_penerima: self.alamat_penerima.as_deref().unwrap_or_default(),
            nohp_penerima: self.nohp_penerima.as_deref().unwrap_or_default(),
            total_harga: self.total_harga.unwrap_or_default(),
            tanggal_keberangkatan,
            barang: self.barang.as_deref().unwrap_or_default(),
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// Parses a departure date supplied on the write path. Plain dates become
/// midnight UTC.
pub fn parse_departure(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|dt| dt.and_utc())
        .ok()
}
