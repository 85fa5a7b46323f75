use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::spec::{parse_index, Filters, PageMode, QuerySpec, SortField, SortSpec};

/// A listing request body in one of the two POST shapes. Shape detection is
/// by presence of `startRow`/`endRow`: the row-range variant is tried first
/// because the paged variant accepts any object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListRequest {
    RowRange(RowRangeRequest),
    Paged(PagedRequest),
}

impl ListRequest {
    pub fn normalize(&self) -> QuerySpec {
        match self {
            Self::RowRange(request) => request.normalize(),
            Self::Paged(request) => request.normalize(),
        }
    }
}

/// Shape A: `{filters: {...}, pagination: {page, limit}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedRequest {
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Page and limit as sent by the client, either numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<Value>,
    pub limit: Option<Value>,
}

impl PagedRequest {
    fn normalize(&self) -> QuerySpec {
        paged_spec(
            &self.filters,
            parse_index(self.pagination.page.as_ref()),
            parse_index(self.pagination.limit.as_ref()),
        )
    }
}

/// Shape B: the grid widget's block-loading request with a per-column
/// filter model and a sort model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRangeRequest {
    pub start_row: i64,
    pub end_row: i64,
    #[serde(default)]
    pub filter_model: HashMap<String, FilterEntry>,
    #[serde(default)]
    pub sort_model: Vec<SortEntry>,
}

/// One column entry of the grid's filter model. Text and number filters
/// arrive under `filter`, date filters under `dateFrom`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    pub filter: Option<Value>,
    pub date_from: Option<String>,
}

impl FilterEntry {
    fn filter_text(&self) -> Option<String> {
        match &self.filter {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortEntry {
    pub col_id: String,
    pub sort: String,
}

impl RowRangeRequest {
    fn normalize(&self) -> QuerySpec {
        let offset = self.start_row.max(0);
        let limit = self.end_row.saturating_sub(offset).max(0);

        let sort = self
            .sort_model
            .first()
            .and_then(|entry| {
                SortField::from_col_id(&entry.col_id).map(|field| SortSpec {
                    field,
                    descending: !entry.sort.eq_ignore_ascii_case("asc"),
                })
            })
            .unwrap_or_default();

        QuerySpec {
            predicates: self.filters().predicates(),
            sort,
            offset,
            limit,
            mode: PageMode::RowRange,
        }
    }

    /// Folds the loosely-keyed filter model into the canonical filter set.
    /// Only the known fields are recognized; anything else is ignored.
    fn filters(&self) -> Filters {
        let mut filters = Filters::default();
        for (field, entry) in &self.filter_model {
            match field.as_str() {
                "namaPengirim" => filters.nama_pengirim = entry.filter_text(),
                "namaPenerima" => filters.nama_penerima = entry.filter_text(),
                "tanggalKeberangkatan" => {
                    filters.tanggal_keberangkatan = entry.date_from.clone();
                }
                "totalHarga" => filters.total_harga = entry.filter.clone(),
                // The grid column is "barang"; older clients sent "barangFilter".
                "barang" | "barangFilter" => filters.barang_filter = entry.filter_text(),
                other => tracing::debug!(field = other, "ignoring unknown filter field"),
            }
        }
        filters
    }
}

/// Shape C: flat GET query-string parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub nama_pengirim: Option<String>,
    pub nama_penerima: Option<String>,
    pub tanggal_keberangkatan: Option<String>,
}

impl ListQuery {
    pub fn normalize(&self) -> QuerySpec {
        let filters = Filters {
            nama_pengirim: self.nama_pengirim.clone(),
            nama_penerima: self.nama_penerima.clone(),
            tanggal_keberangkatan: self.tanggal_keberangkatan.clone(),
            total_harga: None,
            barang_filter: None,
        };

        paged_spec(
            &filters,
            self.page.as_deref().and_then(|s| s.trim().parse().ok()),
            self.limit.as_deref().and_then(|s| s.trim().parse().ok()),
        )
    }
}

/// Pagination defaults shared by shapes A and C: page 1, limit 10 when
/// absent or non-numeric, offset = (page - 1) * limit. Saturating math
/// keeps absurdly large client-supplied page numbers from overflowing.
fn paged_spec(filters: &Filters, page: Option<i64>, limit: Option<i64>) -> QuerySpec {
    let page = page.filter(|p| *p >= 1).unwrap_or(1);
    let limit = limit.filter(|l| *l >= 0).unwrap_or(10);

    QuerySpec {
        predicates: filters.predicates(),
        sort: SortSpec::default(),
        offset: page.saturating_sub(1).saturating_mul(limit),
        limit,
        mode: PageMode::Paged { page },
    }
}
