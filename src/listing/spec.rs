use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

/// One filter condition against the shipment listing.
///
/// The operator is fixed by field semantics, so each variant only carries
/// the parsed value. Predicates are always emitted in the canonical order
/// sender, recipient, departure date, total price, item name, regardless of
/// which request shape supplied them.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match on namaPengirim.
    SenderContains(String),
    /// Case-insensitive substring match on namaPenerima.
    RecipientContains(String),
    /// Calendar-day equality on tanggalKeberangkatan.
    DepartureOn(NaiveDate),
    /// Exact match on totalHarga.
    TotalPriceEq(f64),
    /// A shipment matches when any of its line items' catalog name contains
    /// the text (EXISTS semantics, never duplicates parent rows).
    ItemNameContains(String),
}

/// Columns the grid is allowed to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    NamaPengirim,
    NamaPenerima,
    TanggalKeberangkatan,
    TotalHarga,
}

impl SortField {
    pub fn from_col_id(col_id: &str) -> Option<Self> {
        match col_id {
            "id" => Some(Self::Id),
            "namaPengirim" => Some(Self::NamaPengirim),
            "namaPenerima" => Some(Self::NamaPenerima),
            "tanggalKeberangkatan" => Some(Self::TanggalKeberangkatan),
            "totalHarga" => Some(Self::TotalHarga),
            _ => None,
        }
    }

    /// The database column this field sorts on.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::NamaPengirim => "namaPengirim",
            Self::NamaPenerima => "namaPenerima",
            Self::TanggalKeberangkatan => "tanggalKeberangkatan",
            Self::TotalHarga => "totalHarga",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::TanggalKeberangkatan,
            descending: true,
        }
    }
}

/// How the caller consumes the listing, which selects the envelope shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageMode {
    /// Classic page-by-page pagination.
    Paged { page: i64 },
    /// Contiguous row-range blocks for the infinite-scroll grid.
    RowRange,
}

/// Canonical, shape-independent representation of one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub predicates: Vec<Predicate>,
    pub sort: SortSpec,
    pub offset: i64,
    pub limit: i64,
    pub mode: PageMode,
}

/// Filter intent shared by all request shapes. Field names follow the wire
/// format of the grid. `total_harga` stays a raw JSON value because clients
/// send it both as a number and as a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub nama_pengirim: Option<String>,
    pub nama_penerima: Option<String>,
    pub tanggal_keberangkatan: Option<String>,
    pub total_harga: Option<Value>,
    pub barang_filter: Option<String>,
}

impl Filters {
    /// Builds the predicate list in canonical order. Empty strings count as
    /// absent (the grid sends `""` for untouched columns) and unparseable
    /// numbers or dates are dropped rather than treated as errors.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(text) = non_empty(&self.nama_pengirim) {
            predicates.push(Predicate::SenderContains(text));
        }
        if let Some(text) = non_empty(&self.nama_penerima) {
            predicates.push(Predicate::RecipientContains(text));
        }
        if let Some(raw) = non_empty(&self.tanggal_keberangkatan) {
            match parse_day(&raw) {
                Some(day) => predicates.push(Predicate::DepartureOn(day)),
                None => {
                    tracing::debug!(value = %raw, "dropping unparseable tanggalKeberangkatan filter")
                }
            }
        }
        if let Some(value) = &self.total_harga {
            match parse_number(value) {
                Some(number) => predicates.push(Predicate::TotalPriceEq(number)),
                None => tracing::debug!(value = %value, "dropping unparseable totalHarga filter"),
            }
        }
        if let Some(text) = non_empty(&self.barang_filter) {
            predicates.push(Predicate::ItemNameContains(text));
        }

        predicates
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Parses a page/limit value that may arrive as a JSON number or a numeric
/// string. Anything else counts as absent.
pub(crate) fn parse_index(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Derives the calendar day from a filter date string. The grid sends
/// `YYYY-MM-DD HH:MM:SS`, the query-string shape sends plain dates, and
/// older clients sent RFC 3339.
pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|dt| dt.date())
        .ok()
}
