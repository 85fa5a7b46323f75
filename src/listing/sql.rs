use sqlx::{QueryBuilder, Sqlite};

use super::spec::{Predicate, QuerySpec};

/// Column list returned to the grid for every shipment row.
pub const SHIPMENT_COLUMNS: &str = "id, namaPengirim, alamatPengirim, nohpPengirim, \
    namaPenerima, alamatPenerima, nohpPenerima, totalHarga, tanggalKeberangkatan";

/// Builds the data query: filtered, sorted, paginated shipment rows.
/// Child rows are fetched separately and assembled in application code.
pub fn data_query(spec: &QuerySpec) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {SHIPMENT_COLUMNS} FROM pengiriman WHERE 1=1"
    ));
    push_predicates(&mut builder, &spec.predicates);

    builder.push(" ORDER BY ");
    builder.push(spec.sort.field.column());
    builder.push(if spec.sort.descending { " DESC" } else { " ASC" });
    // Tiebreak on id so pages stay stable across requests.
    builder.push(", id DESC");

    builder.push(" LIMIT ");
    builder.push_bind(spec.limit);
    builder.push(" OFFSET ");
    builder.push_bind(spec.offset);

    builder
}

/// Builds the count query over the same predicates, without join,
/// aggregation or pagination.
pub fn count_query(predicates: &[Predicate]) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM pengiriman WHERE 1=1");
    push_predicates(&mut builder, predicates);
    builder
}

/// Appends every predicate as an AND condition with bound parameters.
/// Both the data query and the count query go through here, which is what
/// keeps their row sets in agreement.
fn push_predicates(builder: &mut QueryBuilder<'static, Sqlite>, predicates: &[Predicate]) {
    for predicate in predicates {
        builder.push(" AND ");
        match predicate {
            Predicate::SenderContains(text) => {
                builder.push("namaPengirim LIKE ");
                builder.push_bind(like_pattern(text));
                builder.push(" ESCAPE '\\'");
            }
            Predicate::RecipientContains(text) => {
                builder.push("namaPenerima LIKE ");
                builder.push_bind(like_pattern(text));
                builder.push(" ESCAPE '\\'");
            }
            Predicate::DepartureOn(day) => {
                builder.push("date(tanggalKeberangkatan) = ");
                builder.push_bind(day.format("%Y-%m-%d").to_string());
            }
            Predicate::TotalPriceEq(value) => {
                builder.push("totalHarga = ");
                builder.push_bind(*value);
            }
            Predicate::ItemNameContains(text) => {
                builder.push(
                    "EXISTS (SELECT 1 FROM barang \
                     JOIN katalog_barang ON katalog_barang.id = barang.barangId \
                     WHERE barang.pengirimanId = pengiriman.id \
                     AND katalog_barang.namaBarang LIKE ",
                );
                builder.push_bind(like_pattern(text));
                builder.push(" ESCAPE '\\')");
            }
        }
    }
}

/// Wraps filter text in `%...%`, escaping LIKE metacharacters so they match
/// literally. Must be paired with `ESCAPE '\'` in the query.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
