use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::time::Duration;

pub mod catalog_store;
pub mod shipment_store;
pub mod user_store;

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the database schema
pub async fn setup_database(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pengiriman (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            namaPengirim TEXT NOT NULL,
            alamatPengirim TEXT NOT NULL,
            nohpPengirim TEXT NOT NULL,
            namaPenerima TEXT NOT NULL,
            alamatPenerima TEXT NOT NULL,
            nohpPenerima TEXT NOT NULL,
            totalHarga REAL NOT NULL,
            tanggalKeberangkatan TEXT NOT NULL,
            createdAt TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updatedAt TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS katalog_barang (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            namaBarang TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS barang (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pengirimanId INTEGER NOT NULL,
            barangId INTEGER NOT NULL,
            jumlahBarang INTEGER NOT NULL,
            harga REAL NOT NULL,
            FOREIGN KEY (pengirimanId) REFERENCES pengiriman(id) ON DELETE CASCADE,
            FOREIGN KEY (barangId) REFERENCES katalog_barang(id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            last_edit TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Seed an admin account if the table is empty
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count.0 == 0 {
        let password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        user_store::UserStore::new(pool.clone())
            .create_user("Admin User", "admin", &password)
            .await?;
    }

    Ok(())
}
