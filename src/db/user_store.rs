use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::user::User,
};

/// User store for database operations
#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
}

impl UserStore {
    /// Create a new UserStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::UserNotFound)?;

        Ok(user)
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(user)
    }

    /// Check a username/password pair against the stored argon2 hash.
    /// The error message never says which half was wrong.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User> {
        let invalid = || AppError::Auth("Invalid username or password".to_string());

        let user = self
            .get_user_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        let parsed = PasswordHash::new(&user.password_hash).map_err(|_| invalid())?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| invalid())?;

        Ok(user)
    }

    /// Create a user with a freshly hashed password
    pub async fn create_user(&self, name: &str, username: &str, password: &str) -> Result<User> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?
            .to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, username, password_hash, last_edit)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(&password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        self.get_user_by_id(result.last_insert_rowid()).await
    }
}
