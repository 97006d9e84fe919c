use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use ventry_common::models::auth::User;

const USER_COLUMNS: &str = "user_id, username, email, password_hash, first_name, last_name, phone_number, address, city, state, country, profile_picture_url, created_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Strip the password hash for client-facing responses.
    pub fn into_user(self) -> User {
        User {
            id: self.user_id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            profile_picture_url: self.profile_picture_url,
            created_at: self.created_at,
        }
    }
}

/// Full overwrite of the mutable profile fields
#[derive(Debug, Clone)]
pub struct ProfileUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO users (user_id, username, email, password_hash, first_name, last_name) VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .execute(pool)
        .await
        .context("Failed to create user")?;
        Ok(())
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE user_id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    /// Duplicate check for registration: matches on either unique column.
    pub async fn get_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $2",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to check for existing user")?;
        Ok(row)
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        update: &ProfileUpdate<'_>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $1, email = $2, first_name = $3, last_name = $4,
                phone_number = $5, address = $6, city = $7, state = $8,
                country = $9, profile_picture_url = $10
            WHERE user_id = $11
            "#,
        )
        .bind(update.username)
        .bind(update.email)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.phone_number)
        .bind(update.address)
        .bind(update.city)
        .bind(update.state)
        .bind(update.country)
        .bind(update.profile_picture_url)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to update user profile")?;
        Ok(result.rows_affected())
    }
}
