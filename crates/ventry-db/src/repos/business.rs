use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const BUSINESS_COLUMNS: &str = "business_id, owner_id, name, industry, location, website_url, contact_email, contact_phone, registration_date, created_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BusinessRow {
    pub business_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub website_url: Option<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub registration_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBusiness<'a> {
    pub name: &'a str,
    pub industry: &'a str,
    pub location: &'a str,
    pub website_url: Option<&'a str>,
    pub contact_email: &'a str,
    pub contact_phone: &'a str,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct BusinessUpdate<'a> {
    pub name: &'a str,
    pub industry: &'a str,
    pub location: &'a str,
    pub website_url: Option<&'a str>,
    pub contact_email: &'a str,
    pub contact_phone: &'a str,
    pub registration_date: NaiveDate,
}

/// Optional search predicates; each present field adds one parameterized
/// `AND column = $n` clause on top of the fixed owner predicate.
#[derive(Debug, Clone, Default)]
pub struct BusinessFilter {
    pub industry: Option<String>,
    pub location: Option<String>,
    pub registration_date: Option<NaiveDate>,
}

pub struct BusinessRepo;

impl BusinessRepo {
    pub async fn create(pool: &PgPool, owner_id: Uuid, new: &NewBusiness<'_>) -> Result<Uuid> {
        let business_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO business (business_id, owner_id, name, industry, location, website_url, contact_email, contact_phone, registration_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(business_id)
        .bind(owner_id)
        .bind(new.name)
        .bind(new.industry)
        .bind(new.location)
        .bind(new.website_url)
        .bind(new.contact_email)
        .bind(new.contact_phone)
        .bind(new.registration_date)
        .execute(pool)
        .await
        .context("Failed to create business")?;
        Ok(business_id)
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<BusinessRow>> {
        let rows = sqlx::query_as::<_, BusinessRow>(&format!(
            "SELECT {} FROM business WHERE owner_id = $1 ORDER BY created_at DESC",
            BUSINESS_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .context("Failed to list businesses")?;
        Ok(rows)
    }

    /// Owner-scoped lookup: a business another user owns is indistinguishable
    /// from one that does not exist.
    pub async fn get(pool: &PgPool, business_id: Uuid, owner_id: Uuid) -> Result<Option<BusinessRow>> {
        let row = sqlx::query_as::<_, BusinessRow>(&format!(
            "SELECT {} FROM business WHERE business_id = $1 AND owner_id = $2",
            BUSINESS_COLUMNS
        ))
        .bind(business_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get business")?;
        Ok(row)
    }

    /// Search the caller's businesses, composing the fixed owner predicate
    /// with the filter's optional predicates as bound placeholders.
    pub async fn search(
        pool: &PgPool,
        owner_id: Uuid,
        filter: &BusinessFilter,
    ) -> Result<Vec<BusinessRow>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM business WHERE owner_id = ",
            BUSINESS_COLUMNS
        ));
        query.push_bind(owner_id);

        if let Some(industry) = &filter.industry {
            query.push(" AND industry = ").push_bind(industry);
        }
        if let Some(location) = &filter.location {
            query.push(" AND location = ").push_bind(location);
        }
        if let Some(date) = filter.registration_date {
            query.push(" AND registration_date = ").push_bind(date);
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query
            .build_query_as::<BusinessRow>()
            .fetch_all(pool)
            .await
            .context("Failed to search businesses")?;
        Ok(rows)
    }

    pub async fn update(
        pool: &PgPool,
        business_id: Uuid,
        owner_id: Uuid,
        update: &BusinessUpdate<'_>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE business
            SET name = $1, industry = $2, location = $3, website_url = $4,
                contact_email = $5, contact_phone = $6, registration_date = $7
            WHERE business_id = $8 AND owner_id = $9
            "#,
        )
        .bind(update.name)
        .bind(update.industry)
        .bind(update.location)
        .bind(update.website_url)
        .bind(update.contact_email)
        .bind(update.contact_phone)
        .bind(update.registration_date)
        .bind(business_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to update business")?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, business_id: Uuid, owner_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM business WHERE business_id = $1 AND owner_id = $2")
            .bind(business_id)
            .bind(owner_id)
            .execute(pool)
            .await
            .context("Failed to delete business")?;
        Ok(result.rows_affected())
    }
}
