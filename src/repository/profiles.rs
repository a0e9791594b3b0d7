//! Accounts and profiles repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{like_pattern, map_constraint};
use crate::{
    error::{AppError, AppResult},
    models::{
        profile::{Profile, ProfileStatus, RegistrationQuery, Role},
        session::Account,
    },
};

/// Fields of a profile created together with its account
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub role: Role,
    pub external_id: String,
    pub phone: String,
    pub status: ProfileStatus,
}

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile with id {} not found", id)))
    }

    /// Profile attached to an authentication account
    pub async fn get_by_account(&self, account_id: Uuid) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE LOWER(external_id) = LOWER($1)",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn get_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM auth_accounts WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// Create the authentication account and its profile in one transaction
    pub async fn create_with_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: &NewProfile,
    ) -> AppResult<(Account, Profile)> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO auth_accounts (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint(e, "An account with this identifier already exists"))?;

        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, account_id, name, role, external_id, phone, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account.id)
        .bind(&profile.name)
        .bind(profile.role)
        .bind(&profile.external_id)
        .bind(&profile.phone)
        .bind(profile.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint(e, "A profile with this identifier already exists"))?;

        tx.commit().await?;

        Ok((account, created))
    }

    /// List student and faculty registrations, newest first
    pub async fn list_registrations(&self, query: &RegistrationQuery) -> AppResult<Vec<Profile>> {
        let mut conditions = vec!["role <> 'librarian'".to_string()];
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if query.q.is_some() {
            conditions.push(format!(
                "(LOWER(name) LIKE ${} OR LOWER(external_id) LIKE ${})",
                idx, idx
            ));
        }

        let sql = format!(
            "SELECT * FROM profiles WHERE {} ORDER BY created_at DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Profile>(&sql);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(ref q) = query.q {
            builder = builder.bind(like_pattern(q));
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Overwrite the status of a pending profile. Returns None when the
    /// profile is missing or no longer pending.
    pub async fn decide_if_pending(
        &self,
        id: Uuid,
        status: ProfileStatus,
    ) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Active students and faculty, the people a book can be lent to
    pub async fn list_active_members(&self) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, Profile>(
            r#"
            SELECT * FROM profiles
            WHERE status = 'active' AND role <> 'librarian'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_active_members(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM profiles WHERE status = 'active' AND role <> 'librarian'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: ProfileStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
