/// User model and database operations
///
/// Users are plain identity records: a unique username, contact fields,
/// permission flags and a password hash. Staff users can sign in to the
/// back office.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(150) NOT NULL UNIQUE,
///     email VARCHAR(254) NOT NULL DEFAULT '',
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(150) NOT NULL DEFAULT '',
///     last_name VARCHAR(150) NOT NULL DEFAULT '',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_staff BOOLEAN NOT NULL DEFAULT FALSE,
///     is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
///     date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use pcshop_shared::models::user::{User, CreateUser};
/// use pcshop_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "Alice".to_string(),
///     last_name: String::new(),
///     is_active: true,
///     is_staff: false,
///     is_superuser: false,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// let found = User::find_by_username(&pool, "alice").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::like_pattern;
use super::filter::{blank_as_none, since_now, DateRange};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// User ID
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Email address (may be empty)
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    /// Inactive users cannot sign in
    pub is_active: bool,

    /// Staff users can use the back office
    pub is_staff: bool,

    pub is_superuser: bool,

    /// When the account was created
    pub date_joined: DateTime<Utc>,

    /// Last successful back-office login
    pub last_login: Option<DateTime<Utc>>,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Input for updating a user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                            is_active, is_staff, is_superuser, date_joined, last_login";

/// Filters for the back-office user list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_staff: Option<bool>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_superuser: Option<bool>,

    /// Joined within this window
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_joined: Option<DateRange>,

    /// Case-insensitive match on username, email, first or last name
    pub q: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name,
                               is_active, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.is_active)
        .bind(data.is_staff)
        .bind(data.is_superuser)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact match)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` will be updated.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET id = id");
        let mut bind_count = 1;

        let mut push = |column: &str, present: bool| {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        };
        push("username", data.username.is_some());
        push("email", data.email.is_some());
        push("password_hash", data.password_hash.is_some());
        push("first_name", data.first_name.is_some());
        push("last_name", data.last_name.is_some());
        push("is_active", data.is_active.is_some());
        push("is_staff", data.is_staff.is_some());
        push("is_superuser", data.is_superuser.is_some());

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", USER_COLUMNS));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        for value in [
            data.username,
            data.email,
            data.password_hash,
            data.first_name,
            data.last_name,
        ]
        .into_iter()
        .flatten()
        {
            q = q.bind(value);
        }
        for flag in [data.is_active, data.is_staff, data.is_superuser]
            .into_iter()
            .flatten()
        {
            q = q.bind(flag);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// ⚠️  **WARNING**: Cascades to every order of the user.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Records a successful login
    pub async fn update_last_login(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every user alphabetically by username
    pub async fn list_by_username(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY username ASC",
            USER_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists users newest joined first, filtered by flags, join date and a
    /// search term over username, email and names
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE ($1::text IS NULL
                   OR username ILIKE $1 OR email ILIKE $1
                   OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::boolean IS NULL OR is_staff = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
              AND ($4::boolean IS NULL OR is_superuser = $4)
              AND ($5::timestamptz IS NULL OR date_joined >= $5)
            ORDER BY date_joined DESC, id DESC
            LIMIT $6 OFFSET $7
            "#,
            USER_COLUMNS
        ))
        .bind(filter.q.as_deref().map(like_pattern))
        .bind(filter.is_staff)
        .bind(filter.is_active)
        .bind(filter.is_superuser)
        .bind(since_now(filter.date_joined))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts users matching the same filter as [`User::list`]
    pub async fn count(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::text IS NULL
                   OR username ILIKE $1 OR email ILIKE $1
                   OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::boolean IS NULL OR is_staff = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
              AND ($4::boolean IS NULL OR is_superuser = $4)
              AND ($5::timestamptz IS NULL OR date_joined >= $5)
            "#,
        )
        .bind(filter.q.as_deref().map(like_pattern))
        .bind(filter.is_staff)
        .bind(filter.is_active)
        .bind(filter.is_superuser)
        .bind(since_now(filter.date_joined))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Whether this user may sign in to the back office
    pub fn can_use_backoffice(&self) -> bool {
        self.is_active && self.is_staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Alice".to_string(),
            last_name: String::new(),
            is_active: true,
            is_staff: true,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.username.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.is_staff.is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_can_use_backoffice() {
        let mut u = user();
        assert!(u.can_use_backoffice());

        u.is_active = false;
        assert!(!u.can_use_backoffice());

        u.is_active = true;
        u.is_staff = false;
        assert!(!u.can_use_backoffice());
    }
}
