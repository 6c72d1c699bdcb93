use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{Role, User};
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, role, password_hash, enrolled_courses, course_selection_completed, created_at";

/// A real Argon2 hash generated once, verified against when the email is unknown so
/// failed logins take the same time either way.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| hash_password("dummy-never-matches").ok().map(|(_, hash)| hash));

impl PostgresRepository {
    pub async fn create_user(&self, name: &str, email: &str, password: &str, role: Role) -> Result<User, AppError> {
        let (salt, password_hash) = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, role, salt, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(&salt)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn verify_password(&self, user: &User, password: &str) -> Result<(), AppError> {
        verify_password_hash(&user.password_hash, password)
    }

    pub fn dummy_verify(password: &str) {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = verify_password_hash(hash, password);
        }
    }

    /// Replace the student's course selection and mark the selection step done.
    pub async fn update_enrolled_courses(&self, user_id: &Uuid, course_ids: &[Uuid]) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET enrolled_courses = $1, course_selection_completed = true
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(course_ids)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

pub(crate) fn hash_password(password: &str) -> Result<(String, String), AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;

    Ok((salt.to_string(), hash.to_string()))
}

pub(crate) fn verify_password_hash(stored_hash: &str, password: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::InvalidCredentials)
}
