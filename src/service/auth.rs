use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::LoginSession;
use crate::models::user::{LoginRequest, SignupRequest, User};
use chrono::{Duration, Utc};
use tracing::info;
use validator::Validate;

pub const SESSION_TTL_DAYS: i64 = 7;

pub struct AuthService<'a> {
    pub repo: &'a PostgresRepository,
}

impl<'a> AuthService<'a> {
    pub async fn signup(&self, request: &SignupRequest) -> Result<User, AppError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.repo.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::UserAlreadyExists(email));
        }

        let user = self.repo.create_user(request.name.trim(), &email, &request.password, request.role).await?;
        info!(user_id = %user.id, role = %user.role, "user signed up");
        Ok(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<(User, LoginSession), AppError> {
        let email = normalize_email(&request.email);
        let Some(user) = self.repo.get_user_by_email(&email).await? else {
            PostgresRepository::dummy_verify(&request.password);
            return Err(AppError::InvalidCredentials);
        };

        self.repo.verify_password(&user, &request.password).await?;

        let session = self.repo.create_login_session(&user.id, Utc::now() + Duration::days(SESSION_TTL_DAYS)).await?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, session))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
