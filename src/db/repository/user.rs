//! User Repository

use chrono::Utc;

use super::{BaseRepository, CountRow, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{User, UserCreate, new_public_id};
use crate::utils::PageParams;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_page(&self, params: &PageParams) -> RepoResult<(i64, Vec<User>)> {
        let limit = params.record_per_page();
        let start = params.start_index();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT count() AS total FROM user GROUP ALL")
                    .query(
                        "SELECT * FROM user ORDER BY created_at LIMIT $limit START $start",
                    )
                    .bind(("limit", limit as i64))
                    .bind(("start", start as i64))
                    .await?;
                let counts: Vec<CountRow> = result.take(0)?;
                let total = counts.first().map(|c| c.total).unwrap_or(0);
                let users = decode_rows(result.take(1), TABLE);
                Ok((total, users))
            })
            .await
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> RepoResult<Option<User>> {
        let user_id = user_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM user WHERE user_id = $user_id LIMIT 1")
                    .bind(("user_id", user_id))
                    .await?;
                let users: Vec<User> = result.take(0)?;
                Ok(users.into_iter().next())
            })
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM user WHERE email = $email LIMIT 1")
                    .bind(("email", email))
                    .await?;
                let users: Vec<User> = result.take(0)?;
                Ok(users.into_iter().next())
            })
            .await
    }

    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<User>> {
        let phone = phone.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM user WHERE phone = $phone LIMIT 1")
                    .bind(("phone", phone))
                    .await?;
                let users: Vec<User> = result.take(0)?;
                Ok(users.into_iter().next())
            })
            .await
    }

    /// Create a user, refusing duplicate email or phone before the insert.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(
                "An account with this email or phone already exists".to_string(),
            ));
        }
        if self.find_by_phone(&data.phone).await?.is_some() {
            return Err(RepoError::Duplicate(
                "An account with this email or phone already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: None,
            user_id: new_public_id(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            hashed_password: data.hashed_password,
            avatar: data.avatar,
            token: None,
            refresh_token: None,
            token_version: 0,
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
            })
            .await
    }

    /// Persist a freshly issued token pair for an existing user.
    ///
    /// Runs as one UPDATE keyed on `user_id`: both tokens and the version
    /// counter move together, and an unknown user is an error rather than
    /// an insert.
    pub async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
    ) -> RepoResult<User> {
        let user_id_owned = user_id.to_string();
        let token = token.to_string();
        let refresh_token = refresh_token.to_string();
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE user SET token = $token, refresh_token = $refresh_token, \
                         token_version += 1, updated_at = $updated_at \
                         WHERE user_id = $user_id RETURN AFTER",
                    )
                    .bind(("user_id", user_id_owned))
                    .bind(("token", token))
                    .bind(("refresh_token", refresh_token))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<User> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("User {} not found", user_id)))
            })
            .await
    }
}
