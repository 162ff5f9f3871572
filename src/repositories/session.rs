//! # Session Store
//!
//! Opaque bearer tokens backing the authenticated surfaces. Tokens are 32
//! random bytes hex-encoded; possession of the token is the whole credential.

use chrono::Utc;
use rand::RngCore;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use uuid::Uuid;

use crate::models::session::{ActiveModel as SessionActiveModel, Entity as Session};
use crate::models::user::{Entity as User, Model as UserModel};
use crate::repositories::RepositoryError;

/// Repository for session database operations
pub struct SessionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SessionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mint a new session for a user and return the bearer token
    pub async fn create(&self, user_id: Uuid) -> Result<String, RepositoryError> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let session = SessionActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id),
            created_at: Set(Utc::now().into()),
        };
        session.insert(self.db).await?;

        Ok(token)
    }

    /// Resolve a bearer token to its user, or None if the token is unknown
    pub async fn resolve(&self, token: &str) -> Result<Option<UserModel>, RepositoryError> {
        let Some(session) = Session::find_by_id(token).one(self.db).await? else {
            return Ok(None);
        };
        Ok(session.find_related(User).one(self.db).await?)
    }

    /// Delete a session. Unknown tokens are a no-op so logout is idempotent.
    pub async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        Session::delete_by_id(token).exec(self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::repositories::{CreateAccountRequest, UserRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn setup_test_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let db = Database::connect(opt).await.expect("Failed to init test DB");
        Migrator::up(&db, None).await.expect("Failed to migrate");
        db
    }

    async fn create_user(db: &DatabaseConnection, username: &str) -> UserModel {
        UserRepository::new(db)
            .create_account(CreateAccountRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                phone: "5550001".to_string(),
                national_id: format!("NID-{}", username),
                password: "s3cret-pass".to_string(),
                role: Role::Investor,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let db = setup_test_db().await;
        let repo = SessionRepository::new(&db);
        let user = create_user(&db, "ivy").await;

        let token = repo.create(user.id).await.unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        let resolved = repo.resolve(&token).await.unwrap().expect("session user");
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let db = setup_test_db().await;
        let repo = SessionRepository::new(&db);

        assert!(repo.resolve("deadbeef").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = setup_test_db().await;
        let repo = SessionRepository::new(&db);
        let user = create_user(&db, "ivy").await;

        let token = repo.create(user.id).await.unwrap();
        repo.delete(&token).await.unwrap();
        assert!(repo.resolve(&token).await.unwrap().is_none());

        // Second delete of the same token succeeds
        repo.delete(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_login() {
        let db = setup_test_db().await;
        let repo = SessionRepository::new(&db);
        let user = create_user(&db, "ivy").await;

        let first = repo.create(user.id).await.unwrap();
        let second = repo.create(user.id).await.unwrap();
        assert_ne!(first, second);
    }
}
