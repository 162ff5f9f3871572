//! # Account Directory
//!
//! Repository for user accounts. Passwords are hashed with Argon2id; logins
//! key on the (national_id, role) pair, so the same identity string may exist
//! once per role but never twice within one. That invariant is a compound
//! unique index in the schema, and a conflicting insert surfaces here as
//! [`RepositoryError::DuplicateIdentity`].

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::artifacts;
use crate::error::is_unique_violation;
use crate::models::user::{
    ActiveModel as UserActiveModel, Column, Entity as User, Model as UserModel, Role,
};
use crate::repositories::RepositoryError;

/// Request data for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub password: String,
    pub role: Role,
}

/// Repository for user account database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new account with a hashed password.
    ///
    /// Fails with `DuplicateIdentity` when the (national_id, role) pair or
    /// the username is already registered.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<UserModel, RepositoryError> {
        validate_account_request(&request)?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(request.password.as_bytes(), &salt)
            .map_err(|e| RepositoryError::PasswordHash(e.to_string()))?
            .to_string();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(request.username),
            email: Set(request.email),
            phone: Set(request.phone),
            national_id: Set(request.national_id),
            password_hash: Set(password_hash),
            role: Set(request.role),
            created_at: Set(Utc::now().into()),
        };

        user.insert(self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::DuplicateIdentity(
                    "An account with this identity is already registered".to_string(),
                )
            } else {
                RepositoryError::Database(e)
            }
        })
    }

    /// Authenticate by (national_id, role) pair and password.
    ///
    /// Returns the matching user if the password verifies, `None` otherwise.
    /// A mismatched role yields no match even when the identity string
    /// collides across roles.
    pub async fn authenticate(
        &self,
        national_id: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let Some(user) = User::find()
            .filter(Column::NationalId.eq(national_id))
            .filter(Column::Role.eq(role))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| RepositoryError::PasswordHash(e.to_string()))?;

        let verified = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();

        Ok(verified.then_some(user))
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, RepositoryError> {
        Ok(User::find_by_id(user_id).one(self.db).await?)
    }
}

fn validate_account_request(request: &CreateAccountRequest) -> Result<(), RepositoryError> {
    if request.username.trim().is_empty() {
        return Err(RepositoryError::validation("Username is required"));
    }
    // The username is embedded in artifact filenames (the vendor QR image),
    // so path-hostile names must be rejected before the row is inserted;
    // a failure after the insert would burn the (national_id, role) slot.
    if !artifacts::is_safe_name(&request.username) {
        return Err(RepositoryError::validation(
            "Username must not contain '/', '\\' or '..'",
        ));
    }
    if request.national_id.trim().is_empty() {
        return Err(RepositoryError::validation("National ID is required"));
    }
    if request.password.is_empty() {
        return Err(RepositoryError::validation("Password is required"));
    }
    Ok(())
}
