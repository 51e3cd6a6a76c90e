//! User service implementation
//!
//! Account management on top of the user repository: password hashing,
//! self-service password changes and permission cache upkeep.

use tracing::{debug, info};

use crate::database::repositories::UserRepository;
use crate::models::user::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, User};
use crate::models::Validate;
use crate::services::auth::{hash_password, verify_password, AuthService};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::logging::log_user_action;

#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
    auth: AuthService,
}

impl UserService {
    pub fn new(user_repository: UserRepository, auth: AuthService) -> Self {
        Self {
            user_repository,
            auth,
        }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.user_repository.list().await
    }

    pub async fn list_active(&self) -> Result<Vec<User>> {
        self.user_repository.list_active().await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "usuario", id })
    }

    /// Register a new account
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        request.validate()?;
        debug!(username = %request.username, "Creating user");

        let password_hash = hash_password(&request.password)?;
        let user = self.user_repository.create(request, password_hash).await?;

        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Update an account; a new password is hashed before storing
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User> {
        request.validate()?;

        let password_hash = match &request.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let user = self
            .user_repository
            .update(id, request, password_hash)
            .await?
            .ok_or(ColectaError::NotFound { resource: "usuario", id })?;

        self.auth.invalidate_user(id).await;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Soft delete an account
    pub async fn deactivate(&self, id: i64) -> Result<User> {
        let user = self
            .user_repository
            .deactivate(id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "usuario", id })?;

        self.auth.invalidate_user(id).await;
        info!(user_id = id, "User deactivated");
        Ok(user)
    }

    /// Change the caller's own password after checking the current one
    pub async fn change_password(&self, caller_id: i64, id: i64, request: ChangePasswordRequest) -> Result<()> {
        if caller_id != id {
            return Err(ColectaError::PermissionDenied(
                "passwords can only be changed by their owner".to_string(),
            ));
        }
        request.validate()?;

        let user = self.get(id).await?;
        if !verify_password(&user.password_hash, &request.current_password)? {
            return Err(ColectaError::validation("current password is incorrect"));
        }

        self.user_repository
            .update_password(id, hash_password(&request.new_password)?)
            .await?;

        log_user_action(id, "change_password", None);
        Ok(())
    }
}
