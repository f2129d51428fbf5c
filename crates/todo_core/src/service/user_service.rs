//! User use-case service.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::error::RepoResult;
use crate::repo::user_repo::UserRepository;
use log::debug;

/// Use-case service wrapper for user operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user.
    ///
    /// # Contract
    /// - Fails with `RepoError::DuplicateUser` when username or email is taken;
    ///   nothing is written in that case.
    pub fn create_user(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<UserId> {
        let id = self.repo.create_user(&NewUser::new(username, email))?;
        debug!("event=user_create module=service status=ok user_id={id}");
        Ok(id)
    }

    pub fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }

    pub fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.repo.get_user_by_username(username)
    }

    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        self.repo.list_users()
    }
}
