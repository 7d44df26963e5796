//! Get Profile Use Case

use std::sync::Arc;

use kernel::id::UserId;
use kernel::session::CurrentUser;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct GetProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> GetProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Callers may only read their own profile.
    pub async fn execute(&self, caller: &CurrentUser, user_id: UserId) -> AuthResult<User> {
        caller.ensure_owner(user_id)?;

        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
