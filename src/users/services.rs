use std::sync::Arc;

use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::auth::password::PasswordHasher;
use crate::error::Code;
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User, UserFields, UserPage};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 120;
const PLACEHOLDER_NAME_LEN: usize = 10;

pub(crate) fn is_valid_username(user_name: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^\S{4,12}$").unwrap();
    }
    USERNAME_RE.is_match(user_name)
}

pub(crate) fn check_password_len(password: &str) -> Result<(), Code> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(Code::PasswordTooShort);
    }
    if len > MAX_PASSWORD_LEN {
        return Err(Code::InvalidPassword);
    }
    Ok(())
}

fn placeholder_name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PLACEHOLDER_NAME_LEN)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    #[cfg(test)]
    pub async fn find_by_username(&self, user_name: &str) -> Result<Option<User>, Code> {
        Ok(self.store.find_by_username(user_name).await?)
    }

    /// Pre-create check. An empty username is replaced in place with a
    /// random placeholder instead of being rejected.
    #[instrument(skip(self, candidate), fields(user_name = %candidate.user_name))]
    pub async fn check_availability(&self, candidate: &mut NewUser) -> Result<(), Code> {
        if candidate.user_name.is_empty() {
            candidate.user_name = placeholder_name();
            info!(user_name = %candidate.user_name, "empty username, generated placeholder");
        }
        check_password_len(&candidate.pass_word)?;

        match self.store.find_by_username(&candidate.user_name).await? {
            Some(existing) if existing.id > 0 => {
                warn!(user_name = %candidate.user_name, "username already taken");
                Err(Code::UsernameUsed)
            }
            _ => Ok(()),
        }
    }

    /// Edit-time check: the name is free or already belongs to `id`.
    #[instrument(skip(self))]
    pub async fn check_rename(&self, id: i64, user_name: &str) -> Result<(), Code> {
        match self.store.find_by_username(user_name).await? {
            Some(existing) if existing.id > 0 && existing.id != id => Err(Code::UsernameUsed),
            _ => Ok(()),
        }
    }

    /// Hashes the plaintext password, then persists.
    #[instrument(skip(self, user), fields(user_name = %user.user_name))]
    pub async fn create(&self, mut user: NewUser) -> Result<User, Code> {
        user.pass_word = self.hasher.hash(&user.pass_word).map_err(|e| {
            error!(error = %e, "could not hash password for new user");
            Code::Error
        })?;
        let created = self.store.insert(user).await?;
        info!(user_id = created.id, "user created");
        Ok(created)
    }

    /// Saves `user`. A new plaintext password is hashed first; `None` keeps
    /// the stored digest as is.
    #[instrument(skip(self, user, new_password), fields(user_id = user.id))]
    pub async fn update(&self, mut user: User, new_password: Option<&str>) -> Result<User, Code> {
        if let Some(plain) = new_password {
            user.pass_word = self.hasher.hash(plain).map_err(|e| {
                error!(error = %e, "could not hash replacement password");
                Code::Error
            })?;
        }
        self.store.save(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self, plain))]
    pub async fn change_password(&self, id: i64, plain: &str) -> Result<(), Code> {
        check_password_len(plain)?;
        let user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(Code::UserNotExist)?;
        self.update(user, Some(plain)).await?;
        info!(user_id = id, "password changed");
        Ok(())
    }

    /// 1-indexed page; `total` counts the whole filtered set.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &str,
        page_size: i64,
        page_num: i64,
    ) -> Result<UserPage, Code> {
        let filter = (!filter.is_empty()).then_some(filter);
        let offset = page_num.saturating_sub(1).saturating_mul(page_size).max(0);
        Ok(self.store.list(filter, page_size, offset).await?)
    }

    #[instrument(skip(self))]
    pub async fn edit_fields(&self, id: i64, fields: UserFields) -> Result<(), Code> {
        self.store.edit_fields(id, &fields).await?;
        info!(user_id = id, "user edited");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i64) -> Result<(), Code> {
        self.store.soft_delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }
}
