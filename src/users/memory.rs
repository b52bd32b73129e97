use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::StoreError;
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User, UserFields, UserPage};

/// In-process store used by tests; mirrors the soft-delete and partial
/// unique index behaviour of the Postgres schema.
#[derive(Default)]
pub struct MemUserStore {
    rows: Mutex<Vec<User>>,
}

impl MemUserStore {
    fn live(rows: &[User]) -> impl Iterator<Item = &User> {
        rows.iter().filter(|u| u.deleted_at.is_none())
    }

    /// Raw row including soft-deleted ones.
    pub fn raw(&self, id: i64) -> Option<User> {
        let rows = self.rows.lock().unwrap();
        let found = rows.iter().find(|u| u.id == id).cloned();
        found
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let found = Self::live(&rows).find(|u| u.user_name == user_name).cloned();
        Ok(found)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let found = Self::live(&rows).find(|u| u.id == id).cloned();
        Ok(found)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::live(&rows).any(|u| u.user_name == user.user_name) {
            return Err(StoreError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let row = User {
            id: rows.len() as i64 + 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_name: user.user_name,
            pass_word: user.pass_word,
            role: user.role,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows
            .iter_mut()
            .find(|u| u.id == user.id && u.deleted_at.is_none())
        {
            row.user_name = user.user_name.clone();
            row.pass_word = user.pass_word.clone();
            row.role = user.role;
            row.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<UserPage, StoreError> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<&User> = Self::live(&rows)
            .filter(|u| filter.map_or(true, |f| u.user_name.contains(f)))
            .collect();
        let items = matching
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|u| (*u).clone())
            .collect();
        Ok(UserPage {
            items,
            total: matching.len() as i64,
        })
    }

    async fn edit_fields(&self, id: i64, fields: &UserFields) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|u| u.deleted_at.is_none() && u.id != id && u.user_name == fields.user_name)
        {
            return Err(StoreError::Conflict);
        }
        if let Some(row) = rows.iter_mut().find(|u| u.id == id && u.deleted_at.is_none()) {
            row.user_name = fields.user_name.clone();
            row.role = fields.role;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|u| u.id == id && u.deleted_at.is_none()) {
            row.deleted_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }
}
