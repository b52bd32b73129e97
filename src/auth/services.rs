use std::sync::Arc;

use tracing::{instrument, warn};

use crate::auth::password::PasswordHasher;
use crate::error::Code;
use crate::users::repo::UserStore;
use crate::users::repo_types::User;

/// Which authorization gate runs after the password matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    /// Back-office login; only administrators pass.
    Admin,
    /// Front-end login; any verified user passes.
    Front,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub async fn check_login(&self, user_name: &str, password: &str) -> Result<User, Code> {
        self.login(user_name, password, LoginKind::Admin).await
    }

    pub async fn check_login_front(&self, user_name: &str, password: &str) -> Result<User, Code> {
        self.login(user_name, password, LoginKind::Front).await
    }

    /// Lookup, then verify, then authorize. A missing user never reaches the
    /// hasher.
    #[instrument(skip(self, password))]
    async fn login(
        &self,
        user_name: &str,
        password: &str,
        kind: LoginKind,
    ) -> Result<User, Code> {
        let user = self
            .users
            .find_by_username(user_name)
            .await?
            .ok_or_else(|| {
                warn!(user_name, "login unknown user");
                Code::UserNotExist
            })?;

        if !self.hasher.verify(&user.pass_word, password) {
            warn!(user_id = user.id, "login invalid password");
            return Err(Code::PasswordWrong);
        }

        if kind == LoginKind::Admin && !user.is_admin() {
            warn!(user_id = user.id, role = user.role, "login without admin role");
            return Err(Code::UserNoRight);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::test_hasher;
    use crate::users::memory::MemUserStore;
    use crate::users::repo_types::{NewUser, UserFields, ROLE_ADMIN, ROLE_MEMBER};
    use crate::users::services::UserService;

    fn services() -> (UserService, AuthService) {
        let store: Arc<dyn UserStore> = Arc::new(MemUserStore::default());
        let hasher = test_hasher();
        (
            UserService::new(store.clone(), hasher.clone()),
            AuthService::new(store, hasher),
        )
    }

    async fn create_alice(users: &UserService) -> User {
        let mut candidate = NewUser {
            user_name: "alice".into(),
            pass_word: "secret1".into(),
            role: ROLE_MEMBER,
        };
        users.check_availability(&mut candidate).await.unwrap();
        users.create(candidate).await.unwrap()
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (_, auth) = services();
        assert_eq!(
            auth.check_login("ghost", "secret1").await.unwrap_err(),
            Code::UserNotExist
        );
        assert_eq!(
            auth.check_login_front("ghost", "secret1").await.unwrap_err(),
            Code::UserNotExist
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_before_role_gate() {
        let (users, auth) = services();
        create_alice(&users).await;
        assert_eq!(
            auth.check_login("alice", "nope-nope").await.unwrap_err(),
            Code::PasswordWrong
        );
        assert_eq!(
            auth.check_login_front("alice", "nope-nope").await.unwrap_err(),
            Code::PasswordWrong
        );
    }

    #[tokio::test]
    async fn admin_login_requires_admin_role() {
        let (users, auth) = services();
        let alice = create_alice(&users).await;

        let stored = users.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.pass_word, "secret1");

        assert_eq!(
            auth.check_login("alice", "secret1").await.unwrap_err(),
            Code::UserNoRight
        );

        users
            .edit_fields(
                alice.id,
                UserFields {
                    user_name: "alice".into(),
                    role: ROLE_ADMIN,
                },
            )
            .await
            .unwrap();

        let admin = auth.check_login("alice", "secret1").await.unwrap();
        assert_eq!(admin.id, alice.id);
        assert!(admin.is_admin());
    }

    #[tokio::test]
    async fn front_login_ignores_role() {
        let (users, auth) = services();
        let alice = create_alice(&users).await;
        let user = auth.check_login_front("alice", "secret1").await.unwrap();
        assert_eq!(user.id, alice.id);
    }

    #[tokio::test]
    async fn deleted_user_cannot_log_in() {
        let (users, auth) = services();
        let alice = create_alice(&users).await;
        users
            .edit_fields(
                alice.id,
                UserFields {
                    user_name: "alice".into(),
                    role: ROLE_ADMIN,
                },
            )
            .await
            .unwrap();

        users.soft_delete(alice.id).await.unwrap();

        assert_eq!(
            auth.check_login("alice", "secret1").await.unwrap_err(),
            Code::UserNotExist
        );
    }

    #[tokio::test]
    async fn malformed_stored_digest_is_wrong_password() {
        let store = Arc::new(MemUserStore::default());
        store
            .insert(NewUser {
                user_name: "legacy".into(),
                pass_word: "plain-not-a-digest".into(),
                role: ROLE_ADMIN,
            })
            .await
            .unwrap();
        let auth = AuthService::new(store, test_hasher());
        assert_eq!(
            auth.check_login("legacy", "plain-not-a-digest").await.unwrap_err(),
            Code::PasswordWrong
        );
    }
}
