//! In-process user directory.
//!
//! Mirrors the PostgreSQL repositories: uniqueness is enforced at write time,
//! multi-row operations are applied under a single lock so they are atomic,
//! and invitations are looked up by hash only.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_entity::invitation::{Invitation, hash_token};
use socialhub_entity::user::{NewUser, Role, User};

use crate::directory::{RoleStore, UserDirectory, UserReader};

#[derive(Debug)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
    invitations: HashMap<String, Invitation>,
    roles: Vec<Role>,
}

impl State {
    fn role(&self, name: &str) -> AppResult<Role> {
        self.roles
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Role '{name}' not found")))
    }

    /// Validate a new user against the unique constraints without mutating.
    fn check_insert(&self, new_user: &NewUser) -> AppResult<Role> {
        let role = self.role(new_user.role_name())?;
        if self.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::duplicate_email());
        }
        if self.users.values().any(|u| u.username == new_user.username) {
            return Err(AppError::duplicate_username());
        }
        Ok(role)
    }

    fn insert(&mut self, new_user: &NewUser, role: Role) -> User {
        let id = self.next_id;
        self.next_id += 1;
        let user = User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            is_active: false,
            role,
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        user
    }
}

/// A [`UserDirectory`] and [`RoleStore`] held entirely in memory.
#[derive(Debug)]
pub struct MemoryUserDirectory {
    state: Mutex<State>,
}

impl MemoryUserDirectory {
    /// Create a directory seeded with the default roles.
    pub fn new() -> Self {
        Self::with_roles(Role::seeded())
    }

    /// Create a directory with a custom role table.
    pub fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                users: BTreeMap::new(),
                invitations: HashMap::new(),
                roles,
            }),
        }
    }

    /// Number of stored users, active or not.
    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    /// Number of pending invitations.
    pub async fn invitation_count(&self) -> usize {
        self.state.lock().await.invitations.len()
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserReader for MemoryUserDirectory {
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let state = self.state.lock().await;
        state
            .users
            .get(&id)
            .filter(|u| u.is_active)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        let state = self.state.lock().await;
        state
            .users
            .values()
            .find(|u| u.email == email && u.is_active)
            .cloned()
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let role = state.check_insert(new_user)?;
        Ok(state.insert(new_user, role))
    }

    async fn create_and_invite(
        &self,
        new_user: &NewUser,
        invitation_hash: &str,
        ttl: Duration,
    ) -> AppResult<User> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::validation(format!("Invalid invitation TTL: {e}")))?;

        let mut state = self.state.lock().await;
        let role = state.check_insert(new_user)?;
        if state.invitations.contains_key(invitation_hash) {
            return Err(AppError::conflict("Invitation already exists"));
        }

        let user = state.insert(new_user, role);
        state.invitations.insert(
            invitation_hash.to_string(),
            Invitation {
                token_hash: invitation_hash.to_string(),
                user_id: user.id,
                expiry: user.created_at + ttl,
            },
        );

        info!(user_id = user.id, "Created inactive user with pending invitation");
        Ok(user)
    }

    async fn activate(&self, plaintext_token: &str) -> AppResult<User> {
        let token_hash = hash_token(plaintext_token);
        let mut state = self.state.lock().await;

        let user_id = state
            .invitations
            .get(&token_hash)
            .filter(|inv| inv.is_redeemable_at(Utc::now()))
            .map(|inv| inv.user_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        let user = match state.users.get_mut(&user_id) {
            Some(user) => {
                user.is_active = true;
                user.clone()
            }
            None => return Err(AppError::not_found(format!("User {user_id} not found"))),
        };
        state.invitations.retain(|_, inv| inv.user_id != user_id);

        info!(user_id, "User activated");
        Ok(user)
    }

    async fn delete(&self, user_id: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.users.remove(&user_id).is_none() {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        state.invitations.retain(|_, inv| inv.user_id != user_id);

        debug!(user_id, "User deleted");
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryUserDirectory {
    async fn get_by_name(&self, name: &str) -> AppResult<Role> {
        self.state.lock().await.role(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialhub_core::error::ErrorKind;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_default_role_inactive() {
        let dir = MemoryUserDirectory::new();
        let user = dir.create(&new_user("alice", "alice@example.com")).await.unwrap();

        assert_eq!(user.id, 1);
        assert!(!user.is_active);
        assert_eq!(user.role.name, "user");
        assert!(dir.get_by_id(user.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found() {
        let dir = MemoryUserDirectory::new();
        let mut data = new_user("alice", "alice@example.com");
        data.role_name = Some("superuser".to_string());

        let err = dir.create(&data).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(dir.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let dir = MemoryUserDirectory::new();
        let first = dir.create(&new_user("a", "a@example.com")).await.unwrap();
        dir.delete(first.id).await.unwrap();
        let second = dir.create(&new_user("a", "a@example.com")).await.unwrap();
        assert!(second.id > first.id);
    }
}
