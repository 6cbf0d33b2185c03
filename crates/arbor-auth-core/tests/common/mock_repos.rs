//! Mock repositories for testing

use arbor_db::{CreateUser, DbError, DbResult, UpdateProfile, UserRepository, UserRow};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .users
            .iter()
            .find(|r| r.value().email == email)
            .map(|r| r.value().clone()))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let row = UserRow {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> DbResult<UserRow> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        user.email = profile.email;
        user.first_name = profile.first_name;
        user.last_name = profile.last_name;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
