//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AppUser;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Builds the domain user from this row and its relation sets.
    pub fn into_app_user(self, friend_ids: Vec<Uuid>, blocked_user_ids: Vec<Uuid>) -> AppUser {
        AppUser {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            friend_ids: friend_ids.into_iter().collect(),
            blocked_user_ids: blocked_user_ids.into_iter().collect(),
            is_admin: self.is_admin,
        }
    }
}
