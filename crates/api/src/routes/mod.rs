//! HTTP route handlers.

pub mod auth;
pub mod games;
pub mod groups;
pub mod health;
pub mod invites;
pub mod notifications;
pub mod parks;
pub mod scan;
pub mod users;
