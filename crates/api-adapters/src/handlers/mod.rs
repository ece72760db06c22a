//! Request handlers, grouped the way the routes are.

pub mod admin;
pub mod answers;
pub mod auth;
pub mod notifications;
pub mod questions;
pub mod tags;
