pub mod auth;
pub mod bracelets;
pub mod health;
pub mod metrics;
pub mod readings;
pub mod swagger;
pub mod users;
