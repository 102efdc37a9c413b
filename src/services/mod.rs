pub mod auth_service;
pub mod bracelet_service;
pub mod reading_service;
pub mod user_service;

pub use bracelet_service::*;
pub use reading_service::*;
pub use user_service::*;
