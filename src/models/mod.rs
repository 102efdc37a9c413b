pub mod bracelet;
pub mod reading;
pub mod user;

pub use bracelet::*;
pub use reading::*;
pub use user::*;
