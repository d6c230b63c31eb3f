pub mod ids;
pub mod list;
pub mod models;

pub use ids::*;
pub use list::*;
pub use models::*;
