pub mod models;
pub mod enums;
pub mod context;

pub use models::*;
pub use enums::*;
pub use context::*;
