pub mod task;
pub mod user;
pub mod criteria;
pub mod dataset;
pub mod store;
pub mod config;

pub use task::*;
pub use user::*;
pub use criteria::*;
pub use dataset::*;
pub use store::*;
pub use config::*;
