pub mod config;
pub mod error;
pub mod events;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::HivelyError;
pub use events::*;
pub use store::{CommunityState, PrimaryStore, StoreResult};
pub use types::*;
