pub mod bucket;
pub mod error;
pub mod policy;
pub mod store;
pub mod sweeper;
pub mod tiers;
mod time;

pub use error::RateLimitError;
pub use policy::RateLimitPolicy;
pub use store::MemoryStore;
pub use store::RateLimitBackend;
pub use store::RateLimitResult;
pub use sweeper::Sweeper;
