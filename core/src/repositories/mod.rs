pub mod code;
pub mod user;

pub use code::{CodeRepository, MemoryCodeRepository};
pub use user::{MemoryUserRepository, UserRepository};
