//! MySQL repository implementations

mod code_repository_impl;
mod user_repository_impl;

pub use code_repository_impl::MySqlCodeRepository;
pub use user_repository_impl::MySqlUserRepository;
