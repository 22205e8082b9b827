//! Domain entities representing core business objects.

pub mod user;
pub mod verification_code;

// Re-export commonly used types
pub use user::{User, UserStatus};
pub use verification_code::{
    code_ttl, CodeId, VerificationCode, CODE_LENGTH, CODE_TTL_MINUTES, MAX_CODE_VALUE,
    MIN_CODE_VALUE,
};
