//! Verification code generation

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::verification_code::{MAX_CODE_VALUE, MIN_CODE_VALUE};

/// Source of fresh verification codes
pub trait CodeGenerator: Send + Sync {
    /// Produce a six-digit code; no uniqueness guarantee
    fn generate(&self) -> String;
}

/// Uniform codes in `100000..=999999` from the OS CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        OsRng.gen_range(MIN_CODE_VALUE..=MAX_CODE_VALUE).to_string()
    }
}
