//! Sign-in environment.
//!
//! Dependencies injected into [`SignInReducer`](crate::reducer::SignInReducer).

use crate::config::SignInConfig;
use crate::credentials::{CodeGenerator, RandomCodeGenerator};

/// Sign-in environment.
///
/// # Type Parameters
///
/// - `G`: PIN code generator
#[derive(Debug, Clone)]
pub struct SignInEnvironment<G>
where
    G: CodeGenerator,
{
    /// URL, PIN length and host API level.
    pub config: SignInConfig,

    /// PIN code source.
    pub codes: G,
}

impl<G> SignInEnvironment<G>
where
    G: CodeGenerator,
{
    /// Create a new sign-in environment.
    #[must_use]
    pub const fn new(config: SignInConfig, codes: G) -> Self {
        Self { config, codes }
    }
}

impl SignInEnvironment<RandomCodeGenerator> {
    /// Environment with random PIN codes.
    #[must_use]
    pub const fn with_random_codes(config: SignInConfig) -> Self {
        Self::new(config, RandomCodeGenerator)
    }
}

impl Default for SignInEnvironment<RandomCodeGenerator> {
    fn default() -> Self {
        Self::with_random_codes(SignInConfig::default())
    }
}
