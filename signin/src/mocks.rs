//! Deterministic code generators for testing.

use crate::credentials::{CodeGenerator, Credential, MAX_PIN_LENGTH};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Always returns the same code, cut to the requested length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCodeGenerator {
    code: Credential,
}

impl FixedCodeGenerator {
    /// Generator returning `code`.
    #[must_use]
    pub const fn new(code: Credential) -> Self {
        Self { code }
    }
}

impl Default for FixedCodeGenerator {
    fn default() -> Self {
        Self::new(Credential::from_alphabet("7Q2K9X4M1B8Z".to_string()))
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self, length: usize) -> Credential {
        let length = length.clamp(1, self.code.len());
        Credential::from_alphabet(self.code.as_str()[..length].to_string())
    }
}

/// Returns `000000000001`, `000000000002`, ... cut to the requested length.
#[derive(Debug, Default)]
pub struct SequentialCodeGenerator {
    next: AtomicUsize,
}

impl SequentialCodeGenerator {
    /// Generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes handed out.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl CodeGenerator for SequentialCodeGenerator {
    fn generate(&self, length: usize) -> Credential {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        let padded = format!("{n:0>width$}", width = MAX_PIN_LENGTH);
        let length = length.clamp(1, MAX_PIN_LENGTH);
        Credential::from_alphabet(padded[padded.len() - length..].to_string())
    }
}
