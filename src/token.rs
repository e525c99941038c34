//! Opaque session tokens handed out on login and presented as bearer
//! credentials on every todo request.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose, Engine};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::AppError;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate(rng: &SystemRandom) -> Result<Self, AppError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rng.fill(&mut bytes)
            .map_err(|_| AppError::Internal("system randomness unavailable".to_string()))?;

        Ok(Self(general_purpose::URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionToken {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = general_purpose::URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| AppError::Unauthenticated)?;
        if decoded.len() != TOKEN_BYTES {
            return Err(AppError::Unauthenticated);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_parse_back() {
        let rng = SystemRandom::new();
        let token = SessionToken::generate(&rng).unwrap();
        assert_eq!(token.as_str().len(), 43);

        let parsed: SessionToken = token.as_str().parse().unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn generated_tokens_differ() {
        let rng = SystemRandom::new();
        let a = SessionToken::generate(&rng).unwrap();
        let b = SessionToken::generate(&rng).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_tokens() {
        let too_long = "A".repeat(44);
        for raw in ["", "1", "not a token", "c2hvcnQ", too_long.as_str()] {
            assert!(
                matches!(raw.parse::<SessionToken>(), Err(AppError::Unauthenticated)),
                "accepted {raw:?}"
            );
        }
    }
}
