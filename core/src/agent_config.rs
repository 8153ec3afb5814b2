//! `AgentConfigAlias` weighted version resolution and `VirtualKey` secrets.
//!
//! CRUD for these records (create/list/revoke) is an out-of-scope collaborator; this
//! module covers only the resolution/format logic the Agent Builder needs: drawing a
//! version from a weighted alias, and parsing/minting/verifying the `sk-uno-...` secret
//! format.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SECRET_PREFIX: &str = "sk-uno-";
const SECRET_BYTES: usize = 32;

/// `(name, agent_id, version1, version2?, weight?)`: resolves to `version1` unconditionally
/// unless `version2` is set, in which case `weight` (0-100) is the percent chance of
/// drawing `version1`.
#[derive(Clone, Debug)]
pub struct AgentConfigAlias {
    pub name: String,
    pub agent_id: String,
    pub version1: u32,
    pub version2: Option<u32>,
    pub weight: Option<u8>,
}

impl AgentConfigAlias {
    /// Draws a version using a fresh random percentile. Over many calls the fraction
    /// resolving to `version1` converges to `weight/100`.
    pub fn resolve(&self) -> u32 {
        let draw = (rand::random::<u8>() as u16 * 100 / 256) as u8;
        self.resolve_with_draw(draw)
    }

    /// Resolves given an explicit `draw` in `[0,100)`, for deterministic testing.
    pub fn resolve_with_draw(&self, draw: u8) -> u32 {
        let Some(version2) = self.version2 else {
            return self.version1;
        };
        let weight = self.weight.unwrap_or(100);
        if draw < weight {
            self.version1
        } else {
            version2
        }
    }
}

/// `(unit, limit)`: a rate limit window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitUnit {
    OneMinute,
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
    OneWeek,
    OneMonth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub unit: RateLimitUnit,
    pub limit: u32,
}

/// A minted virtual key secret plus the record it authorizes. The plaintext secret is
/// only ever available at mint time; `secret_hash` is what's persisted and compared
/// against on lookup.
pub struct MintedVirtualKey {
    pub record: VirtualKey,
    pub secret: String,
}

/// Associates a `sk-uno-...` secret (stored as a SHA-256 hash, never in plaintext) with
/// the providers/models it may call and optional rate limits.
#[derive(Clone, Debug)]
pub struct VirtualKey {
    pub secret_hash: [u8; 32],
    pub providers: Vec<String>,
    pub allowed_models: Vec<String>,
    pub rate_limits: Vec<RateLimit>,
}

#[derive(Debug, thiserror::Error)]
pub enum VirtualKeyError {
    #[error("virtual key must start with \"sk-uno-\"")]
    BadPrefix,
    #[error("virtual key payload is not valid base64url")]
    BadEncoding,
    #[error("virtual key payload must decode to {SECRET_BYTES} bytes")]
    BadLength,
}

fn hash_secret(secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

impl VirtualKey {
    /// Mints a fresh secret and the record that authorizes it.
    pub fn generate(providers: Vec<String>, allowed_models: Vec<String>, rate_limits: Vec<RateLimit>) -> MintedVirtualKey {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let secret = format!("{SECRET_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes));
        let record = VirtualKey {
            secret_hash: hash_secret(&secret),
            providers,
            allowed_models,
            rate_limits,
        };
        MintedVirtualKey { record, secret }
    }

    /// Validates wire format without needing the stored record: prefix present, payload
    /// is base64url-no-pad, and decodes to exactly 32 bytes.
    pub fn validate_format(secret: &str) -> Result<(), VirtualKeyError> {
        let payload = secret
            .strip_prefix(SECRET_PREFIX)
            .ok_or(VirtualKeyError::BadPrefix)?;
        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| VirtualKeyError::BadEncoding)?;
        if decoded.len() != SECRET_BYTES {
            return Err(VirtualKeyError::BadLength);
        }
        Ok(())
    }

    /// Constant-time comparison against this record's stored hash, so a caller probing
    /// `x-virtual-key` can't time out which prefix bytes matched.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate_hash = hash_secret(candidate);
        self.secret_hash[..].ct_eq(&candidate_hash[..]).into()
    }

    pub fn allows_model(&self, model: &str) -> bool {
        self.allowed_models.iter().any(|m| m == model)
    }
}
