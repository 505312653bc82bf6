//! The capability probe: checks that algorithm availability matches the
//! provider's FIPS mode flag.
//!
//! | Algorithm     | FIPS off | FIPS on  |
//! |---------------|----------|----------|
//! | SHA-256       | succeeds | succeeds |
//! | MD5           | succeeds | fails    |
//! | AES-256-CBC   | succeeds | succeeds |
//! | 3DES (2-key)  | succeeds | fails    |
//!
//! Any other outcome is a [`Violation`].

use rand::RngCore;
use rand::rngs::OsRng;
use tracing::debug;

use super::provider::{CipherAlgorithm, HashAlgorithm, Provider};

pub const HASH_VERIFIED: &str = "Hash generation successfully verified";
pub const CIPHER_VERIFIED: &str = "Cipher generation successfully verified";

const SHA256_INPUT: &[u8] = b"FIPS test";
const MD5_INPUT: &[u8] = b"MD5 test";
const AES_PLAINTEXT: &[u8] = b"Test of AES encryption.";

/// Algorithm availability that contradicts the mode flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{algorithm} generation should be supported with or without FIPS mode: {reason}")]
    Required {
        algorithm: &'static str,
        reason: String,
    },

    #[error("{algorithm} generation should not succeed with FIPS mode enabled")]
    NotRestricted { algorithm: &'static str },

    #[error("{algorithm} generation should succeed without FIPS mode: {reason}")]
    Unavailable {
        algorithm: &'static str,
        reason: String,
    },
}

impl Violation {
    pub fn algorithm(&self) -> &'static str {
        match self {
            Violation::Required { algorithm, .. }
            | Violation::NotRestricted { algorithm }
            | Violation::Unavailable { algorithm, .. } => algorithm,
        }
    }
}

/// Outcome of a passing probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Mode flag the run was checked against.
    pub fips_mode: bool,
}

/// Sample the mode flag once, run both checks, and append a confirmation
/// line to `out` after each one passes.
pub fn run(provider: &dyn Provider, out: &mut String) -> Result<Report, Violation> {
    let fips_mode = provider.fips_mode();
    debug!(fips_mode, "running FIPS capability probe");

    verify_hash(provider, fips_mode)?;
    out.push_str(HASH_VERIFIED);
    out.push('\n');

    verify_ciphers(provider, fips_mode)?;
    out.push_str(CIPHER_VERIFIED);
    out.push('\n');

    Ok(Report { fips_mode })
}

/// SHA-256 must always work; MD5 must work exactly when FIPS is off.
pub fn verify_hash(provider: &dyn Provider, fips_mode: bool) -> Result<(), Violation> {
    required(
        HashAlgorithm::Sha256.name(),
        provider.digest(HashAlgorithm::Sha256, SHA256_INPUT),
    )?;
    gated(
        HashAlgorithm::Md5.name(),
        provider.digest(HashAlgorithm::Md5, MD5_INPUT),
        fips_mode,
    )
}

/// AES-256-CBC must always work; two-key 3DES-CBC setup must work exactly
/// when FIPS is off. Key material is fresh on every call.
pub fn verify_ciphers(provider: &dyn Provider, fips_mode: bool) -> Result<(), Violation> {
    let aes = CipherAlgorithm::Aes256Cbc;
    let (key, iv) = key_material(aes);
    let encryptor = required(aes.name(), provider.encryptor(aes, &key, &iv))?;
    required(aes.name(), encryptor.encrypt(AES_PLAINTEXT))?;

    let tdes = CipherAlgorithm::TdesEde2Cbc;
    let (key, iv) = key_material(tdes);
    gated(tdes.name(), provider.encryptor(tdes, &key, &iv), fips_mode)
}

fn required<T>(algorithm: &'static str, result: crate::Result<T>) -> Result<T, Violation> {
    result.map_err(|e| Violation::Required {
        algorithm,
        reason: e.to_string(),
    })
}

fn gated<T>(
    algorithm: &'static str,
    result: crate::Result<T>,
    fips_mode: bool,
) -> Result<(), Violation> {
    match (result, fips_mode) {
        (Ok(_), true) => Err(Violation::NotRestricted { algorithm }),
        (Err(e), false) => Err(Violation::Unavailable {
            algorithm,
            reason: e.to_string(),
        }),
        (Ok(_), false) | (Err(_), true) => Ok(()),
    }
}

fn key_material(cipher: CipherAlgorithm) -> (Vec<u8>, Vec<u8>) {
    let mut key = vec![0u8; cipher.key_len()];
    let mut iv = vec![0u8; cipher.iv_len()];
    OsRng.fill_bytes(&mut key);
    OsRng.fill_bytes(&mut iv);
    (key, iv)
}
