//! The system cryptographic library, as seen by the probe.
//!
//! Digests and ciphers come from OpenSSL. Whether an algorithm is available
//! is whatever the library answers: in FIPS mode it refuses to initialise
//! non-approved algorithms. The mode flag is read separately, through a
//! [`ModeSource`], so the probe can compare the two.

use std::fmt;
use std::path::PathBuf;

use openssl::hash::{Hasher, MessageDigest};
use openssl::nid::Nid;
use openssl::symm::{Cipher, Crypter, Mode};
use tracing::debug;

use crate::config::{self, FipsMode};
use crate::{Error, Result};

/// Digest algorithms the probe exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Md5,
}

impl HashAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Md5 => "md5",
        }
    }

    fn message_digest(self) -> MessageDigest {
        match self {
            HashAlgorithm::Sha256 => MessageDigest::sha256(),
            HashAlgorithm::Md5 => MessageDigest::md5(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Block cipher modes the probe exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherAlgorithm {
    /// AES-256 in CBC mode.
    Aes256Cbc,
    /// Two-key triple DES (EDE) in CBC mode.
    TdesEde2Cbc,
}

impl CipherAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            CipherAlgorithm::Aes256Cbc => "aes-256-cbc",
            CipherAlgorithm::TdesEde2Cbc => "des-ede-cbc",
        }
    }

    pub fn key_len(self) -> usize {
        match self {
            CipherAlgorithm::Aes256Cbc => 32,
            CipherAlgorithm::TdesEde2Cbc => 16,
        }
    }

    pub fn iv_len(self) -> usize {
        match self {
            CipherAlgorithm::Aes256Cbc => 16,
            CipherAlgorithm::TdesEde2Cbc => 8,
        }
    }

    fn cipher(self) -> Result<Cipher> {
        match self {
            CipherAlgorithm::Aes256Cbc => Ok(Cipher::aes_256_cbc()),
            CipherAlgorithm::TdesEde2Cbc => Cipher::from_nid(Nid::DES_EDE_CBC)
                .ok_or_else(|| Error::Crypto(format!("{self} is not provided by the library"))),
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A keyed CBC encryptor, initialised by the library and ready to run.
pub struct Encryptor {
    algorithm: CipherAlgorithm,
    block_size: usize,
    crypter: Crypter,
}

impl Encryptor {
    /// Initialise `cipher` for encryption. Fails when the key or IV has the
    /// wrong length, or when the library refuses the algorithm.
    pub fn new(cipher: CipherAlgorithm, key: &[u8], iv: &[u8]) -> Result<Self> {
        if key.len() != cipher.key_len() || iv.len() != cipher.iv_len() {
            return Err(Error::Crypto(format!(
                "{cipher} needs a {}-byte key and a {}-byte IV",
                cipher.key_len(),
                cipher.iv_len()
            )));
        }
        let evp = cipher.cipher()?;
        let crypter = Crypter::new(evp, Mode::Encrypt, key, Some(iv))?;
        Ok(Self {
            algorithm: cipher,
            block_size: evp.block_size(),
            crypter,
        })
    }

    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Encrypt `plaintext` with PKCS#7 padding.
    pub fn encrypt(mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; plaintext.len() + self.block_size];
        let mut written = self.crypter.update(plaintext, &mut out)?;
        written += self.crypter.finalize(&mut out[written..])?;
        out.truncate(written);
        Ok(out)
    }
}

impl fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Encryptor").field(&self.algorithm).finish()
    }
}

/// Hash `data` with the library's implementation of `algorithm`.
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
    let mut hasher = Hasher::new(algorithm.message_digest())?;
    hasher.update(data)?;
    Ok(hasher.finish()?.to_vec())
}

/// A cryptographic library and the FIPS mode flag it is expected to follow.
///
/// `digest` and `encryptor` report what the library actually allows; they
/// never consult the flag. The probe samples [`fips_mode`](Provider::fips_mode)
/// once per run and compares.
pub trait Provider: Send + Sync {
    /// Current mode flag.
    fn fips_mode(&self) -> bool;

    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>>;

    fn encryptor(&self, cipher: CipherAlgorithm, key: &[u8], iv: &[u8]) -> Result<Encryptor>;
}

/// Where the mode flag is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSource {
    /// Kernel flag file; `1` means restricted. The system OpenSSL enters
    /// FIPS mode from the same flag.
    Kernel(PathBuf),
    Fixed(bool),
}

impl ModeSource {
    pub fn from_config(cfg: &config::Fips) -> Self {
        match cfg.mode {
            FipsMode::System => ModeSource::Kernel(cfg.flag_path.clone()),
            FipsMode::Enabled => ModeSource::Fixed(true),
            FipsMode::Disabled => ModeSource::Fixed(false),
        }
    }

    pub fn sample(&self) -> bool {
        match self {
            ModeSource::Fixed(enabled) => *enabled,
            ModeSource::Kernel(path) => match std::fs::read_to_string(path) {
                Ok(content) => content.trim() == "1",
                Err(e) => {
                    debug!(path = %path.display(), "FIPS flag unreadable, assuming disabled: {e}");
                    false
                }
            },
        }
    }
}

/// The system OpenSSL, checked against a [`ModeSource`].
#[derive(Debug, Clone)]
pub struct SystemProvider {
    mode: ModeSource,
}

impl SystemProvider {
    pub fn new(mode: ModeSource) -> Self {
        Self { mode }
    }

    pub fn from_config(cfg: &config::Fips) -> Self {
        Self::new(ModeSource::from_config(cfg))
    }
}

impl Provider for SystemProvider {
    fn fips_mode(&self) -> bool {
        self.mode.sample()
    }

    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
        digest(algorithm, data)
    }

    fn encryptor(&self, cipher: CipherAlgorithm, key: &[u8], iv: &[u8]) -> Result<Encryptor> {
        Encryptor::new(cipher, key, iv)
    }
}
