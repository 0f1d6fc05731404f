//! Sealing files under a split key.
//!
//! Sealing draws a fresh 256-bit key, splits it into envelopes and encrypts
//! the file under it. Opening reconstructs the key from any threshold of
//! envelopes and decrypts. The key exists only for the duration of a call.

use core::fmt;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use crate::cipher::{ChaChaFileCipher, CipherError, CipherKey, FileCipher, KEY_LEN};
use crate::config::{ConfigError, VaultConfig};
use crate::core::PrimeField;
use crate::entropy::{EntropySource, OsEntropy};
use crate::mpc::envelope::reconstruct_from_envelopes;
use crate::mpc::quorum::split_secret;
use crate::mpc::{ShareEnvelope, SharingError};
use crate::storage::raw_files;
use crate::storage::StorageError;

/// Largest share file `read_share_files` accepts.
pub const MAX_SHARE_FILE_LEN: u64 = 64 * 1024;

/// Errors from vault operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    Config(ConfigError),
    Sharing(SharingError),
    Cipher(CipherError),
    Storage(StorageError),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::Config(err) => write!(f, "Configuration error: {}", err),
            VaultError::Sharing(err) => write!(f, "Sharing error: {}", err),
            VaultError::Cipher(err) => write!(f, "Cipher error: {}", err),
            VaultError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for VaultError {}

impl From<ConfigError> for VaultError {
    fn from(err: ConfigError) -> Self {
        VaultError::Config(err)
    }
}

impl From<SharingError> for VaultError {
    fn from(err: SharingError) -> Self {
        VaultError::Sharing(err)
    }
}

impl From<CipherError> for VaultError {
    fn from(err: CipherError) -> Self {
        VaultError::Cipher(err)
    }
}

impl From<StorageError> for VaultError {
    fn from(err: StorageError) -> Self {
        VaultError::Storage(err)
    }
}

/// Seals and opens files whose key is split among holders.
pub struct Vault<E: EntropySource, C: FileCipher> {
    config: VaultConfig,
    field: PrimeField,
    rng: E,
    cipher: C,
}

impl Vault<OsEntropy, ChaChaFileCipher<OsEntropy>> {
    /// Vault backed by the operating-system generator and ChaCha20-Poly1305.
    pub fn new(config: VaultConfig) -> Result<Self, VaultError> {
        Self::with_parts(config, OsEntropy::new(), ChaChaFileCipher::new(OsEntropy::new()))
    }
}

impl<E: EntropySource, C: FileCipher> Vault<E, C> {
    /// # Errors
    /// * `VaultError::Config` if the configuration is invalid or its field
    ///   cannot hold a 256-bit key.
    pub fn with_parts(config: VaultConfig, rng: E, cipher: C) -> Result<Self, VaultError> {
        config.validate((KEY_LEN as u64) * 8)?;
        let field = config.field.field();
        Ok(Self {
            config,
            field,
            rng,
            cipher,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// Encrypts `plaintext` into `ciphertext` under a fresh key and returns
    /// one envelope per holder.
    ///
    /// The key is split before anything is written, so a sharing failure
    /// never leaves behind a ciphertext nobody can open.
    pub fn seal(
        &mut self,
        plaintext: &mut dyn Read,
        ciphertext: &mut dyn Write,
    ) -> Result<Vec<ShareEnvelope>, VaultError> {
        let key = CipherKey::generate(&mut self.rng)?;
        let secret = key.to_secret(&self.field)?;
        let shares = split_secret(
            &self.field,
            &secret,
            self.config.threshold,
            self.config.share_count,
            &mut self.rng,
        )?;
        let envelopes = ShareEnvelope::wrap_all(&self.field, self.config.threshold, shares)?;

        let written = self.cipher.encrypt(plaintext, ciphertext, &key)?;
        log::info!(
            "Sealed {} bytes; key split {}-of-{}",
            written,
            self.config.threshold,
            self.config.share_count
        );
        Ok(envelopes)
    }

    /// Reconstructs the key from `envelopes` and decrypts `ciphertext` into
    /// `plaintext`. Envelopes must agree on threshold and field.
    pub fn open(
        &self,
        envelopes: &[ShareEnvelope],
        ciphertext: &mut dyn Read,
        plaintext: &mut dyn Write,
    ) -> Result<u64, VaultError> {
        let secret = reconstruct_from_envelopes(envelopes)?;
        let field = envelopes
            .first()
            .map(ShareEnvelope::field)
            .unwrap_or(&self.field);
        let key = CipherKey::from_secret(field, &secret)?;
        let written = self.cipher.decrypt(ciphertext, plaintext, &key)?;
        log::info!("Opened {} bytes from {} envelopes", written, envelopes.len());
        Ok(written)
    }

    /// Seals `path` into `<path><encrypted_extension>`, written atomically.
    /// Returns the sealed path and the envelopes.
    pub fn seal_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<(PathBuf, Vec<ShareEnvelope>), VaultError> {
        let path = path.as_ref();
        let plaintext = Zeroizing::new(raw_files::read_file(path)?);
        let mut sealed = Vec::new();
        let envelopes = self.seal(&mut &plaintext[..], &mut sealed)?;

        let target = with_suffix(path, &self.config.encrypted_extension);
        raw_files::write_atomic(&target, &sealed)?;
        log::debug!("Wrote sealed file {}", target.display());
        Ok((target, envelopes))
    }

    /// Opens a sealed file into `output`, written atomically.
    pub fn open_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        encrypted: P,
        output: Q,
        envelopes: &[ShareEnvelope],
    ) -> Result<(), VaultError> {
        let sealed = raw_files::read_file(encrypted)?;
        let mut plaintext = Zeroizing::new(Vec::new());
        self.open(envelopes, &mut &sealed[..], &mut *plaintext)?;
        raw_files::write_atomic(output, &plaintext)?;
        Ok(())
    }

    /// Writes one text envelope per file into `dir`, named
    /// `share-<x><share_extension>`. Returns the paths in envelope order.
    ///
    /// # Errors
    /// * `StorageError::AlreadyExists` if any target file is already present.
    ///   Nothing is written in that case.
    /// * Any write failure. Files written earlier in the same call are removed.
    pub fn write_share_files<P: AsRef<Path>>(
        &self,
        dir: P,
        envelopes: &[ShareEnvelope],
    ) -> Result<Vec<PathBuf>, VaultError> {
        let dir = dir.as_ref();
        let paths: Vec<PathBuf> = envelopes
            .iter()
            .map(|e| dir.join(format!("share-{}{}", e.x(), self.config.share_extension)))
            .collect();
        if let Some(taken) = paths.iter().find(|path| raw_files::exists(path)) {
            log::warn!("Refusing to overwrite share file {}", taken.display());
            return Err(StorageError::AlreadyExists.into());
        }

        for (i, (envelope, path)) in envelopes.iter().zip(&paths).enumerate() {
            let line = share_file_line(envelope);
            if let Err(err) = raw_files::write_atomic(path, line.as_bytes()) {
                log::error!("Failed to write share file {}: {}", path.display(), err);
                for written in &paths[..i] {
                    let _ = raw_files::delete(written);
                }
                return Err(err.into());
            }
        }
        log::debug!("Wrote {} share files to {}", paths.len(), dir.display());
        Ok(paths)
    }

    /// Reads envelopes written by [`Vault::write_share_files`].
    pub fn read_share_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<ShareEnvelope>, VaultError> {
        let mut envelopes = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = Zeroizing::new(raw_files::read_limited(path, MAX_SHARE_FILE_LEN)?);
            let text = core::str::from_utf8(&raw)
                .map_err(|_| SharingError::MalformedShare("share file is not UTF-8"))?;
            envelopes.push(ShareEnvelope::parse_text(&self.field, text)?);
        }
        Ok(envelopes)
    }
}

/// The envelope text plus a trailing newline, allocated once at its final
/// size so no unwiped copy of the share is left behind by a reallocation.
fn share_file_line(envelope: &ShareEnvelope) -> Zeroizing<String> {
    let text = envelope.to_text();
    let mut line = Zeroizing::new(String::with_capacity(text.len() + 1));
    line.push_str(&text);
    line.push('\n');
    line
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
