//! ChaCha20-Poly1305 file cipher.
//!
//! File layout: `"SSVE" || nonce (12) || ciphertext || tag (16)`. The magic
//! and nonce are bound as associated data. The whole file is processed in
//! memory, capped at [`MAX_PLAINTEXT_LEN`].

use std::io::{Read, Write};

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::Zeroizing;

use super::{CipherError, CipherKey, FileCipher};
use crate::entropy::{require_full_entropy, EntropySource};

pub const FILE_MAGIC: &[u8; 4] = b"SSVE";
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 4 + NONCE_LEN;

/// Largest plaintext accepted (1 GiB).
pub const MAX_PLAINTEXT_LEN: u64 = 1024 * 1024 * 1024;

/// ChaCha20-Poly1305 with a random nonce per file.
#[derive(Debug)]
pub struct ChaChaFileCipher<E: EntropySource> {
    rng: E,
}

impl<E: EntropySource> ChaChaFileCipher<E> {
    pub fn new(rng: E) -> Self {
        Self { rng }
    }
}

fn read_capped(input: &mut dyn Read, max: u64) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let mut buffer = Zeroizing::new(Vec::new());
    input.take(max.saturating_add(1)).read_to_end(&mut buffer)?;
    if buffer.len() as u64 > max {
        return Err(CipherError::TooLarge);
    }
    Ok(buffer)
}

impl<E: EntropySource> FileCipher for ChaChaFileCipher<E> {
    fn encrypt(
        &mut self,
        plaintext: &mut dyn Read,
        ciphertext: &mut dyn Write,
        key: &CipherKey,
    ) -> Result<u64, CipherError> {
        let message = read_capped(plaintext, MAX_PLAINTEXT_LEN)?;

        require_full_entropy(&self.rng)?;
        let mut header = [0u8; HEADER_LEN];
        header[..4].copy_from_slice(FILE_MAGIC);
        self.rng.fill(&mut header[4..])?;

        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        let nonce = Nonce::from_slice(&header[4..]);
        let sealed = cipher
            .encrypt(nonce, Payload { msg: &message, aad: &header })
            .map_err(|_| CipherError::AuthenticationFailed)?;

        ciphertext.write_all(&header)?;
        ciphertext.write_all(&sealed)?;
        ciphertext.flush()?;
        Ok((HEADER_LEN + sealed.len()) as u64)
    }

    fn decrypt(
        &self,
        ciphertext: &mut dyn Read,
        plaintext: &mut dyn Write,
        key: &CipherKey,
    ) -> Result<u64, CipherError> {
        let limit = MAX_PLAINTEXT_LEN + (HEADER_LEN + TAG_LEN) as u64;
        let content = read_capped(ciphertext, limit)?;
        if content.len() < HEADER_LEN + TAG_LEN || &content[..4] != FILE_MAGIC {
            return Err(CipherError::BadHeader);
        }

        let (header, sealed) = content.split_at(HEADER_LEN);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        let nonce = Nonce::from_slice(&header[4..]);
        let message = Zeroizing::new(
            cipher
                .decrypt(nonce, Payload { msg: sealed, aad: header })
                .map_err(|_| {
                    log::warn!("Ciphertext failed authentication");
                    CipherError::AuthenticationFailed
                })?,
        );

        plaintext.write_all(&message)?;
        plaintext.flush()?;
        Ok(message.len() as u64)
    }
}
