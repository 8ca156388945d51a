/// Segment encryption for everything the transport puts on storage.
///
/// A segment is one XChaCha20-Poly1305 ciphertext framed as
/// `nonce (24) | ciphertext length (u32 BE) | ciphertext`.
/// The key is derived from the user's main secret with HKDF-SHA256.
use std::io::{Read, Write};

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{Result, VaultTransportError};

/// HKDF info string for domain separation.
const HKDF_INFO: &[u8] = b"vault-transport-segment-xchacha20poly1305-v1";

const NONCE_LEN: usize = 24;

/// Poly1305 authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Largest plaintext accepted in a single segment.
pub const MAX_SEGMENT_LENGTH: usize = 1024 * 1024;

/// Authenticated encryption of framed segments.
pub trait Crypto {
    /// Encrypt `plaintext` and write it as one segment to `out`.
    fn encrypt_segment(&self, out: &mut dyn Write, plaintext: &[u8]) -> Result<()>;

    /// Read one segment from `input` and return its plaintext.
    fn decrypt_segment(&self, input: &mut dyn Read) -> Result<Vec<u8>>;
}

/// [`Crypto`] backed by a key derived from the main secret.
pub struct CryptoImpl {
    cipher: XChaCha20Poly1305,
}

impl CryptoImpl {
    pub fn new(main_secret: &[u8]) -> Self {
        let key = derive_key(main_secret);
        Self {
            cipher: XChaCha20Poly1305::new(&key.into()),
        }
    }
}

/// Derive a 32-byte segment key using HKDF-SHA256.
fn derive_key(main_secret: &[u8]) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(None, main_secret);
    let mut key = [0u8; 32];
    hkdf.expand(HKDF_INFO, &mut key)
        .expect("HKDF-SHA256 expand to 32 bytes always succeeds");
    key
}

impl Crypto for CryptoImpl {
    fn encrypt_segment(&self, out: &mut dyn Write, plaintext: &[u8]) -> Result<()> {
        use chacha20poly1305::aead::rand_core::{OsRng, RngCore};

        if plaintext.len() > MAX_SEGMENT_LENGTH {
            return Err(VaultTransportError::Crypto(format!(
                "segment too large: {} bytes (max {MAX_SEGMENT_LENGTH})",
                plaintext.len()
            )));
        }

        // Random 24-byte nonce (safe for random generation with XChaCha20)
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = XNonce::from(nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| VaultTransportError::Crypto(format!("encryption failed: {e}")))?;

        out.write_all(&nonce_bytes)?;
        out.write_all(&(ciphertext.len() as u32).to_be_bytes())?;
        out.write_all(&ciphertext)?;
        Ok(())
    }

    fn decrypt_segment(&self, input: &mut dyn Read) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        input.read_exact(&mut nonce_bytes)?;

        let mut len_bytes = [0u8; 4];
        input.read_exact(&mut len_bytes)?;
        let len = u32::from_be_bytes(len_bytes) as usize;
        if len < TAG_LEN || len > MAX_SEGMENT_LENGTH + TAG_LEN {
            return Err(VaultTransportError::Crypto(format!(
                "invalid segment length: {len}"
            )));
        }

        let mut ciphertext = vec![0u8; len];
        input.read_exact(&mut ciphertext)?;

        let nonce = XNonce::from(nonce_bytes);
        self.cipher
            .decrypt(&nonce, ciphertext.as_ref())
            .map_err(|_| VaultTransportError::Crypto("decryption failed: authentication error".into()))
    }
}
