//! Account key derivation
//!
//! The account password never leaves the client. PBKDF2 stretches it into
//! 96 bytes which are split three ways: the password the server sees, the
//! master key that wraps item keys, and the auth key used for envelope MACs.
//! Each item then gets its own random [`ItemKey`].

use std::fmt;
use std::num::NonZeroU32;

use rand::{rngs::OsRng, RngCore};
use ring::{digest, pbkdf2};
use zeroize::Zeroizing;

use crate::cipher::{generate_key, KEY_SIZE};
use crate::{CryptoError, Result};

const DERIVED_LEN: usize = KEY_SIZE * 3;
/// Encryption half followed by authentication half
pub const ITEM_KEY_SIZE: usize = KEY_SIZE * 2;

/// Master key + auth key. Both are zeroized on drop.
pub struct KeySet {
    master_key: Zeroizing<[u8; KEY_SIZE]>,
    auth_key: Zeroizing<[u8; KEY_SIZE]>,
}

impl KeySet {
    pub fn new(master_key: [u8; KEY_SIZE], auth_key: [u8; KEY_SIZE]) -> Self {
        Self {
            master_key: Zeroizing::new(master_key),
            auth_key: Zeroizing::new(auth_key),
        }
    }

    /// Fresh random keys, not tied to any account
    pub fn generate() -> Self {
        Self {
            master_key: generate_key(),
            auth_key: generate_key(),
        }
    }

    pub fn master_key(&self) -> &[u8] {
        &self.master_key[..]
    }

    pub fn auth_key(&self) -> &[u8] {
        &self.auth_key[..]
    }
}

impl Clone for KeySet {
    fn clone(&self) -> Self {
        Self::new(*self.master_key, *self.auth_key)
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("master_key", &"[redacted]")
            .field("auth_key", &"[redacted]")
            .finish()
    }
}

/// Random per-item key. The first half encrypts the item content, the
/// second half authenticates it. Stored on the server as a hex string
/// sealed under the account [`KeySet`].
pub struct ItemKey {
    bytes: Zeroizing<[u8; ITEM_KEY_SIZE]>,
}

impl ItemKey {
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; ITEM_KEY_SIZE]);
        OsRng.fill_bytes(&mut bytes[..]);
        Self { bytes }
    }

    pub fn encryption_key(&self) -> &[u8] {
        &self.bytes[..KEY_SIZE]
    }

    pub fn auth_key(&self) -> &[u8] {
        &self.bytes[KEY_SIZE..]
    }

    /// Lowercase hex, the plaintext of `enc_item_key`
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.bytes[..]))
    }

    pub fn from_hex(encoded: &[u8]) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; ITEM_KEY_SIZE]);
        hex::decode_to_slice(encoded, &mut bytes[..])
            .map_err(|e| CryptoError::MalformedEnvelope(format!("item key: {e}")))?;
        Ok(Self { bytes })
    }
}

impl fmt::Debug for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemKey([redacted])")
    }
}

/// Output of [`derive_keys`]
pub struct DerivedKeys {
    /// Hex string sent to the server in place of the real password
    pub server_password: Zeroizing<String>,
    pub keys: KeySet,
}

/// Salt for an account, computed from the server-provided auth params.
pub fn password_salt(identifier: &str, version: &str, cost: u32, nonce: &str) -> String {
    let input = format!("{identifier}:SN:{version}:{cost}:{nonce}");
    hex::encode(digest::digest(&digest::SHA256, input.as_bytes()))
}

/// Stretch `password` with PBKDF2-HMAC-SHA512 and split the result.
pub fn derive_keys(password: &str, salt: &str, cost: u32) -> Result<DerivedKeys> {
    let iterations = NonZeroU32::new(cost)
        .ok_or_else(|| CryptoError::KeyDerivation("iteration count must be non-zero".into()))?;

    let mut out = Zeroizing::new([0u8; DERIVED_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA512,
        iterations,
        salt.as_bytes(),
        password.as_bytes(),
        &mut out[..],
    );

    let (pw, rest) = out.split_at(KEY_SIZE);
    let (mk, ak) = rest.split_at(KEY_SIZE);

    let mut master_key = [0u8; KEY_SIZE];
    master_key.copy_from_slice(mk);
    let mut auth_key = [0u8; KEY_SIZE];
    auth_key.copy_from_slice(ak);

    let keys = KeySet::new(master_key, auth_key);
    zeroize::Zeroize::zeroize(&mut master_key);
    zeroize::Zeroize::zeroize(&mut auth_key);

    Ok(DerivedKeys {
        server_password: Zeroizing::new(hex::encode(pw)),
        keys,
    })
}
