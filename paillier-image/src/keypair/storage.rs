//! On-disk key records.
//!
//! Binary records are the raw fields in host-native byte order with no header:
//! the public key is `n, g` (16 bytes), the private key is `lambda, mu, n` (24 bytes).

use crate::errors::{PaillierError, Result};
use crate::keypair::keys::{KeyPair, PrivateKey, PublicKey};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use std::io::Write;
use std::path::{Path, PathBuf};

pub const PUBLIC_KEY_FILE: &str = "Paillier_public_key.bin";
pub const PRIVATE_KEY_FILE: &str = "Paillier_private_key.bin";

pub const PUBLIC_KEY_LEN: usize = 16;
pub const PRIVATE_KEY_LEN: usize = 24;

/// Either half of a key pair, as loaded from storage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Key {
    Public(PublicKey),
    Private(PrivateKey),
}

impl PublicKey {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<NativeEndian>(self.n)?;
        writer.write_u64::<NativeEndian>(self.g)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(PUBLIC_KEY_LEN);
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = record(bytes, PUBLIC_KEY_LEN, "public key")?;
        let n = reader.read_u64::<NativeEndian>()?;
        let g = reader.read_u64::<NativeEndian>()?;
        PublicKey::try_with(n, g)
    }
}

impl PrivateKey {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<NativeEndian>(self.lambda)?;
        writer.write_u64::<NativeEndian>(self.mu)?;
        writer.write_u64::<NativeEndian>(self.n)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(PRIVATE_KEY_LEN);
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = record(bytes, PRIVATE_KEY_LEN, "private key")?;
        let lambda = reader.read_u64::<NativeEndian>()?;
        let mu = reader.read_u64::<NativeEndian>()?;
        let n = reader.read_u64::<NativeEndian>()?;
        PrivateKey::try_with(lambda, mu, n)
    }
}

/// Decodes a binary key record.
///
/// # Example
///
/// ```
/// # use paillier_image::keypair::{Key, PublicKey, load_key};
/// let key = PublicKey::try_with(143, 144).unwrap();
/// let loaded = load_key(&key.to_bytes().unwrap(), true).unwrap();
/// assert_eq!(loaded, Key::Public(key));
/// ```
pub fn load_key(bytes: &[u8], is_public: bool) -> Result<Key> {
    if is_public {
        Ok(Key::Public(PublicKey::from_bytes(bytes)?))
    } else {
        Ok(Key::Private(PrivateKey::from_bytes(bytes)?))
    }
}

pub fn load_key_file(path: impl AsRef<Path>, is_public: bool) -> Result<Key> {
    let bytes = std::fs::read(path)?;
    load_key(&bytes, is_public)
}

impl KeyPair {
    /// Writes both binary records into `dir`, returning `(public, private)` paths.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        let public_path = dir.join(PUBLIC_KEY_FILE);
        let private_path = dir.join(PRIVATE_KEY_FILE);

        std::fs::write(&private_path, self.private_key.to_bytes()?)?;
        std::fs::write(&public_path, self.public_key.to_bytes()?)?;
        log::debug!(
            "keys written to {} and {}",
            public_path.display(),
            private_path.display()
        );

        Ok((public_path, private_path))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a JSON export and re-validates both halves.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: KeyPair = serde_json::from_str(json)?;
        if raw.public_key.n != raw.private_key.n {
            return Err(PaillierError::InvalidKeyData(format!(
                "public n = {} differs from private n = {}",
                raw.public_key.n, raw.private_key.n
            )));
        }

        Ok(Self {
            public_key: PublicKey::try_with(raw.public_key.n, raw.public_key.g)?,
            private_key: PrivateKey::try_with(
                raw.private_key.lambda,
                raw.private_key.mu,
                raw.private_key.n,
            )?,
        })
    }
}

fn record<'a>(bytes: &'a [u8], len: usize, what: &str) -> Result<&'a [u8]> {
    if bytes.len() != len {
        return Err(PaillierError::InvalidKeyData(format!(
            "{} record must be {} bytes, got {}",
            what,
            len,
            bytes.len()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_layout() -> Result<()> {
        let public_key = PublicKey::try_with(3233, 6497)?;
        let bytes = public_key.to_bytes()?;
        assert_eq!(&bytes[..8], &3233u64.to_ne_bytes());
        assert_eq!(&bytes[8..], &6497u64.to_ne_bytes());

        let private_key = PrivateKey::try_with(780, 1197, 3233)?;
        let bytes = private_key.to_bytes()?;
        assert_eq!(bytes.len(), PRIVATE_KEY_LEN);
        assert_eq!(load_key(&bytes, false)?, Key::Private(private_key));
        Ok(())
    }

    #[test]
    fn test_truncated_or_invalid_records() {
        assert!(load_key(&[0u8; 15], true).is_err());
        assert!(load_key(&[0u8; 16], true).is_err());
        assert!(load_key(&[0u8; 25], false).is_err());

        let zero_mu = [780u64.to_ne_bytes(), 0u64.to_ne_bytes(), 3233u64.to_ne_bytes()].concat();
        assert!(matches!(
            load_key(&zero_mu, false),
            Err(PaillierError::InvalidKeyData(_))
        ));
    }

    #[test]
    fn test_key_files_in_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let pair = KeyPair {
            public_key: PublicKey::try_with(3233, 6497)?,
            private_key: PrivateKey::try_with(780, 1197, 3233)?,
        };

        let (public_path, private_path) = pair.save_to_dir(dir.path())?;
        assert_eq!(public_path, dir.path().join(PUBLIC_KEY_FILE));
        assert_eq!(private_path, dir.path().join(PRIVATE_KEY_FILE));
        assert_eq!(std::fs::metadata(&public_path)?.len(), PUBLIC_KEY_LEN as u64);
        assert_eq!(std::fs::metadata(&private_path)?.len(), PRIVATE_KEY_LEN as u64);

        assert_eq!(load_key_file(&public_path, true)?, Key::Public(pair.public_key));
        assert_eq!(load_key_file(&private_path, false)?, Key::Private(pair.private_key));
        assert!(load_key_file(&public_path, false).is_err());
        assert!(matches!(
            load_key_file(dir.path().join("missing.bin"), true),
            Err(PaillierError::Io(_))
        ));
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> Result<()> {
        let pair = KeyPair {
            public_key: PublicKey::try_with(143, 144)?,
            private_key: PrivateKey::try_with(60, 31, 143)?,
        };
        let json = pair.to_json()?;
        assert_eq!(KeyPair::from_json(&json)?, pair);

        let mismatched = json.replacen("143", "221", 1);
        assert!(KeyPair::from_json(&mismatched).is_err());
        Ok(())
    }
}
