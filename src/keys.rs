use crate::error::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::path::{Path, PathBuf};

/// Public-key renderings of a freshly generated keypair.
///
/// The private seed never leaves the secret file.
#[derive(Debug)]
pub struct GeneratedKeys {
    pub public_b64: String,
    pub public_hex: String,
    pub public_pem: String,
    pub secret_path: PathBuf,
    pub key_path: Option<PathBuf>,
}

/// Generate an Ed25519 signing keypair for the trading API.
///
/// The base64-encoded 32-byte seed is written to `secret_path` (parent
/// directories created as needed); the API key, when given, is written to
/// `key_path`. Returns the public key in the formats the broker's
/// developer UI accepts.
pub fn generate_keys(
    secret_path: &Path,
    api_key: Option<&str>,
    key_path: &Path,
) -> Result<GeneratedKeys> {
    let signing_key = SigningKey::generate(&mut OsRng);
    let seed = signing_key.to_bytes();
    let public = signing_key.verifying_key().to_bytes();

    let public_b64 = BASE64.encode(public);

    make_dir_for_file(secret_path)?;
    std::fs::write(secret_path, BASE64.encode(seed))?;

    let key_path_written = match api_key {
        Some(key) => {
            make_dir_for_file(key_path)?;
            std::fs::write(key_path, key.trim())?;
            Some(key_path.to_path_buf())
        }
        None => None,
    };

    Ok(GeneratedKeys {
        public_hex: hex::encode(public),
        public_pem: pem_wrap(&public_b64),
        public_b64,
        secret_path: secret_path.to_path_buf(),
        key_path: key_path_written,
    })
}

fn make_dir_for_file(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// Minimal PEM-style wrapper around a base64 public key, 64 chars per line.
fn pem_wrap(b64: &str) -> String {
    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    for chunk in b64.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----\n");
    pem
}
