//! SSH key provisioning
//!
//! Each fleet run gets a fresh 2048-bit RSA key pair. The private half is
//! written as a PKCS#1 PEM file readable by the owner only, the public half
//! as an OpenSSH `authorized_keys` line, and the public half is registered
//! with the provider so new machines trust it.

use crate::error::{CloudError, Result};
use crate::provider::ComputeProvider;
use rsa::RsaPrivateKey;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use ssh_key::public::{KeyData, RsaPublicKey as SshRsaPublicKey};
use ssh_key::{HashAlg, PublicKey};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const KEY_BITS: usize = 2048;
pub const PRIVATE_KEY_FILE: &str = "id_rsa";
pub const PUBLIC_KEY_FILE: &str = "id_rsa.pub";

const PRIVATE_KEY_MODE: u32 = 0o600;
const PUBLIC_KEY_MODE: u32 = 0o644;

/// A freshly generated key pair, encoded and ready to be written
pub struct KeyPair {
    private_pem: String,
    public_openssh: String,
    fingerprint: String,
}

impl KeyPair {
    /// Generate a new RSA key pair. CPU bound; call from a blocking context.
    pub fn generate(comment: &str) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, KEY_BITS)
            .map_err(|e| CloudError::KeyGeneration(format!("RSA generation: {}", e)))?;

        let pem = private
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CloudError::KeyGeneration(format!("PEM encoding: {}", e)))?;

        let key_data = SshRsaPublicKey::try_from(&private.to_public_key())
            .map_err(|e| CloudError::KeyGeneration(format!("public key encoding: {}", e)))?;
        let public = PublicKey::new(KeyData::Rsa(key_data), comment);
        let public_openssh = public
            .to_openssh()
            .map_err(|e| CloudError::KeyGeneration(format!("OpenSSH encoding: {}", e)))?;

        Ok(Self {
            private_pem: pem.as_str().to_owned(),
            public_openssh,
            fingerprint: public.fingerprint(HashAlg::Sha256).to_string(),
        })
    }

    pub fn private_pem(&self) -> &str {
        &self.private_pem
    }

    pub fn public_openssh(&self) -> &str {
        &self.public_openssh
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// A key pair that has been written to disk and registered
#[derive(Debug, Clone)]
pub struct ProvisionedKey {
    /// Provider-assigned key id, referenced when creating machines
    pub key_id: u64,
    pub name: String,
    pub fingerprint: String,
    pub private_key: String,
    pub public_key: String,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

/// Generates, stores and registers key pairs
pub struct KeyProvisioner {
    dir: PathBuf,
    named_copy: bool,
}

impl KeyProvisioner {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            named_copy: true,
        }
    }

    /// Skip the extra copy under `<dir>/<name>/`
    pub fn without_named_copy(mut self) -> Self {
        self.named_copy = false;
        self
    }

    /// Generate a key pair, write it to disk and register it as `name`.
    ///
    /// Every step is fatal: machines created without a usable key could
    /// not be reached.
    pub async fn provision<P>(&self, provider: &P, name: &str) -> Result<ProvisionedKey>
    where
        P: ComputeProvider + ?Sized,
    {
        let comment = name.to_string();
        let pair = tokio::task::spawn_blocking(move || KeyPair::generate(&comment))
            .await
            .map_err(|e| CloudError::KeyGeneration(format!("key generation task: {}", e)))??;
        tracing::debug!("Generated RSA key {}", pair.fingerprint());

        let (private_key_path, public_key_path) = self.write_pair(&self.dir, &pair).await?;
        if self.named_copy {
            self.write_pair(&self.dir.join(name), &pair).await?;
        }

        let registered = provider
            .register_ssh_key(name, pair.public_openssh())
            .await?;
        tracing::info!(key_id = registered.id, "Registered SSH key {}", name);

        Ok(ProvisionedKey {
            key_id: registered.id,
            name: name.to_string(),
            fingerprint: pair.fingerprint,
            private_key: pair.private_pem,
            public_key: pair.public_openssh,
            private_key_path,
            public_key_path,
        })
    }

    async fn write_pair(&self, dir: &Path, pair: &KeyPair) -> Result<(PathBuf, PathBuf)> {
        if !dir.exists() {
            fs::create_dir_all(dir).await?;
        }

        let private_path = dir.join(PRIVATE_KEY_FILE);
        let public_path = dir.join(PUBLIC_KEY_FILE);

        write_key_file(&private_path, pair.private_pem(), PRIVATE_KEY_MODE).await?;
        write_key_file(
            &public_path,
            &format!("{}\n", pair.public_openssh()),
            PUBLIC_KEY_MODE,
        )
        .await?;

        tracing::debug!("Wrote key pair to {}", dir.display());
        Ok((private_path, public_path))
    }
}

async fn write_key_file(path: &Path, contents: &str, mode: u32) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);

    let mut file = options.open(path).await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await?;

    // the open mode only applies to new files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
