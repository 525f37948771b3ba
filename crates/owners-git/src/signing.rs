//! Detached OpenPGP signatures over commit payloads.

use std::fmt;

use pgp::composed::{ArmorOptions, Deserializable, DetachedSignature, SignedSecretKey};
use pgp::crypto::hash::HashAlgorithm;
use pgp::packet::{KeyFlags, SecretKey, SecretSubkey, Signature, SignatureType};
use pgp::types::{KeyDetails, Password, PublicKeyTrait, SecretKeyTrait};

use crate::{Error, Result};

/// Produces an ASCII-armored detached signature for a commit payload.
pub trait CommitSigner {
    fn sign(&self, payload: &str) -> Result<String>;
}

/// Signs with an armored OpenPGP secret key.
#[derive(Clone)]
pub struct PgpSigner {
    armored_key: String,
    passphrase: String,
}

impl PgpSigner {
    pub fn new(armored_key: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            armored_key: armored_key.into(),
            passphrase: passphrase.into(),
        }
    }
}

impl fmt::Debug for PgpSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgpSigner")
            .field("armored_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

impl CommitSigner for PgpSigner {
    fn sign(&self, payload: &str) -> Result<String> {
        sign_detached(payload, &self.armored_key, &self.passphrase)
    }
}

/// Sign `payload` with the signing key of an armored secret key block.
///
/// The newest secret sub-key whose binding signature allows signing is
/// used. The primary key signs only when no such sub-key exists and its own
/// self-signatures allow it. Only the selected key is unlocked with
/// `passphrase`, so a sub-key export whose primary is a stub still signs.
///
/// # Errors
///
/// - [`Error::KeyParse`] when `armored_key` is not a valid armored secret key
/// - [`Error::NoSigningKey`] when no key in the block may sign
/// - [`Error::Decrypt`] when the passphrase does not unlock the selected key
/// - [`Error::Signing`] when the signature cannot be produced or armored
pub fn sign_detached(payload: &str, armored_key: &str, passphrase: &str) -> Result<String> {
    let (key, _headers) =
        SignedSecretKey::from_string(armored_key).map_err(|source| Error::KeyParse { source })?;

    let password = Password::from(passphrase);
    let signature = match select_signing_key(&key).ok_or(Error::NoSigningKey)? {
        SigningKey::Primary(primary) => {
            check_unlock(primary.unlock(&password, |_, _| Ok(())))?;
            sign_with(primary, &password, payload)?
        }
        SigningKey::Subkey(subkey) => {
            check_unlock(subkey.unlock(&password, |_, _| Ok(())))?;
            sign_with(subkey, &password, payload)?
        }
    };

    let armored = signature
        .to_armored_string(ArmorOptions::default())
        .map_err(Error::signing)?;

    tracing::debug!(payload_bytes = payload.len(), "Signed commit payload");
    Ok(armored)
}

enum SigningKey<'a> {
    Primary(&'a SecretKey),
    Subkey(&'a SecretSubkey),
}

fn select_signing_key(key: &SignedSecretKey) -> Option<SigningKey<'_>> {
    let subkey = key
        .secret_subkeys
        .iter()
        .filter(|sub| sub.key.public_key().is_signing_key())
        .filter(|sub| !is_revoked(&sub.signatures))
        .filter(|sub| sub.signatures.iter().any(|sig| sig.key_flags().sign()))
        .max_by_key(|sub| *sub.key.public_key().created_at());
    if let Some(sub) = subkey {
        tracing::debug!(key_id = %sub.key.key_id(), "Selected signing sub-key");
        return Some(SigningKey::Subkey(&sub.key));
    }

    let primary = &key.primary_key;
    if !primary.public_key().is_signing_key() {
        return None;
    }

    // Self-signatures without a key flags subpacket predate key flags and
    // leave the primary free to sign.
    let flags: Vec<KeyFlags> = key
        .details
        .users
        .iter()
        .flat_map(|user| &user.signatures)
        .chain(&key.details.direct_signatures)
        .map(Signature::key_flags)
        .filter(|flags| *flags != KeyFlags::default())
        .collect();
    (flags.is_empty() || flags.iter().any(KeyFlags::sign)).then_some(SigningKey::Primary(primary))
}

fn is_revoked(signatures: &[Signature]) -> bool {
    signatures
        .iter()
        .any(|sig| sig.typ() == Some(SignatureType::SubkeyRevocation))
}

fn check_unlock(result: pgp::errors::Result<pgp::errors::Result<()>>) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) | Err(source) => Err(Error::Decrypt { source }),
    }
}

fn sign_with(
    key: &impl SecretKeyTrait,
    password: &Password,
    payload: &str,
) -> Result<DetachedSignature> {
    DetachedSignature::sign_binary_data(
        rand::thread_rng(),
        key,
        password,
        HashAlgorithm::Sha256,
        payload.as_bytes(),
    )
    .map_err(Error::signing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_key_is_a_parse_error() {
        let err = sign_detached("payload", "not a key", "").unwrap_err();
        assert!(matches!(err, Error::KeyParse { .. }), "got: {err:?}");
    }

    #[test]
    fn test_signer_debug_redacts_secrets() {
        let signer = PgpSigner::new("SECRET KEY", "hunter2");
        let debug = format!("{signer:?}");
        assert!(!debug.contains("SECRET KEY"));
        assert!(!debug.contains("hunter2"));
    }
}
