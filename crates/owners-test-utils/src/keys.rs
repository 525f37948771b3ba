//! Armored OpenPGP secret keys for signing tests.
//!
//! Throwaway keys generated for this test suite only.

/// Ed25519 signing key with a cv25519 encryption sub-key, both protected by
/// [`JANE_PASSPHRASE`]. User id: `Jane Doe <jane@example.com>`.
pub const JANE_SECRET_KEY: &str = include_str!("../../../test-fixtures/keys/jane.sec.asc");

/// Passphrase for [`JANE_SECRET_KEY`].
pub const JANE_PASSPHRASE: &str = "correct horse battery staple";

/// Unprotected Ed25519 signing key. User id: `Robo Committer <robot@example.com>`.
pub const ROBOT_SECRET_KEY: &str = include_str!("../../../test-fixtures/keys/robot.sec.asc");

/// Certification-only Ed25519 primary with an Ed25519 signing sub-key, both
/// protected by [`SAM_PASSPHRASE`]. User id: `Sam Subkey <sam@example.com>`.
pub const SAM_SECRET_KEY: &str = include_str!("../../../test-fixtures/keys/sam.sec.asc");

/// [`SAM_SECRET_KEY`] exported with `--export-secret-subkeys`: the primary
/// carries no secret material.
pub const SAM_SUBKEYS_ONLY_SECRET_KEY: &str =
    include_str!("../../../test-fixtures/keys/sam.subkeys.sec.asc");

/// Passphrase for [`SAM_SECRET_KEY`] and [`SAM_SUBKEYS_ONLY_SECRET_KEY`].
pub const SAM_PASSPHRASE: &str = "sub key passphrase";
