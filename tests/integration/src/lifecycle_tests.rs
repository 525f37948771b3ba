//! End-to-end owners file lifecycle on a repository on disk.
//!
//! Every step goes through the public APIs: desired rules are parsed from
//! TOML, the service commits through `LocalRepository`, and the result is
//! checked with plain git2 reads.

use chrono::{DateTime, TimeZone, Utc};
use git2::Oid;
use owners_core::{
    ApplyOutcome, BranchTarget, DesiredRules, OwnersService, ProviderConfig,
};
use owners_git::{CommitIdentity, LocalRepository, commit_payload};
use owners_rules::{GENERATED_HEADER, parse};
use owners_test_utils::keys::{JANE_PASSPHRASE, JANE_SECRET_KEY};
use owners_test_utils::repo::TestRepo;
use pgp::composed::{Deserializable, DetachedSignature, SignedSecretKey};
use pretty_assertions::assert_eq;

const OWNERS_PATH: &str = ".github/CODEOWNERS";

fn fixed_clock() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn jane_config() -> ProviderConfig {
    ProviderConfig {
        username: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        gpg_secret_key: Some(JANE_SECRET_KEY.to_string()),
        gpg_passphrase: Some(JANE_PASSPHRASE.to_string()),
        ..Default::default()
    }
}

fn service(repo: &TestRepo, config: ProviderConfig) -> OwnersService<LocalRepository> {
    OwnersService::new(LocalRepository::open(repo.root()).unwrap(), config)
        .unwrap()
        .with_clock(fixed_clock)
}

fn target() -> BranchTarget {
    BranchTarget::new("acme", "widgets", "main")
}

fn desired(document: &str) -> owners_rules::Ruleset {
    DesiredRules::parse(document).unwrap().into_ruleset().unwrap()
}

#[test]
fn test_full_lifecycle() {
    let repo = TestRepo::new("main");
    let service = service(&repo, ProviderConfig {
        gpg_secret_key: None,
        ..jane_config()
    });

    // Create
    let first = desired(
        r#"
[[rule]]
pattern = "*"
owners = ["@acme/platform"]
"#,
    );
    let outcome = service.apply(&target().with_ruleset(first.clone())).unwrap();
    assert!(matches!(outcome, ApplyOutcome::Committed(_)));
    assert_eq!(
        repo.read_file(OWNERS_PATH).unwrap(),
        format!("{GENERATED_HEADER}\n* @acme/platform \n")
    );

    // Same rules again: nothing to do
    let tip = repo.tip();
    assert_eq!(
        service.apply(&target().with_ruleset(first)).unwrap(),
        ApplyOutcome::Unchanged
    );
    assert_eq!(repo.tip(), tip);

    // Update
    let second = desired(
        r#"
[[rule]]
pattern = "*"
owners = ["@acme/platform"]

[[rule]]
pattern = "/docs/"
owners = ["alice", "docs@example.com"]
"#,
    );
    service.apply(&target().with_ruleset(second.clone())).unwrap();
    let on_disk = parse(&repo.read_file(OWNERS_PATH).unwrap());
    assert!(on_disk.equal(&second));
    assert_eq!(service.read(&target()).unwrap(), Some(second));

    // Clear
    let cleared = service.clear(&target()).unwrap().unwrap();
    assert_eq!(cleared.sha, repo.tip().to_string());
    assert_eq!(repo.read_file(OWNERS_PATH).as_deref(), Some(""));
    repo.assert_file_contains("README.md", "# Test");

    // Four commits on top of the seed, each with its own message
    let messages: Vec<String> = {
        let git = repo.repository();
        let mut walk = git.revwalk().unwrap();
        walk.push(repo.tip()).unwrap();
        walk.map(|oid| {
            git.find_commit(oid.unwrap())
                .unwrap()
                .message()
                .unwrap()
                .to_string()
        })
        .collect()
    };
    assert_eq!(
        messages,
        vec![
            "Remove .github/CODEOWNERS",
            "Update .github/CODEOWNERS",
            "Update .github/CODEOWNERS",
            "Initial commit",
        ]
    );
}

#[test]
fn test_hand_edited_file_is_replaced() {
    let repo = TestRepo::new("main");
    repo.commit_files(
        &[(OWNERS_PATH, "# maintained by hand\n*   @alice   @mallory\n")],
        "Hand edit",
    );
    let service = service(&repo, ProviderConfig {
        gpg_secret_key: None,
        ..jane_config()
    });

    let wanted = desired("[[rule]]\npattern = \"*\"\nowners = [\"alice\"]\n");
    let plan = service.plan(&target(), &wanted).unwrap();
    assert!(!plan.is_up_to_date());

    service.apply(&target().with_ruleset(wanted)).unwrap();
    assert_eq!(
        repo.read_file(OWNERS_PATH).unwrap(),
        format!("{GENERATED_HEADER}\n* @alice \n")
    );
}

#[test]
fn test_signed_commit_covers_stored_payload() {
    let repo = TestRepo::new("main");
    let parent = repo.tip();
    let service = service(&repo, jane_config());

    let wanted = desired("[[rule]]\npattern = \"*\"\nowners = [\"alice\"]\n");
    let ApplyOutcome::Committed(outcome) =
        service.apply(&target().with_ruleset(wanted)).unwrap()
    else {
        panic!("expected a commit");
    };
    assert!(outcome.signed);
    assert_eq!(outcome.parent_sha, parent.to_string());

    let oid = Oid::from_str(&outcome.sha).unwrap();
    let (signature, signed_data) = repo.repository().extract_signature(&oid, None).unwrap();

    let identity = CommitIdentity::new("Jane Doe", "jane@example.com", fixed_clock());
    let payload = commit_payload(
        &outcome.tree_sha,
        &outcome.parent_sha,
        &identity,
        "Update .github/CODEOWNERS",
    );
    assert_eq!(signed_data.as_str(), Some(payload.as_str()));

    let (signature, _) = DetachedSignature::from_string(signature.as_str().unwrap()).unwrap();
    let (key, _) = SignedSecretKey::from_string(JANE_SECRET_KEY).unwrap();
    let public = key.primary_key.public_key();
    signature.verify(public, payload.as_bytes()).unwrap();
    assert!(
        signature
            .verify(public, format!("{payload}\n").as_bytes())
            .is_err()
    );
}

#[test]
fn test_wrong_passphrase_leaves_branch_alone() {
    let repo = TestRepo::new("main");
    let tip = repo.tip();
    let service = service(&repo, ProviderConfig {
        gpg_passphrase: Some("not the passphrase".to_string()),
        ..jane_config()
    });

    let wanted = desired("[[rule]]\npattern = \"*\"\nowners = [\"alice\"]\n");
    let err = service.apply(&target().with_ruleset(wanted)).unwrap_err();

    match err {
        owners_core::Error::Git(inner) => assert!(inner.is_signing_failure(), "got: {inner:?}"),
        other => panic!("expected a signing failure, got {other:?}"),
    }
    assert_eq!(repo.tip(), tip);
}
