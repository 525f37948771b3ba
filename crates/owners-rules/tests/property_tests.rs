use owners_rules::{Rule, Ruleset, parse, same_owners};
use proptest::prelude::*;

fn owner() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,8}",
        "[a-z]{1,6}@[a-z]{1,6}\\.com",
    ]
}

fn rule() -> impl Strategy<Value = Rule> {
    ("[a-z*/.]{1,8}", prop::collection::vec(owner(), 1..4))
        .prop_map(|(pattern, owners)| Rule::new(pattern, owners))
}

fn ruleset() -> impl Strategy<Value = Ruleset> {
    prop::collection::vec(rule(), 0..6).prop_map(Ruleset::from)
}

/// Rulesets whose patterns are unique.
fn distinct_ruleset() -> impl Strategy<Value = Ruleset> {
    prop::collection::btree_map("[a-z*/.]{1,8}", prop::collection::vec(owner(), 1..4), 0..6)
        .prop_map(|rules| {
            rules
                .into_iter()
                .map(|(pattern, owners)| Rule::new(pattern, owners))
                .collect::<Ruleset>()
        })
}

proptest! {
    #[test]
    fn test_equal_is_reflexive(r in ruleset()) {
        prop_assert!(r.equal(&r));
    }

    #[test]
    fn test_equal_is_symmetric(a in ruleset(), b in ruleset()) {
        prop_assert_eq!(a.equal(&b), b.equal(&a));
    }

    #[test]
    fn test_equal_ignores_order(r in ruleset(), seed in any::<u64>()) {
        let mut rules: Vec<Rule> = r.rules().to_vec();
        // Deterministic shuffle of rules and of each rule's owners.
        let len = rules.len();
        if len > 1 {
            rules.rotate_left((seed as usize) % len);
        }
        for rule in &mut rules {
            rule.owners.reverse();
        }
        let shuffled = Ruleset::from(rules);
        prop_assert!(r.equal(&shuffled));
    }

    #[test]
    fn test_equal_agrees_with_sorted_comparison(a in ruleset(), b in ruleset()) {
        let canonical = |r: &Ruleset| {
            let mut rules: Vec<(String, Vec<String>)> = r
                .iter()
                .map(|rule| {
                    let mut owners = rule.owners.clone();
                    owners.sort();
                    (rule.pattern.clone(), owners)
                })
                .collect();
            rules.sort();
            rules
        };
        prop_assert_eq!(a.equal(&b), canonical(&a) == canonical(&b));
    }

    #[test]
    fn test_compile_then_parse_round_trips(r in distinct_ruleset()) {
        let parsed = parse(&String::from_utf8(r.compile()).unwrap());
        prop_assert!(parsed.equal(&r));
    }

    #[test]
    fn test_extra_owner_breaks_equality(r in distinct_ruleset(), extra in owner()) {
        prop_assume!(!r.is_empty());
        let mut rules: Vec<Rule> = r.rules().to_vec();
        rules[0].owners.push(extra);
        prop_assert!(!r.equal(&Ruleset::from(rules)));
    }

    #[test]
    fn test_same_owners_is_permutation_invariant(mut owners in prop::collection::vec(owner(), 0..6)) {
        let original = owners.clone();
        owners.reverse();
        prop_assert!(same_owners(&original, &owners));
    }
}
