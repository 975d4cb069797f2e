use super::*;

use crate::tree::Node;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Walk the whole tree checking key order, balance and cached heights.
fn validate_tree<V>(t: &AvlTree<V>) {
    fn check<'a, V>(
        node: Option<&'a Node<V>>,
        lo: Option<&'a str>,
        hi: Option<&'a str>,
    ) -> (u32, usize) {
        let Some(n) = node else {
            return (0, 0);
        };
        if let Some(lo) = lo {
            assert!(n.key() > lo, "{:?} sits right of {:?} but is not greater", n.key(), lo);
        }
        if let Some(hi) = hi {
            assert!(n.key() < hi, "{:?} sits left of {:?} but is not smaller", n.key(), hi);
        }
        let (lh, lc) = check(n.left(), lo, Some(n.key()));
        let (rh, rc) = check(n.right(), Some(n.key()), hi);
        assert!(
            (i64::from(lh) - i64::from(rh)).abs() <= 1,
            "unbalanced at {:?}: {} vs {}",
            n.key(),
            lh,
            rh
        );
        assert_eq!(n.height(), 1 + lh.max(rh), "stale height at {:?}", n.key());
        (n.height(), lc + rc + 1)
    }

    let (height, count) = check(t.root(), None, None);
    assert_eq!(height, t.height());
    assert_eq!(count, t.len(), "reachable node count must match AvlTree::len");
}

/// Pre-order `(key, height)` listing.
fn shape<V>(t: &AvlTree<V>) -> Vec<(String, u32)> {
    let mut out = Vec::new();
    let mut stack: Vec<&Node<V>> = t.root().into_iter().collect();
    while let Some(n) = stack.pop() {
        out.push((n.key().to_string(), n.height()));
        stack.extend(n.right());
        stack.extend(n.left());
    }
    out
}

/// AVL worst case: height <= ceil(1.44 * log2(n + 2)).
fn avl_height_bound(n: usize) -> u32 {
    (1.44 * ((n + 2) as f64).log2()).ceil() as u32
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    // Small alphabet so duplicates are common.
    "[a-dA-D]{1,4}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(
        #[proptest(strategy = "key_strategy()")] String,
        #[proptest(strategy = "0u32..1000")] u32,
    ),
    Get(#[proptest(strategy = "key_strategy()")] String),
}

fn policy_strategy() -> impl Strategy<Value = DuplicatePolicy> {
    prop_oneof![Just(DuplicatePolicy::Overwrite), Just(DuplicatePolicy::Reject)]
}

fn cents() -> impl Strategy<Value = f64> {
    (-1_000_000_000i64..1_000_000_000).prop_map(|c| c as f64 / 100.0)
}

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |x| x.is_finite())
}

fn cent_profile() -> impl Strategy<Value = Profile> {
    (any::<u32>(), cents(), cents(), cents()).prop_map(|(p, b, i, s)| Profile::new(p, b, i, s))
}

fn exact_profile() -> impl Strategy<Value = Profile> {
    (any::<u32>(), finite(), finite(), finite()).prop_map(|(p, b, i, s)| Profile::new(p, b, i, s))
}

fn build(config: Config, records: &[(String, Profile)]) -> Registry {
    let mut r = Registry::with_config(config);
    for (name, profile) in records {
        r.insert(name, *profile).unwrap();
    }
    r
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=500), policy in policy_strategy()) {
        let mut t: AvlTree<u32> = AvlTree::new();
        let mut m: BTreeMap<String, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let got = t.insert(&key, value, policy);
                    let expected = match (m.get(&key).copied(), policy) {
                        (None, _) => {
                            m.insert(key, value);
                            Insertion::Inserted
                        }
                        (Some(old), DuplicatePolicy::Overwrite) => {
                            m.insert(key, value);
                            Insertion::Updated(old)
                        }
                        (Some(_), DuplicatePolicy::Reject) => Insertion::Rejected(value),
                    };
                    prop_assert_eq!(got, expected);
                    validate_tree(&t);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        let got: Vec<(&str, u32)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(&str, u32)> = m.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_height_bound(keys in prop::collection::hash_set("[a-z]{1,8}", 1..600), sorted in any::<bool>()) {
        let mut keys: Vec<String> = keys.into_iter().collect();
        if sorted {
            keys.sort();
        }
        let mut t = AvlTree::new();
        for k in &keys {
            t.insert(k, (), DuplicatePolicy::Reject);
        }
        validate_tree(&t);
        prop_assert!(
            t.height() <= avl_height_bound(keys.len()),
            "height {} exceeds bound {} for {} keys",
            t.height(),
            avl_height_bound(keys.len()),
            keys.len()
        );
    }

    #[test]
    fn prop_overwrite_changes_only_payload(
        keys in prop::collection::hash_set("[a-z]{1,6}", 1..200),
        pick in any::<prop::sample::Index>(),
        value in any::<u64>(),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut t = AvlTree::new();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as u64, DuplicatePolicy::Overwrite);
        }
        let before = shape(&t);
        let mut expected: Vec<(String, u64)> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();

        let target = pick.get(&keys).clone();
        t.insert(&target, value, DuplicatePolicy::Overwrite);

        for entry in expected.iter_mut() {
            if entry.0 == target {
                entry.1 = value;
            }
        }
        let after: Vec<(String, u64)> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        prop_assert_eq!(shape(&t), before);
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn prop_block_roundtrip(
        records in prop::collection::vec(("[A-Za-z][A-Za-z .'-]{0,30}", cent_profile()), 0..100),
    ) {
        let r = build(Config::city(), &records);
        let text = r.encode().unwrap();
        let back = Registry::decode(&text, Config::city()).unwrap();
        validate_tree(back.tree());
        let a: Vec<_> = r.iter().collect();
        let b: Vec<_> = back.iter().collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_line_roundtrip_exact(
        records in prop::collection::vec(("[A-Za-z0-9_.-]{1,49}", exact_profile()), 0..100),
    ) {
        let config = Config { decimals: None, ..Config::country() };
        let r = build(config, &records);
        let text = r.encode().unwrap();
        let back = Registry::decode(&text, config).unwrap();
        let a: Vec<_> = r.iter().collect();
        let b: Vec<_> = back.iter().collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_encoded_keys_strictly_ascending(
        records in prop::collection::vec(("[A-Za-z]{1,10}", cent_profile()), 0..200),
    ) {
        let r = build(Config::country(), &records);
        let text = r.encode().unwrap();
        let names: Vec<&str> = text
            .lines()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        prop_assert!(names.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(names.len(), r.len());
    }

    #[test]
    fn prop_richest_is_maximal(
        records in prop::collection::vec(("[a-z]{1,5}", cent_profile()), 1..100),
        per_capita in any::<bool>(),
    ) {
        let config = Config {
            scoring: if per_capita { Scoring::PerCapita } else { Scoring::NetBalance },
            ..Config::country()
        };
        let r = build(config, &records);
        let scoring = config.scoring;
        match r.richest() {
            Some((name, best)) => {
                let top = scoring.score(best);
                for (other, p) in r.iter() {
                    let s = scoring.score(p);
                    prop_assert!(s.is_nan() || s <= top);
                    // Smallest key wins ties.
                    if s == top {
                        prop_assert!(other >= name);
                    }
                }
            }
            None => prop_assert!(r.iter().all(|(_, p)| scoring.score(p).is_nan())),
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = ["a", "b", "c", "aa", "ab", "ba", "B"];
    let mut reloaded_shape: Option<Vec<(String, u32)>> = None;

    for_each_permutation(&keys, |perm| {
        let mut r = Registry::new(Entity::Country);
        let mut m: BTreeMap<&str, u32> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let p = Profile::new(i as u32 + 1, 0.0, i as f64, 0.0);
            r.insert(k, p).unwrap();
            m.insert(k, i as u32 + 1);
        }

        validate_tree(r.tree());
        let got: Vec<(&str, u32)> = r.iter().map(|(k, p)| (k, p.population)).collect();
        let expected: Vec<(&str, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(got, expected);

        // Snapshots are sorted, so reloading yields one shape for the key set.
        let back = Registry::decode(&r.encode().unwrap(), Config::country()).unwrap();
        let s = shape(back.tree());
        if let Some(prev) = &reloaded_shape {
            assert_eq!(&s, prev);
            return;
        }
        reloaded_shape = Some(s);
    });
}

#[test]
fn shuffled_bulk_insert_stays_balanced() {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(3);
    let mut names: Vec<String> = (0..20_000).map(|i| format!("place{:06}", i)).collect();
    names.shuffle(&mut rng);

    let mut r = Registry::new(Entity::City);
    for name in &names {
        let p = Profile::new(rng.gen_range(1..1_000_000), 0.0, rng.gen_range(0.0..1e6), 0.0);
        r.insert(name, p).unwrap();
    }
    validate_tree(r.tree());
    assert_eq!(r.len(), 20_000);
    assert!(r.tree().height() <= avl_height_bound(20_000));
}
