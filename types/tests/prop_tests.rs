use proptest::prelude::*;

use vp_types::{BlockTag, CacheKey, ItemKind, NormalizedTotal, Power};

fn kind_strategy() -> impl Strategy<Value = ItemKind> {
    prop_oneof![Just(ItemKind::Space), Just(ItemKind::Proposal)]
}

fn block_strategy() -> impl Strategy<Value = Option<u64>> {
    prop::option::of(any::<u64>())
}

proptest! {
    /// Rendering is deterministic and round-trips through parsing.
    #[test]
    fn key_render_is_deterministic(
        kind in kind_strategy(),
        id in ".{0,24}",
        block in block_strategy(),
    ) {
        let a = CacheKey::new(kind, id.clone(), block);
        let b = CacheKey::new(kind, id, block);
        prop_assert_eq!(a.to_string(), b.to_string());
        let parsed: CacheKey = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    /// Distinct triples never render to the same string.
    #[test]
    fn key_render_is_injective(
        k1 in kind_strategy(), id1 in "[a-z0-9:.]{0,12}", b1 in block_strategy(),
        k2 in kind_strategy(), id2 in "[a-z0-9:.]{0,12}", b2 in block_strategy(),
    ) {
        let key1 = CacheKey::new(k1, id1.clone(), b1);
        let key2 = CacheKey::new(k2, id2.clone(), b2);
        let same_triple = k1 == k2 && id1 == id2 && BlockTag::from(b1) == BlockTag::from(b2);
        prop_assert_eq!(key1.to_string() == key2.to_string(), same_triple);
        prop_assert_eq!(key1 == key2, same_triple);
    }

    /// An absent block and `latest` are the same key.
    #[test]
    fn absent_block_is_latest(kind in kind_strategy(), id in ".{0,24}") {
        let absent = CacheKey::new(kind, id.clone(), None);
        let latest = CacheKey::new(kind, id, BlockTag::Latest);
        prop_assert_eq!(absent.to_string(), latest.to_string());
        prop_assert_eq!(absent, latest);
    }

    /// Around a threshold T, totals of T-1, T and T+1 whole units compare
    /// as false, true, true regardless of the decimal count.
    #[test]
    fn threshold_boundaries(threshold in 1u64..u64::MAX - 1, decimals in 0u32..30) {
        let unit = Power::new(primitive_types::U256::exp10(decimals as usize));
        let at = |whole: u64| {
            let raw = primitive_types::U256::from(whole) * unit.raw();
            Power::new(raw)
        };
        for (whole, expected) in [(threshold - 1, false), (threshold, true), (threshold + 1, true)] {
            let value = at(whole);
            let total = NormalizedTotal::from_terms([(&value, decimals)]).unwrap();
            prop_assert_eq!(total.meets(&Power::from(threshold)).unwrap(), expected);
        }
    }

    /// Splitting a balance across strategies does not change the outcome.
    #[test]
    fn split_terms_sum_exactly(a in 0u64..1_000_000_000, b in 0u64..1_000_000_000, t in 0u64..3_000) {
        // a with 6 decimals + b with 3 decimals, compared against a*1e-6 + b*1e-3
        let va = Power::from(a);
        let vb = Power::from(b);
        let total = NormalizedTotal::from_terms([(&va, 6), (&vb, 3)]).unwrap();
        let scaled = u128::from(a) + u128::from(b) * 1_000;
        let expected = scaled >= u128::from(t) * 1_000_000;
        prop_assert_eq!(total.meets(&Power::from(t)).unwrap(), expected);
    }
}
