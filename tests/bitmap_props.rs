/*!
 * Bitmap Properties
 * Randomized checks for event bitmap set semantics
 */

use modemlink::EventBitmap;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_indices_rebuild_non_sentinel_bits(raw in any::<u64>()) {
        let bitmap = EventBitmap::from_raw(raw);
        let mut rebuilt = EventBitmap::EMPTY;
        for index in bitmap.indices() {
            rebuilt.insert(index);
        }
        prop_assert_eq!(rebuilt.raw(), raw & !(1u64 << 63));
    }

    #[test]
    fn prop_indices_ascend(raw in any::<u64>()) {
        let bitmap = EventBitmap::from_raw(raw);
        let indices: Vec<usize> = bitmap.indices().collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        prop_assert_eq!(indices, sorted);
    }

    #[test]
    fn prop_merge_is_union(a in any::<u64>(), b in any::<u64>()) {
        let mut merged = EventBitmap::from_raw(a);
        merged.merge(EventBitmap::from_raw(b));
        prop_assert_eq!(merged.raw(), a | b);
    }

    #[test]
    fn prop_reset_detection(raw in any::<u64>()) {
        let bitmap = EventBitmap::from_raw(raw);
        prop_assert_eq!(bitmap.has_reset(), raw & (1u64 << 63) != 0);
        prop_assert!(!bitmap.without_reset().has_reset());
    }
}
