use boundary_gen::{generate, plan, GenerationError, MessageTemplate};
use proptest::prelude::*;

/// Template whose every line is exactly `len` bytes, newline included.
fn fixed_len(len: usize) -> impl Fn(usize) -> String {
    move |i| {
        if len == 1 {
            return "\n".to_string();
        }
        format!("{}{}\n", "#".repeat(len - 2), i % 10)
    }
}

proptest! {
    #[test]
    fn prop_misaligned_capacity_overflows_by_at_most_one_message(
        capacity in 1usize..20_000,
        length in 1usize..200,
    ) {
        prop_assume!(capacity % length != 0);
        let template = fixed_len(length);

        let batch = generate(capacity, &template).unwrap();
        let count = capacity / length + 1;

        prop_assert_eq!(batch.message_count(), count);
        prop_assert_eq!(batch.last_index(), count - 1);
        prop_assert!((count - 1) * length < capacity);
        prop_assert!(capacity <= count * length);
        prop_assert!(batch.total_len() > capacity);
        prop_assert!(batch.total_len() - capacity < length);
    }

    #[test]
    fn prop_first_boundary_always_splits_a_message(
        capacity in 1usize..20_000,
        length in 2usize..200,
    ) {
        prop_assume!(capacity % length != 0);
        let batch = generate(capacity, &fixed_len(length)).unwrap();

        let crossing = batch
            .boundary_crossings()
            .into_iter()
            .find(|c| c.boundary == capacity);
        prop_assert!(crossing.is_some());
        let crossing = crossing.unwrap();
        prop_assert!(crossing.bytes_before > 0);
        prop_assert!(crossing.bytes_after > 0);
        prop_assert_eq!(crossing.bytes_before + crossing.bytes_after, length);
    }

    #[test]
    fn prop_aligned_capacity_is_rejected(
        multiple in 1usize..200,
        length in 1usize..200,
    ) {
        let capacity = multiple * length;
        let err = generate(capacity, &fixed_len(length)).unwrap_err();
        prop_assert_eq!(
            err,
            GenerationError::Alignment { capacity, message_length: length }
        );
        prop_assert!(plan(capacity, &fixed_len(length)).is_err());
    }

    #[test]
    fn prop_generate_is_idempotent(capacity in 1usize..10_000, length in 1usize..100) {
        prop_assume!(capacity % length != 0);
        let template = fixed_len(length);
        let a = generate(capacity, &template).unwrap();
        let b = generate(capacity, &template).unwrap();
        prop_assert_eq!(a.bytes(), b.bytes());
        prop_assert_eq!(template.render(0).len(), length);
    }
}
