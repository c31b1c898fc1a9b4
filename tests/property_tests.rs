//! Property-based tests for pipeline invariants.
//!
//! Tests validate:
//! 1. Normalization is idempotent
//! 2. Validation, evaluation and paste filtering are total
//! 3. Paste filtering only ever yields whitelisted text
//! 4. Integer arithmetic agrees with native arithmetic

use safecalc::{evaluate, extract_safe, filter_paste, is_valid, normalize, EvaluationOutcome};
use proptest::prelude::*;

// ===== Property 1: Normalization =====

proptest! {
    #[test]
    fn normalize_is_idempotent(s in any::<String>()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_formula_like_text(s in r"[0-9 ,._'x\u{0445}\u{2013}\u{2014}:^+*/()-]{0,64}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }
}

// ===== Property 2: Totality =====

proptest! {
    #[test]
    fn is_valid_never_panics(s in any::<String>()) {
        let _ = is_valid(&s);
        let _ = is_valid(&normalize(&s));
    }

    #[test]
    fn evaluate_never_panics(s in r"[0-9.+*/()e -]{0,64}") {
        let _ = evaluate(&s);
    }

    #[test]
    fn filter_paste_never_panics(s in any::<String>()) {
        let _ = filter_paste(&s);
    }
}

// ===== Property 3: Salvage Output =====

proptest! {
    #[test]
    fn filtered_paste_is_always_valid(s in any::<String>()) {
        let filtered = filter_paste(&s);
        prop_assert!(is_valid(&filtered), "{:?} filtered to invalid {:?}", s, filtered);
    }

    #[test]
    fn extract_safe_is_a_fixed_point(s in any::<String>()) {
        let once = extract_safe(&s);
        prop_assert_eq!(extract_safe(&once), once);
    }
}

// ===== Property 4: Arithmetic =====

proptest! {
    #[test]
    fn integer_arithmetic_matches_native(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        prop_assert_eq!(evaluate(&format!("{a}+{b}")), EvaluationOutcome::Success((a + b).to_string()));
        prop_assert_eq!(evaluate(&format!("{a}-({b})")), EvaluationOutcome::Success((a - b).to_string()));
        prop_assert_eq!(evaluate(&format!("{a}*{b}")), EvaluationOutcome::Success((a * b).to_string()));
    }

    #[test]
    fn division_by_zero_regardless_of_numerator(a in -10_000i64..10_000) {
        prop_assert_eq!(evaluate(&format!("{a}/0")), EvaluationOutcome::DivisionByZero);
        prop_assert_eq!(evaluate(&format!("{a}//(1-1)")), EvaluationOutcome::DivisionByZero);
    }
}
