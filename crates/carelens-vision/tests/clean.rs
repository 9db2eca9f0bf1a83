use carelens_vision::clean::{CleanMode, clean_text};
use proptest::prelude::*;

#[test]
fn ingredients_mode_drops_punctuation() {
    let raw = "INGREDIENTS:\n  Sugar, Sodium Benzoate (E211);\tWater.\r\n";
    assert_eq!(
        clean_text(raw, CleanMode::Ingredients),
        "INGREDIENTS Sugar Sodium Benzoate E211 Water"
    );
}

#[test]
fn report_mode_keeps_punctuation() {
    let raw = "Glucose:\t5.4 mmol/L\n\nHbA1c:  6.1%";
    assert_eq!(
        clean_text(raw, CleanMode::Report),
        "Glucose: 5.4 mmol/L HbA1c: 6.1%"
    );
}

#[test]
fn punctuation_between_spaces_leaves_single_space() {
    assert_eq!(clean_text("salt , sugar", CleanMode::Ingredients), "salt sugar");
}

#[test]
fn empty_and_blank_inputs_clean_to_empty() {
    assert_eq!(clean_text("", CleanMode::Ingredients), "");
    assert_eq!(clean_text(" \n\t ", CleanMode::Report), "");
    assert_eq!(clean_text("!!! ???", CleanMode::Ingredients), "");
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(raw in "\\PC{0,64}") {
        for mode in [CleanMode::Ingredients, CleanMode::Report] {
            let once = clean_text(&raw, mode);
            prop_assert_eq!(clean_text(&once, mode), once);
        }
    }

    #[test]
    fn ingredients_output_is_ascii_alnum_and_single_spaces(raw in ".{0,64}") {
        let out = clean_text(&raw, CleanMode::Ingredients);
        prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.trim(), out.as_str());
    }
}
