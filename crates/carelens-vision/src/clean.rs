//! Deterministic cleanup of raw OCR output.

/// How aggressively to clean extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    /// Whitespace normalisation plus removal of every character outside
    /// ASCII letters, digits and whitespace. Lossy: punctuation in
    /// ingredient lists ("E211, sugar (cane)") is discarded on purpose,
    /// since the model only needs the ingredient words.
    Ingredients,
    /// Whitespace normalisation only; report values such as `5.4 mmol/L`
    /// keep their punctuation.
    Report,
}

/// Collapse line breaks, tabs and runs of whitespace to single spaces and
/// trim both ends; in [`CleanMode::Ingredients`] also drop non-alphanumeric
/// characters.
///
/// Characters are dropped before whitespace is collapsed, so the result is a
/// fixed point: `clean_text(&clean_text(x, m), m) == clean_text(x, m)`.
pub fn clean_text(text: &str, mode: CleanMode) -> String {
    match mode {
        CleanMode::Ingredients => {
            let kept: String = text
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
                .collect();
            collapse_whitespace(&kept)
        }
        CleanMode::Report => collapse_whitespace(text),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_handles_mixed_breaks() {
        assert_eq!(collapse_whitespace("\n\ta \r\n  b\t"), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
