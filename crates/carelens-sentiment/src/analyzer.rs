//! Rule-based polarity scoring in the style of VADER.
//!
//! Each token gets a valence from the lexicon, adjusted by the three tokens
//! before it (intensity boosters and negations), by ALL-CAPS emphasis, and by
//! a contrastive "but". Valences are summed, amplified by trailing `!`/`?`,
//! and squashed into a compound score in `[-1, 1]`. The positive, negative
//! and neutral proportions come from the same per-token valences.
//!
//! Known limitation: the bundled lexicon (`data/lexicon.tsv`) holds a curated
//! core of about 190 common sentiment words, not the ~7.5k entries of the
//! full VADER lexicon. Words outside it score as neutral, so text whose
//! sentiment rests on rarer vocabulary, slang or emoticons reads as more
//! neutral than VADER would rate it. The file uses VADER's `word<TAB>valence`
//! layout, so the full list can be dropped in without code changes.

use carelens_core::models::sentiment::{SentimentResult, SentimentScores};

use crate::lexicon::{LEXICON, booster, is_negation};

/// Added to a valence when its word is shouted in otherwise mixed-case text.
const CAPS_INCR: f64 = 0.733;
/// Multiplier applied when a negation precedes a sentiment word.
const NEGATION_SCALAR: f64 = -0.74;
/// Normalisation constant approximating the max expected sum.
const ALPHA: f64 = 15.0;
/// Lookback distances and the damping applied to boosters at each distance.
const LOOKBACK_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> SentimentResult {
        SentimentResult::from_scores(self.polarity_scores(text))
    }

    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScores::default();
        }

        let shouting = caps_differential(&tokens);
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut valences = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let word = lowered[i].as_str();
            let is_kind_of = word == "kind" && lowered.get(i + 1).is_some_and(|n| n == "of");
            if booster(word).is_some() || is_kind_of {
                valences.push(0.0);
                continue;
            }
            valences.push(token_valence(&tokens, &lowered, i, shouting));
        }

        apply_but_shift(&lowered, &mut valences);
        score(&valences, text)
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|raw| {
            let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            // Keep short tokens (emoticons like ":)") intact.
            if stripped.chars().count() <= 2 { raw } else { stripped }
        })
        .filter(|token| token.chars().count() > 1)
        .collect()
}

fn is_shouted(token: &str) -> bool {
    let mut letters = token.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// True when some, but not all, tokens are upper case.
fn caps_differential(tokens: &[&str]) -> bool {
    let shouted = tokens.iter().filter(|t| is_shouted(t)).count();
    shouted > 0 && shouted < tokens.len()
}

fn token_valence(tokens: &[&str], lowered: &[String], i: usize, shouting: bool) -> f64 {
    let Some(&base) = LEXICON.get(lowered[i].as_str()) else {
        return 0.0;
    };

    let mut valence = base;
    if shouting && is_shouted(tokens[i]) {
        valence += if valence > 0.0 { CAPS_INCR } else { -CAPS_INCR };
    }

    for (distance, damping) in LOOKBACK_DAMPING.iter().enumerate() {
        let Some(j) = i.checked_sub(distance + 1) else {
            break;
        };
        let prior = lowered[j].as_str();
        if LEXICON.contains_key(prior) {
            continue;
        }

        if let Some(mut scalar) = booster(prior) {
            if valence < 0.0 {
                scalar = -scalar;
            }
            if shouting && is_shouted(tokens[j]) {
                scalar += if valence > 0.0 { CAPS_INCR } else { -CAPS_INCR };
            }
            valence += scalar * damping;
        }

        // "never so good" intensifies rather than negates.
        let never_so = distance > 0
            && prior == "never"
            && matches!(lowered[j + 1].as_str(), "so" | "this");
        if never_so {
            valence *= 1.25;
        } else if is_negation(prior) {
            valence *= NEGATION_SCALAR;
        }
    }

    valence
}

/// Text after "but" dominates: earlier valences are halved, later ones
/// scaled by 1.5.
fn apply_but_shift(lowered: &[String], valences: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (i, v) in valences.iter_mut().enumerate() {
        if i < pivot {
            *v *= 0.5;
        } else if i > pivot {
            *v *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + questions
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score(valences: &[f64], text: &str) -> SentimentScores {
    let emphasis = punctuation_emphasis(text);

    let mut sum: f64 = valences.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neutral_count = 0.0;
    for &v in valences {
        if v > 0.0 {
            pos_sum += v + 1.0;
        } else if v < 0.0 {
            neg_sum += v - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neutral_count;
    if total == 0.0 {
        return SentimentScores::default();
    }

    SentimentScores {
        positive: round_to((pos_sum / total).abs(), 3),
        negative: round_to((neg_sum / total).abs(), 3),
        neutral: round_to((neutral_count / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_strips_edge_punctuation_and_single_chars() {
        assert_eq!(tokenize("I feel GREAT, really!"), vec!["feel", "GREAT", "really"]);
        assert_eq!(tokenize("ok :)"), vec!["ok", ":)"]);
    }

    #[test]
    fn caps_differential_needs_mixed_case() {
        assert!(caps_differential(&["feel", "GREAT"]));
        assert!(!caps_differential(&["FEEL", "GREAT"]));
        assert!(!caps_differential(&["feel", "great"]));
    }

    #[test]
    fn normalize_stays_in_range() {
        assert_eq!(normalize(0.0), 0.0);
        assert!(normalize(1000.0) <= 1.0);
        assert!(normalize(-1000.0) >= -1.0);
    }

    #[test]
    fn punctuation_emphasis_caps_out() {
        assert_eq!(punctuation_emphasis("no marks"), 0.0);
        assert!((punctuation_emphasis("!!!!!!!") - 4.0 * 0.292).abs() < 1e-12);
        assert!((punctuation_emphasis("??????") - 0.96).abs() < 1e-12);
    }
}
