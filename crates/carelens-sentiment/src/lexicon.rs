use std::collections::HashMap;
use std::sync::LazyLock;

/// Word valences on a -4..=4 scale, one `word<TAB>valence` pair per line.
/// Further tab-separated columns (VADER's std-dev and raw ratings) are
/// ignored.
const LEXICON_TSV: &str = include_str!("../data/lexicon.tsv");

pub(crate) static LEXICON: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| LEXICON_TSV.lines().filter_map(parse_line).collect());

fn parse_line(line: &str) -> Option<(&str, f64)> {
    let mut fields = line.split('\t');
    let word = fields.next()?;
    let valence = fields.next()?.trim().parse().ok()?;
    Some((word, valence))
}

/// Intensity modifiers and their push on the following sentiment word.
pub(crate) fn booster(word: &str) -> Option<f64> {
    const INCR: f64 = 0.293;
    const DECR: f64 = -0.293;
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably"
        | "decidedly" | "deeply" | "enormously" | "entirely" | "especially"
        | "exceptionally" | "extremely" | "fully" | "greatly" | "highly" | "hugely"
        | "incredibly" | "intensely" | "majorly" | "more" | "most" | "particularly"
        | "purely" | "quite" | "really" | "remarkably" | "so" | "substantially"
        | "thoroughly" | "totally" | "tremendously" | "unbelievably" | "unusually"
        | "utterly" | "very" => Some(INCR),
        "almost" | "barely" | "hardly" | "less" | "little" | "marginally"
        | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat" => Some(DECR),
        _ => None,
    }
}

pub(crate) fn is_negation(word: &str) -> bool {
    matches!(
        word,
        "aint" | "arent" | "cannot" | "cant" | "couldnt" | "didnt" | "doesnt" | "dont"
            | "hadnt" | "hasnt" | "havent" | "isnt" | "mightnt" | "mustnt" | "neither"
            | "never" | "none" | "nope" | "nor" | "not" | "nothing" | "nowhere"
            | "shouldnt" | "wasnt" | "werent" | "without" | "wont" | "wouldnt"
    ) || word.ends_with("n't")
}
