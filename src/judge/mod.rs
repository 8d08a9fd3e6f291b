mod levenshtein;

pub use levenshtein::levenshtein;

use crate::STOP_WORDS;

/// Outcome of comparing a candidate answer against the reference answer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Judgment {
    pub correct: bool,
    pub similarity: f32,
}

impl Judgment {
    fn new(correct: bool, similarity: f32) -> Self {
        Self {
            correct,
            similarity: similarity.clamp(0.0, 1.0),
        }
    }
}

/// Cascaded exact / keyword / edit-distance answer comparator.
///
/// Stages run in order and the first one to produce a verdict wins:
/// blank input, normalized equality, keyword overlap, whole-string edit
/// distance, and finally a similarity-only fallback.
pub struct AnswerJudge;

impl AnswerJudge {
    pub fn check(candidate: &str, reference: &str) -> Judgment {
        let cand = normalize(candidate);
        let refr = normalize(reference);

        if cand.is_empty() {
            return Judgment::new(false, 0.0);
        }
        if cand == refr {
            return Judgment::new(true, 1.0);
        }
        if keyword_match(&cand, &refr) {
            return Judgment::new(true, 0.8);
        }
        let d = levenshtein(&cand, &refr);
        let tolerance = std::cmp::max(2, (refr.chars().count() as f64 * 0.2).floor() as usize);
        if d <= tolerance {
            let len = refr.chars().count().max(1);
            return Judgment::new(true, 1.0 - d as f32 / len as f32);
        }
        let len = refr.chars().count().max(cand.chars().count()).max(1);
        Judgment::new(false, (1.0 - d as f32 / len as f32).max(0.0))
    }
}

/// lowercase, strip non-alphanumeric/non-space, collapse whitespace, trim
fn normalize(s: &str) -> String {
    let stripped: String = s
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(' ')
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !STOP_WORDS.contains(w))
        .collect()
}

fn keyword_match(cand: &str, refr: &str) -> bool {
    let cand_words = tokenize(cand);
    let refr_words = tokenize(refr);
    cand_words
        .iter()
        .any(|cw| refr_words.iter().any(|pw| words_match(cw, pw)))
}

fn words_match(cw: &str, pw: &str) -> bool {
    if cw == pw {
        return true;
    }
    let (longer, shorter) = if cw.len() >= pw.len() {
        (cw, pw)
    } else {
        (pw, cw)
    };
    if shorter.len() > 3 && longer.contains(shorter) {
        return true;
    }
    let tolerance = (cw.chars().count() as f64 * 0.25).floor() as usize;
    levenshtein(cw, pw) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_perfect() {
        let j = AnswerJudge::check("Gatsby", "Gatsby");
        assert!(j.correct);
        assert_eq!(j.similarity, 1.0);
    }

    #[test]
    fn blank_candidate_never_correct() {
        let j = AnswerJudge::check("", "anything");
        assert!(!j.correct);
        assert_eq!(j.similarity, 0.0);
        let j = AnswerJudge::check("   ", "anything");
        assert!(!j.correct);
    }

    #[test]
    fn keyword_match_scores_point_eight() {
        let j = AnswerJudge::check("the great gatsby", "Gatsby");
        assert!(j.correct);
        assert_eq!(j.similarity, 0.8);
    }

    #[test]
    fn edit_distance_tolerates_typos() {
        let j = AnswerJudge::check("Einstien", "Einstein");
        assert!(j.correct);
        assert!(j.similarity >= 0.8);
    }

    #[test]
    fn unrelated_answer_is_wrong() {
        let j = AnswerJudge::check("bananas", "Einstein");
        assert!(!j.correct);
    }

    #[test]
    fn stop_words_are_ignored_in_keyword_match() {
        // "what is the" carries no content word, so this must NOT match
        // on any stray common short token.
        let j = AnswerJudge::check("what is the", "photosynthesis");
        assert!(!j.correct);
    }
}
