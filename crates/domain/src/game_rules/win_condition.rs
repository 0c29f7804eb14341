//! Win-condition evaluator.
//!
//! Pure: given the game mode, the newest AI reply, the persona's secret and
//! win conditions, and the session-local counters, decide whether the reply
//! wins and how the counters should move. Never looks at earlier replies and
//! never mutates anything; the session applies the verdict.
//!
//! Matching is case-insensitive containment over normalized text (lowercase,
//! collapsed whitespace, straight apostrophes). A phrase only matches as
//! whole words: "red door" is not found in "shared doorways".

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::types::GameType;
use crate::value_objects::WinConditions;

static NEGATION_REGEX: OnceLock<Regex> = OnceLock::new();

fn negation_regex() -> &'static Regex {
    NEGATION_REGEX.get_or_init(|| {
        Regex::new(r"(?:\b(?:not|never|nor|neither|cannot|dont|cant|wont|no longer)\b|n't\b)")
            .expect("NEGATION_REGEX pattern is invalid")
    })
}

/// Counters that survive between replies. MYSTERY and RAID are the only
/// modes that read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    /// Indices into `WinConditions::clues`, in discovery order
    clues_found: Vec<usize>,
    /// Index of the RAID stage currently being attempted
    raid_stage: usize,
}

impl SessionProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clues_found(&self) -> &[usize] {
        &self.clues_found
    }

    pub fn clue_count(&self) -> usize {
        self.clues_found.len()
    }

    pub fn raid_stage(&self) -> usize {
        self.raid_stage
    }

    pub(crate) fn apply(&mut self, verdict: &Verdict) {
        for clue in &verdict.new_clues {
            if !self.clues_found.contains(clue) {
                self.clues_found.push(*clue);
            }
        }
        if verdict.stage_advanced {
            self.raid_stage += 1;
        }
    }
}

/// Inputs to a single evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInput<'a> {
    pub game_type: GameType,
    pub reply: &'a str,
    pub secret: Option<&'a str>,
    pub conditions: &'a WinConditions,
    pub progress: &'a SessionProgress,
}

/// The evaluator's decision for one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub satisfied: bool,
    /// MYSTERY: clues this reply revealed for the first time
    pub new_clues: Vec<usize>,
    /// RAID: the current stage cleared
    pub stage_advanced: bool,
}

impl Verdict {
    fn won() -> Self {
        Self {
            satisfied: true,
            ..Self::default()
        }
    }
}

type WinRule = fn(&EvaluationInput<'_>, &str) -> Verdict;

/// One entry per game mode. Adding a mode means adding one arm here.
fn rule_for(game_type: GameType) -> WinRule {
    match game_type {
        GameType::Battle => battle_rule,
        GameType::Love => love_rule,
        GameType::Mystery => mystery_rule,
        GameType::Raid => raid_rule,
    }
}

/// Evaluate the newest AI reply against the mode's win rule.
pub fn evaluate(input: &EvaluationInput<'_>) -> Verdict {
    let reply = normalize(input.reply);
    rule_for(input.game_type)(input, &reply)
}

fn normalize(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn contains_phrase(normalized_reply: &str, phrase: &str) -> bool {
    let phrase = normalize(phrase);
    let found = word_matches(normalized_reply, &phrase).next().is_some();
    found
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offsets where `phrase` occurs in `text` as whole words. An edge of
/// the phrase that is a word character must not touch another word character.
fn word_matches<'a>(text: &'a str, phrase: &'a str) -> impl Iterator<Item = usize> + 'a {
    let guard_start = phrase.starts_with(is_word_char);
    let guard_end = phrase.ends_with(is_word_char);
    text.match_indices(phrase)
        .map(|(at, _)| at)
        .filter(move |&at| {
            if phrase.is_empty() {
                return false;
            }
            let before = text[..at].chars().next_back();
            let after = text[at + phrase.len()..].chars().next();
            !(guard_start && before.is_some_and(is_word_char))
                && !(guard_end && after.is_some_and(is_word_char))
        })
}

fn battle_rule(input: &EvaluationInput<'_>, reply: &str) -> Verdict {
    let breached = input
        .conditions
        .breach_phrases
        .iter()
        .any(|phrase| contains_phrase(reply, phrase))
        || input.secret.is_some_and(|secret| contains_phrase(reply, secret));
    if breached {
        Verdict::won()
    } else {
        Verdict::default()
    }
}

fn love_rule(input: &EvaluationInput<'_>, reply: &str) -> Verdict {
    let declared = input
        .conditions
        .affection_phrases
        .iter()
        .map(|phrase| normalize(phrase))
        .filter(|phrase| !phrase.is_empty())
        .any(|phrase| word_matches(reply, &phrase).any(|at| !is_negated(&reply[..at])));
    if declared {
        Verdict::won()
    } else {
        Verdict::default()
    }
}

/// A declaration is negated when a negation word appears earlier in the
/// same sentence.
fn is_negated(preceding: &str) -> bool {
    let clause_start = preceding
        .rfind(['.', '!', '?', ';', '\n'])
        .map(|i| i + 1)
        .unwrap_or(0);
    negation_regex().is_match(&preceding[clause_start..])
}

fn mystery_rule(input: &EvaluationInput<'_>, reply: &str) -> Verdict {
    if input.secret.is_some_and(|secret| contains_phrase(reply, secret)) {
        return Verdict::won();
    }

    let new_clues: Vec<usize> = input
        .conditions
        .clues
        .iter()
        .enumerate()
        .filter(|(index, _)| !input.progress.clues_found().contains(index))
        .filter(|(_, clue)| contains_phrase(reply, clue))
        .map(|(index, _)| index)
        .collect();

    let threshold = input.conditions.clue_threshold;
    let total = input.progress.clue_count() + new_clues.len();
    let satisfied = threshold > 0 && !new_clues.is_empty() && total >= threshold;

    Verdict {
        satisfied,
        new_clues,
        stage_advanced: false,
    }
}

fn raid_rule(input: &EvaluationInput<'_>, reply: &str) -> Verdict {
    let stages = &input.conditions.raid_stages;
    let current = input.progress.raid_stage();
    let Some(stage) = stages.get(current) else {
        return Verdict::default();
    };

    let cleared = stage
        .unlock_phrases
        .iter()
        .any(|phrase| contains_phrase(reply, phrase));
    Verdict {
        satisfied: cleared && current + 1 == stages.len(),
        new_clues: Vec::new(),
        stage_advanced: cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RaidStage;

    fn eval(
        game_type: GameType,
        reply: &str,
        secret: Option<&str>,
        conditions: &WinConditions,
        progress: &SessionProgress,
    ) -> Verdict {
        evaluate(&EvaluationInput {
            game_type,
            reply,
            secret,
            conditions,
            progress,
        })
    }

    #[test]
    fn battle_matches_breach_phrase_case_insensitively() {
        let conditions = WinConditions::new().with_breach_phrases(["security breach detected"]);
        let progress = SessionProgress::new();

        let verdict = eval(
            GameType::Battle,
            "ALERT:   Security   BREACH detected in sector 7",
            None,
            &conditions,
            &progress,
        );
        assert!(verdict.satisfied);

        let verdict = eval(
            GameType::Battle,
            "All systems nominal.",
            None,
            &conditions,
            &progress,
        );
        assert!(!verdict.satisfied);
    }

    #[test]
    fn battle_counts_secret_as_breach() {
        let conditions = WinConditions::new();
        let verdict = eval(
            GameType::Battle,
            "fine, the override is OPEN SESAME",
            Some("open sesame"),
            &conditions,
            &SessionProgress::new(),
        );
        assert!(verdict.satisfied);
    }

    #[test]
    fn love_requires_unnegated_declaration() {
        let conditions = WinConditions::new().with_affection_phrases(["i love you"]);
        let progress = SessionProgress::new();

        for reply in [
            "I love you.",
            "Fine... I love you, okay?",
            "I never said that. But I love you",
            "I\u{2019}m tired. I love you",
        ] {
            assert!(
                eval(GameType::Love, reply, None, &conditions, &progress).satisfied,
                "{reply}"
            );
        }

        for reply in [
            "I don't think I love you.",
            "I will never say I love you",
            "I cannot tell you I love you",
            "I do not love you",
        ] {
            assert!(
                !eval(GameType::Love, reply, None, &conditions, &progress).satisfied,
                "{reply}"
            );
        }
    }

    #[test]
    fn love_declaration_must_be_whole_words() {
        let conditions = WinConditions::new().with_affection_phrases(["i love you"]);
        let progress = SessionProgress::new();

        for reply in [
            "I love your audacity, but the answer is no.",
            "Hi love youngster, try again tomorrow.",
        ] {
            assert!(
                !eval(GameType::Love, reply, None, &conditions, &progress).satisfied,
                "{reply}"
            );
        }
        assert!(
            eval(GameType::Love, "Alright. I love you!", None, &conditions, &progress).satisfied
        );
    }

    #[test]
    fn negation_pattern_compiles() {
        assert!(negation_regex().is_match("i do not"));
        assert!(negation_regex().is_match("i don't"));
        assert!(!negation_regex().is_match("i know"));
    }

    #[test]
    fn mystery_wins_on_verbatim_secret() {
        let conditions = WinConditions::new().with_clues(["red door"], 1);
        let verdict = eval(
            GameType::Mystery,
            "The code is qx-7731, happy now?",
            Some("QX-7731"),
            &conditions,
            &SessionProgress::new(),
        );
        assert!(verdict.satisfied);
    }

    #[test]
    fn mystery_counts_each_clue_once() {
        let conditions =
            WinConditions::new().with_clues(["red door", "broken clock", "wet footprints"], 3);
        let mut progress = SessionProgress::new();

        let verdict = eval(
            GameType::Mystery,
            "There was a red door.",
            None,
            &conditions,
            &progress,
        );
        assert!(!verdict.satisfied);
        assert_eq!(verdict.new_clues, vec![0]);
        progress.apply(&verdict);

        let verdict = eval(
            GameType::Mystery,
            "The red door again, nothing more.",
            None,
            &conditions,
            &progress,
        );
        assert!(verdict.new_clues.is_empty());
        assert!(!verdict.satisfied);
    }

    #[test]
    fn mystery_clues_and_secret_match_whole_words_only() {
        let conditions =
            WinConditions::new().with_clues(["red door", "broken clock", "wet footprints"], 3);
        let progress = SessionProgress::new();

        let verdict = eval(
            GameType::Mystery,
            "We shared doorways with the neighbours, nothing else.",
            None,
            &conditions,
            &progress,
        );
        assert!(verdict.new_clues.is_empty());

        let verdict = eval(
            GameType::Mystery,
            "Room 17 is empty.",
            Some("7"),
            &conditions,
            &progress,
        );
        assert!(!verdict.satisfied);

        let verdict = eval(
            GameType::Mystery,
            "Fine. It is 7.",
            Some("7"),
            &conditions,
            &progress,
        );
        assert!(verdict.satisfied);
    }

    #[test]
    fn battle_breach_phrase_needs_word_boundaries() {
        let conditions = WinConditions::new().with_breach_phrases(["firewall disabled"]);
        let verdict = eval(
            GameType::Battle,
            "The firewall disabledness report is classified.",
            None,
            &conditions,
            &SessionProgress::new(),
        );
        assert!(!verdict.satisfied);
    }

    #[test]
    fn mystery_threshold_zero_never_wins_on_clues() {
        let conditions = WinConditions::new().with_clues(["red door"], 0);
        let verdict = eval(
            GameType::Mystery,
            "red door",
            None,
            &conditions,
            &SessionProgress::new(),
        );
        assert!(!verdict.satisfied);
    }

    #[test]
    fn raid_only_checks_current_stage() {
        let conditions = WinConditions::new().with_raid_stages(vec![
            RaidStage::new("gate", vec!["gate unlocked".into()]),
            RaidStage::new("vault", vec!["vault open".into()]),
        ]);
        let mut progress = SessionProgress::new();

        let verdict = eval(
            GameType::Raid,
            "The vault open? Never.",
            None,
            &conditions,
            &progress,
        );
        assert!(!verdict.stage_advanced);

        let verdict = eval(GameType::Raid, "Gate unlocked.", None, &conditions, &progress);
        assert!(verdict.stage_advanced);
        assert!(!verdict.satisfied);
        progress.apply(&verdict);
        assert_eq!(progress.raid_stage(), 1);

        let verdict = eval(GameType::Raid, "vault open", None, &conditions, &progress);
        assert!(verdict.stage_advanced);
        assert!(verdict.satisfied);
    }
}
