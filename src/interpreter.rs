//! Play notation interpreter.
//!
//! Converts a single play code (`S8/G.1-3`, `64(1)3/GDP`, `K+SB2`, ...) into an
//! [`Action`]. Interpretation runs in three steps:
//!
//! ```text
//! raw play ─┬─ event components ──→ ordered rule table (first match wins)
//!           └─ advance section  ──→ movement resolver
//!                                        │
//!           baserunner movements ────────┴──→ batter handler ──→ Action
//! ```
//!
//! 1. The event text is split into components (`K+SB2` is `K` and `SB2`) and
//!    each component is matched against the rule table in declared order.
//! 2. Baserunner-category matches and the explicit advance section are
//!    resolved into one movement map.
//! 3. The primary batter-category handler receives that map, so it can read
//!    where the batter actually ended up, and its own movements are merged
//!    with it.

use crate::action::Action;
use crate::base::Origin;
use crate::batter_rules;
use crate::error::ScoreError;
use crate::movement::{resolve_advances, Bases};
use crate::runner_rules;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A rule handler: the matched component, its regex captures, and the
/// baserunner movements already resolved for the same play.
pub type Handler = fn(&str, &Captures<'_>, &Bases) -> Result<Action, ScoreError>;

/// Which part of the play a rule describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Determines the plate-appearance outcome.
    Batter,
    /// Moves a runner already on base; appended to the play's movements.
    Baserunner,
}

/// One entry of the ordered rule table.
#[derive(Clone)]
pub struct PlayRule {
    name: &'static str,
    category: RuleCategory,
    pattern: Regex,
    handler: Handler,
}

impl std::fmt::Debug for PlayRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayRule")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

impl PlayRule {
    pub fn new(
        name: &'static str,
        category: RuleCategory,
        pattern: Regex,
        handler: Handler,
    ) -> Self {
        Self {
            name,
            category,
            pattern,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Whether this rule's pattern matches `component`.
    pub fn matches(&self, component: &str) -> bool {
        self.pattern.is_match(component)
    }
}

fn standard(
    name: &'static str,
    category: RuleCategory,
    pattern: &str,
    handler: Handler,
) -> PlayRule {
    let pattern = Regex::new(pattern).expect("standard play rule pattern");
    PlayRule::new(name, category, pattern, handler)
}

static STANDARD_RULES: Lazy<Vec<PlayRule>> = Lazy::new(|| {
    use RuleCategory::{Baserunner, Batter};
    vec![
        standard(
            "hit",
            Batter,
            r"^(HR)|^([SDT])\d*!?/|^(DGR)|^([SDT])\d$",
            batter_rules::hit,
        ),
        // Older files omit the hit location and sometimes end lines in '#'.
        standard("legacy-hit", Batter, r"^([SDT])\d*#*$", batter_rules::legacy_hit),
        standard("hit-by-pitch", Batter, r"^HP", batter_rules::hit_by_pitch),
        standard("walk", Batter, r"^(I)?W[^P]|^(I)?W$|^(I)", batter_rules::walk),
        standard("error", Batter, r"^\d?C?/?E(\d)", batter_rules::error),
        standard("fielders-choice", Batter, r"^FC(\d*)", batter_rules::fielders_choice),
        standard("foul-error", Batter, r"^FLE(\d)", batter_rules::foul_error),
        standard("strikeout", Batter, r"^K", batter_rules::strikeout),
        standard("simple-out", Batter, r"^(\d+)/", batter_rules::simple_out),
        standard(
            "multi-out",
            Batter,
            r"^(\d+)\(([B123])\)",
            batter_rules::multi_out,
        ),
        standard(
            "caught-stealing",
            Baserunner,
            r"^(PO)?CS([23H])\(([\dE]+)\)",
            runner_rules::caught_stealing,
        ),
        standard("stolen-base", Baserunner, r"^SB([23H])", runner_rules::stolen_base),
        standard(
            "pickoff",
            Baserunner,
            r"^PO([123])\((E?\d+)\)",
            runner_rules::pick_off,
        ),
        // Placeholder for unknown plays in very old files.
        standard("legacy-unknown", Batter, r"^99", batter_rules::unknown),
        standard(
            "runner-advance",
            Baserunner,
            r"^(WP|PB|BK|DI|OA|NP)$",
            runner_rules::advance_only,
        ),
    ]
});

/// Interprets play codes against an ordered rule table.
///
/// Rules are tried strictly in declared order and the first one whose
/// pattern matches wins; later rules are never consulted for that
/// component.
///
/// # Examples
///
/// ```rust
/// use retroscore::{Action, Base, Bases, PlayInterpreter};
/// use retroscore::result;
///
/// let interpreter = PlayInterpreter::new();
/// let action = interpreter.interpret("S8/G").unwrap();
///
/// assert_eq!(
///     action,
///     Action::with_result(result::hit(Base::First)).with_bases(Bases::batter_to(Base::First))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PlayInterpreter {
    rules: Vec<PlayRule>,
}

impl PlayInterpreter {
    /// An interpreter using the standard rule table.
    pub fn new() -> Self {
        Self {
            rules: STANDARD_RULES.clone(),
        }
    }

    /// An interpreter using a caller-supplied table, evaluated in the given
    /// order.
    pub fn with_rules(rules: Vec<PlayRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PlayRule] {
        &self.rules
    }

    /// The rule that would handle `component`: the first in table order
    /// whose pattern matches.
    ///
    /// ```rust
    /// use retroscore::PlayInterpreter;
    ///
    /// let interpreter = PlayInterpreter::new();
    /// assert_eq!(interpreter.matching_rule("K").unwrap().name(), "strikeout");
    /// assert!(interpreter.matching_rule("ZZ").is_none());
    /// ```
    pub fn matching_rule(&self, component: &str) -> Option<&PlayRule> {
        self.rules.iter().find(|rule| rule.matches(component))
    }

    fn match_component<'a>(
        &self,
        component: &'a str,
        play: &str,
    ) -> Result<(&PlayRule, Captures<'a>), ScoreError> {
        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(component) {
                log::debug!("play '{}': component '{}' matched {}", play, component, rule.name);
                return Ok((rule, caps));
            }
        }
        Err(ScoreError::UnrecognizedPlayNotation(play.to_string()))
    }

    /// Interpret one play code.
    ///
    /// # Errors
    ///
    /// * `UnrecognizedPlayNotation` - a component matches no rule, or the
    ///   advance section is malformed
    /// * `MissingDefensivePosition` - an out names no fielder
    /// * `AmbiguousBaseOrigin` - two fragments contradict each other about
    ///   the same runner
    pub fn interpret(&self, play: &str) -> Result<Action, ScoreError> {
        let play = play.trim();
        let (event, advance_section) = match play.split_once('.') {
            Some((event, advances)) => (event, advances),
            None => (play, ""),
        };
        let event: String = event.chars().filter(|c| !matches!(c, '!' | '?')).collect();

        let components = split_components(&event);
        if components.is_empty() {
            return Err(ScoreError::UnrecognizedPlayNotation(play.to_string()));
        }

        let mut runner_moves = Bases::new();
        let mut primary = None;
        for (index, component) in components.iter().enumerate() {
            let (rule, caps) = self.match_component(component, play)?;
            if index == 0 && rule.category == RuleCategory::Batter {
                primary = Some((rule, caps, *component));
                continue;
            }
            // Secondary components only contribute movement. A secondary
            // batter outcome (the E2 of K+E2) rides on the batter's entry.
            let action = (rule.handler)(component, &caps, &Bases::new())?;
            for (origin, entry) in action.bases.iter() {
                let mut entry = entry.clone();
                if origin == Origin::Batter && rule.category == RuleCategory::Batter {
                    entry.is_at_bat_result = false;
                    entry.result = entry.result.or_else(|| action.result.clone());
                }
                runner_moves.insert_unique(origin, entry, play)?;
            }
        }

        let mut movements = runner_moves;
        movements.merge_all(resolve_advances(advance_section, play)?, play)?;

        let Some((rule, caps, component)) = primary else {
            return Ok(Action::empty().with_bases(movements));
        };

        let mut action = (rule.handler)(component, &caps, &movements)?;
        let mut bases = std::mem::take(&mut action.bases);
        bases.merge_all(movements, play)?;
        action.bases = bases;
        Ok(action)
    }
}

impl Default for PlayInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split event text on `+` and `;` separators that start a new event
/// (an uppercase letter follows).
fn split_components(event: &str) -> Vec<&str> {
    let mut components = Vec::new();
    let mut start = 0;
    let bytes = event.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let starts_event = bytes
            .get(i + 1)
            .is_some_and(|next| next.is_ascii_uppercase());
        if (b == b'+' || b == b';') && starts_event {
            components.push(&event[start..i]);
            start = i + 1;
        }
    }
    components.push(&event[start..]);
    components.retain(|c| !c.is_empty());
    components
}
