//! Secondary ("mixed") emotions: capped, order-preserving multi-select.

use super::primary::UnknownEmotion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default cap on simultaneously selected secondary emotions.
pub const DEFAULT_MAX_SELECTIONS: usize = 3;
/// Options shown before the "show more" disclosure is opened.
pub const INITIAL_VISIBLE: usize = 8;

// ── Vocabulary ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryEmotion {
    Excited,
    Nervous,
    Confident,
    Overwhelmed,
    Grateful,
    Frustrated,
    Curious,
    Content,
    Anxious,
    Hopeful,
    Disappointed,
    Proud,
    Embarrassed,
    Peaceful,
    Restless,
}

impl SecondaryEmotion {
    /// Display order of the option grid.
    pub const ALL: [SecondaryEmotion; 15] = [
        SecondaryEmotion::Excited,
        SecondaryEmotion::Nervous,
        SecondaryEmotion::Confident,
        SecondaryEmotion::Overwhelmed,
        SecondaryEmotion::Grateful,
        SecondaryEmotion::Frustrated,
        SecondaryEmotion::Curious,
        SecondaryEmotion::Content,
        SecondaryEmotion::Anxious,
        SecondaryEmotion::Hopeful,
        SecondaryEmotion::Disappointed,
        SecondaryEmotion::Proud,
        SecondaryEmotion::Embarrassed,
        SecondaryEmotion::Peaceful,
        SecondaryEmotion::Restless,
    ];

    /// Lowercase label; also the control's accessible name.
    pub fn label(&self) -> &'static str {
        match self {
            SecondaryEmotion::Excited => "excited",
            SecondaryEmotion::Nervous => "nervous",
            SecondaryEmotion::Confident => "confident",
            SecondaryEmotion::Overwhelmed => "overwhelmed",
            SecondaryEmotion::Grateful => "grateful",
            SecondaryEmotion::Frustrated => "frustrated",
            SecondaryEmotion::Curious => "curious",
            SecondaryEmotion::Content => "content",
            SecondaryEmotion::Anxious => "anxious",
            SecondaryEmotion::Hopeful => "hopeful",
            SecondaryEmotion::Disappointed => "disappointed",
            SecondaryEmotion::Proud => "proud",
            SecondaryEmotion::Embarrassed => "embarrassed",
            SecondaryEmotion::Peaceful => "peaceful",
            SecondaryEmotion::Restless => "restless",
        }
    }
}

impl fmt::Display for SecondaryEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SecondaryEmotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        SecondaryEmotion::ALL
            .into_iter()
            .find(|e| e.label() == lower)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

static OPTION_ORDER: [SecondaryEmotion; 15] = SecondaryEmotion::ALL;

// ── Selection rules ────────────────────────────────────

/// Result of toggling `emotion` against `selected` with cap `max`.
///
/// `None` means the toggle is rejected (unselected label at the cap).
pub fn toggle(
    selected: &[SecondaryEmotion],
    emotion: SecondaryEmotion,
    max: usize,
) -> Option<Vec<SecondaryEmotion>> {
    if selected.contains(&emotion) {
        Some(remove(selected, emotion))
    } else if selected.len() < max {
        let mut next = selected.to_vec();
        next.push(emotion);
        Some(next)
    } else {
        None
    }
}

/// `selected` without `emotion`, order of the rest preserved.
pub fn remove(selected: &[SecondaryEmotion], emotion: SecondaryEmotion) -> Vec<SecondaryEmotion> {
    selected.iter().copied().filter(|e| *e != emotion).collect()
}

// ── Render model ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub emotion: SecondaryEmotion,
    pub label: &'static str,
    pub selected: bool,
    /// Unselected options turn non-interactive once the cap is reached.
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub emotion: SecondaryEmotion,
    pub label: &'static str,
    /// "Remove {label}"; absent while the selector is disabled.
    pub dismiss_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedEmotionsView {
    pub title: &'static str,
    pub hint: String,
    pub chips: Vec<ChipView>,
    pub options: Vec<OptionView>,
    pub disclosure_label: Option<String>,
    pub limit_message: Option<String>,
}

// ── Component ──────────────────────────────────────────

/// Controlled multi-select over [`SecondaryEmotion`].
pub struct MixedEmotionsSelector<F>
where
    F: FnMut(Vec<SecondaryEmotion>),
{
    selected: Vec<SecondaryEmotion>,
    on_emotions_change: F,
    max_selections: usize,
    disabled: bool,
    show_all: bool,
}

impl<F> MixedEmotionsSelector<F>
where
    F: FnMut(Vec<SecondaryEmotion>),
{
    pub fn new(selected: Vec<SecondaryEmotion>, on_emotions_change: F) -> Self {
        Self {
            selected,
            on_emotions_change,
            max_selections: DEFAULT_MAX_SELECTIONS,
            disabled: false,
            show_all: false,
        }
    }

    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = max;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_selected(&mut self, selected: Vec<SecondaryEmotion>) {
        self.selected = selected;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn selected(&self) -> &[SecondaryEmotion] {
        &self.selected
    }

    pub fn max_selections(&self) -> usize {
        self.max_selections
    }

    pub fn at_limit(&self) -> bool {
        self.selected.len() >= self.max_selections
    }

    /// Activate an option control. Returns whether the callback fired.
    pub fn toggle(&mut self, emotion: SecondaryEmotion) -> bool {
        if self.disabled {
            return false;
        }
        match toggle(&self.selected, emotion, self.max_selections) {
            Some(next) => {
                (self.on_emotions_change)(next);
                true
            }
            None => false,
        }
    }

    /// Activate a rendered option by its literal lowercase label text.
    /// Options hidden behind the disclosure are not addressable.
    pub fn toggle_label(&mut self, label: &str) -> bool {
        match self.visible().iter().find(|e| e.label() == label) {
            Some(&emotion) => self.toggle(emotion),
            None => false,
        }
    }

    fn visible(&self) -> &'static [SecondaryEmotion] {
        if self.show_all {
            &OPTION_ORDER[..]
        } else {
            &OPTION_ORDER[..INITIAL_VISIBLE]
        }
    }

    /// Dismiss affordance on a selected chip.
    pub fn dismiss(&mut self, emotion: SecondaryEmotion) -> bool {
        if self.disabled || !self.selected.contains(&emotion) {
            return false;
        }
        (self.on_emotions_change)(remove(&self.selected, emotion));
        true
    }

    /// Show more / show less. Never touches the selection.
    pub fn toggle_show_all(&mut self) {
        if !self.disabled {
            self.show_all = !self.show_all;
        }
    }

    pub fn is_showing_all(&self) -> bool {
        self.show_all
    }

    pub fn view(&self) -> MixedEmotionsView {
        let visible = self.visible();
        let at_limit = self.at_limit();

        let options = visible
            .iter()
            .map(|&emotion| {
                let selected = self.selected.contains(&emotion);
                OptionView {
                    emotion,
                    label: emotion.label(),
                    selected,
                    disabled: self.disabled || (!selected && at_limit),
                }
            })
            .collect();

        let chips = self
            .selected
            .iter()
            .map(|&emotion| ChipView {
                emotion,
                label: emotion.label(),
                dismiss_name: (!self.disabled).then(|| format!("Remove {}", emotion.label())),
            })
            .collect();

        let hidden = SecondaryEmotion::ALL.len().saturating_sub(INITIAL_VISIBLE);
        let disclosure_label = (hidden > 0).then(|| {
            if self.show_all {
                "Show Less".to_string()
            } else {
                format!("Show More ({} more)", hidden)
            }
        });

        MixedEmotionsView {
            title: "Mixed Feelings? (Optional)",
            hint: format!(
                "Select up to {} additional emotions you're experiencing",
                self.max_selections
            ),
            chips,
            options,
            disclosure_label,
            limit_message: at_limit
                .then(|| format!("Maximum of {} emotions selected", self.max_selections)),
        }
    }
}
