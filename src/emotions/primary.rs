//! Primary Emotion Selector: the 8-segment Plutchik wheel.
//!
//! The wheel is fully controlled: it never stores the selection it emits.
//! The owner re-supplies `selected` after every callback, exactly like a
//! controlled form field.

use super::intensity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Vocabulary ─────────────────────────────────────────

/// Plutchik's eight primary emotions, mutually exclusive on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryEmotion {
    Joy,
    Trust,
    Fear,
    Surprise,
    Sadness,
    Disgust,
    Anger,
    Anticipation,
}

impl PrimaryEmotion {
    /// Wheel order, clockwise from 0°.
    pub const ALL: [PrimaryEmotion; 8] = [
        PrimaryEmotion::Joy,
        PrimaryEmotion::Trust,
        PrimaryEmotion::Fear,
        PrimaryEmotion::Surprise,
        PrimaryEmotion::Sadness,
        PrimaryEmotion::Disgust,
        PrimaryEmotion::Anger,
        PrimaryEmotion::Anticipation,
    ];

    /// Lowercase wire/label name.
    pub fn name(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "joy",
            PrimaryEmotion::Trust => "trust",
            PrimaryEmotion::Fear => "fear",
            PrimaryEmotion::Surprise => "surprise",
            PrimaryEmotion::Sadness => "sadness",
            PrimaryEmotion::Disgust => "disgust",
            PrimaryEmotion::Anger => "anger",
            PrimaryEmotion::Anticipation => "anticipation",
        }
    }

    /// Capitalized name used in captions ("Joy").
    pub fn display_name(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "Joy",
            PrimaryEmotion::Trust => "Trust",
            PrimaryEmotion::Fear => "Fear",
            PrimaryEmotion::Surprise => "Surprise",
            PrimaryEmotion::Sadness => "Sadness",
            PrimaryEmotion::Disgust => "Disgust",
            PrimaryEmotion::Anger => "Anger",
            PrimaryEmotion::Anticipation => "Anticipation",
        }
    }

    /// Position on the wheel in degrees.
    pub fn angle(&self) -> u16 {
        match self {
            PrimaryEmotion::Joy => 0,
            PrimaryEmotion::Trust => 45,
            PrimaryEmotion::Fear => 90,
            PrimaryEmotion::Surprise => 135,
            PrimaryEmotion::Sadness => 180,
            PrimaryEmotion::Disgust => 225,
            PrimaryEmotion::Anger => 270,
            PrimaryEmotion::Anticipation => 315,
        }
    }

    /// Accessible name of the segment control: `Select {emotion} emotion`.
    pub fn accessible_name(&self) -> String {
        format!("Select {} emotion", self.name())
    }
}

impl fmt::Display for PrimaryEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for PrimaryEmotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        PrimaryEmotion::ALL
            .into_iter()
            .find(|e| e.name() == lower)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// The active primary emotion and its 0..=100 intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimarySelection {
    pub emotion: PrimaryEmotion,
    pub intensity: u8,
}

impl PrimarySelection {
    pub fn new(emotion: PrimaryEmotion, intensity: u8) -> Self {
        Self {
            emotion,
            intensity: intensity.min(100),
        }
    }
}

// ── Render model ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    pub emotion: PrimaryEmotion,
    pub label: &'static str,
    pub accessible_name: String,
    pub angle: u16,
    pub selected: bool,
    pub disabled: bool,
    pub opacity: f32,
    pub scale: f32,
}

/// Caption under the wheel, e.g. "Joy" / "Intensity: 80%".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelCaption {
    pub emotion: String,
    pub intensity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelView {
    /// "{intensity}%" when something is selected, otherwise "Select".
    pub center_label: String,
    pub segments: Vec<SegmentView>,
    pub caption: Option<WheelCaption>,
}

// ── Component ──────────────────────────────────────────

/// Controlled wheel of the eight primary emotions.
pub struct EmotionWheel<F>
where
    F: FnMut(PrimaryEmotion, u8),
{
    selected: Option<PrimarySelection>,
    on_emotion_select: F,
    disabled: bool,
    /// Hover is local presentation state only.
    hovered: Option<PrimaryEmotion>,
}

impl<F> EmotionWheel<F>
where
    F: FnMut(PrimaryEmotion, u8),
{
    pub fn new(on_emotion_select: F) -> Self {
        Self {
            selected: None,
            on_emotion_select,
            disabled: false,
            hovered: None,
        }
    }

    pub fn with_selected(mut self, selected: Option<PrimarySelection>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_selected(&mut self, selected: Option<PrimarySelection>) {
        self.selected = selected;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.hovered = None;
        }
    }

    pub fn selected(&self) -> Option<PrimarySelection> {
        self.selected
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Intensity a click on `emotion` would emit, or `None` while disabled.
    pub fn resolve_click(&self, emotion: PrimaryEmotion) -> Option<u8> {
        if self.disabled {
            return None;
        }
        let current = self.selected.as_ref().map(|s| (&s.emotion, s.intensity));
        Some(intensity::next_on_click(current, &emotion))
    }

    /// Activate a segment. Returns whether the callback fired.
    pub fn click(&mut self, emotion: PrimaryEmotion) -> bool {
        match self.resolve_click(emotion) {
            Some(next) => {
                (self.on_emotion_select)(emotion, next);
                true
            }
            None => false,
        }
    }

    /// Activate the segment whose accessible name matches `accessible_name`.
    pub fn click_by_label(&mut self, accessible_name: &str) -> bool {
        match PrimaryEmotion::ALL
            .into_iter()
            .find(|e| e.accessible_name() == accessible_name)
        {
            Some(emotion) => self.click(emotion),
            None => false,
        }
    }

    pub fn hover(&mut self, emotion: PrimaryEmotion) {
        if !self.disabled {
            self.hovered = Some(emotion);
        }
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    fn opacity(&self, emotion: PrimaryEmotion) -> f32 {
        match self.selected {
            Some(sel) if sel.emotion == emotion => sel.intensity as f32 / 100.0,
            _ if self.hovered == Some(emotion) => 0.8,
            _ => 0.6,
        }
    }

    fn scale(&self, emotion: PrimaryEmotion) -> f32 {
        match self.selected {
            Some(sel) if sel.emotion == emotion => 1.0 + sel.intensity as f32 / 200.0,
            _ if self.hovered == Some(emotion) => 1.1,
            _ => 1.0,
        }
    }

    pub fn view(&self) -> WheelView {
        let segments = PrimaryEmotion::ALL
            .into_iter()
            .map(|emotion| SegmentView {
                emotion,
                label: emotion.name(),
                accessible_name: emotion.accessible_name(),
                angle: emotion.angle(),
                selected: self.selected.map(|s| s.emotion) == Some(emotion),
                disabled: self.disabled,
                opacity: self.opacity(emotion),
                scale: self.scale(emotion),
            })
            .collect();

        WheelView {
            center_label: match self.selected {
                Some(sel) => format!("{}%", sel.intensity),
                None => "Select".to_string(),
            },
            segments,
            caption: self.selected.map(|sel| WheelCaption {
                emotion: sel.emotion.display_name().to_string(),
                intensity: format!("Intensity: {}%", sel.intensity),
            }),
        }
    }
}
