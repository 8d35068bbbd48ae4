//! Continuous 0..=100 intensity control for the selected primary emotion.

use super::intensity::IntensityRange;
use super::primary::PrimaryEmotion;

/// Label band for an intensity value.
pub fn intensity_label(intensity: u8) -> &'static str {
    match intensity {
        0..=20 => "Very Low",
        21..=40 => "Low",
        41..=60 => "Moderate",
        61..=80 => "High",
        _ => "Very High",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensitySliderView {
    /// "{Emotion} Intensity", only when an emotion is attached.
    pub heading: Option<String>,
    /// "{band} ({value}%)", only when an emotion is attached.
    pub readout: Option<String>,
    pub value: u8,
    pub min: u8,
    pub max: u8,
    pub step: u8,
    pub disabled: bool,
    pub role: &'static str,
}

/// Controlled slider; `change` snaps to the 5-point grid before calling back.
pub struct EmotionIntensitySlider<F>
where
    F: FnMut(u8),
{
    value: u8,
    emotion: Option<PrimaryEmotion>,
    on_change: F,
    disabled: bool,
}

impl<F> EmotionIntensitySlider<F>
where
    F: FnMut(u8),
{
    pub fn new(value: u8, on_change: F) -> Self {
        Self {
            value: value.min(100),
            emotion: None,
            on_change,
            disabled: false,
        }
    }

    pub fn with_emotion(mut self, emotion: Option<PrimaryEmotion>) -> Self {
        self.emotion = emotion;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value.min(100);
    }

    /// Drag/keyboard input. Returns the emitted value, `None` while disabled.
    pub fn change(&mut self, target: i32) -> Option<u8> {
        if self.disabled {
            return None;
        }
        let snapped = IntensityRange::EMOTION.snap(target) as u8;
        (self.on_change)(snapped);
        Some(snapped)
    }

    pub fn view(&self) -> IntensitySliderView {
        let range = IntensityRange::EMOTION;
        IntensitySliderView {
            heading: self
                .emotion
                .map(|e| format!("{} Intensity", e.display_name())),
            readout: self
                .emotion
                .map(|_| format!("{} ({}%)", intensity_label(self.value), self.value)),
            value: self.value,
            min: range.min as u8,
            max: range.max as u8,
            step: range.step as u8,
            disabled: self.disabled,
            role: "slider",
        }
    }
}
