//! Energy Level Selector: a single bipolar -50..=50 axis.
//!
//! Zero is neutral, negative is depletion, positive is activation. Unlike the
//! wheel there is no cycling: every change is clamped, snapped and emitted.

use super::intensity::IntensityRange;
use serde::{Deserialize, Serialize};

/// Presentation band of an energy value. Each band includes its upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyBand {
    Drained,
    Low,
    Neutral,
    Energized,
    HighlyEnergized,
}

/// Icon family shown next to the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyIcon {
    BatteryLow,
    Battery,
    Zap,
}

impl EnergyBand {
    /// ≤-30 Drained, ≤-10 Low Energy, ≤10 Neutral, ≤30 Energized, else Highly Energized.
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=-30 => EnergyBand::Drained,
            -29..=-10 => EnergyBand::Low,
            -9..=10 => EnergyBand::Neutral,
            11..=30 => EnergyBand::Energized,
            _ => EnergyBand::HighlyEnergized,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnergyBand::Drained => "Drained",
            EnergyBand::Low => "Low Energy",
            EnergyBand::Neutral => "Neutral",
            EnergyBand::Energized => "Energized",
            EnergyBand::HighlyEnergized => "Highly Energized",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EnergyBand::Drained => "Feeling depleted and need rest",
            EnergyBand::Low => "Below average energy, somewhat tired",
            EnergyBand::Neutral => "Balanced energy state",
            EnergyBand::Energized => "Good energy, feeling active",
            EnergyBand::HighlyEnergized => "High energy, feeling very active",
        }
    }

    pub fn icon(&self) -> EnergyIcon {
        match self {
            EnergyBand::Drained | EnergyBand::Low => EnergyIcon::BatteryLow,
            EnergyBand::Neutral => EnergyIcon::Battery,
            EnergyBand::Energized | EnergyBand::HighlyEnergized => EnergyIcon::Zap,
        }
    }
}

/// Shorthand for `EnergyBand::from_level(level).label()`.
pub fn energy_label(level: i32) -> &'static str {
    EnergyBand::from_level(level).label()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnergyView {
    pub value: i32,
    pub band: EnergyBand,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: EnergyIcon,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub disabled: bool,
    pub role: &'static str,
    pub markers: [&'static str; 5],
}

/// Controlled energy slider.
pub struct EnergyLevelSlider<F>
where
    F: FnMut(i32),
{
    value: i32,
    on_change: F,
    disabled: bool,
}

impl<F> EnergyLevelSlider<F>
where
    F: FnMut(i32),
{
    pub fn new(value: i32, on_change: F) -> Self {
        Self {
            value: IntensityRange::ENERGY.clamp(value),
            on_change,
            disabled: false,
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = IntensityRange::ENERGY.clamp(value);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Slider input. Returns the emitted value, `None` while disabled.
    pub fn change(&mut self, target: i32) -> Option<i32> {
        if self.disabled {
            return None;
        }
        let next = IntensityRange::ENERGY.snap(target);
        (self.on_change)(next);
        Some(next)
    }

    pub fn view(&self) -> EnergyView {
        let band = EnergyBand::from_level(self.value);
        let range = IntensityRange::ENERGY;
        EnergyView {
            value: self.value,
            band,
            label: band.label(),
            description: band.description(),
            icon: band.icon(),
            min: range.min,
            max: range.max,
            step: range.step,
            disabled: self.disabled,
            role: "slider",
            markers: ["Drained", "Low", "Neutral", "High", "Energized"],
        }
    }
}
