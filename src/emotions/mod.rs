pub mod context;
pub mod energy;
pub mod intensity;
pub mod intensity_slider;
pub mod primary;
pub mod secondary;
pub mod submit;


pub use context::{EmotionContext, EmotionProvider, EmotionSnapshot, EntryContext, SessionError};
pub use energy::{energy_label, EnergyBand, EnergyLevelSlider};
pub use intensity::IntensityRange;
pub use intensity_slider::EmotionIntensitySlider;
pub use primary::{EmotionWheel, PrimaryEmotion, PrimarySelection, UnknownEmotion};
pub use secondary::{MixedEmotionsSelector, SecondaryEmotion};
pub use submit::EmotionSubmitter;
