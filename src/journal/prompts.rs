//! Writing prompts offered above the entry editor.
//!
//! A fixed table: six general prompts plus three for each mood. The editor
//! shows four at a time, picked by the mood the writer has tagged.

use super::filter::Mood;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// How many prompts the editor shows at once.
pub const PROMPTS_SHOWN: usize = 4;

/// A mood needs at least this many prompts of its own before general ones
/// stop being mixed in.
const MOOD_SPECIFIC_MIN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Memory,
    Growth,
    Mindfulness,
    Creative,
    Gratitude,
    Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub id: u32,
    pub text: &'static str,
    pub category: PromptCategory,
    /// `None` for general prompts.
    pub mood: Option<Mood>,
}

const fn prompt(
    id: u32,
    text: &'static str,
    category: PromptCategory,
    mood: Option<Mood>,
) -> Prompt {
    Prompt {
        id,
        text,
        category,
        mood,
    }
}

use PromptCategory::*;

pub static PROMPTS: [Prompt; 21] = [
    // ── General ──
    prompt(1, "What moment from today would you want to remember in 5 years?", Memory, None),
    prompt(2, "What challenged you today, and how did you grow from it?", Growth, None),
    prompt(3, "Describe a small detail you noticed today that others might have missed.", Mindfulness, None),
    prompt(4, "If today had a color, what would it be and why?", Creative, None),
    prompt(5, "What are three things you're grateful for today?", Gratitude, None),
    prompt(6, "How did you make someone else's day better today?", Relationship, None),
    // ── Amazing ──
    prompt(7, "What made you smile the most today?", Memory, Some(Mood::Amazing)),
    prompt(8, "How can you create more moments like today?", Growth, Some(Mood::Amazing)),
    prompt(9, "Who would you want to share this feeling with and why?", Relationship, Some(Mood::Amazing)),
    // ── Good ──
    prompt(10, "What went right today that you didn't expect?", Mindfulness, Some(Mood::Good)),
    prompt(11, "What small victory are you celebrating today?", Growth, Some(Mood::Good)),
    prompt(12, "How did you contribute to your own happiness today?", Gratitude, Some(Mood::Good)),
    // ── Okay ──
    prompt(13, "What would have made today more meaningful?", Growth, Some(Mood::Okay)),
    prompt(14, "What are you looking forward to tomorrow?", Mindfulness, Some(Mood::Okay)),
    prompt(15, "What lesson is today trying to teach you?", Creative, Some(Mood::Okay)),
    // ── Bad ──
    prompt(16, "What do you need right now to feel better?", Mindfulness, Some(Mood::Bad)),
    prompt(17, "How can you be kind to yourself during this difficult time?", Growth, Some(Mood::Bad)),
    prompt(18, "What would you tell a friend going through the same thing?", Relationship, Some(Mood::Bad)),
    // ── Terrible ──
    prompt(19, "What emotions are you feeling, and where do you feel them in your body?", Mindfulness, Some(Mood::Terrible)),
    prompt(20, "What's one small thing you can do to take care of yourself right now?", Growth, Some(Mood::Terrible)),
    prompt(21, "Who or what gives you strength during tough times?", Relationship, Some(Mood::Terrible)),
];

/// The prompts to show for `mood`, drawn from the built-in table.
pub fn prompts_for_mood(mood: Option<Mood>) -> Vec<&'static Prompt> {
    select_for_mood(&PROMPTS, mood)
}

/// Without a mood: the first general prompts. With one: its own prompts if
/// it has enough, otherwise its own followed by general ones. Never more
/// than [`PROMPTS_SHOWN`].
pub fn select_for_mood(table: &[Prompt], mood: Option<Mood>) -> Vec<&Prompt> {
    let general = table.iter().filter(|p| p.mood.is_none());
    let Some(mood) = mood else {
        return general.take(PROMPTS_SHOWN).collect();
    };

    let specific: Vec<&Prompt> = table.iter().filter(|p| p.mood == Some(mood)).collect();
    if specific.len() >= MOOD_SPECIFIC_MIN {
        return specific.into_iter().take(PROMPTS_SHOWN).collect();
    }
    specific
        .into_iter()
        .chain(general)
        .take(PROMPTS_SHOWN)
        .collect()
}

/// Up to `count` distinct prompts in random order, skipping those tagged
/// with `exclude`.
pub fn random_prompts<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    exclude: Option<Mood>,
) -> Vec<&'static Prompt> {
    let pool: Vec<&'static Prompt> = PROMPTS
        .iter()
        .filter(|p| exclude.is_none() || p.mood != exclude)
        .collect();
    pool.choose_multiple(rng, count).copied().collect()
}
