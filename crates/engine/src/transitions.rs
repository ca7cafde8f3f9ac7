use serde::{Deserialize, Serialize};

/// One transition effect anchored at an absolute source timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEffect {
    pub id: u64,
    pub name: String,
    pub at: f64,
    pub duration: f64,
}

/// Derived state of the transition covering the current cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTransition {
    pub id: u64,
    pub name: String,
    pub progress: f64,
}

/// Projects the cursor position onto the effect list.
///
/// Returns the first effect whose `[at, at + duration]` window covers
/// `position`, with progress clamped into `[0, 1]`. Effects without a
/// positive duration are skipped. A read-only projection; nothing here
/// feeds back into the timeline.
pub fn active_transition(effects: &[TransitionEffect], position: f64) -> Option<ActiveTransition> {
    effects
        .iter()
        .filter(|effect| effect.duration > 0.0)
        .find(|effect| position >= effect.at && position <= effect.at + effect.duration)
        .map(|effect| ActiveTransition {
            id: effect.id,
            name: effect.name.clone(),
            progress: ((position - effect.at) / effect.duration).clamp(0.0, 1.0),
        })
}
