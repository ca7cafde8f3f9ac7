use serde::{Deserialize, Serialize};

/// Volume and mute state for one playback channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVolume {
    percent: u8,
    muted: bool,
}

impl ChannelVolume {
    /// Creates a channel volume, capping `percent` at 100.
    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
            muted: false,
        }
    }

    pub fn set_percent(&mut self, percent: u8) {
        self.percent = percent.min(100);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain actually applied to the player: 0.0 when muted, else `percent / 100`.
    pub fn effective(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            f64::from(self.percent) / 100.0
        }
    }
}

impl Default for ChannelVolume {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Per-session playback settings passed explicitly to whoever needs them.
///
/// One value object per session instead of ambient globals: the video track,
/// the background-music track and the voice-over track each carry their own
/// volume and mute state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    pub video: ChannelVolume,
    pub music: ChannelVolume,
    pub voice: ChannelVolume,
}
