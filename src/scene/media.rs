//! Seam between the scene and whatever decodes and plays media.
//!
//! The scene never decodes anything itself. It issues [`MediaRequest`]s to an optional
//! [`MediaBackend`] and learns about playback progress through [`MediaReport`]s, which it turns
//! into [`SceneEvent`]s for inspectors.

use std::path::PathBuf;

use crate::foundation::error::{GrailError, GrailResult};

/// Playback state of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not playing; position is at the start.
    #[default]
    Stopped,
    /// Advancing.
    Playing,
    /// Holding the current position.
    Paused,
}

impl PlaybackState {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a layer does when its media reaches the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Stop and rewind.
    #[default]
    Stop,
    /// Hold the last frame.
    Pause,
    /// Restart from the beginning.
    Loop,
}

impl TransportMode {
    /// Parse `"stop"`, `"pause"` or `"loop"`.
    pub fn parse(s: &str) -> GrailResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop" => Ok(Self::Stop),
            "pause" => Ok(Self::Pause),
            "loop" => Ok(Self::Loop),
            other => Err(GrailError::validation(format!(
                "unknown transport mode \"{other}\""
            ))),
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Loop => "loop",
        }
    }
}

/// Work the scene asks of the media backend.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaRequest {
    /// Open a new source for `layer`.
    Load {
        /// Target layer id.
        layer: u32,
        /// Source path as received.
        path: PathBuf,
    },
    /// Start or resume playback.
    Play {
        /// Target layer id.
        layer: u32,
    },
    /// Hold the current frame.
    Pause {
        /// Target layer id.
        layer: u32,
    },
    /// Stop and rewind.
    Stop {
        /// Target layer id.
        layer: u32,
    },
    /// Jump to a position.
    Seek {
        /// Target layer id.
        layer: u32,
        /// Position in milliseconds.
        position_ms: u64,
    },
    /// Effective output volume (layer volume times scene volume).
    Volume {
        /// Target layer id.
        layer: u32,
        /// Volume in `[0, 1]`.
        volume: f64,
    },
}

/// Receiver of [`MediaRequest`]s.
pub trait MediaBackend: Send {
    /// Handle one request. Failures come back later as [`MediaReport::Error`].
    fn request(&mut self, request: MediaRequest);
}

/// Progress reported back by the media backend.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaReport {
    /// Current playback position.
    Position {
        /// Layer id.
        layer: u32,
        /// Position in milliseconds.
        position_ms: u64,
    },
    /// Duration of the loaded source became known.
    Duration {
        /// Layer id.
        layer: u32,
        /// Duration in milliseconds.
        duration_ms: u64,
    },
    /// The backend changed state on its own.
    State {
        /// Layer id.
        layer: u32,
        /// New state.
        state: PlaybackState,
    },
    /// Playback reached the end of the source.
    EndOfMedia {
        /// Layer id.
        layer: u32,
    },
    /// The source could not be opened or decoded.
    Error {
        /// Layer id.
        layer: u32,
        /// Backend-provided description.
        message: String,
    },
}

impl MediaReport {
    /// Layer this report is about.
    pub fn layer(&self) -> u32 {
        match self {
            Self::Position { layer, .. }
            | Self::Duration { layer, .. }
            | Self::State { layer, .. }
            | Self::EndOfMedia { layer }
            | Self::Error { layer, .. } => *layer,
        }
    }
}

/// Outgoing notification for inspectors, addressed like `!clip/{n}/playback/...`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// `!clip/{n}/playback/position`
    Position {
        /// Layer id.
        layer: u32,
        /// Position in milliseconds.
        position_ms: u64,
    },
    /// `!clip/{n}/playback/duration`
    Duration {
        /// Layer id.
        layer: u32,
        /// Duration in milliseconds.
        duration_ms: u64,
    },
    /// `!clip/{n}/playback/state`
    State {
        /// Layer id.
        layer: u32,
        /// New state.
        state: PlaybackState,
    },
}

impl SceneEvent {
    /// Message address of this event.
    pub fn address(&self) -> String {
        match self {
            Self::Position { layer, .. } => format!("!clip/{layer}/playback/position"),
            Self::Duration { layer, .. } => format!("!clip/{layer}/playback/duration"),
            Self::State { layer, .. } => format!("!clip/{layer}/playback/state"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/media.rs"]
mod tests;
