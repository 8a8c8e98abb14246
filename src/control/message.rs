//! Control messages and the closed set of commands they decode into.

use crate::foundation::core::Color;
use crate::foundation::error::{GrailError, GrailResult};
use crate::scene::media::{SceneEvent, TransportMode};
use crate::scene::text::{CaseTransform, HAlign, VAlign};

/// One positional argument of a control message.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
}

impl ControlValue {
    /// Numeric view; integers widen, strings parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view; floats truncate toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            Self::Float(_) => None,
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Str(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.trunc() as i64)
                })
            }
        }
    }

    /// Boolean view: booleans, non-zero numbers, `"true"`/`"false"`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(v) => Some(*v != 0),
            Self::Float(v) => Some(*v != 0.0),
            Self::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
        }
    }

    /// String view. Numbers and booleans are not coerced.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for ControlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ControlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ControlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ControlValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A named message with positional arguments, as received from a control surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlMessage {
    /// Address such as `/comp/size` or `/clip/1/opacity`.
    pub address: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<ControlValue>,
}

impl ControlMessage {
    /// Build a message from an address and arguments.
    pub fn new(address: impl Into<String>, args: Vec<ControlValue>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Message without arguments.
    pub fn bare(address: impl Into<String>) -> Self {
        Self::new(address, Vec::new())
    }

    fn arg(&self, i: usize) -> GrailResult<&ControlValue> {
        self.args.get(i).ok_or_else(|| {
            GrailError::message(format!(
                "{} expects at least {} argument(s), got {}",
                self.address,
                i + 1,
                self.args.len()
            ))
        })
    }

    fn f64_arg(&self, i: usize) -> GrailResult<f64> {
        self.arg(i)?.as_f64().ok_or_else(|| self.bad_arg(i, "a number"))
    }

    fn i64_arg(&self, i: usize) -> GrailResult<i64> {
        self.arg(i)?.as_i64().ok_or_else(|| self.bad_arg(i, "an integer"))
    }

    fn bool_arg(&self, i: usize) -> GrailResult<bool> {
        self.arg(i)?.as_bool().ok_or_else(|| self.bad_arg(i, "a boolean"))
    }

    fn str_arg(&self, i: usize) -> GrailResult<&str> {
        self.arg(i)?.as_str().ok_or_else(|| self.bad_arg(i, "a string"))
    }

    fn bad_arg(&self, i: usize, expected: &str) -> GrailError {
        GrailError::message(format!(
            "{} argument {} should be {expected}, got {:?}",
            self.address, i, self.args[i]
        ))
    }
}

impl From<&SceneEvent> for ControlMessage {
    fn from(event: &SceneEvent) -> Self {
        let ms = |v: u64| ControlValue::Int(i64::try_from(v).unwrap_or(i64::MAX));
        let arg = match event {
            SceneEvent::Position { position_ms, .. } => ms(*position_ms),
            SceneEvent::Duration { duration_ms, .. } => ms(*duration_ms),
            SceneEvent::State { state, .. } => ControlValue::from(state.as_str()),
        };
        Self::new(event.address(), vec![arg])
    }
}

/// Every operation a control message can request.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `/comp/size w h`
    CompSize {
        /// Requested width; clamped by the scene.
        width: i64,
        /// Requested height; clamped by the scene.
        height: i64,
    },
    /// `/comp/opacity v`
    CompOpacity(f64),
    /// `/comp/volume v`
    CompVolume(f64),
    /// `/comp/testcard flag`
    CompTestcard(bool),
    /// `/comp/transition seconds`
    CompTransition(f64),
    /// `/comp/blackout`
    Blackout,
    /// `/clip/text text`
    Text(String),
    /// `/clip/text/font size family style`
    TextFont {
        /// Size in points.
        size_pt: f64,
        /// Family name.
        family: String,
        /// Style name.
        style: String,
    },
    /// `/clip/text/color color`
    TextColor(Color),
    /// `/clip/text/padding l t r b`
    TextPadding {
        /// Left.
        left: f64,
        /// Top.
        top: f64,
        /// Right.
        right: f64,
        /// Bottom.
        bottom: f64,
    },
    /// `/clip/text/align h v`
    TextAlign(HAlign, VAlign),
    /// `/clip/text/shadow x y blur color`
    TextShadow {
        /// Horizontal offset.
        x: f64,
        /// Vertical offset.
        y: f64,
        /// Blur radius.
        blur: f64,
        /// Shadow color.
        color: Color,
    },
    /// `/clip/text/transform mode`
    TextTransform(CaseTransform),
    /// `/clip/{n}/size w h`
    ClipSize {
        /// Layer id.
        layer: u32,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// `/clip/{n}/pos x y`
    ClipPosition {
        /// Layer id.
        layer: u32,
        /// Horizontal offset from center.
        x: f64,
        /// Vertical offset from center.
        y: f64,
    },
    /// `/clip/{n}/rotate degrees`
    ClipRotate {
        /// Layer id.
        layer: u32,
        /// Rotation in degrees.
        degrees: f64,
    },
    /// `/clip/{n}/opacity v`
    ClipOpacity {
        /// Layer id.
        layer: u32,
        /// Opacity.
        value: f64,
    },
    /// `/clip/{n}/volume v`
    ClipVolume {
        /// Layer id.
        layer: u32,
        /// Volume.
        value: f64,
    },
    /// `/clip/{n}/scale v`
    ClipScale {
        /// Layer id.
        layer: u32,
        /// Scale.
        value: f64,
    },
    /// `/clip/{n}/playback/source path`
    ClipSource {
        /// Layer id.
        layer: u32,
        /// Source path.
        path: String,
    },
    /// `/clip/{n}/playback/play`
    ClipPlay {
        /// Layer id.
        layer: u32,
    },
    /// `/clip/{n}/playback/pause`
    ClipPause {
        /// Layer id.
        layer: u32,
    },
    /// `/clip/{n}/playback/stop`
    ClipStop {
        /// Layer id.
        layer: u32,
    },
    /// `/clip/{n}/playback/position ms`
    ClipSeek {
        /// Layer id.
        layer: u32,
        /// Target position in milliseconds.
        position_ms: f64,
    },
    /// `/clip/{n}/playback/transport mode`
    ClipTransport {
        /// Layer id.
        layer: u32,
        /// End-of-media behavior.
        mode: TransportMode,
    },
}

impl Command {
    /// Decode a control message.
    pub fn decode(msg: &ControlMessage) -> GrailResult<Self> {
        let address = msg.address.trim_end_matches('/');
        let cmd = match address {
            "/comp/size" => Self::CompSize {
                width: msg.i64_arg(0)?,
                height: msg.i64_arg(1)?,
            },
            "/comp/opacity" => Self::CompOpacity(msg.f64_arg(0)?),
            "/comp/volume" => Self::CompVolume(msg.f64_arg(0)?),
            "/comp/testcard" => Self::CompTestcard(msg.bool_arg(0)?),
            "/comp/transition" => Self::CompTransition(msg.f64_arg(0)?),
            "/comp/blackout" | "!comp/blackout" => Self::Blackout,
            "/clip/text" => Self::Text(msg.str_arg(0)?.to_string()),
            "/clip/text/font" => Self::TextFont {
                size_pt: msg.f64_arg(0)?,
                family: msg.str_arg(1)?.to_string(),
                style: msg.str_arg(2)?.to_string(),
            },
            "/clip/text/color" => Self::TextColor(parse_color(msg, 0)?),
            "/clip/text/padding" => Self::TextPadding {
                left: msg.f64_arg(0)?,
                top: msg.f64_arg(1)?,
                right: msg.f64_arg(2)?,
                bottom: msg.f64_arg(3)?,
            },
            "/clip/text/align" => Self::TextAlign(
                HAlign::parse(msg.str_arg(0)?).map_err(into_message)?,
                VAlign::parse(msg.str_arg(1)?).map_err(into_message)?,
            ),
            "/clip/text/shadow" => Self::TextShadow {
                x: msg.f64_arg(0)?,
                y: msg.f64_arg(1)?,
                blur: msg.f64_arg(2)?,
                color: parse_color(msg, 3)?,
            },
            "/clip/text/transform" => {
                Self::TextTransform(CaseTransform::parse(msg.str_arg(0)?).map_err(into_message)?)
            }
            _ => return Self::decode_clip(msg, address),
        };
        Ok(cmd)
    }

    fn decode_clip(msg: &ControlMessage, address: &str) -> GrailResult<Self> {
        let unknown = || GrailError::message(format!("unknown address \"{}\"", msg.address));
        let rest = address.strip_prefix("/clip/").ok_or_else(unknown)?;
        let (layer, op) = rest.split_once('/').ok_or_else(unknown)?;
        let layer: u32 = layer.parse().map_err(|_| unknown())?;

        let cmd = match op {
            "size" => Self::ClipSize {
                layer,
                width: msg.f64_arg(0)?,
                height: msg.f64_arg(1)?,
            },
            "pos" => Self::ClipPosition {
                layer,
                x: msg.f64_arg(0)?,
                y: msg.f64_arg(1)?,
            },
            "rotate" => Self::ClipRotate {
                layer,
                degrees: msg.f64_arg(0)?,
            },
            "opacity" => Self::ClipOpacity {
                layer,
                value: msg.f64_arg(0)?,
            },
            "volume" => Self::ClipVolume {
                layer,
                value: msg.f64_arg(0)?,
            },
            "scale" => Self::ClipScale {
                layer,
                value: msg.f64_arg(0)?,
            },
            "playback/source" => Self::ClipSource {
                layer,
                path: msg.str_arg(0)?.to_string(),
            },
            "playback/play" | "play" => Self::ClipPlay { layer },
            "playback/pause" | "pause" => Self::ClipPause { layer },
            "playback/stop" | "stop" => Self::ClipStop { layer },
            "playback/position" => Self::ClipSeek {
                layer,
                position_ms: msg.f64_arg(0)?,
            },
            "playback/transport" => Self::ClipTransport {
                layer,
                mode: TransportMode::parse(msg.str_arg(0)?).map_err(into_message)?,
            },
            _ => return Err(unknown()),
        };
        Ok(cmd)
    }

    /// Target layer, for per-layer commands.
    pub fn layer(&self) -> Option<u32> {
        match self {
            Self::ClipSize { layer, .. }
            | Self::ClipPosition { layer, .. }
            | Self::ClipRotate { layer, .. }
            | Self::ClipOpacity { layer, .. }
            | Self::ClipVolume { layer, .. }
            | Self::ClipScale { layer, .. }
            | Self::ClipSource { layer, .. }
            | Self::ClipPlay { layer }
            | Self::ClipPause { layer }
            | Self::ClipStop { layer }
            | Self::ClipSeek { layer, .. }
            | Self::ClipTransport { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    /// Whether the command describes persistent state worth restoring on the next session.
    ///
    /// Transport actions, seeks and blackout are momentary and never recalled.
    pub fn is_recallable(&self) -> bool {
        !matches!(
            self,
            Self::Blackout
                | Self::ClipPlay { .. }
                | Self::ClipPause { .. }
                | Self::ClipStop { .. }
                | Self::ClipSeek { .. }
        )
    }
}

impl TryFrom<&ControlMessage> for Command {
    type Error = GrailError;

    fn try_from(msg: &ControlMessage) -> Result<Self, Self::Error> {
        Self::decode(msg)
    }
}

fn parse_color(msg: &ControlMessage, i: usize) -> GrailResult<Color> {
    Color::parse(msg.str_arg(i)?).map_err(into_message)
}

fn into_message(err: GrailError) -> GrailError {
    match err {
        GrailError::Validation(m) => GrailError::Message(m),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/control/message.rs"]
mod tests;
