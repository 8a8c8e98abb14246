//! Grail is the display engine of a live lyrics and media presentation tool.
//!
//! A [`Scene`] stacks media layers, a styled text overlay and an optional test card. Control
//! surfaces talk to it through [`ControlMessage`]s queued on a [`Controller`]. The composited
//! frame from [`CpuRenderer`] is shown on any number of [`OutputTarget`]s, each warped through its
//! own corner-pin [`QuadTransform`] for projection mapping.
//!
//! - Build a [`Controller`] and feed it messages (or restore a [`Session`])
//! - Render the scene with [`CpuRenderer::render`]
//! - Present it with [`OutputTarget::render`] or [`PreviewView::render`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod control;
pub(crate) mod output;
pub(crate) mod render;
pub(crate) mod scene;
pub mod session;
pub(crate) mod transform;

pub use crate::foundation::core::{Affine, Color, Edges, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{GrailError, GrailResult};

pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::frames::{FrameProvider, NoFrames, StillImageProvider};
pub use crate::control::dispatch::{Controller, PumpStats, Recall};
pub use crate::control::message::{Command, ControlMessage, ControlValue};
pub use crate::output::target::{
    DEFAULT_OUTPUT_SIZE, Geometry, OutputMode, OutputTarget, Outputs, Screen, WINDOWED_SIZES,
};
pub use crate::output::view::PreviewView;
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::frame::Frame;
pub use crate::render::testcard::render_test_card;
pub use crate::render::text::{FONT_DIR_ENV, FontBook};
pub use crate::render::warp::warp_frame;
pub use crate::scene::display::{
    DEFAULT_HEIGHT, DEFAULT_LAYERS, DEFAULT_WIDTH, MAX_SIZE, MAX_TRANSITION, Scene,
};
pub use crate::scene::layer::Layer;
pub use crate::scene::media::{
    MediaBackend, MediaReport, MediaRequest, PlaybackState, SceneEvent, TransportMode,
};
pub use crate::scene::testcard::TestCard;
pub use crate::scene::text::{CaseTransform, FontSpec, HAlign, Shadow, TextOverlay, VAlign};
pub use crate::session::{OutputRecord, Session, load_script};
pub use crate::transform::corner_pin::{ArrowKey, CornerPinEditor, Handle, Viewport};
pub use crate::transform::homography::{Homography, QuadTransform, rect_corners};
