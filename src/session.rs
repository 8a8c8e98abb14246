//! Saved operator state: the recall table plus every output's window and corner-pin.
//!
//! ```json
//! { "recall": { "/comp/size": [1280, 720] },
//!   "outputs": [ { "name": "Output 1", "x": 0, "y": 0, "width": 1920, "height": 1080,
//!                  "frameless": true, "disabled": false, "points": [0, 0, 1920, 0, ...] } ] }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use anyhow::Context as _;

use crate::control::dispatch::{Controller, PumpStats, Recall};
use crate::control::message::ControlMessage;
use crate::foundation::error::{GrailError, GrailResult};
use crate::output::target::{Geometry, OutputTarget, Outputs};

/// One persisted output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OutputRecord {
    /// Display name.
    pub name: String,
    /// Window left edge.
    pub x: i32,
    /// Window top edge.
    pub y: i32,
    /// Client width.
    pub width: u32,
    /// Client height.
    pub height: u32,
    /// Undecorated window.
    #[serde(default)]
    pub frameless: bool,
    /// Hidden output.
    #[serde(default)]
    pub disabled: bool,
    /// Corner-pin destination points, `x1 y1 .. x4 y4` in TL, TR, BR, BL order.
    pub points: [f64; 8],
}

impl From<&OutputTarget> for OutputRecord {
    fn from(t: &OutputTarget) -> Self {
        let g = t.geometry();
        Self {
            name: t.name().to_string(),
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
            frameless: t.frameless(),
            disabled: t.disabled(),
            points: t.quad().raw_points(),
        }
    }
}

impl TryFrom<&OutputRecord> for OutputTarget {
    type Error = GrailError;

    fn try_from(r: &OutputRecord) -> GrailResult<Self> {
        if r.points.iter().any(|v| !v.is_finite()) {
            return Err(GrailError::validation(format!(
                "output '{}' has non-finite corner points",
                r.name
            )));
        }
        OutputTarget::with_points(
            r.name.clone(),
            Geometry::new(r.x, r.y, r.width, r.height),
            r.frameless,
            r.disabled,
            &r.points,
        )
    }
}

/// Everything needed to bring a show back up.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Session {
    /// Last applied value per persistent control address.
    #[serde(default)]
    pub recall: Recall,
    /// Outputs in creation order.
    #[serde(default)]
    pub outputs: Vec<OutputRecord>,
}

impl Session {
    /// Snapshot a running controller and its outputs.
    pub fn capture(controller: &Controller, outputs: &Outputs) -> Self {
        Self {
            recall: controller.recall().clone(),
            outputs: outputs.iter().map(OutputRecord::from).collect(),
        }
    }

    /// Parse from JSON text.
    pub fn from_json(json: &str) -> GrailResult<Self> {
        serde_json::from_str(json).map_err(|e| GrailError::serde(format!("session JSON: {e}")))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> GrailResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GrailError::serde(e.to_string()))
    }

    /// Read a session file.
    pub fn load(path: &Path) -> GrailResult<Self> {
        let f = File::open(path).with_context(|| format!("open session '{}'", path.display()))?;
        let session = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse session '{}'", path.display()))?;
        Ok(session)
    }

    /// Write a session file, replacing any existing one.
    pub fn save(&self, path: &Path) -> GrailResult<()> {
        let f =
            File::create(path).with_context(|| format!("create session '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .with_context(|| format!("write session '{}'", path.display()))?;
        w.flush()
            .with_context(|| format!("flush session '{}'", path.display()))?;
        Ok(())
    }

    /// Rebuild the output registry.
    pub fn outputs(&self) -> GrailResult<Outputs> {
        let mut outputs = Outputs::new();
        for record in &self.outputs {
            outputs.push(OutputTarget::try_from(record)?);
        }
        Ok(outputs)
    }

    /// Replay the recall table into `controller`, defaults first.
    pub fn restore(&self, controller: &mut Controller) -> PumpStats {
        controller.restore(&self.recall)
    }
}

/// Read a JSON array of control messages, as fed to the CLI with `--script`.
pub fn load_script(path: &Path) -> GrailResult<Vec<ControlMessage>> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let script = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse script '{}'", path.display()))?;
    Ok(script)
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
