use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::control::message::{Command, ControlMessage, ControlValue};
use crate::foundation::error::{GrailError, GrailResult};
use crate::scene::display::Scene;

/// Last applied arguments per address, replayed to restore a session.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Recall {
    entries: BTreeMap<String, Vec<ControlValue>>,
}

impl Recall {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline state, in replay order.
    pub fn defaults() -> Vec<ControlMessage> {
        use ControlValue as V;
        let m = |address: &str, args: Vec<ControlValue>| ControlMessage::new(address, args);
        vec![
            m("/comp/size", vec![V::Int(1280), V::Int(720)]),
            m("/comp/testcard", vec![V::Bool(false)]),
            m("/comp/opacity", vec![V::Float(1.0)]),
            m("/comp/transition", vec![V::Float(0.0)]),
            m("/comp/volume", vec![V::Float(1.0)]),
            m("/clip/text", vec![V::from("")]),
            m(
                "/clip/text/font",
                vec![V::Int(12), V::from("decorative"), V::from("normal")],
            ),
            m("/clip/text/color", vec![V::from("#ffffff")]),
            m(
                "/clip/text/padding",
                vec![V::Int(0), V::Int(0), V::Int(0), V::Int(0)],
            ),
            m("/clip/text/align", vec![V::from("center"), V::from("middle")]),
            m(
                "/clip/text/shadow",
                vec![V::Int(0), V::Int(5), V::Int(0), V::from("#000000")],
            ),
            m("/clip/text/transform", vec![V::from("normal")]),
        ]
    }

    /// Remember `msg` as the latest state for its address.
    pub fn store(&mut self, msg: &ControlMessage) {
        self.entries.insert(msg.address.clone(), msg.args.clone());
    }

    /// Stored arguments for `address`.
    pub fn get(&self, address: &str) -> Option<&[ControlValue]> {
        self.entries.get(address).map(Vec::as_slice)
    }

    /// Number of stored addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages that rebuild the recalled state: every default (overridden by stored values)
    /// followed by the remaining stored addresses in lexical order.
    pub fn replay(&self) -> Vec<ControlMessage> {
        let defaults = Self::defaults();
        let mut out: Vec<ControlMessage> = defaults
            .iter()
            .map(|d| match self.entries.get(&d.address) {
                Some(args) => ControlMessage::new(d.address.clone(), args.clone()),
                None => d.clone(),
            })
            .collect();
        out.extend(
            self.entries
                .iter()
                .filter(|(address, _)| !defaults.iter().any(|d| &d.address == *address))
                .map(|(address, args)| ControlMessage::new(address.clone(), args.clone())),
        );
        out
    }
}

/// Outcome of one [`Controller::pump`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Messages applied to the scene.
    pub applied: usize,
    /// Messages dropped as malformed or addressed to a missing layer.
    pub rejected: usize,
}

/// Single owner of the [`Scene`]. Other threads feed it through cloned senders.
#[derive(Debug)]
pub struct Controller {
    scene: Scene,
    tx: Sender<ControlMessage>,
    rx: Receiver<ControlMessage>,
    recall: Recall,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Scene::new())
    }
}

impl Controller {
    /// Take ownership of `scene`.
    pub fn new(scene: Scene) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            scene,
            tx,
            rx,
            recall: Recall::new(),
        }
    }

    /// Queue handle for producers on other threads.
    pub fn sender(&self) -> Sender<ControlMessage> {
        self.tx.clone()
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene, for direct manipulation on the owner thread.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Recall table built from applied messages.
    pub fn recall(&self) -> &Recall {
        &self.recall
    }

    /// Decode and apply one message now. Persistent state is recorded in the recall table.
    pub fn handle(&mut self, msg: &ControlMessage) -> GrailResult<()> {
        let command = Command::decode(msg)?;
        let recallable = command.is_recallable();
        let blackout = matches!(command, Command::Blackout);
        self.scene.apply(command)?;
        if recallable {
            self.recall.store(msg);
        }
        if blackout {
            // Blackout clears the text, so a restore must not bring it back.
            self.recall
                .store(&ControlMessage::new("/clip/text", vec![ControlValue::Str(String::new())]));
        }
        Ok(())
    }

    /// Apply every queued message in arrival order. Failures are logged and skipped.
    #[tracing::instrument(skip(self))]
    pub fn pump(&mut self) -> PumpStats {
        let mut stats = PumpStats::default();
        loop {
            let msg = match self.rx.try_recv() {
                Ok(msg) => msg,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            match self.handle(&msg) {
                Ok(()) => stats.applied += 1,
                Err(err) => {
                    stats.rejected += 1;
                    match err {
                        GrailError::InvalidLayer(layer) => {
                            tracing::debug!(address = %msg.address, layer, "ignoring message for missing layer");
                        }
                        err => {
                            tracing::warn!(address = %msg.address, %err, "dropping control message");
                        }
                    }
                }
            }
        }
        stats
    }

    /// Replay `recall` (defaults filling the gaps) through [`Controller::handle`].
    pub fn restore(&mut self, recall: &Recall) -> PumpStats {
        let mut stats = PumpStats::default();
        for msg in recall.replay() {
            match self.handle(&msg) {
                Ok(()) => stats.applied += 1,
                Err(err) => {
                    stats.rejected += 1;
                    tracing::warn!(address = %msg.address, %err, "skipping recalled message");
                }
            }
        }
        stats
    }

    /// Drain scene events as outgoing messages.
    pub fn take_events(&mut self) -> Vec<ControlMessage> {
        self.scene
            .take_events()
            .iter()
            .map(ControlMessage::from)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/control/dispatch.rs"]
mod tests;
