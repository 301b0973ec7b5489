//! Playback gate: keeps the audio context suspended until the first
//! user gesture, as browser autoplay policies require.

use std::cell::OnceCell;

use crate::error::BridgeError;
use crate::graph::AudioGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// First gesture: the context was resumed. Listeners for every event
    /// in [`PlaybackGate::EVENTS`] should now be removed.
    Opened,
    /// The gate was already open; nothing happened.
    AlreadyOpen,
}

#[derive(Debug, Default)]
pub struct PlaybackGate {
    open: bool,
}

impl PlaybackGate {
    /// Document events that count as a user gesture.
    pub const EVENTS: [&'static str; 2] = ["mousedown", "touchstart"];

    /// Suspend the context and return a closed gate.
    pub fn armed<A: AudioGraph>(graph: &A) -> Result<Self, BridgeError> {
        graph.suspend()?;
        Ok(PlaybackGate { open: false })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Handle a gesture. Resumes the context at most once.
    pub fn open<A: AudioGraph>(&mut self, graph: &A) -> Result<GateOutcome, BridgeError> {
        if self.open {
            return Ok(GateOutcome::AlreadyOpen);
        }
        // Flip first so a failed resume still detaches the listeners.
        self.open = true;
        graph.resume()?;
        Ok(GateOutcome::Opened)
    }
}

/// Document-level event registration, keyed by a callback handle.
pub trait Listeners {
    type Handle;

    fn listen(&self, event: &'static str, handle: &Self::Handle) -> Result<(), BridgeError>;
    fn unlisten(&self, event: &'static str, handle: &Self::Handle) -> Result<(), BridgeError>;
}

/// The gesture callback's registration: one handle bound to every event
/// in [`PlaybackGate::EVENTS`], detached from all of them when the gate
/// opens.
pub struct GestureHook<L: Listeners> {
    listeners: L,
    handle: OnceCell<L::Handle>,
}

impl<L: Listeners> GestureHook<L> {
    pub fn new(listeners: L) -> Self {
        GestureHook {
            listeners,
            handle: OnceCell::new(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Register `handle` for every gesture event. Only the first handle is
    /// kept; later calls are no-ops.
    pub fn bind(&self, handle: L::Handle) -> Result<(), BridgeError> {
        if self.handle.set(handle).is_err() {
            return Ok(());
        }
        let Some(handle) = self.handle.get() else {
            return Ok(());
        };
        for event in PlaybackGate::EVENTS {
            self.listeners.listen(event, handle)?;
        }
        Ok(())
    }

    /// Run one gesture through `gate`. On the opening gesture the handle
    /// is removed from every event, even if resuming the context failed.
    pub fn fire<A: AudioGraph>(
        &self,
        gate: &mut PlaybackGate,
        graph: &A,
    ) -> Result<GateOutcome, BridgeError> {
        let opened = gate.open(graph);
        if let Ok(GateOutcome::AlreadyOpen) = opened {
            return opened;
        }

        let mut detached = Ok(());
        if let Some(handle) = self.handle.get() {
            for event in PlaybackGate::EVENTS {
                let removed = self.listeners.unlisten(event, handle);
                if detached.is_ok() {
                    detached = removed;
                }
            }
        }
        let outcome = opened?;
        detached?;
        Ok(outcome)
    }
}
