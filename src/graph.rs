//! The platform audio-graph seam.
//!
//! The reconciler and the playback gate only talk to the audio API
//! through [`AudioGraph`]. The browser implementation lives in
//! [`crate::web::audio`]; tests use a recording mock.

use crate::error::BridgeError;
use crate::sound::WaveType;

/// Minimal audio-graph API: context control, oscillator and gain nodes,
/// parameter scheduling on the audio clock, and wiring.
///
/// Every parameter change is a set-value-at-time call; nothing waits on
/// the audio rendering thread.
pub trait AudioGraph {
    type Oscillator;
    type Gain;

    /// Monotonic audio-clock time in seconds.
    fn current_time(&self) -> f64;

    fn suspend(&self) -> Result<(), BridgeError>;
    fn resume(&self) -> Result<(), BridgeError>;

    fn create_oscillator(&self, wave_type: WaveType) -> Result<Self::Oscillator, BridgeError>;
    fn create_gain(&self) -> Result<Self::Gain, BridgeError>;

    /// Change the waveform of a (possibly running) oscillator in place.
    fn set_wave_type(
        &self,
        osc: &Self::Oscillator,
        wave_type: WaveType,
    ) -> Result<(), BridgeError>;

    fn schedule_frequency(
        &self,
        osc: &Self::Oscillator,
        hz: f64,
        at: f64,
    ) -> Result<(), BridgeError>;
    fn schedule_gain(&self, gain: &Self::Gain, level: f64, at: f64) -> Result<(), BridgeError>;

    /// Wire `osc -> gain -> destination`.
    fn connect(&self, osc: &Self::Oscillator, gain: &Self::Gain) -> Result<(), BridgeError>;
    fn start(&self, osc: &Self::Oscillator) -> Result<(), BridgeError>;

    fn disconnect_oscillator(&self, osc: &Self::Oscillator) -> Result<(), BridgeError>;
    fn disconnect_gain(&self, gain: &Self::Gain) -> Result<(), BridgeError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use super::AudioGraph;
    use crate::error::BridgeError;
    use crate::sound::WaveType;

    /// Handle handed out by [`RecordingGraph`]; unique per created node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeId(pub usize);

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Suspend,
        Resume,
        CreateOscillator(NodeId, WaveType),
        CreateGain(NodeId),
        SetWaveType(NodeId, WaveType),
        Frequency(NodeId, f64, f64),
        Gain(NodeId, f64, f64),
        Connect(NodeId, NodeId),
        Start(NodeId),
        Disconnect(NodeId),
    }

    /// Audio graph that records every call instead of making sound.
    #[derive(Default)]
    pub struct RecordingGraph {
        pub ops: RefCell<Vec<Op>>,
        pub time: Cell<f64>,
        next_id: Cell<usize>,
        /// Fail the n-th gain scheduling call (0-based), if set.
        pub fail_gain_at: Cell<Option<usize>>,
        gain_calls: Cell<usize>,
        /// Reject every `connect` call.
        pub fail_connect: Cell<bool>,
        /// Reject `resume`.
        pub fail_resume: Cell<bool>,
        /// Nodes whose disconnect is rejected.
        pub fail_disconnect: RefCell<Vec<NodeId>>,
    }

    impl RecordingGraph {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn advance(&self, secs: f64) {
            self.time.set(self.time.get() + secs);
        }

        pub fn take_ops(&self) -> Vec<Op> {
            std::mem::take(&mut *self.ops.borrow_mut())
        }

        fn record(&self, op: Op) {
            self.ops.borrow_mut().push(op);
        }

        fn rejected(op: &'static str) -> BridgeError {
            BridgeError::Audio {
                op,
                message: "rejected".to_string(),
            }
        }

        fn disconnect(&self, node: NodeId) -> Result<(), BridgeError> {
            if self.fail_disconnect.borrow().contains(&node) {
                return Err(Self::rejected("disconnect"));
            }
            self.record(Op::Disconnect(node));
            Ok(())
        }

        fn fresh(&self) -> NodeId {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            NodeId(id)
        }
    }

    impl AudioGraph for RecordingGraph {
        type Oscillator = NodeId;
        type Gain = NodeId;

        fn current_time(&self) -> f64 {
            self.time.get()
        }

        fn suspend(&self) -> Result<(), BridgeError> {
            self.record(Op::Suspend);
            Ok(())
        }

        fn resume(&self) -> Result<(), BridgeError> {
            if self.fail_resume.get() {
                return Err(Self::rejected("resume"));
            }
            self.record(Op::Resume);
            Ok(())
        }

        fn create_oscillator(&self, wave_type: WaveType) -> Result<NodeId, BridgeError> {
            let id = self.fresh();
            self.record(Op::CreateOscillator(id, wave_type));
            Ok(id)
        }

        fn create_gain(&self) -> Result<NodeId, BridgeError> {
            let id = self.fresh();
            self.record(Op::CreateGain(id));
            Ok(id)
        }

        fn set_wave_type(&self, osc: &NodeId, wave_type: WaveType) -> Result<(), BridgeError> {
            self.record(Op::SetWaveType(*osc, wave_type));
            Ok(())
        }

        fn schedule_frequency(&self, osc: &NodeId, hz: f64, at: f64) -> Result<(), BridgeError> {
            self.record(Op::Frequency(*osc, hz, at));
            Ok(())
        }

        fn schedule_gain(&self, gain: &NodeId, level: f64, at: f64) -> Result<(), BridgeError> {
            let call = self.gain_calls.get();
            self.gain_calls.set(call + 1);
            if self.fail_gain_at.get() == Some(call) {
                return Err(BridgeError::Audio {
                    op: "setValueAtTime",
                    message: format!("non-finite value {level}"),
                });
            }
            self.record(Op::Gain(*gain, level, at));
            Ok(())
        }

        fn connect(&self, osc: &NodeId, gain: &NodeId) -> Result<(), BridgeError> {
            if self.fail_connect.get() {
                return Err(Self::rejected("connect"));
            }
            self.record(Op::Connect(*osc, *gain));
            Ok(())
        }

        fn start(&self, osc: &NodeId) -> Result<(), BridgeError> {
            self.record(Op::Start(*osc));
            Ok(())
        }

        fn disconnect_oscillator(&self, osc: &NodeId) -> Result<(), BridgeError> {
            self.disconnect(*osc)
        }

        fn disconnect_gain(&self, gain: &NodeId) -> Result<(), BridgeError> {
            self.disconnect(*gain)
        }
    }
}
