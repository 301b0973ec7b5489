//! Reconciler: keeps the live audio graph in sync with the latest
//! sound-state snapshot.
//!
//! Each snapshot is applied synchronously: new ids get a fresh
//! oscillator/gain pair, known ids are retuned in place, and ids that
//! disappeared are disconnected and dropped.

use std::collections::{HashMap, HashSet};

use crate::error::BridgeError;
use crate::graph::AudioGraph;
use crate::sound::{SoundSpec, WaveType};

/// An oscillator/gain pair sounding for one id.
#[derive(Debug)]
pub struct LiveVoice<O, G> {
    pub oscillator: O,
    pub gain: G,
    /// Waveform currently set on `oscillator`.
    pub wave_type: WaveType,
}

/// Live voices keyed by the UI's source id.
#[derive(Debug)]
pub struct VoiceRegistry<O, G> {
    voices: HashMap<String, LiveVoice<O, G>>,
}

impl<O, G> VoiceRegistry<O, G> {
    pub fn new() -> Self {
        VoiceRegistry {
            voices: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.voices.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&LiveVoice<O, G>> {
        self.voices.get(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.voices.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl<O, G> Default for VoiceRegistry<O, G> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single [`Reconciler::apply`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    /// Updated voices whose waveform changed.
    pub retyped: usize,
    pub removed: usize,
}

pub struct Reconciler<A: AudioGraph> {
    graph: A,
    registry: VoiceRegistry<A::Oscillator, A::Gain>,
}

impl<A: AudioGraph> Reconciler<A> {
    pub fn new(graph: A) -> Self {
        Reconciler {
            graph,
            registry: VoiceRegistry::new(),
        }
    }

    pub fn graph(&self) -> &A {
        &self.graph
    }

    pub fn registry(&self) -> &VoiceRegistry<A::Oscillator, A::Gain> {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    pub fn voice(&self, id: &str) -> Option<&LiveVoice<A::Oscillator, A::Gain>> {
        self.registry.get(id)
    }

    /// Bring the graph in line with `snapshot`.
    ///
    /// Creations and updates run first, in snapshot order; removals of
    /// ids missing from the snapshot run last, against the id set taken
    /// before anything was mutated.
    pub fn apply(&mut self, snapshot: &[SoundSpec]) -> Result<ReconcileStats, BridgeError> {
        let stale: Vec<String> = self.registry.voices.keys().cloned().collect();
        let mut current: HashSet<&str> = HashSet::with_capacity(snapshot.len());
        let mut stats = ReconcileStats::default();

        for spec in snapshot {
            current.insert(spec.id.as_str());

            match self.registry.voices.get_mut(&spec.id) {
                Some(voice) => {
                    if voice.wave_type != spec.wave_type {
                        self.graph.set_wave_type(&voice.oscillator, spec.wave_type)?;
                        voice.wave_type = spec.wave_type;
                        stats.retyped += 1;
                    }
                    let now = self.graph.current_time();
                    self.graph.schedule_frequency(&voice.oscillator, spec.freq, now)?;
                    self.graph.schedule_gain(&voice.gain, spec.level, now)?;
                    stats.updated += 1;
                }
                None => {
                    let voice = spawn_voice(&self.graph, spec)?;
                    self.registry.voices.insert(spec.id.clone(), voice);
                    stats.created += 1;
                }
            }
        }

        // Every stale voice gets both disconnects even if one is rejected;
        // the first rejection is reported once the sweep is done.
        let mut first_err = None;
        for id in stale.iter().filter(|id| !current.contains(id.as_str())) {
            let Some(voice) = self.registry.voices.remove(id) else {
                continue;
            };
            let osc = self.graph.disconnect_oscillator(&voice.oscillator);
            let gain = self.graph.disconnect_gain(&voice.gain);
            if let Err(e) = osc.and(gain) {
                first_err.get_or_insert(e);
            }
            stats.removed += 1;
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}

/// Build, wire and start a silent pair, then raise it to `spec`.
///
/// Both parameters start at 0 so the node never sounds at its platform
/// default. If wiring or anything after it fails, the pair is
/// disconnected again before the error is returned.
fn spawn_voice<A: AudioGraph>(
    graph: &A,
    spec: &SoundSpec,
) -> Result<LiveVoice<A::Oscillator, A::Gain>, BridgeError> {
    let oscillator = graph.create_oscillator(spec.wave_type)?;
    graph.schedule_frequency(&oscillator, 0.0, graph.current_time())?;

    let gain = graph.create_gain()?;
    graph.schedule_gain(&gain, 0.0, graph.current_time())?;

    let raised = graph.connect(&oscillator, &gain).and_then(|()| {
        graph.start(&oscillator)?;
        let now = graph.current_time();
        graph.schedule_frequency(&oscillator, spec.freq, now)?;
        graph.schedule_gain(&gain, spec.level, now)
    });
    if let Err(e) = raised {
        let _ = graph.disconnect_oscillator(&oscillator);
        let _ = graph.disconnect_gain(&gain);
        return Err(e);
    }

    Ok(LiveVoice {
        oscillator,
        gain,
        wave_type: spec.wave_type,
    })
}
