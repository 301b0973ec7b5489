//! [`AudioGraph`] over the browser's Web Audio API.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::error::BridgeError;
use crate::graph::AudioGraph;
use crate::sound::WaveType;

pub struct WebAudioGraph {
    ctx: AudioContext,
}

impl WebAudioGraph {
    /// Create a context, falling back to the prefixed constructor on
    /// engines that only ship `webkitAudioContext`.
    pub fn new() -> Result<Self, BridgeError> {
        let ctx = match AudioContext::new() {
            Ok(ctx) => ctx,
            Err(_) => prefixed_context()?,
        };
        Ok(WebAudioGraph { ctx })
    }

    pub fn context(&self) -> &AudioContext {
        &self.ctx
    }
}

fn prefixed_context() -> Result<AudioContext, BridgeError> {
    let window = web_sys::window().ok_or_else(|| BridgeError::MissingGlobal {
        name: "window".into(),
    })?;
    let ctor = Reflect::get(&window, &JsValue::from_str("webkitAudioContext"))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
        .ok_or_else(|| BridgeError::MissingGlobal {
            name: "AudioContext".into(),
        })?;
    let ctx = Reflect::construct(&ctor, &Array::new())
        .map_err(|e| BridgeError::js("new webkitAudioContext", &e))?;
    Ok(ctx.unchecked_into())
}

fn oscillator_type(wave_type: WaveType) -> OscillatorType {
    match wave_type {
        WaveType::Sine => OscillatorType::Sine,
        WaveType::Square => OscillatorType::Square,
        WaveType::Sawtooth => OscillatorType::Sawtooth,
        WaveType::Triangle => OscillatorType::Triangle,
    }
}

impl AudioGraph for WebAudioGraph {
    type Oscillator = OscillatorNode;
    type Gain = GainNode;

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    // suspend()/resume() return promises; like the rest of the bridge we
    // fire and forget them.
    fn suspend(&self) -> Result<(), BridgeError> {
        self.ctx
            .suspend()
            .map(drop)
            .map_err(|e| BridgeError::js("suspend", &e))
    }

    fn resume(&self) -> Result<(), BridgeError> {
        self.ctx
            .resume()
            .map(drop)
            .map_err(|e| BridgeError::js("resume", &e))
    }

    fn create_oscillator(&self, wave_type: WaveType) -> Result<OscillatorNode, BridgeError> {
        let osc = self
            .ctx
            .create_oscillator()
            .map_err(|e| BridgeError::js("createOscillator", &e))?;
        osc.set_type(oscillator_type(wave_type));
        Ok(osc)
    }

    fn create_gain(&self) -> Result<GainNode, BridgeError> {
        self.ctx
            .create_gain()
            .map_err(|e| BridgeError::js("createGain", &e))
    }

    fn set_wave_type(&self, osc: &OscillatorNode, wave_type: WaveType) -> Result<(), BridgeError> {
        osc.set_type(oscillator_type(wave_type));
        Ok(())
    }

    fn schedule_frequency(&self, osc: &OscillatorNode, hz: f64, at: f64) -> Result<(), BridgeError> {
        osc.frequency()
            .set_value_at_time(hz as f32, at)
            .map(drop)
            .map_err(|e| BridgeError::js("frequency.setValueAtTime", &e))
    }

    fn schedule_gain(&self, gain: &GainNode, level: f64, at: f64) -> Result<(), BridgeError> {
        gain.gain()
            .set_value_at_time(level as f32, at)
            .map(drop)
            .map_err(|e| BridgeError::js("gain.setValueAtTime", &e))
    }

    fn connect(&self, osc: &OscillatorNode, gain: &GainNode) -> Result<(), BridgeError> {
        osc.connect_with_audio_node(gain)
            .map_err(|e| BridgeError::js("connect", &e))?;
        gain.connect_with_audio_node(&self.ctx.destination())
            .map_err(|e| BridgeError::js("connect", &e))?;
        Ok(())
    }

    fn start(&self, osc: &OscillatorNode) -> Result<(), BridgeError> {
        osc.start().map_err(|e| BridgeError::js("start", &e))
    }

    fn disconnect_oscillator(&self, osc: &OscillatorNode) -> Result<(), BridgeError> {
        osc.disconnect().map_err(|e| BridgeError::js("disconnect", &e))
    }

    fn disconnect_gain(&self, gain: &GainNode) -> Result<(), BridgeError> {
        gain.disconnect().map_err(|e| BridgeError::js("disconnect", &e))
    }
}
