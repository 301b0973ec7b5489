//! Wires the reconciler, playback gate and relay to a running Elm app.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::gate::{GateOutcome, GestureHook, Listeners, PlaybackGate};
use crate::logging;
use crate::reconciler::Reconciler;
use crate::relay::OutsideClickRelay;
use crate::sound::SoundSpec;

use super::audio::WebAudioGraph;
use super::ports::{OutboundPort, Ports};

type SharedReconciler = Rc<RefCell<Reconciler<WebAudioGraph>>>;

/// Handle returned to JS once the bridge is live.
///
/// Every listener the bridge installs stays registered for the page
/// lifetime, whether or not this handle is kept.
#[wasm_bindgen]
pub struct Bridge {
    reconciler: SharedReconciler,
    gate: Rc<RefCell<PlaybackGate>>,
}

#[wasm_bindgen]
impl Bridge {
    /// Apply a snapshot directly, bypassing the `updateSoundState` port.
    #[wasm_bindgen(js_name = applySnapshot)]
    pub fn apply_snapshot(&self, value: JsValue) -> Result<(), JsValue> {
        apply_snapshot(&self.reconciler, value)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = voiceCount)]
    pub fn voice_count(&self) -> usize {
        self.reconciler.borrow().len()
    }

    #[wasm_bindgen(js_name = voiceIds)]
    pub fn voice_ids(&self) -> Vec<String> {
        self.reconciler.borrow().ids()
    }

    #[wasm_bindgen(js_name = audioEnabled)]
    pub fn audio_enabled(&self) -> bool {
        self.gate.borrow().is_open()
    }
}

fn document() -> Result<Document, BridgeError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| BridgeError::MissingGlobal {
            name: "document".into(),
        })
}

fn decode_snapshot(value: JsValue) -> Result<Vec<SoundSpec>, BridgeError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| BridgeError::decode_js("snapshot", e))
}

fn apply_snapshot(reconciler: &SharedReconciler, value: JsValue) -> Result<(), BridgeError> {
    let snapshot = decode_snapshot(value)?;
    let stats = reconciler.borrow_mut().apply(&snapshot)?;
    debug!(
        created = stats.created,
        updated = stats.updated,
        retyped = stats.retyped,
        removed = stats.removed,
        "applied sound state"
    );
    Ok(())
}

/// Attach to an already initialised Elm app.
pub fn attach_with(app: &JsValue, config: &BridgeConfig) -> Result<Bridge, BridgeError> {
    let document = document()?;
    let graph = WebAudioGraph::new()?;
    let gate = Rc::new(RefCell::new(PlaybackGate::armed(&graph)?));
    let reconciler: SharedReconciler = Rc::new(RefCell::new(Reconciler::new(graph)));
    let ports = Ports::of(app);

    // Sound state: UI -> audio graph.
    let on_snapshot = Closure::<dyn FnMut(JsValue)>::new({
        let reconciler = reconciler.clone();
        move |value: JsValue| {
            if let Err(e) = apply_snapshot(&reconciler, value) {
                error!("failed to apply sound state: {e}");
            }
        }
    });
    if ports.subscribe(&config.update_sound_state_port, on_snapshot.as_ref().unchecked_ref())? {
        on_snapshot.forget();
    } else {
        warn!("port '{}' not found, sound state ignored", config.update_sound_state_port);
    }

    // Pointer releases anywhere in the document: document -> UI.
    let relay = OutsideClickRelay::new(ports.outbound(&config.pointer_up_port));
    if !relay.is_connected() {
        debug!("port '{}' not found, pointer releases not relayed", config.pointer_up_port);
    }
    let on_pointer_up = Closure::<dyn FnMut()>::new(move || {
        if let Err(e) = relay.pointer_up() {
            error!("failed to relay pointer release: {e}");
        }
    });
    document
        .add_event_listener_with_callback(
            OutsideClickRelay::<OutboundPort>::EVENT,
            on_pointer_up.as_ref().unchecked_ref(),
        )
        .map_err(|e| BridgeError::js("addEventListener", &e))?;
    on_pointer_up.forget();

    install_gate(&document, &gate, &reconciler)?;

    info!("audio bridge attached");
    Ok(Bridge { reconciler, gate })
}

/// Document listeners keyed by the JS callback they dispatch to.
pub struct DocumentListeners {
    document: Document,
}

impl Listeners for DocumentListeners {
    type Handle = Function;

    fn listen(&self, event: &'static str, handle: &Function) -> Result<(), BridgeError> {
        self.document
            .add_event_listener_with_callback(event, handle)
            .map_err(|e| BridgeError::js("addEventListener", &e))
    }

    fn unlisten(&self, event: &'static str, handle: &Function) -> Result<(), BridgeError> {
        self.document
            .remove_event_listener_with_callback(event, handle)
            .map_err(|e| BridgeError::js("removeEventListener", &e))
    }
}

/// One callback shared by every gesture event; the hook removes it from
/// all of them the first time it runs.
fn install_gate(
    document: &Document,
    gate: &Rc<RefCell<PlaybackGate>>,
    reconciler: &SharedReconciler,
) -> Result<(), BridgeError> {
    let hook = Rc::new(GestureHook::new(DocumentListeners {
        document: document.clone(),
    }));

    let on_gesture = Closure::<dyn FnMut()>::new({
        let hook = hook.clone();
        let gate = gate.clone();
        let reconciler = reconciler.clone();
        move || {
            let fired = hook.fire(&mut gate.borrow_mut(), reconciler.borrow().graph());
            match fired {
                Ok(GateOutcome::Opened) => info!("audio playback enabled"),
                Ok(GateOutcome::AlreadyOpen) => {}
                Err(e) => error!("failed to enable audio playback: {e}"),
            }
        }
    });

    hook.bind(on_gesture.as_ref().unchecked_ref::<Function>().clone())?;
    on_gesture.forget();
    Ok(())
}

/// Initialise the Elm app named in `config` and attach to it.
pub fn boot_with(config: &BridgeConfig) -> Result<Bridge, BridgeError> {
    let window = web_sys::window().ok_or_else(|| BridgeError::MissingGlobal {
        name: "window".into(),
    })?;
    let node = document()?
        .get_element_by_id(&config.mount_id)
        .ok_or_else(|| BridgeError::MissingElement {
            id: config.mount_id.clone(),
        })?;

    let mut module: JsValue = window.into();
    let mut path = String::new();
    for segment in std::iter::once("Elm").chain(config.elm_module_path()) {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(segment);
        module = Reflect::get(&module, &JsValue::from_str(segment))
            .ok()
            .filter(|m| m.is_object())
            .ok_or_else(|| BridgeError::MissingGlobal { name: path.clone() })?;
    }

    let init = Reflect::get(&module, &JsValue::from_str("init"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| BridgeError::MissingGlobal {
            name: format!("{path}.init"),
        })?;

    let flags = serde_wasm_bindgen::to_value(&config.flags())
        .map_err(|e| BridgeError::decode_js("flags", e))?;
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("node"), &node)
        .and_then(|_| Reflect::set(&options, &JsValue::from_str("flags"), &flags))
        .map_err(|e| BridgeError::js("init options", &e))?;

    let app = init
        .call1(&module, &options)
        .map_err(|e| BridgeError::js("Elm init", &e))?;
    info!("initialised {path}");
    attach_with(&app, config)
}

pub(crate) fn decode_config(value: JsValue) -> Result<BridgeConfig, BridgeError> {
    if value.is_undefined() || value.is_null() {
        return Ok(BridgeConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| BridgeError::decode_js("config", e))
}

/// Shared start-up for the exported entry points.
pub(crate) fn prepare(config: JsValue) -> Result<BridgeConfig, BridgeError> {
    console_error_panic_hook::set_once();
    let config = decode_config(config)?;
    logging::init(config.log_level.into());
    Ok(config)
}
