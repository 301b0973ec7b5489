//! Elm port lookup.
//!
//! Ports are optional: an app that does not declare one simply does not
//! get that channel wired up.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::error::BridgeError;
use crate::relay::Notify;

/// The `ports` object of an initialised Elm app.
pub struct Ports {
    ports: JsValue,
}

impl Ports {
    pub fn of(app: &JsValue) -> Self {
        let ports = Reflect::get(app, &JsValue::from_str("ports")).unwrap_or(JsValue::UNDEFINED);
        Ports { ports }
    }

    fn port(&self, name: &str) -> Option<JsValue> {
        if !self.ports.is_object() {
            return None;
        }
        Reflect::get(&self.ports, &JsValue::from_str(name))
            .ok()
            .filter(|p| p.is_object())
    }

    fn method(port: &JsValue, name: &str) -> Option<Function> {
        Reflect::get(port, &JsValue::from_str(name))
            .ok()
            .and_then(|m| m.dyn_into::<Function>().ok())
    }

    /// Subscribe `callback` to an inbound port. Returns `false` if the
    /// port does not exist.
    pub fn subscribe(&self, name: &str, callback: &Function) -> Result<bool, BridgeError> {
        let Some(port) = self.port(name) else {
            return Ok(false);
        };
        let Some(subscribe) = Self::method(&port, "subscribe") else {
            return Ok(false);
        };
        subscribe
            .call1(&port, callback)
            .map_err(|e| BridgeError::js("port.subscribe", &e))?;
        Ok(true)
    }

    /// Sending half of an outbound port, if the app declares it.
    pub fn outbound(&self, name: &str) -> Option<OutboundPort> {
        let port = self.port(name)?;
        let send = Self::method(&port, "send")?;
        Some(OutboundPort { port, send })
    }
}

pub struct OutboundPort {
    port: JsValue,
    send: Function,
}

impl Notify for OutboundPort {
    fn notify(&self) -> Result<(), BridgeError> {
        self.send
            .call1(&self.port, &JsValue::NULL)
            .map(drop)
            .map_err(|e| BridgeError::js("port.send", &e))
    }
}
