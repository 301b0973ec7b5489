//! Elm port lookup against plain JS objects. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use menro_core::relay::{Notify, OutsideClickRelay};
use menro_core::web::ports::Ports;

fn set(target: &JsValue, key: &str, value: &JsValue) {
    Reflect::set(target, &JsValue::from_str(key), value).unwrap();
}

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap()
}

/// `{ ports: { <name>: port } }`
fn app_with(name: &str, port: &JsValue) -> JsValue {
    let ports: JsValue = Object::new().into();
    set(&ports, name, port);
    let app: JsValue = Object::new().into();
    set(&app, "ports", &ports);
    app
}

fn inbound_port() -> JsValue {
    let port: JsValue = Object::new().into();
    set(&port, "subscribe", &Function::new_with_args("cb", "this.subscribed = cb;"));
    port
}

fn outbound_port() -> JsValue {
    let port: JsValue = Object::new().into();
    set(
        &port,
        "send",
        &Function::new_with_args("v", "this.sent = (this.sent || 0) + 1; this.last = v;"),
    );
    port
}

#[wasm_bindgen_test]
fn app_without_ports() {
    let ports = Ports::of(&Object::new().into());
    let callback = Function::new_no_args("");
    assert!(!ports.subscribe("updateSoundState", &callback).unwrap());
    assert!(ports.outbound("pointerUpOutsideOfTheApp").is_none());
}

#[wasm_bindgen_test]
fn missing_port_names_are_skipped() {
    let app = app_with("somethingElse", &inbound_port());
    let ports = Ports::of(&app);
    let callback = Function::new_no_args("");
    assert!(!ports.subscribe("updateSoundState", &callback).unwrap());
    assert!(ports.outbound("pointerUpOutsideOfTheApp").is_none());
}

#[wasm_bindgen_test]
fn port_without_subscribe_is_skipped() {
    // An outbound-only port has `send` but no `subscribe`.
    let app = app_with("updateSoundState", &outbound_port());
    let callback = Function::new_no_args("");
    assert!(!Ports::of(&app).subscribe("updateSoundState", &callback).unwrap());
}

#[wasm_bindgen_test]
fn subscribes_callback_to_inbound_port() {
    let port = inbound_port();
    let app = app_with("updateSoundState", &port);
    let callback = Function::new_no_args("");
    assert!(Ports::of(&app).subscribe("updateSoundState", &callback).unwrap());
    assert_eq!(get(&port, "subscribed"), JsValue::from(callback));
}

#[wasm_bindgen_test]
fn outbound_port_sends_null() {
    let port = outbound_port();
    let app = app_with("pointerUpOutsideOfTheApp", &port);
    let outbound = Ports::of(&app).outbound("pointerUpOutsideOfTheApp").unwrap();
    outbound.notify().unwrap();
    outbound.notify().unwrap();
    assert_eq!(get(&port, "sent").as_f64(), Some(2.0));
    assert!(get(&port, "last").is_null());
}

#[wasm_bindgen_test]
fn relay_over_missing_port_is_inert() {
    let ports = Ports::of(&Object::new().into());
    let relay = OutsideClickRelay::new(ports.outbound("pointerUpOutsideOfTheApp"));
    assert!(!relay.is_connected());
    assert!(!relay.pointer_up().unwrap());
}
