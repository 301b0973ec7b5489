//! Outside-click relay: tells the UI about every document-wide pointer
//! release, so drags started inside the app end even when the pointer
//! is released outside its root element.

use crate::error::BridgeError;

/// An outbound channel that carries a payload-less notification.
pub trait Notify {
    fn notify(&self) -> Result<(), BridgeError>;
}

pub struct OutsideClickRelay<N> {
    port: Option<N>,
}

impl<N: Notify> OutsideClickRelay<N> {
    pub const EVENT: &'static str = "mouseup";

    /// `port` is `None` when the UI does not expose the channel; the relay
    /// then ignores every event.
    pub fn new(port: Option<N>) -> Self {
        OutsideClickRelay { port }
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    /// Returns whether a notification was sent.
    pub fn pointer_up(&self) -> Result<bool, BridgeError> {
        match &self.port {
            Some(port) => {
                port.notify()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct Counter(Cell<usize>);

    impl Notify for &Counter {
        fn notify(&self) -> Result<(), BridgeError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn forwards_every_release() {
        let counter = Counter::default();
        let relay = OutsideClickRelay::new(Some(&counter));
        assert!(relay.is_connected());
        for _ in 0..3 {
            assert!(relay.pointer_up().unwrap());
        }
        assert_eq!(counter.0.get(), 3);
    }

    #[test]
    fn missing_port_is_skipped() {
        let relay: OutsideClickRelay<&Counter> = OutsideClickRelay::new(None);
        assert!(!relay.is_connected());
        assert!(!relay.pointer_up().unwrap());
    }

    #[test]
    fn listens_for_mouseup() {
        assert_eq!(OutsideClickRelay::<&Counter>::EVENT, "mouseup");
    }
}
