//! Backend implementations
//!
//! Two backends exist: [`sim::SimBackend`] for hardware-free simulation and
//! [`remote::RemoteBackend`] for talking to a robot daemon over TCP.

pub mod remote;
pub mod sim;

pub use remote::RemoteBackend;
pub use sim::SimBackend;

use crate::config::{RobotConfig, RobotMode, DEFAULT_PORT};
use crate::core::{Backend, ComponentId};
use crate::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use duckie_messages::Payload;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Create the backend selected by the configuration
pub fn create_backend(config: &RobotConfig) -> Result<Arc<dyn Backend>> {
    match config.robot.mode {
        RobotMode::Simulated => Ok(Arc::new(SimBackend::new(
            &config.robot.name,
            config.simulation.clone(),
        )?)),
        RobotMode::Real => {
            let endpoint = robot_endpoint(&config.robot.name);
            Ok(Arc::new(RemoteBackend::connect(
                endpoint.as_str(),
                config.network.wire_format,
            )?))
        }
    }
}

/// Daemon endpoint for a named robot (hostname-addressed, mDNS style)
pub fn robot_endpoint(name: &str) -> String {
    format!("{}.local:{}", name, DEFAULT_PORT)
}

/// Per-component subscriber channels shared by both backends
pub(crate) type SubscriberMap = Mutex<HashMap<ComponentId, Vec<Sender<Payload>>>>;

/// Register a new subscriber channel for a component.
///
/// Camera channels are kept short because frames are large and stale frames
/// are worthless; the other sensors get deeper queues.
pub(crate) fn register_subscriber(map: &SubscriberMap, id: ComponentId) -> Receiver<Payload> {
    let capacity = match id {
        ComponentId::Camera => 4,
        _ => 64,
    };
    let (tx, rx) = bounded(capacity);
    map.lock().entry(id).or_default().push(tx);
    rx
}

/// Best-effort delivery to every subscriber of a component.
///
/// A full queue drops the payload; a disconnected receiver is pruned.
pub(crate) fn dispatch(map: &SubscriberMap, id: ComponentId, payload: &Payload) {
    let mut map = map.lock();
    let Some(senders) = map.get_mut(&id) else {
        return;
    };
    senders.retain(|sender| match sender.try_send(payload.clone()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            log::trace!("{}: subscriber queue full, dropping payload", id);
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    });
}

/// True if any subscriber channel is registered for the component
pub(crate) fn has_subscribers(map: &SubscriberMap, id: ComponentId) -> bool {
    map.lock().get(&id).is_some_and(|s| !s.is_empty())
}
