//! Protocol messages exchanged with the robot daemon

use crate::core::ComponentId;
use duckie_messages::Payload;
use serde::{Deserialize, Serialize};

/// Messages sent by a robot handle to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Start a component
    Start { component: ComponentId },
    /// Stop a component
    Stop { component: ComponentId },
    /// Publish an actuator payload
    Publish {
        component: ComponentId,
        payload: Payload,
    },
}

/// Messages sent by the daemon to a robot handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Sensor payload for a started component
    Data {
        component: ComponentId,
        payload: Payload,
    },
}
