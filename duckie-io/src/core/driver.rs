//! Backend trait and typed driver handles
//!
//! A [`Backend`] is the opaque endpoint a robot handle talks to — either the
//! in-process simulation or a TCP connection to a robot daemon. Component
//! drivers are thin typed views over it: [`Publisher`] for actuators,
//! [`Subscriber`] for sensors.

use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use duckie_messages::Payload;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Identifies one robot component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
    Motors,
    Lights,
    Camera,
    RangeFinder,
    LeftWheelEncoder,
    RightWheelEncoder,
}

impl ComponentId {
    /// Snake-case component name, matching the robot handle's accessors
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentId::Motors => "motors",
            ComponentId::Lights => "lights",
            ComponentId::Camera => "camera",
            ComponentId::RangeFinder => "range_finder",
            ComponentId::LeftWheelEncoder => "left_wheel_encoder",
            ComponentId::RightWheelEncoder => "right_wheel_encoder",
        }
    }

    /// True for components that produce data (attach/capture side)
    pub fn is_sensor(&self) -> bool {
        matches!(
            self,
            ComponentId::Camera
                | ComponentId::RangeFinder
                | ComponentId::LeftWheelEncoder
                | ComponentId::RightWheelEncoder
        )
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Robot endpoint a component driver talks to
pub trait Backend: Send + Sync {
    /// Start the component
    fn start(&self, id: ComponentId) -> Result<()>;

    /// Stop the component
    fn stop(&self, id: ComponentId) -> Result<()>;

    /// Publish an actuator payload
    fn publish(&self, id: ComponentId, payload: Payload) -> Result<()>;

    /// Register a subscriber channel for a sensor component
    fn subscribe(&self, id: ComponentId) -> Result<Receiver<Payload>>;
}

/// Typed actuator handle
pub struct Publisher<T> {
    backend: Arc<dyn Backend>,
    id: ComponentId,
    _marker: PhantomData<fn(T)>,
}

impl<T: Into<Payload>> Publisher<T> {
    pub(crate) fn new(backend: Arc<dyn Backend>, id: ComponentId) -> Self {
        Self {
            backend,
            id,
            _marker: PhantomData,
        }
    }

    /// Start the actuator
    pub fn start(&self) -> Result<()> {
        self.backend.start(self.id)
    }

    /// Stop the actuator
    pub fn stop(&self) -> Result<()> {
        self.backend.stop(self.id)
    }

    /// Publish one message to the actuator
    pub fn publish(&self, message: T) -> Result<()> {
        self.backend.publish(self.id, message.into())
    }
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct SubscriberInner {
    receiver: Option<Receiver<Payload>>,
    worker: Option<JoinHandle<()>>,
    worker_stop: Option<Arc<AtomicBool>>,
}

/// Typed sensor handle.
///
/// Supports both consumption styles of the underlying SDK surface: register
/// a callback with [`attach`](Subscriber::attach) before or after
/// [`start`](Subscriber::start), or poll with
/// [`capture`](Subscriber::capture). Each payload is delivered to exactly
/// one consumer, so mixing both styles on one subscriber splits the stream.
pub struct Subscriber<T> {
    backend: Arc<dyn Backend>,
    id: ComponentId,
    callbacks: Arc<Mutex<Vec<Callback<T>>>>,
    inner: Mutex<SubscriberInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Subscriber<T>
where
    T: TryFrom<Payload, Error = duckie_messages::Error> + Send + 'static,
{
    pub(crate) fn new(backend: Arc<dyn Backend>, id: ComponentId) -> Self {
        Self {
            backend,
            id,
            callbacks: Arc::new(Mutex::new(Vec::new())),
            inner: Mutex::new(SubscriberInner {
                receiver: None,
                worker: None,
                worker_stop: None,
            }),
            _marker: PhantomData,
        }
    }

    /// Start the sensor; data begins flowing after this call
    pub fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.receiver.is_some() {
            return Ok(());
        }

        self.backend.start(self.id)?;
        inner.receiver = Some(self.backend.subscribe(self.id)?);

        if !self.callbacks.lock().is_empty() {
            self.spawn_worker(&mut inner)?;
        }
        Ok(())
    }

    /// Stop the sensor and join the callback worker, if any
    pub fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock();

        if let Some(stop) = inner.worker_stop.take() {
            stop.store(true, Ordering::Relaxed);
        }
        if let Some(worker) = inner.worker.take() {
            if worker.join().is_err() {
                log::error!("{}: subscriber worker panicked", self.id);
            }
        }
        inner.receiver = None;

        self.backend.stop(self.id)
    }

    /// Register a callback invoked for every received message.
    ///
    /// May be called before or after [`start`](Subscriber::start); delivery
    /// begins once the sensor is started.
    pub fn attach<F>(&self, callback: F) -> Result<()>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.callbacks.lock().push(Arc::new(callback));

        let mut inner = self.inner.lock();
        if inner.receiver.is_some() && inner.worker.is_none() {
            self.spawn_worker(&mut inner)?;
        }
        Ok(())
    }

    /// Receive the next message.
    ///
    /// With `block = true`, waits for the next message. With `block = false`,
    /// drains the queue and returns the newest available message, or `None`
    /// if nothing has arrived.
    pub fn capture(&self, block: bool) -> Result<Option<T>> {
        let receiver = {
            let inner = self.inner.lock();
            inner
                .receiver
                .clone()
                .ok_or(Error::NotStarted(self.id.as_str()))?
        };

        if block {
            loop {
                let payload = receiver.recv().map_err(|_| Error::Disconnected)?;
                match T::try_from(payload) {
                    Ok(message) => return Ok(Some(message)),
                    Err(e) => log::warn!("{}: skipping payload: {}", self.id, e),
                }
            }
        }

        let mut latest = None;
        loop {
            match receiver.try_recv() {
                Ok(payload) => match T::try_from(payload) {
                    Ok(message) => latest = Some(message),
                    Err(e) => log::warn!("{}: skipping payload: {}", self.id, e),
                },
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    if latest.is_some() {
                        return Ok(latest);
                    }
                    return Err(Error::Disconnected);
                }
            }
        }
    }

    fn spawn_worker(&self, inner: &mut SubscriberInner) -> Result<()> {
        let receiver = match inner.receiver.clone() {
            Some(r) => r,
            None => return Err(Error::NotStarted(self.id.as_str())),
        };
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let callbacks = Arc::clone(&self.callbacks);
        let id = self.id;

        let worker = thread::Builder::new()
            .name(format!("{}-subscriber", id))
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match receiver.recv_timeout(Duration::from_millis(100)) {
                        Ok(payload) => match T::try_from(payload) {
                            Ok(message) => {
                                for callback in callbacks.lock().iter() {
                                    callback(&message);
                                }
                            }
                            Err(e) => log::warn!("{}: skipping payload: {}", id, e),
                        },
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            log::debug!("{}: subscriber channel closed", id);
                            break;
                        }
                    }
                }
            })
            .map_err(|e| Error::Other(format!("failed to spawn subscriber worker: {}", e)))?;

        inner.worker = Some(worker);
        inner.worker_stop = Some(stop);
        Ok(())
    }
}

impl<T> Drop for Subscriber<T> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        if let Some(stop) = inner.worker_stop.take() {
            stop.store(true, Ordering::Relaxed);
        }
        if let Some(worker) = inner.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Sender};
    use duckie_messages::{ImageFrame, Range};
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    /// Backend whose sensor data is fed by the test through a channel
    struct StubBackend {
        receiver: Receiver<Payload>,
    }

    impl StubBackend {
        fn new() -> (Sender<Payload>, Arc<Self>) {
            let (sender, receiver) = unbounded();
            (sender, Arc::new(Self { receiver }))
        }
    }

    impl Backend for StubBackend {
        fn start(&self, _id: ComponentId) -> Result<()> {
            Ok(())
        }

        fn stop(&self, _id: ComponentId) -> Result<()> {
            Ok(())
        }

        fn publish(&self, _id: ComponentId, _payload: Payload) -> Result<()> {
            Ok(())
        }

        fn subscribe(&self, _id: ComponentId) -> Result<Receiver<Payload>> {
            Ok(self.receiver.clone())
        }
    }

    #[test]
    fn test_capture_skips_mismatched_payloads() {
        let (sender, backend) = StubBackend::new();
        let camera: Subscriber<ImageFrame> = Subscriber::new(backend, ComponentId::Camera);
        camera.start().unwrap();

        let frame = ImageFrame::new(2, 2, vec![0u8; 12]).unwrap();
        sender.send(Payload::from(Range::meters(0.5))).unwrap();
        sender.send(Payload::from(frame.clone())).unwrap();

        // Blocking capture skips the foreign payload and returns the frame
        assert_eq!(camera.capture(true).unwrap(), Some(frame));

        // A queue holding only mismatches drains to nothing
        sender.send(Payload::from(Range::out_of_range())).unwrap();
        assert_eq!(camera.capture(false).unwrap(), None);
    }

    #[test]
    fn test_callback_worker_skips_mismatched_payloads() {
        let (sender, backend) = StubBackend::new();
        let camera: Subscriber<ImageFrame> = Subscriber::new(backend, ComponentId::Camera);

        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        camera
            .attach(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        camera.start().unwrap();

        sender.send(Payload::from(Range::meters(0.5))).unwrap();
        let frame = ImageFrame::new(2, 2, vec![0u8; 12]).unwrap();
        sender.send(Payload::from(frame)).unwrap();

        thread::sleep(Duration::from_millis(300));
        camera.stop().unwrap();

        // Only the frame reached the callback
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_component_names() {
        assert_eq!(ComponentId::Motors.as_str(), "motors");
        assert_eq!(ComponentId::RangeFinder.as_str(), "range_finder");
        assert_eq!(ComponentId::LeftWheelEncoder.to_string(), "left_wheel_encoder");
    }

    #[test]
    fn test_sensor_classification() {
        assert!(ComponentId::Camera.is_sensor());
        assert!(ComponentId::RightWheelEncoder.is_sensor());
        assert!(!ComponentId::Motors.is_sensor());
        assert!(!ComponentId::Lights.is_sensor());
    }

    #[test]
    fn test_component_id_serde() {
        let json = serde_json::to_string(&ComponentId::RangeFinder).unwrap();
        assert_eq!(json, "\"range_finder\"");
        let id: ComponentId = serde_json::from_str("\"left_wheel_encoder\"").unwrap();
        assert_eq!(id, ComponentId::LeftWheelEncoder);
    }
}
