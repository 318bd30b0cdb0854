//! Robot daemon
//!
//! Listens for one robot handle at a time and bridges the streaming protocol
//! onto a local backend. Sensor data flows out through per-component
//! forwarder threads; control and actuator messages are applied as they
//! arrive. When the client disconnects the daemon halts the motors and stops
//! every component the client started, so a dropped connection never leaves
//! the robot driving.

use crate::core::{Backend, ComponentId};
use crate::error::{Error, Result};
use crate::streaming::{read_frame, write_frame, ClientMessage, Serializer, ServerMessage, WireFormat};
use duckie_messages::{Payload, WheelSpeeds};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const ACCEPT_POLL: Duration = Duration::from_millis(10);
const FORWARD_POLL: Duration = Duration::from_millis(100);

/// TCP server exposing a backend to remote robot handles
pub struct Daemon {
    listener: TcpListener,
    backend: Arc<dyn Backend>,
    serializer: Serializer,
}

struct ActiveClient {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
    stream: TcpStream,
    peer: SocketAddr,
}

impl Daemon {
    /// Bind the daemon to `addr` serving the given backend
    pub fn bind<A: ToSocketAddrs>(
        addr: A,
        backend: Arc<dyn Backend>,
        format: WireFormat,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        log::info!("Daemon listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            backend,
            serializer: Serializer::new(format),
        })
    }

    /// Actual bound address, useful when binding to port 0
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve clients until `running` goes false.
    ///
    /// One client is served at a time; later connections are turned away
    /// until the active one disconnects.
    pub fn run(&self, running: Arc<AtomicBool>) -> Result<()> {
        let mut active: Option<ActiveClient> = None;

        while running.load(Ordering::Relaxed) {
            if let Some(client) = active.take() {
                if client.handle.is_finished() {
                    let _ = client.handle.join();
                    log::info!("Client {} disconnected", client.peer);
                } else {
                    active = Some(client);
                }
            }

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if active.is_some() {
                        log::warn!("Rejecting {}: another client is connected", peer);
                        let _ = stream.shutdown(Shutdown::Both);
                        continue;
                    }
                    log::info!("Client connected from {}", peer);
                    active = Some(self.spawn_client(stream, peer)?);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    log::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL);
                }
            }
        }

        if let Some(client) = active.take() {
            client.stop.store(true, Ordering::Relaxed);
            let _ = client.stream.shutdown(Shutdown::Both);
            let _ = client.handle.join();
        }
        log::info!("Daemon terminated");
        Ok(())
    }

    fn spawn_client(&self, stream: TcpStream, peer: SocketAddr) -> Result<ActiveClient> {
        stream.set_nodelay(true)?;
        let control_stream = stream.try_clone()?;

        let stop = Arc::new(AtomicBool::new(false));
        let backend = Arc::clone(&self.backend);
        let serializer = self.serializer;
        let client_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name(format!("client-{}", peer))
            .spawn(move || serve_client(stream, backend, serializer, client_stop))
            .map_err(|e| Error::Other(format!("failed to spawn client thread: {}", e)))?;

        Ok(ActiveClient {
            handle,
            stop,
            stream: control_stream,
            peer,
        })
    }
}

/// Handle one client connection until it closes or the daemon shuts down
fn serve_client(
    mut stream: TcpStream,
    backend: Arc<dyn Backend>,
    serializer: Serializer,
    stop: Arc<AtomicBool>,
) {
    let writer = match stream.try_clone() {
        Ok(clone) => Arc::new(Mutex::new(clone)),
        Err(e) => {
            log::error!("Failed to clone client stream: {}", e);
            return;
        }
    };

    let mut forwarders: HashMap<ComponentId, (Arc<AtomicBool>, JoinHandle<()>)> = HashMap::new();
    let mut started: Vec<ComponentId> = Vec::new();

    while !stop.load(Ordering::Relaxed) {
        let bytes = match read_frame(&mut stream) {
            Ok(bytes) => bytes,
            Err(e) => {
                if !stop.load(Ordering::Relaxed) {
                    log::debug!("Client stream ended: {}", e);
                }
                break;
            }
        };

        let message = match serializer.deserialize::<ClientMessage>(&bytes) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Skipping undecodable frame: {}", e);
                continue;
            }
        };

        match message {
            ClientMessage::Start { component } => {
                log::debug!("Client start: {}", component);
                if let Err(e) = backend.start(component) {
                    log::warn!("Failed to start {}: {}", component, e);
                    continue;
                }
                if !started.contains(&component) {
                    started.push(component);
                }
                if component.is_sensor() && !forwarders.contains_key(&component) {
                    match spawn_forwarder(&backend, component, serializer, &writer, &stop) {
                        Ok(forwarder) => {
                            forwarders.insert(component, forwarder);
                        }
                        Err(e) => log::warn!("Failed to forward {}: {}", component, e),
                    }
                }
            }
            ClientMessage::Stop { component } => {
                log::debug!("Client stop: {}", component);
                if let Some((flag, handle)) = forwarders.remove(&component) {
                    flag.store(true, Ordering::Relaxed);
                    let _ = handle.join();
                }
                started.retain(|&c| c != component);
                if let Err(e) = backend.stop(component) {
                    log::warn!("Failed to stop {}: {}", component, e);
                }
            }
            ClientMessage::Publish { component, payload } => {
                if let Err(e) = backend.publish(component, payload) {
                    log::warn!("Publish to {} failed: {}", component, e);
                }
            }
        }
    }

    // Leave the robot safe regardless of how the client went away
    for (component, (flag, handle)) in forwarders.drain() {
        flag.store(true, Ordering::Relaxed);
        let _ = handle.join();
        log::debug!("Forwarder for {} joined", component);
    }
    if started.contains(&ComponentId::Motors) {
        if let Err(e) = backend.publish(ComponentId::Motors, Payload::from(WheelSpeeds::stop())) {
            log::warn!("Failed to halt motors: {}", e);
        }
    }
    for component in started {
        if let Err(e) = backend.stop(component) {
            log::warn!("Failed to stop {}: {}", component, e);
        }
    }
}

/// Spawn a thread forwarding one sensor's payloads to the client
fn spawn_forwarder(
    backend: &Arc<dyn Backend>,
    component: ComponentId,
    serializer: Serializer,
    writer: &Arc<Mutex<TcpStream>>,
    client_stop: &Arc<AtomicBool>,
) -> Result<(Arc<AtomicBool>, JoinHandle<()>)> {
    let receiver = backend.subscribe(component)?;
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let client_stop = Arc::clone(client_stop);
    let writer = Arc::clone(writer);

    let handle = thread::Builder::new()
        .name(format!("{}-forwarder", component))
        .spawn(move || {
            while !flag.load(Ordering::Relaxed) && !client_stop.load(Ordering::Relaxed) {
                let payload = match receiver.recv_timeout(FORWARD_POLL) {
                    Ok(payload) => payload,
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                };
                let message = ServerMessage::Data { component, payload };
                let result = serializer
                    .serialize(&message)
                    .and_then(|bytes| write_frame(&mut *writer.lock(), &bytes));
                if let Err(e) = result {
                    log::debug!("Forwarding {} ended: {}", component, e);
                    break;
                }
            }
        })
        .map_err(|e| Error::Other(format!("failed to spawn forwarder: {}", e)))?;

    Ok((stop, handle))
}
