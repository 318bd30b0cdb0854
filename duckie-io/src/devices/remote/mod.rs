//! TCP backend for a real robot
//!
//! Connects to the robot daemon and speaks the length-prefixed streaming
//! protocol: control and actuator messages go out as [`ClientMessage`]
//! frames, and a reader thread turns incoming [`ServerMessage::Data`] frames
//! into subscriber channel deliveries. Decode failures skip the frame; IO
//! errors end the stream.

use crate::core::{Backend, ComponentId};
use crate::devices::{dispatch, register_subscriber, SubscriberMap};
use crate::error::{Error, Result};
use crate::streaming::{read_frame, write_frame, ClientMessage, Serializer, ServerMessage, WireFormat};
use crossbeam_channel::Receiver;
use duckie_messages::Payload;
use parking_lot::Mutex;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Backend connected to a robot daemon over TCP
pub struct RemoteBackend {
    writer: Mutex<TcpStream>,
    serializer: Serializer,
    shutdown: Arc<AtomicBool>,
    subscribers: Arc<SubscriberMap>,
    reader_thread: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteBackend {
    /// Connect to the daemon at `addr` using the given wire format.
    ///
    /// Both ends must agree on the format; the daemon's default is postcard.
    pub fn connect<A: ToSocketAddrs + std::fmt::Display>(
        addr: A,
        format: WireFormat,
    ) -> Result<Self> {
        let stream = TcpStream::connect(&addr)?;
        stream.set_nodelay(true)?;
        log::info!("Connected to robot daemon at {}", addr);

        let serializer = Serializer::new(format);
        let shutdown = Arc::new(AtomicBool::new(false));
        let subscribers: Arc<SubscriberMap> = Arc::new(Mutex::new(Default::default()));

        let mut read_stream = stream.try_clone()?;
        let reader_shutdown = Arc::clone(&shutdown);
        let reader_subscribers = Arc::clone(&subscribers);
        let reader = thread::Builder::new()
            .name("remote-reader".to_string())
            .spawn(move || {
                while !reader_shutdown.load(Ordering::Relaxed) {
                    let bytes = match read_frame(&mut read_stream) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            if !reader_shutdown.load(Ordering::Relaxed) {
                                log::warn!("Daemon connection closed: {}", e);
                            }
                            break;
                        }
                    };
                    match serializer.deserialize::<ServerMessage>(&bytes) {
                        Ok(ServerMessage::Data { component, payload }) => {
                            dispatch(&reader_subscribers, component, &payload);
                        }
                        Err(e) => log::warn!("Skipping undecodable frame: {}", e),
                    }
                }
                log::debug!("Remote reader terminated");
            })
            .map_err(|e| Error::Other(format!("failed to spawn remote reader: {}", e)))?;

        Ok(Self {
            writer: Mutex::new(stream),
            serializer,
            shutdown,
            subscribers,
            reader_thread: Mutex::new(Some(reader)),
        })
    }

    fn send(&self, message: &ClientMessage) -> Result<()> {
        let bytes = self.serializer.serialize(message)?;
        let mut writer = self.writer.lock();
        write_frame(&mut *writer, &bytes)
    }
}

impl Backend for RemoteBackend {
    fn start(&self, id: ComponentId) -> Result<()> {
        self.send(&ClientMessage::Start { component: id })
    }

    fn stop(&self, id: ComponentId) -> Result<()> {
        self.send(&ClientMessage::Stop { component: id })
    }

    fn publish(&self, id: ComponentId, payload: Payload) -> Result<()> {
        if id.is_sensor() {
            return Err(Error::NotSupported(format!(
                "{} does not accept published data",
                id
            )));
        }
        self.send(&ClientMessage::Publish {
            component: id,
            payload,
        })
    }

    fn subscribe(&self, id: ComponentId) -> Result<Receiver<Payload>> {
        if !id.is_sensor() {
            return Err(Error::NotSupported(format!(
                "{} does not produce data",
                id
            )));
        }
        Ok(register_subscriber(&self.subscribers, id))
    }
}

impl Drop for RemoteBackend {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Unblock the reader's read_exact
        let _ = self.writer.lock().shutdown(Shutdown::Both);
        if let Some(reader) = self.reader_thread.lock().take() {
            let _ = reader.join();
        }
    }
}
