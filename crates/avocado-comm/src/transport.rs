//! Byte transports the communicator can drive.
//!
//! A transport is a duplex byte channel with a short read timeout. The
//! communicator owns it exclusively; releasing it is the transport's `Drop`.

use avocado_protocol::split_lines;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

/// A duplex byte channel to the actuator line.
pub trait Transport {
    /// Write one complete frame.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Collect everything that arrives before the read timeout, split into
    /// lines. An empty vector means nothing arrived.
    fn read_available(&mut self) -> io::Result<Vec<Vec<u8>>>;

    /// Short human-readable name for logs.
    fn name(&self) -> String {
        "transport".to_string()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn read_available(&mut self) -> io::Result<Vec<Vec<u8>>> {
        (**self).read_available()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Callback that produces the reply bytes for a written frame.
pub type Responder = Box<dyn FnMut(&[u8]) -> Vec<u8> + Send>;

#[derive(Default)]
struct MemoryState {
    written: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
    responder: Option<Responder>,
    polls: usize,
    closed: usize,
}

/// In-memory transport.
///
/// Each call to `read_available` consumes one queued poll worth of bytes. The
/// paired [`MemoryPeer`] plays the actuator side: it queues replies, inspects
/// written frames and observes when the transport is released.
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

/// Actuator side of a [`MemoryTransport`].
#[derive(Clone)]
pub struct MemoryPeer {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    /// Create a connected transport/peer pair.
    pub fn new_pair() -> (MemoryTransport, MemoryPeer) {
        let state = Arc::new(Mutex::new(MemoryState::default()));
        (
            MemoryTransport { state: state.clone() },
            MemoryPeer { state },
        )
    }
}

impl Transport for MemoryTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.written.push(bytes.to_vec());
        if let Some(responder) = state.responder.as_mut() {
            state.replies.push_back(responder(bytes));
        }
        Ok(())
    }

    fn read_available(&mut self) -> io::Result<Vec<Vec<u8>>> {
        let mut state = self.state.lock();
        state.polls += 1;
        Ok(state
            .replies
            .pop_front()
            .map(|raw| split_lines(&raw))
            .unwrap_or_default())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.state.lock().closed += 1;
    }
}

impl MemoryPeer {
    /// Queue the bytes returned by the next unanswered poll.
    pub fn queue_reply(&self, raw: &[u8]) {
        self.state.lock().replies.push_back(raw.to_vec());
    }

    /// Answer every written frame with the bytes `responder` returns.
    pub fn set_responder<F>(&self, responder: F)
    where
        F: FnMut(&[u8]) -> Vec<u8> + Send + 'static,
    {
        self.state.lock().responder = Some(Box::new(responder));
    }

    /// All frames written so far, oldest first.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().written.clone()
    }

    /// Number of polls performed.
    pub fn polls(&self) -> usize {
        self.state.lock().polls
    }

    /// Number of times the transport was released.
    pub fn close_count(&self) -> usize {
        self.state.lock().closed
    }
}
