//! Recording view host.

use std::{
    convert::Infallible,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use parlor_app::{ControllerState, HostIntent, ViewHost};
use parlor_core::ScrollProbe;
use tokio::sync::mpsc;

/// Everything the host was asked to do, in order of occurrence.
#[derive(Debug, Default)]
pub struct Recording {
    /// Controller states passed to `render`, oldest first.
    pub renders: Vec<ControllerState>,
    /// Number of scroll-to-bottom commands executed.
    pub scrolls: usize,
}

/// A [`ViewHost`] that records renders and scroll commands and replays
/// scripted intents and probes.
pub struct SimHost {
    intents: mpsc::UnboundedReceiver<HostIntent>,
    probe: Arc<Mutex<Option<ScrollProbe>>>,
    recording: Arc<Mutex<Recording>>,
}

/// Test-side handle to a [`SimHost`] that has been moved into a runtime.
#[derive(Clone)]
pub struct SimHostHandle {
    intents: mpsc::UnboundedSender<HostIntent>,
    probe: Arc<Mutex<Option<ScrollProbe>>>,
    recording: Arc<Mutex<Recording>>,
}

impl SimHost {
    /// Create a host and its controlling handle.
    pub fn new() -> (Self, SimHostHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let probe = Arc::new(Mutex::new(None));
        let recording = Arc::new(Mutex::new(Recording::default()));
        let host =
            Self { intents: rx, probe: Arc::clone(&probe), recording: Arc::clone(&recording) };
        (host, SimHostHandle { intents: tx, probe, recording })
    }
}

impl SimHostHandle {
    /// Script the probe value the host reports until changed again.
    pub fn set_probe(&self, probe: Option<ScrollProbe>) {
        *lock(&self.probe) = probe;
    }

    /// Send a user intent to the runtime. Ignored once the host is gone.
    pub fn send(&self, intent: HostIntent) {
        let _ = self.intents.send(intent);
    }

    /// The states rendered so far, oldest first.
    pub fn renders(&self) -> Vec<ControllerState> {
        lock(&self.recording).renders.clone()
    }

    /// The most recently rendered state. `None` before the first render.
    pub fn last_render(&self) -> Option<ControllerState> {
        lock(&self.recording).renders.last().cloned()
    }

    /// Number of scroll-to-bottom commands executed so far.
    pub fn scrolls(&self) -> usize {
        lock(&self.recording).scrolls
    }
}

impl ViewHost for SimHost {
    type Error = Infallible;

    fn render(&mut self, state: &ControllerState) -> Result<(), Self::Error> {
        lock(&self.recording).renders.push(state.clone());
        Ok(())
    }

    fn scroll_to_bottom(&mut self) {
        lock(&self.recording).scrolls += 1;
    }

    fn scroll_probe(&self) -> Option<ScrollProbe> {
        *lock(&self.probe)
    }

    fn poll_intent(&mut self) -> impl Future<Output = Option<HostIntent>> + Send {
        self.intents.recv()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
