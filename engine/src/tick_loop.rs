//! Background thread that applies one tick per interval.

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError, Sender},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{intents::IntentQueue, lock, Session};

/// Requests the tick loop to end without waiting for it.
///
/// Usable from observers, which run on the loop thread and therefore must
/// not join it. The loop marks the game over and exits before its next tick.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    /// Asks the loop to stop after the tick in progress.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Reports whether a stop was requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Clears a pending request in place, so clones held by observers keep
    /// reaching later loops.
    pub(crate) fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

/// Owns the loop thread. Dropping the guard cancels the next tick and
/// joins the thread, so no tick runs once it is gone.
#[derive(Debug)]
pub(crate) struct TickLoop {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TickLoop {
    pub(crate) fn spawn(
        interval: Duration,
        session: Arc<Mutex<Session>>,
        intents: Arc<IntentQueue>,
        stop: StopHandle,
    ) -> io::Result<Self> {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("maze-chase-tick".to_owned())
            .spawn(move || {
                let mut deadline = Instant::now() + interval;
                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match cancelled.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let mut session = lock(&session);
                    if stop.is_requested() {
                        session.halt();
                        break;
                    }
                    let report = session.tick(&intents);
                    if report.is_game_over() {
                        debug!(tick = report.tick_index, "tick loop finished");
                        break;
                    }
                    if stop.is_requested() {
                        session.halt();
                        break;
                    }
                    drop(session);

                    deadline += interval;
                    let now = Instant::now();
                    if deadline < now {
                        deadline = now;
                    }
                }
            })?;

        Ok(Self {
            cancel: Some(cancel),
            handle: Some(handle),
        })
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("tick loop panicked");
            }
        }
    }
}
