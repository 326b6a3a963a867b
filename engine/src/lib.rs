#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine that sequences world commands into ticks.
//!
//! The engine owns one session: the world, the pursuer strategy state, the
//! intent queue and the observers notified after every tick. Ticks run
//! either synchronously through [`Engine::step`] or on a background loop
//! started with [`Engine::start`].

mod config;
mod intents;
mod tick_loop;

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use maze_chase_core::{Command, Direction, Event, GameStatus};
use maze_chase_system_pursuit::{Pursuit, PursuitView};
use maze_chase_world::{self as world, query, query::Snapshot, Layout, LayoutError, World};
use tracing::{debug, info, trace};

pub use config::EngineConfig;
pub use intents::{IntentQueue, IntentSender, DEFAULT_INTENT_CAPACITY};
pub use tick_loop::StopHandle;

use tick_loop::TickLoop;

/// Callback fired once per completed tick with the settled world.
pub type Observer = Box<dyn Fn(&World) + Send>;

/// Outcome of a single tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Tick counter after the tick.
    pub tick_index: u64,
    /// Session status after the tick.
    pub status: GameStatus,
    /// Events emitted while applying the tick.
    pub events: Vec<Event>,
}

impl TickReport {
    /// Reports whether the session ended on or before this tick.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }
}

/// Runs Maze Chase sessions.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    layout: Layout,
    session: Arc<Mutex<Session>>,
    intents: Arc<IntentQueue>,
    stop: StopHandle,
    ticker: Option<TickLoop>,
}

impl Engine {
    /// Creates an engine on the classic board.
    pub fn new(config: EngineConfig) -> Result<Self, LayoutError> {
        Ok(Self::with_layout(config, Layout::classic()?))
    }

    /// Creates an engine on the provided board.
    #[must_use]
    pub fn with_layout(config: EngineConfig, layout: Layout) -> Self {
        let session = Session::new(&config, &layout, Vec::new());
        let intents = IntentQueue::new(config.intent_capacity);
        Self {
            config,
            layout,
            session: Arc::new(Mutex::new(session)),
            intents: Arc::new(intents),
            stop: StopHandle::default(),
            ticker: None,
        }
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stops any running loop and rebuilds the session from the layout.
    ///
    /// Observers stay subscribed.
    pub fn initialize(&mut self) {
        self.cancel_loop();
        self.intents.reset();
        self.stop.reset();

        let mut session = lock(&self.session);
        let observers = std::mem::take(&mut session.observers);
        *session = Session::new(&self.config, &self.layout, observers);
        info!(strategy = ?self.config.strategy, "session initialized");
    }

    /// Queues a player intent, reporting whether it was accepted.
    pub fn push_intent(&self, direction: Direction) -> bool {
        self.intents.push(direction)
    }

    /// Handle for producer threads feeding intents.
    #[must_use]
    pub fn intents(&self) -> IntentSender {
        IntentSender::new(Arc::clone(&self.intents))
    }

    /// Intents waiting for a tick, oldest first.
    #[must_use]
    pub fn pending_intents(&self) -> Vec<Direction> {
        self.intents.pending()
    }

    /// Marks the session running and spawns the tick loop.
    ///
    /// Does nothing while a loop is already running or once the game ended.
    pub fn start(&mut self) -> io::Result<()> {
        if self.is_started() {
            return Ok(());
        }
        {
            let mut session = lock(&self.session);
            let mut events = Vec::new();
            world::apply(&mut session.world, Command::Start, &mut events);
            if query::status(&session.world).is_game_over() {
                return Ok(());
            }
        }

        self.cancel_loop();
        self.ticker = Some(TickLoop::spawn(
            self.config.tick_interval(),
            Arc::clone(&self.session),
            Arc::clone(&self.intents),
            self.stop.clone(),
        )?);
        info!(interval_ms = self.config.tick_interval_ms, "session started");
        Ok(())
    }

    /// Ends the session and waits for the loop to exit.
    ///
    /// No tick runs and no observer fires after this returns. Calling it
    /// again is harmless.
    pub fn stop(&mut self) {
        self.cancel_loop();
        let mut session = lock(&self.session);
        session.halt();
    }

    /// Handle that ends the loop from within an observer.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Reports whether the tick loop is running.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickLoop::is_running)
    }

    /// Runs one tick on the calling thread, marking the session running if
    /// it was not. A finished session is left untouched.
    pub fn step(&mut self) -> TickReport {
        let mut session = lock(&self.session);
        let mut events = Vec::new();
        world::apply(&mut session.world, Command::Start, &mut events);
        let mut report = session.tick(&self.intents);
        events.append(&mut report.events);
        report.events = events;
        report
    }

    /// Registers a callback fired after every tick.
    ///
    /// Observers run on the ticking thread while the session is locked;
    /// they must not call back into the engine.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&World) + Send + 'static,
    {
        lock(&self.session).observers.push(Box::new(observer));
    }

    /// Owned copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        query::snapshot(&lock(&self.session).world)
    }

    /// Runs `read` against the world between ticks.
    pub fn with_world<R>(&self, read: impl FnOnce(&World) -> R) -> R {
        read(&lock(&self.session).world)
    }

    fn cancel_loop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            drop(ticker);
            debug!("tick loop joined");
        }
    }
}

/// State mutated by ticks, shared between the engine and its loop thread.
pub(crate) struct Session {
    world: World,
    pursuit: Pursuit,
    interval: Duration,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("world", &self.world)
            .field("pursuit", &self.pursuit)
            .field("interval", &self.interval)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    fn new(config: &EngineConfig, layout: &Layout, observers: Vec<Observer>) -> Self {
        Self {
            world: World::new(layout, config.rules()),
            pursuit: Pursuit::new(config.pursuit()),
            interval: config.tick_interval(),
            observers,
        }
    }

    /// Applies one whole tick and notifies observers.
    pub(crate) fn tick(&mut self, intents: &IntentQueue) -> TickReport {
        let mut events = Vec::new();
        if query::status(&self.world).is_game_over() {
            return self.report(events);
        }

        let queued = intents.peek();
        world::apply(
            &mut self.world,
            Command::StepPlayer { queued },
            &mut events,
        );
        for event in &events {
            match event {
                Event::IntentCommitted { direction } => intents.commit(*direction),
                Event::PlayerStalled => intents.clear(),
                _ => {}
            }
        }

        if !query::status(&self.world).is_game_over() {
            let pursuers = query::pursuers(&self.world);
            let view = PursuitView::new(
                query::board(&self.world).tiles(),
                query::player(&self.world),
                &pursuers,
            );
            let moves = self.pursuit.next_moves(&view);
            world::apply(
                &mut self.world,
                Command::StepPursuers { moves },
                &mut events,
            );
        }

        world::apply(&mut self.world, Command::ResolveOutcome, &mut events);
        world::apply(
            &mut self.world,
            Command::Tick { dt: self.interval },
            &mut events,
        );

        for observer in &self.observers {
            observer(&self.world);
        }

        let report = self.report(events);
        trace!(
            tick = report.tick_index,
            score = query::score(&self.world),
            events = report.events.len(),
            "tick applied"
        );
        if report.is_game_over() {
            info!(
                status = %report.status,
                score = query::score(&self.world),
                ticks = report.tick_index,
                "session ended"
            );
        }
        report
    }

    /// Ends the session, keeping a victory already won.
    pub(crate) fn halt(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Halt, &mut events);
        if !events.is_empty() {
            info!(score = query::score(&self.world), "session stopped");
        }
    }

    fn report(&self, events: Vec<Event>) -> TickReport {
        TickReport {
            tick_index: query::tick_index(&self.world),
            status: query::status(&self.world),
            events,
        }
    }
}

/// Locks shared state, recovering it when a previous holder panicked.
///
/// State is only mutated in whole ticks, so a poisoned lock still guards a
/// consistent session.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rows: &[&str]) -> Engine {
        let layout = Layout::parse(rows).expect("layout parses");
        Engine::with_layout(EngineConfig::default(), layout)
    }

    #[test]
    fn step_marks_session_running() {
        let mut engine = engine(&["P.."]);
        let report = engine.step();

        assert_eq!(report.status, GameStatus::RUNNING);
        assert_eq!(report.tick_index, 1);
        assert_eq!(
            report.events.first(),
            Some(&Event::StatusChanged {
                status: GameStatus::RUNNING
            })
        );
    }

    #[test]
    fn finished_session_ignores_further_steps() {
        let mut engine = engine(&["P."]);
        assert!(engine.push_intent(Direction::Right));
        assert!(engine.step().is_game_over());

        let report = engine.step();
        assert!(report.events.is_empty());
        assert_eq!(report.tick_index, 1);
    }

    #[test]
    fn stalled_player_clears_pending_intents() {
        let mut engine = engine(&["wPw", "w.w"]);
        assert!(engine.push_intent(Direction::Left));
        assert!(engine.push_intent(Direction::Right));

        let report = engine.step();
        assert!(report.events.contains(&Event::PlayerStalled));
        assert!(engine.pending_intents().is_empty());
    }
}
