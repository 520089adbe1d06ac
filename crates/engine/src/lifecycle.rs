use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use common::pairs::find_pair;
use common::{DashboardSnapshot, EngineCommand, Narrator, Settings, SettingsStore, Timeframe};

use crate::anchor::AnchorResolver;
use crate::session::Session;

/// Results of background work, fed back into the engine loop.
#[derive(Debug)]
enum Completion {
    Anchor { generation: u64, price: f64 },
    Narration { epoch: u64, text: String },
}

/// Cloneable handle passed to the dashboard API.
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    snapshot: Arc<RwLock<DashboardSnapshot>>,
    snapshot_tx: broadcast::Sender<DashboardSnapshot>,
}

impl EngineHandle {
    pub async fn send(&self, cmd: EngineCommand) {
        if self.command_tx.send(cmd).await.is_err() {
            warn!("Engine is not running, command dropped");
        }
    }

    /// Latest published snapshot.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Subscribe to snapshots published after every state change.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardSnapshot> {
        self.snapshot_tx.subscribe()
    }
}

/// Drives a [`Session`]: tick timer, user commands, anchor fetches and
/// narration requests, all serialized through one task.
pub struct Engine {
    session: Session,
    resolver: AnchorResolver,
    narrator: Arc<dyn Narrator>,
    settings: Option<SettingsStore>,
    snapshot: Arc<RwLock<DashboardSnapshot>>,
    snapshot_tx: broadcast::Sender<DashboardSnapshot>,
    command_rx: mpsc::Receiver<EngineCommand>,
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
}

impl Engine {
    pub fn new(
        session: Session,
        resolver: AnchorResolver,
        narrator: Arc<dyn Narrator>,
        settings: Option<SettingsStore>,
    ) -> (Self, EngineHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (completion_tx, completion_rx) = mpsc::channel(32);
        let (snapshot_tx, _) = broadcast::channel(256);
        let snapshot = Arc::new(RwLock::new(session.snapshot(Utc::now())));

        let handle = EngineHandle {
            command_tx,
            snapshot: snapshot.clone(),
            snapshot_tx: snapshot_tx.clone(),
        };

        let engine = Engine {
            session,
            resolver,
            narrator,
            settings,
            snapshot,
            snapshot_tx,
            command_rx,
            completion_tx,
            completion_rx,
        };

        (engine, handle)
    }

    /// Run until every [`EngineHandle`] is dropped. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!(
            pair = %self.session.pair().id,
            timeframe = %self.session.timeframe(),
            "Engine started"
        );

        self.spawn_anchor_fetch(self.session.generation());
        self.publish().await;

        let mut ticker = tick_interval(self.session.timeframe());

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd, &mut ticker) {
                            self.publish().await;
                        }
                    }
                    None => {
                        info!("Engine command channel closed, shutting down");
                        break;
                    }
                },

                _ = ticker.tick() => {
                    if self.session.tick(Utc::now()).is_some() {
                        self.publish().await;
                    }
                }

                Some(done) = self.completion_rx.recv() => {
                    let changed = match done {
                        Completion::Anchor { generation, price } => {
                            self.session.apply_anchor(generation, price)
                        }
                        Completion::Narration { epoch, text } => {
                            self.session.apply_narration(epoch, text)
                        }
                    };
                    if changed {
                        self.publish().await;
                    }
                }
            }
        }
    }

    /// Returns true when the session changed.
    fn handle_command(&mut self, cmd: EngineCommand, ticker: &mut Interval) -> bool {
        match cmd {
            EngineCommand::SelectPair(id) => {
                let Some(pair) = find_pair(&id) else {
                    warn!(pair = %id, "Unknown pair ignored");
                    return false;
                };
                if pair.id == self.session.pair().id {
                    debug!(pair = %id, "Pair already selected");
                    return false;
                }
                let generation = self.session.select_pair(pair);
                self.spawn_anchor_fetch(generation);
                *ticker = tick_interval(self.session.timeframe());
                self.persist();
                true
            }

            EngineCommand::SelectTimeframe(timeframe) => {
                if timeframe == self.session.timeframe() {
                    debug!(%timeframe, "Timeframe already selected");
                    return false;
                }
                self.session.select_timeframe(timeframe);
                *ticker = tick_interval(timeframe);
                self.persist();
                true
            }

            EngineCommand::RequestNarration => {
                let Some((epoch, request)) = self.session.begin_narration() else {
                    debug!("Narration requested without a signal");
                    return false;
                };
                let narrator = self.narrator.clone();
                let tx = self.completion_tx.clone();
                tokio::spawn(async move {
                    let text = narrator.narrate(&request).await;
                    let _ = tx.send(Completion::Narration { epoch, text }).await;
                });
                true
            }
        }
    }

    fn spawn_anchor_fetch(&self, generation: u64) {
        let resolver = self.resolver.clone();
        let pair_id = self.session.pair().id.clone();
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let price = resolver.resolve(&pair_id).await;
            let _ = tx.send(Completion::Anchor { generation, price }).await;
        });
    }

    fn persist(&self) {
        let Some(store) = &self.settings else {
            return;
        };
        let settings = Settings {
            pair: self.session.pair().clone(),
            timeframe: self.session.timeframe(),
        };
        if let Err(e) = store.save(&settings) {
            warn!(path = %store.path().display(), error = %e, "Failed to save settings");
        }
    }

    async fn publish(&self) {
        let snapshot = self.session.snapshot(Utc::now());
        *self.snapshot.write().await = snapshot.clone();
        // No subscribers is fine
        let _ = self.snapshot_tx.send(snapshot);
    }
}

/// Interval whose first tick lands one full period from now.
fn tick_interval(timeframe: Timeframe) -> Interval {
    let period = timeframe.tick_interval();
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
