use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::error::PlaybackError;
use super::player::{MediaPlayer, PlayerState};
use super::repeat::RepeatState;
use super::sync::{SyncState, TickDecision};
use crate::domain::lesson::LessonTimeline;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one polling tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Player is not playing; nothing evaluated
    Idle(PlayerState),
    /// A player call failed; retried on the next tick
    Skipped,
    Evaluated(TickDecision),
}

struct SessionShared {
    player: Arc<dyn MediaPlayer>,
    timeline: LessonTimeline,
    state: Mutex<SyncState>,
    active_tx: watch::Sender<Option<usize>>,
}

impl SessionShared {
    async fn tick(&self) -> TickOutcome {
        let player_state = match self.player.player_state().await {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping tick, player state unavailable");
                return TickOutcome::Skipped;
            }
        };
        if player_state != PlayerState::Playing {
            return TickOutcome::Idle(player_state);
        }

        let time = match self.player.current_time().await {
            Ok(time) if time.is_finite() => time,
            Ok(time) => {
                tracing::debug!(time, "Skipping tick, player reported a non-finite time");
                return TickOutcome::Skipped;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping tick, current time unavailable");
                return TickOutcome::Skipped;
            }
        };

        let decision = self.state.lock().evaluate(&self.timeline, time);

        if let Some(target) = decision.seek_to {
            tracing::debug!(from = time, to = target, "Play-head left the loop window");
            if let Err(e) = self.restart_at(target).await {
                tracing::debug!(error = %e, "Loop seek failed, retrying on next tick");
                return TickOutcome::Skipped;
            }
        }

        self.publish(decision.active);
        TickOutcome::Evaluated(decision)
    }

    async fn restart_at(&self, seconds: f64) -> Result<(), PlaybackError> {
        self.player.seek_to(seconds, true).await?;
        self.player.play().await?;
        Ok(())
    }

    fn publish(&self, active: Option<usize>) {
        self.active_tx.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
    }

    fn check_index(&self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.timeline.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.timeline.len(),
            });
        }
        Ok(())
    }
}

/// Counts polling loops alive for a session
struct LiveLoop(Arc<AtomicUsize>);

impl LiveLoop {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for LiveLoop {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Keeps an external media player in step with a lesson timeline.
///
/// A session owns at most one polling loop. Every action that changes the
/// loop mode stops the running loop (abort and wait) before starting its
/// replacement, so two loops never compete for the play-head.
pub struct PlaybackSession {
    shared: Arc<SessionShared>,
    poll_task: AsyncMutex<Option<JoinHandle<()>>>,
    poll_interval: Duration,
    live_loops: Arc<AtomicUsize>,
}

impl PlaybackSession {
    /// Attach to a player and start polling. Must be called from within a
    /// tokio runtime.
    pub async fn attach(
        player: Arc<dyn MediaPlayer>,
        timeline: LessonTimeline,
        poll_interval: Duration,
    ) -> Self {
        let (active_tx, _) = watch::channel(None);
        let session = Self {
            shared: Arc::new(SessionShared {
                player,
                timeline,
                state: Mutex::new(SyncState::default()),
                active_tx,
            }),
            poll_task: AsyncMutex::new(None),
            poll_interval,
            live_loops: Arc::new(AtomicUsize::new(0)),
        };

        {
            let mut slot = session.poll_task.lock().await;
            session.start_polling(&mut slot);
        }

        tracing::debug!(
            sentences = session.shared.timeline.len(),
            interval_ms = poll_interval.as_millis() as u64,
            "Playback session attached"
        );
        session
    }

    /// Jump to a sentence and play it, leaving any repeat mode
    pub async fn select(&self, index: usize) -> Result<(), PlaybackError> {
        self.shared.check_index(index)?;
        let start = self.shared.timeline[index].start;

        let mut slot = self.poll_task.lock().await;
        Self::stop_polling(&mut slot).await;

        self.shared.state.lock().select(index);
        self.shared.publish(Some(index));
        let result = self.shared.restart_at(start).await;

        self.start_polling(&mut slot);
        tracing::debug!(index, start, "Sentence selected");
        result
    }

    /// Toggle repeat on a sentence, returning the new mode
    pub async fn toggle_repeat(&self, index: usize) -> Result<RepeatState, PlaybackError> {
        self.shared.check_index(index)?;

        let mut slot = self.poll_task.lock().await;
        Self::stop_polling(&mut slot).await;

        let (repeat, active) = {
            let mut state = self.shared.state.lock();
            let repeat = state.toggle_repeat(index);
            (repeat, state.active())
        };
        self.shared.publish(active);

        self.start_polling(&mut slot);
        tracing::debug!(index, ?repeat, "Repeat toggled");
        Ok(repeat)
    }

    /// Handle the player's "ended" event. Returns whether playback was
    /// restarted at the loop start.
    pub async fn on_media_ended(&self) -> bool {
        let mut slot = self.poll_task.lock().await;

        let restart = self.shared.state.lock().restart_point(&self.shared.timeline);
        let Some(start) = restart else {
            return false;
        };

        Self::stop_polling(&mut slot).await;
        let restarted = match self.shared.restart_at(start).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Could not restart loop after media ended");
                false
            }
        };
        self.start_polling(&mut slot);
        restarted
    }

    pub async fn pause(&self) -> Result<(), PlaybackError> {
        self.shared.player.pause().await?;
        Ok(())
    }

    pub async fn resume(&self) -> Result<(), PlaybackError> {
        self.shared.player.play().await?;
        Ok(())
    }

    /// Evaluate the play-head once, as the polling loop does
    pub async fn tick(&self) -> TickOutcome {
        self.shared.tick().await
    }

    pub fn repeat_state(&self) -> RepeatState {
        self.shared.state.lock().repeat()
    }

    pub fn active_sentence(&self) -> Option<usize> {
        self.shared.state.lock().active()
    }

    /// Watch the highlighted sentence
    pub fn subscribe(&self) -> watch::Receiver<Option<usize>> {
        self.shared.active_tx.subscribe()
    }

    pub fn timeline(&self) -> &LessonTimeline {
        &self.shared.timeline
    }

    /// Number of polling loops currently alive
    pub fn polling_loops(&self) -> usize {
        self.live_loops.load(Ordering::SeqCst)
    }

    /// Stop polling, then release the player
    pub async fn detach(self) -> Arc<dyn MediaPlayer> {
        {
            let mut slot = self.poll_task.lock().await;
            Self::stop_polling(&mut slot).await;
        }
        tracing::debug!("Playback session detached");
        self.shared.player.clone()
    }

    /// Detach from the current media and attach to another one
    pub async fn reattach(
        self,
        player: Arc<dyn MediaPlayer>,
        timeline: LessonTimeline,
    ) -> PlaybackSession {
        let poll_interval = self.poll_interval;
        self.detach().await;
        PlaybackSession::attach(player, timeline, poll_interval).await
    }

    fn start_polling(&self, slot: &mut Option<JoinHandle<()>>) {
        let shared = self.shared.clone();
        let period = self.poll_interval;
        let live = LiveLoop::enter(&self.live_loops);

        *slot = Some(tokio::spawn(async move {
            let _live = live;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                shared.tick().await;
            }
        }));
    }

    async fn stop_polling(slot: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = slot.take() {
            handle.abort();
            if let Err(e) = handle.await {
                if e.is_panic() {
                    tracing::error!(error = %e, "Playback polling loop panicked");
                }
            }
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if let Some(handle) = self.poll_task.get_mut().take() {
            handle.abort();
        }
    }
}
