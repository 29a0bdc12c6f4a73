//! Player lifecycle tracking.

use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, info, instrument, warn};

use splice_ipc::PlayerRole;
use splice_player::{Completion, ListenerId, PlayerAdapter, PlayerEventKind};

use crate::input::{Generation, Input, LifecycleOp};

/// Lifecycle phase of one player as seen by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecyclePhase {
    Uninitialized,
    Initializing,
    Ready,
    Deinitializing,
}

struct PlayerSlot {
    role: PlayerRole,
    adapter: Box<dyn PlayerAdapter>,
    phase: LifecyclePhase,
    subscriptions: Vec<ListenerId>,
}

impl PlayerSlot {
    fn new(role: PlayerRole, adapter: Box<dyn PlayerAdapter>) -> Self {
        Self {
            role,
            adapter,
            phase: LifecyclePhase::Uninitialized,
            subscriptions: Vec::new(),
        }
    }
}

/// Owns both players and their listener subscriptions.
///
/// Completions and listener callbacks are turned into [`Input`]s tagged with
/// the generation current when they were issued.
pub(crate) struct PlayerSlots {
    main: PlayerSlot,
    ad: PlayerSlot,
}

impl PlayerSlots {
    pub(crate) fn new(main: Box<dyn PlayerAdapter>, ad: Box<dyn PlayerAdapter>) -> Self {
        Self {
            main: PlayerSlot::new(PlayerRole::Main, main),
            ad: PlayerSlot::new(PlayerRole::Ad, ad),
        }
    }

    fn slot(&self, role: PlayerRole) -> &PlayerSlot {
        match role {
            PlayerRole::Main => &self.main,
            PlayerRole::Ad => &self.ad,
        }
    }

    fn slot_mut(&mut self, role: PlayerRole) -> &mut PlayerSlot {
        match role {
            PlayerRole::Main => &mut self.main,
            PlayerRole::Ad => &mut self.ad,
        }
    }

    pub(crate) fn phase(&self, role: PlayerRole) -> LifecyclePhase {
        self.slot(role).phase
    }

    pub(crate) fn is_ready(&self, role: PlayerRole) -> bool {
        self.phase(role) == LifecyclePhase::Ready
    }

    /// The player, if its initialize has completed.
    pub(crate) fn ready(&self, role: PlayerRole) -> Option<&dyn PlayerAdapter> {
        let slot = self.slot(role);
        (slot.phase == LifecyclePhase::Ready).then(|| slot.adapter.as_ref())
    }

    /// Run `f` against the player if it is ready.
    pub(crate) fn with_ready<R>(
        &mut self,
        role: PlayerRole,
        f: impl FnOnce(&mut dyn PlayerAdapter) -> R,
    ) -> Option<R> {
        let slot = self.slot_mut(role);
        if slot.phase != LifecyclePhase::Ready {
            return None;
        }
        Some(f(slot.adapter.as_mut()))
    }

    /// Issue `initialize`. Returns false unless the player was uninitialized.
    #[instrument(name = "player_initialize", skip(self, inbox))]
    pub(crate) fn begin_initialize(
        &mut self,
        role: PlayerRole,
        generation: Generation,
        inbox: &Sender<Input>,
    ) -> bool {
        let slot = self.slot_mut(role);
        if slot.phase != LifecyclePhase::Uninitialized {
            debug!(phase = ?slot.phase, "Player not uninitialized, ignoring initialize");
            return false;
        }

        info!(%generation, "Initializing player");
        slot.phase = LifecyclePhase::Initializing;
        let done = lifecycle_completion(role, generation, LifecycleOp::Initialize, inbox);
        slot.adapter.initialize(done);
        true
    }

    /// Record a successful initialize.
    pub(crate) fn mark_ready(&mut self, role: PlayerRole) -> bool {
        let slot = self.slot_mut(role);
        if slot.phase != LifecyclePhase::Initializing {
            warn!(%role, phase = ?slot.phase, "Initialize completed in unexpected phase");
            return false;
        }
        slot.phase = LifecyclePhase::Ready;
        true
    }

    /// Register listeners for `kinds`, replacing any existing ones.
    pub(crate) fn subscribe(
        &mut self,
        role: PlayerRole,
        kinds: &[PlayerEventKind],
        generation: Generation,
        inbox: &Sender<Input>,
    ) -> usize {
        self.unsubscribe(role);

        let slot = self.slot_mut(role);
        for &kind in kinds {
            let tx = inbox.clone();
            let id = slot.adapter.add_event_listener(
                kind,
                Arc::new(move |event| {
                    let _ = tx.send(Input::Player {
                        role,
                        generation,
                        event,
                    });
                }),
            );
            slot.subscriptions.push(id);
        }
        debug!(%role, count = kinds.len(), "Listeners registered");
        slot.subscriptions.len()
    }

    /// Remove every listener this orchestrator registered on `role`.
    pub(crate) fn unsubscribe(&mut self, role: PlayerRole) -> usize {
        let slot = self.slot_mut(role);
        let mut removed = 0;
        for id in slot.subscriptions.drain(..) {
            if slot.adapter.remove_event_listener(id) {
                removed += 1;
            }
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn subscription_count(&self, role: PlayerRole) -> usize {
        self.slot(role).subscriptions.len()
    }

    /// Issue `deinitialize` to a player that was initialized or is still
    /// initializing. Returns false if there was nothing to release.
    pub(crate) fn begin_deinitialize(
        &mut self,
        role: PlayerRole,
        generation: Generation,
        inbox: &Sender<Input>,
    ) -> bool {
        let slot = self.slot_mut(role);
        match slot.phase {
            LifecyclePhase::Initializing | LifecyclePhase::Ready => {}
            LifecyclePhase::Uninitialized | LifecyclePhase::Deinitializing => return false,
        }

        info!(role = %slot.role, %generation, "Deinitializing player");
        slot.phase = LifecyclePhase::Deinitializing;
        let done = lifecycle_completion(role, generation, LifecycleOp::Deinitialize, inbox);
        slot.adapter.deinitialize(done);
        true
    }

    /// Record that a player has been released.
    pub(crate) fn mark_released(&mut self, role: PlayerRole) {
        self.slot_mut(role).phase = LifecyclePhase::Uninitialized;
    }
}

fn lifecycle_completion(
    role: PlayerRole,
    generation: Generation,
    op: LifecycleOp,
    inbox: &Sender<Input>,
) -> Completion {
    let tx = inbox.clone();
    Completion::new(move |result| {
        if tx
            .send(Input::Lifecycle {
                role,
                generation,
                op,
                result,
            })
            .is_err()
        {
            debug!(%role, ?op, "Inbox closed before completion arrived");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_ipc::ContentDescriptor;
    use splice_player::sim::{LifecycleMode, SimPlayerHandle, SimulatedPlayer};

    fn slots() -> (PlayerSlots, SimPlayerHandle, SimPlayerHandle) {
        let main = SimulatedPlayer::new("main");
        let ad = SimulatedPlayer::new("ad");
        let (main_handle, ad_handle) = (main.handle(), ad.handle());
        (
            PlayerSlots::new(Box::new(main), Box::new(ad)),
            main_handle,
            ad_handle,
        )
    }

    #[test]
    fn test_initialize_posts_completion() {
        let (mut players, main, _) = slots();
        let (tx, rx) = crossbeam_channel::unbounded();
        let generation = Generation::default().next();

        assert!(players.begin_initialize(PlayerRole::Main, generation, &tx));
        assert!(!players.begin_initialize(PlayerRole::Main, generation, &tx));
        assert_eq!(players.phase(PlayerRole::Main), LifecyclePhase::Initializing);
        assert!(main.is_initialized());

        match rx.try_recv().unwrap() {
            Input::Lifecycle {
                role,
                generation: tagged,
                op,
                result,
            } => {
                assert_eq!(role, PlayerRole::Main);
                assert_eq!(tagged, generation);
                assert_eq!(op, LifecycleOp::Initialize);
                assert!(result.is_ok());
            }
            other => panic!("unexpected input: {other:?}"),
        }

        assert!(players.ready(PlayerRole::Main).is_none());
        assert!(players.mark_ready(PlayerRole::Main));
        assert!(players.ready(PlayerRole::Main).is_some());
    }

    #[test]
    fn test_with_ready_skips_unready_player() {
        let (mut players, _, ad) = slots();
        assert!(players.with_ready(PlayerRole::Ad, |p| p.play()).is_none());
        assert!(ad.calls().is_empty());
    }

    #[test]
    fn test_subscribe_replaces_and_unsubscribe_clears() {
        let (mut players, main, _) = slots();
        let (tx, rx) = crossbeam_channel::unbounded();
        let generation = Generation::default().next();
        let kinds = [PlayerEventKind::Paused, PlayerEventKind::Ended];

        players.subscribe(PlayerRole::Main, &kinds, generation, &tx);
        players.subscribe(PlayerRole::Main, &kinds, generation, &tx);
        assert_eq!(players.subscription_count(PlayerRole::Main), 2);
        assert_eq!(main.listener_count(), 2);

        players.begin_initialize(PlayerRole::Main, generation, &tx);
        let _ = rx.try_recv();
        main.set_duration(Some(1.0));
        players.mark_ready(PlayerRole::Main);
        let content = ContentDescriptor::new("https://example.com/main.mpd");
        players
            .with_ready(PlayerRole::Main, |p| p.set_source(&content).and_then(|_| p.play()))
            .unwrap()
            .unwrap();
        main.advance(2.0);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Input::Player {
                role: PlayerRole::Main,
                event: PlayerEventKind::Paused,
                ..
            }
        ));

        assert_eq!(players.unsubscribe(PlayerRole::Main), 2);
        assert_eq!(main.listener_count(), 0);
        assert_eq!(players.subscription_count(PlayerRole::Main), 0);
    }

    #[test]
    fn test_deinitialize_pending_initialize() {
        let (mut players, main, _) = slots();
        main.set_lifecycle_mode(LifecycleMode::Manual);
        let (tx, rx) = crossbeam_channel::unbounded();
        let first = Generation::default().next();

        assert!(!players.begin_deinitialize(PlayerRole::Main, first, &tx));
        players.begin_initialize(PlayerRole::Main, first, &tx);
        assert!(rx.try_recv().is_err());

        let second = first.next();
        assert!(players.begin_deinitialize(PlayerRole::Main, second, &tx));
        assert!(!players.begin_deinitialize(PlayerRole::Main, second, &tx));

        // The pending initialize is cancelled under the old generation.
        match rx.try_recv().unwrap() {
            Input::Lifecycle {
                generation, op, result, ..
            } => {
                assert_eq!(generation, first);
                assert_eq!(op, LifecycleOp::Initialize);
                assert!(result.is_err());
            }
            other => panic!("unexpected input: {other:?}"),
        }

        assert!(main.complete_deinitialize());
        match rx.try_recv().unwrap() {
            Input::Lifecycle { generation, op, .. } => {
                assert_eq!(generation, second);
                assert_eq!(op, LifecycleOp::Deinitialize);
            }
            other => panic!("unexpected input: {other:?}"),
        }

        players.mark_released(PlayerRole::Main);
        assert_eq!(players.phase(PlayerRole::Main), LifecyclePhase::Uninitialized);
    }
}
