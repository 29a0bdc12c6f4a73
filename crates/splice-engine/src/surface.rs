//! Exclusive ownership of the video surface.

use tracing::{debug, warn};

use splice_ipc::{PlayerRole, SurfaceHandle};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::players::PlayerSlots;

/// Tracks the cached surface and which player, if any, holds it.
///
/// A holder is always detached before another player is attached.
#[derive(Debug, Default)]
pub(crate) struct SurfaceOwnership {
    current: Option<SurfaceHandle>,
    holder: Option<PlayerRole>,
}

impl SurfaceOwnership {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current(&self) -> Option<&SurfaceHandle> {
        self.current.as_ref()
    }

    pub(crate) fn holder(&self) -> Option<PlayerRole> {
        self.holder
    }

    /// Cache a newly created surface. A different handle replaces the cached
    /// one and is detached from its holder first. Returns false for a repeat.
    pub(crate) fn on_created(&mut self, surface: SurfaceHandle, players: &mut PlayerSlots) -> bool {
        if self.current.as_ref() == Some(&surface) {
            return false;
        }

        if let Some(old) = self.current.take() {
            if let Some(holder) = self.holder.take() {
                detach(holder, &old, players);
            }
        }
        self.current = Some(surface);
        true
    }

    /// Drop the cached surface. Returns false if `surface` is not the cached one.
    pub(crate) fn on_destroyed(&mut self, surface: &SurfaceHandle, players: &mut PlayerSlots) -> bool {
        if self.current.as_ref() != Some(surface) {
            debug!(%surface, "Ignoring destroy for stale surface");
            return false;
        }

        if let Some(holder) = self.holder.take() {
            detach(holder, surface, players);
        }
        self.current = None;
        true
    }

    /// Hand the cached surface to `to`.
    pub(crate) fn assign_current(
        &mut self,
        to: PlayerRole,
        players: &mut PlayerSlots,
    ) -> OrchestratorResult<bool> {
        let surface = self.current.clone().ok_or(OrchestratorError::SurfaceUnavailable)?;
        self.assign_exclusive(&surface, to, players)
    }

    /// Hand `surface` to `to`, detaching the previous holder first.
    ///
    /// Returns `Ok(false)` if `to` already holds it. The target's readiness
    /// is checked before anything is detached.
    pub(crate) fn assign_exclusive(
        &mut self,
        surface: &SurfaceHandle,
        to: PlayerRole,
        players: &mut PlayerSlots,
    ) -> OrchestratorResult<bool> {
        if self.current.as_ref() != Some(surface) {
            return Err(OrchestratorError::SurfaceUnavailable);
        }
        if self.holder == Some(to) {
            return Ok(false);
        }
        if !players.is_ready(to) {
            return Err(OrchestratorError::PlayerNotReady(to));
        }

        let previous = self.holder.take();
        if let Some(previous) = previous {
            detach(previous, surface, players);
        }

        match players.with_ready(to, |p| p.attach_surface(surface)) {
            Some(Ok(())) => {
                self.holder = Some(to);
                Ok(true)
            }
            Some(Err(e)) => {
                if let Some(previous) = previous {
                    self.reattach(previous, surface, players);
                }
                Err(e.into())
            }
            None => Err(OrchestratorError::PlayerNotReady(to)),
        }
    }

    /// Give `surface` back to the holder it was just taken from.
    fn reattach(&mut self, role: PlayerRole, surface: &SurfaceHandle, players: &mut PlayerSlots) {
        match players.with_ready(role, |p| p.attach_surface(surface)) {
            Some(Ok(())) => {
                debug!(%role, %surface, "Surface returned to previous holder");
                self.holder = Some(role);
            }
            Some(Err(e)) => warn!(%role, error = %e, "Failed to return surface"),
            None => {}
        }
    }

    /// Forget the holder without touching the players, which have already
    /// been deinitialized. The cached surface is kept.
    pub(crate) fn release(&mut self) -> Option<PlayerRole> {
        self.holder.take()
    }
}

fn detach(holder: PlayerRole, surface: &SurfaceHandle, players: &mut PlayerSlots) {
    if let Some(Err(e)) = players.with_ready(holder, |p| p.detach_surface(surface)) {
        warn!(role = %holder, error = %e, "Failed to detach surface");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Generation;
    use splice_player::sim::{SimCall, SimPlayerHandle, SimulatedPlayer};

    fn ready_slots() -> (PlayerSlots, SimPlayerHandle, SimPlayerHandle) {
        let main = SimulatedPlayer::new("main");
        let ad = SimulatedPlayer::new("ad");
        let (main_handle, ad_handle) = (main.handle(), ad.handle());
        let mut players = PlayerSlots::new(Box::new(main), Box::new(ad));
        let (tx, _rx) = crossbeam_channel::unbounded();
        for role in PlayerRole::ALL {
            players.begin_initialize(role, Generation::default(), &tx);
            players.mark_ready(role);
        }
        (players, main_handle, ad_handle)
    }

    #[test]
    fn test_handoff_detaches_before_attach() {
        let (mut players, main, ad) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();
        let surface = SurfaceHandle::new("s1");
        surfaces.on_created(surface.clone(), &mut players);

        assert!(surfaces.assign_current(PlayerRole::Main, &mut players).unwrap());
        assert_eq!(main.attached_surface(), Some(surface.clone()));

        assert!(surfaces.assign_current(PlayerRole::Ad, &mut players).unwrap());
        assert_eq!(main.attached_surface(), None);
        assert_eq!(ad.attached_surface(), Some(surface.clone()));
        assert_eq!(surfaces.holder(), Some(PlayerRole::Ad));
        assert_eq!(main.count(&SimCall::DetachSurface(surface)), 1);
    }

    #[test]
    fn test_same_holder_is_noop() {
        let (mut players, main, _) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();
        let surface = SurfaceHandle::new("s1");
        surfaces.on_created(surface.clone(), &mut players);

        surfaces.assign_current(PlayerRole::Main, &mut players).unwrap();
        assert!(!surfaces.assign_current(PlayerRole::Main, &mut players).unwrap());
        assert_eq!(main.count(&SimCall::AttachSurface(surface)), 1);
    }

    #[test]
    fn test_stale_or_missing_surface() {
        let (mut players, _, _) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();

        assert!(matches!(
            surfaces.assign_current(PlayerRole::Main, &mut players),
            Err(OrchestratorError::SurfaceUnavailable)
        ));

        surfaces.on_created(SurfaceHandle::new("s2"), &mut players);
        assert!(matches!(
            surfaces.assign_exclusive(&SurfaceHandle::new("s1"), PlayerRole::Main, &mut players),
            Err(OrchestratorError::SurfaceUnavailable)
        ));
        assert!(!surfaces.on_destroyed(&SurfaceHandle::new("s1"), &mut players));
        assert!(surfaces.current().is_some());
    }

    #[test]
    fn test_unready_target_keeps_holder() {
        let (mut players, main, _) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();
        let surface = SurfaceHandle::new("s1");
        surfaces.on_created(surface.clone(), &mut players);
        surfaces.assign_current(PlayerRole::Main, &mut players).unwrap();

        players.mark_released(PlayerRole::Ad);
        assert!(matches!(
            surfaces.assign_current(PlayerRole::Ad, &mut players),
            Err(OrchestratorError::PlayerNotReady(PlayerRole::Ad))
        ));
        assert_eq!(surfaces.holder(), Some(PlayerRole::Main));
        assert_eq!(main.attached_surface(), Some(surface));
    }

    #[test]
    fn test_failed_attach_returns_surface_to_previous_holder() {
        let (mut players, main, ad) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();
        let surface = SurfaceHandle::new("s1");
        surfaces.on_created(surface.clone(), &mut players);
        surfaces.assign_current(PlayerRole::Main, &mut players).unwrap();

        ad.fail_next_attach("surface lost");
        assert!(matches!(
            surfaces.assign_current(PlayerRole::Ad, &mut players),
            Err(OrchestratorError::Player(_))
        ));
        assert_eq!(surfaces.holder(), Some(PlayerRole::Main));
        assert_eq!(main.attached_surface(), Some(surface.clone()));
        assert_eq!(ad.attached_surface(), None);
        assert_eq!(main.count(&SimCall::AttachSurface(surface)), 2);

        assert!(surfaces.assign_current(PlayerRole::Ad, &mut players).unwrap());
        assert_eq!(main.attached_surface(), None);
        assert_eq!(surfaces.holder(), Some(PlayerRole::Ad));
    }

    #[test]
    fn test_replacement_and_destroy_detach_holder() {
        let (mut players, main, _) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();
        surfaces.on_created(SurfaceHandle::new("s1"), &mut players);
        surfaces.assign_current(PlayerRole::Main, &mut players).unwrap();

        assert!(!surfaces.on_created(SurfaceHandle::new("s1"), &mut players));
        assert!(surfaces.on_created(SurfaceHandle::new("s2"), &mut players));
        assert_eq!(main.attached_surface(), None);
        assert_eq!(surfaces.holder(), None);

        surfaces.assign_current(PlayerRole::Main, &mut players).unwrap();
        assert!(surfaces.on_destroyed(&SurfaceHandle::new("s2"), &mut players));
        assert_eq!(main.attached_surface(), None);
        assert!(surfaces.current().is_none());
    }

    #[test]
    fn test_release_keeps_cached_surface() {
        let (mut players, _, _) = ready_slots();
        let mut surfaces = SurfaceOwnership::new();
        surfaces.on_created(SurfaceHandle::new("s1"), &mut players);
        surfaces.assign_current(PlayerRole::Main, &mut players).unwrap();

        assert_eq!(surfaces.release(), Some(PlayerRole::Main));
        assert_eq!(surfaces.holder(), None);
        assert_eq!(surfaces.current(), Some(&SurfaceHandle::new("s1")));
    }
}
