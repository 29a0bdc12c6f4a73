//! Randomized input sequences against the surface and lifecycle invariants.

mod common;

use proptest::prelude::*;

use common::{quiet_config, Harness};
use splice_ipc::{PlaybackCommand, PlaybackStatus, PlayerRole, SurfaceHandle};
use splice_player::sim::SimCall;

#[derive(Debug, Clone)]
enum Step {
    Start,
    End,
    CreateSurface(u8),
    DestroySurface(u8),
    AdvanceMain(f64),
    AdvanceAd(f64),
    PauseMain,
    PauseAd,
    Tick,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Start),
        1 => Just(Step::End),
        2 => (0u8..3).prop_map(Step::CreateSurface),
        1 => (0u8..3).prop_map(Step::DestroySurface),
        4 => (0.0f64..6.0).prop_map(Step::AdvanceMain),
        3 => (0.0f64..6.0).prop_map(Step::AdvanceAd),
        1 => Just(Step::PauseMain),
        1 => Just(Step::PauseAd),
        2 => Just(Step::Tick),
    ]
}

fn surface(index: u8) -> SurfaceHandle {
    SurfaceHandle::new(format!("surface-{index}"))
}

fn apply(h: &mut Harness, step: &Step) {
    match step {
        Step::Start => h.start(quiet_config()),
        Step::End => h.send(PlaybackCommand::End),
        Step::CreateSurface(i) => h.send(PlaybackCommand::SurfaceCreated(surface(*i))),
        Step::DestroySurface(i) => h.send(PlaybackCommand::SurfaceDestroyed(surface(*i))),
        Step::AdvanceMain(secs) => h.advance_main(*secs),
        Step::AdvanceAd(secs) => h.advance_ad(*secs),
        Step::PauseMain => {
            let _ = h.main.pause();
            h.pump();
        }
        Step::PauseAd => {
            let _ = h.ad.pause();
            h.pump();
        }
        Step::Tick => {
            h.tick();
        }
    }
}

fn check(h: &Harness) -> Result<(), TestCaseError> {
    prop_assert!(h.attached_count() <= 1, "both players hold a surface");

    match h.orchestrator.surface_holder() {
        Some(PlayerRole::Main) => {
            let attached = h.main.attached_surface();
            prop_assert_eq!(attached.as_ref(), h.orchestrator.current_surface());
        }
        Some(PlayerRole::Ad) => {
            let attached = h.ad.attached_surface();
            prop_assert_eq!(attached.as_ref(), h.orchestrator.current_surface());
        }
        None => {}
    }

    if let Some(status) = h.orchestrator.status() {
        if status == PlaybackStatus::AdPlaying {
            prop_assert!(h.ad.is_initialized());
        }
        if let (Some(owner), Some(holder)) = (status.surface_owner(), h.orchestrator.surface_holder()) {
            prop_assert_eq!(owner, holder);
        }
    }

    prop_assert!(h.ad.count(&SimCall::Initialize) <= h.main.count(&SimCall::Initialize));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_at_most_one_player_holds_surface(steps in prop::collection::vec(step(), 1..60)) {
        let mut h = Harness::new();
        h.main.set_duration(Some(40.0));
        h.ad.set_duration(Some(20.0));

        for step in &steps {
            apply(&mut h, step);
            check(&h)?;
        }
    }

    #[test]
    fn test_ad_initialized_at_most_once_per_session(advances in prop::collection::vec(0.0f64..4.0, 1..40)) {
        let mut h = Harness::new();
        h.start(quiet_config());
        h.surface("s1");

        for secs in &advances {
            h.advance_main(*secs);
            h.tick();
            h.advance_ad(*secs);
        }
        prop_assert!(h.ad.count(&SimCall::Initialize) <= 1);
    }

    #[test]
    fn test_end_releases_everything(steps in prop::collection::vec(step(), 0..40)) {
        let mut h = Harness::new();
        for step in &steps {
            apply(&mut h, step);
        }
        h.send(PlaybackCommand::End);

        prop_assert_eq!(h.orchestrator.status(), None);
        prop_assert_eq!(h.orchestrator.surface_holder(), None);
        prop_assert!(h.orchestrator.active_timer().is_none());
        prop_assert_eq!(h.main.listener_count(), 0);
        prop_assert_eq!(h.ad.listener_count(), 0);
        prop_assert_eq!(h.attached_count(), 0);
    }
}
