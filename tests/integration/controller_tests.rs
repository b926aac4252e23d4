//! Command handling and notification contract of `SessionController`.

use std::time::Duration;

use aircon::app::events::{AppEvent, TransitionCause};
use aircon::timers::{TimerFired, TimerKind};
use aircon::{Phase, SessionCommand, SessionConfig, SessionController};

use crate::recording_sink::RecordingSink;

fn make_controller() -> (SessionController, RecordingSink) {
    let config = SessionConfig {
        requested_duration_minutes: 5,
        request_ack_delay_ms: 2_000,
        tick_interval_ms: 1_000,
        ..Default::default()
    };
    let ctl = SessionController::new(config).expect("valid config");
    (ctl, RecordingSink::new())
}

/// Drive a fresh controller into `phase`.
fn controller_in(phase: Phase) -> (SessionController, RecordingSink) {
    let (mut ctl, mut sink) = make_controller();
    match phase {
        Phase::Idle => {}
        Phase::Requesting => ctl.start(&mut sink),
        Phase::Active => {
            ctl.start(&mut sink);
            ctl.advance(Duration::from_secs(2), &mut sink);
        }
    }
    assert_eq!(ctl.phase(), phase);
    sink.clear();
    (ctl, sink)
}

// ── Illegal commands are no-ops ───────────────────────────────

#[test]
fn start_outside_idle_is_ignored() {
    for phase in [Phase::Requesting, Phase::Active] {
        let (mut ctl, mut sink) = controller_in(phase);
        let before = ctl.snapshot();
        let generation = ctl.timers().armed_generation(TimerKind::RequestAck);

        ctl.start(&mut sink);

        assert_eq!(ctl.snapshot(), before, "start changed state in {phase}");
        assert_eq!(ctl.timers().armed_generation(TimerKind::RequestAck), generation);
        assert!(sink.events.is_empty());
    }
}

#[test]
fn double_start_acknowledges_once() {
    let (mut ctl, mut sink) = make_controller();
    ctl.start(&mut sink);
    ctl.start(&mut sink);
    ctl.advance(Duration::from_millis(1_999), &mut sink);
    ctl.start(&mut sink);
    // Ack at 2 s, ticks at 3, 4, 5 and 6 s.
    ctl.advance(Duration::from_millis(4_001), &mut sink);

    assert_eq!(ctl.phase(), Phase::Active);
    assert_eq!(ctl.remaining_minutes(), 1);
    let acks = sink
        .transitions()
        .into_iter()
        .filter(|t| *t == (Phase::Requesting, Phase::Active, TransitionCause::Acknowledged))
        .count();
    assert_eq!(acks, 1);
    assert_eq!(sink.countdown(), vec![4, 3, 2, 1]);
}

#[test]
fn stop_when_idle_emits_nothing() {
    let (mut ctl, mut sink) = controller_in(Phase::Idle);
    ctl.stop(&mut sink);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.transition_count(), 0);
    assert!(sink.events.is_empty());
}

// ── Teardown ──────────────────────────────────────────────────

#[test]
fn teardown_from_every_phase_disarms_all_timers() {
    for phase in [Phase::Idle, Phase::Requesting, Phase::Active] {
        let (mut ctl, mut sink) = controller_in(phase);
        ctl.teardown(&mut sink);

        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.timers().armed_count(), 0);
        assert_eq!(ctl.pending_fires(), 0);
        assert_eq!(ctl.remaining_minutes(), 5);

        let expected = if phase == Phase::Idle {
            vec![]
        } else {
            vec![(phase, Phase::Idle, TransitionCause::Teardown)]
        };
        assert_eq!(sink.transitions(), expected);
    }
}

#[test]
fn teardown_is_idempotent() {
    let (mut ctl, mut sink) = controller_in(Phase::Active);
    ctl.teardown(&mut sink);
    sink.clear();
    ctl.teardown(&mut sink);
    ctl.teardown(&mut sink);
    assert!(sink.events.is_empty());
    assert_eq!(ctl.timers().armed_count(), 0);
}

#[test]
fn teardown_discards_queued_fires() {
    let (mut ctl, mut sink) = controller_in(Phase::Active);
    assert_eq!(ctl.poll_timers(Duration::from_secs(2)), 2);
    assert_eq!(ctl.pending_fires(), 2);

    ctl.teardown(&mut sink);
    assert_eq!(ctl.pending_fires(), 0);
    assert_eq!(ctl.remaining_minutes(), 5);
}

#[test]
fn session_can_restart_after_teardown() {
    let (mut ctl, mut sink) = controller_in(Phase::Active);
    ctl.teardown(&mut sink);
    ctl.start(&mut sink);
    assert_eq!(ctl.phase(), Phase::Requesting);
    ctl.advance(Duration::from_secs(2), &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
}

// ── Stale and foreign fires ───────────────────────────────────

#[test]
fn fires_with_unknown_generation_are_ignored() {
    for phase in [Phase::Idle, Phase::Requesting, Phase::Active] {
        let (mut ctl, mut sink) = controller_in(phase);
        let before = ctl.snapshot();
        for kind in [TimerKind::RequestAck, TimerKind::Countdown] {
            ctl.post_timer_fired(TimerFired {
                kind,
                generation: u64::MAX,
            });
        }
        assert_eq!(ctl.dispatch_pending(&mut sink), 0);
        assert_eq!(ctl.snapshot(), before);
        assert!(sink.events.is_empty());
    }
}

#[test]
fn current_countdown_fire_ticks_once() {
    let (mut ctl, mut sink) = controller_in(Phase::Active);
    let generation = ctl
        .timers()
        .armed_generation(TimerKind::Countdown)
        .expect("countdown armed");

    ctl.post_timer_fired(TimerFired {
        kind: TimerKind::Countdown,
        generation,
    });
    assert_eq!(ctl.dispatch_pending(&mut sink), 1);
    assert_eq!(ctl.remaining_minutes(), 4);
}

// ── Notifications ─────────────────────────────────────────────

#[test]
fn one_notification_per_change() {
    let (mut ctl, mut sink) = make_controller();
    ctl.start(&mut sink);
    ctl.advance(Duration::from_secs(2), &mut sink);
    ctl.advance(Duration::from_secs(2), &mut sink);
    ctl.stop(&mut sink);

    // start, ack, two ticks, stop
    assert_eq!(sink.events.len(), 5);
    assert_eq!(
        sink.transitions(),
        vec![
            (Phase::Idle, Phase::Requesting, TransitionCause::Start),
            (Phase::Requesting, Phase::Active, TransitionCause::Acknowledged),
            (Phase::Active, Phase::Idle, TransitionCause::Stopped),
        ]
    );
    assert_eq!(sink.countdown(), vec![4, 3]);
}

#[test]
fn notifications_carry_post_change_snapshot() {
    let (mut ctl, mut sink) = make_controller();
    ctl.start(&mut sink);
    ctl.advance(Duration::from_secs(2), &mut sink);

    for event in &sink.events {
        if let AppEvent::PhaseChanged { to, snapshot, .. } = event {
            assert_eq!(snapshot.phase, *to);
            assert_eq!(snapshot.countdown_running, *to == Phase::Active);
        }
    }
    assert_eq!(sink.events.last().map(AppEvent::snapshot), Some(&ctl.snapshot()));
}

#[test]
fn auto_stop_is_reported_as_expired() {
    let (mut ctl, mut sink) = make_controller();
    ctl.start(&mut sink);
    ctl.advance(Duration::from_secs(2 + 5), &mut sink);

    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(
        sink.transitions().last(),
        Some(&(Phase::Active, Phase::Idle, TransitionCause::Expired))
    );
    assert_eq!(sink.countdown(), vec![4, 3, 2, 1]);
}

// ── Command dispatch ──────────────────────────────────────────

#[test]
fn handle_command_routes_parsed_words() {
    let (mut ctl, mut sink) = make_controller();
    for word in ["start", "stop", "on", "teardown"] {
        let cmd: SessionCommand = word.parse().expect("known command");
        ctl.handle_command(cmd, &mut sink);
    }
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(
        sink.transitions(),
        vec![
            (Phase::Idle, Phase::Requesting, TransitionCause::Start),
            (Phase::Requesting, Phase::Idle, TransitionCause::Stopped),
            (Phase::Idle, Phase::Requesting, TransitionCause::Start),
            (Phase::Requesting, Phase::Idle, TransitionCause::Teardown),
        ]
    );
}
