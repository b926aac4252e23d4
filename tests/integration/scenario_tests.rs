//! End-to-end session scenarios on a simulated clock.
//!
//! Timing is scaled down: 3 s acknowledgement delay, 1 s per countdown
//! minute.

use std::time::Duration;

use aircon::app::events::{AppEvent, TransitionCause};
use aircon::timers::{TimerFired, TimerKind};
use aircon::{Phase, SessionConfig, SessionController};

use crate::recording_sink::RecordingSink;

const ACK: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_secs(1);

fn scaled_config(minutes: u32) -> SessionConfig {
    SessionConfig {
        requested_duration_minutes: minutes,
        request_ack_delay_ms: ACK.as_millis() as u64,
        tick_interval_ms: TICK.as_millis() as u64,
        ..Default::default()
    }
}

fn controller(minutes: u32) -> SessionController {
    SessionController::new(scaled_config(minutes)).expect("valid config")
}

// ── Start → acknowledge → count down ──────────────────────────

#[test]
fn start_is_acknowledged_then_counts_down() {
    let mut ctl = controller(10);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    assert_eq!(ctl.phase(), Phase::Requesting);
    assert_eq!(ctl.remaining_minutes(), 10);

    // Just short of the acknowledgement nothing happens.
    ctl.advance(ACK - Duration::from_millis(1), &mut sink);
    assert_eq!(ctl.phase(), Phase::Requesting);

    ctl.advance(Duration::from_millis(1), &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
    assert_eq!(ctl.remaining_minutes(), 10);
    assert!(ctl.snapshot().countdown_running);

    ctl.advance(TICK, &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
    assert_eq!(ctl.remaining_minutes(), 9);

    assert_eq!(
        sink.transitions(),
        vec![
            (Phase::Idle, Phase::Requesting, TransitionCause::Start),
            (Phase::Requesting, Phase::Active, TransitionCause::Acknowledged),
        ]
    );
    assert_eq!(sink.countdown(), vec![9]);
}

#[test]
fn first_tick_already_elapsed_starts_one_lower() {
    let mut ctl = SessionController::new(SessionConfig {
        first_tick_already_elapsed: true,
        ..scaled_config(10)
    })
    .expect("valid config");
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    ctl.advance(ACK, &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
    assert_eq!(ctl.remaining_minutes(), 9);

    ctl.advance(TICK, &mut sink);
    assert_eq!(ctl.remaining_minutes(), 8);
}

// ── Countdown exhaustion ──────────────────────────────────────

#[test]
fn last_minute_tick_auto_stops_and_resets() {
    let mut ctl = controller(3);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    ctl.advance(ACK, &mut sink);
    ctl.advance(TICK * 2, &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
    assert_eq!(ctl.remaining_minutes(), 1);

    sink.clear();
    ctl.advance(TICK, &mut sink);

    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.remaining_minutes(), 3);
    assert_eq!(ctl.timers().armed_count(), 0);
    assert_eq!(
        sink.transitions(),
        vec![(Phase::Active, Phase::Idle, TransitionCause::Expired)]
    );

    // Manual stop leaves the same state behind.
    let mut manual = controller(3);
    manual.start(&mut sink);
    manual.advance(ACK + TICK, &mut sink);
    manual.stop(&mut sink);
    assert_eq!(manual.snapshot(), ctl.snapshot());
}

#[test]
fn one_minute_session_ends_on_first_tick() {
    let mut ctl = controller(1);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    ctl.advance(ACK, &mut sink);
    assert_eq!(ctl.remaining_minutes(), 1);

    ctl.advance(TICK, &mut sink);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert!(sink.countdown().is_empty());
}

#[test]
fn time_after_auto_stop_changes_nothing() {
    let mut ctl = controller(2);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    ctl.advance(ACK + TICK * 2, &mut sink);
    assert_eq!(ctl.phase(), Phase::Idle);

    sink.clear();
    assert_eq!(ctl.advance(Duration::from_secs(600), &mut sink), 0);
    assert!(sink.events.is_empty());
}

// ── Cancellation ──────────────────────────────────────────────

#[test]
fn stop_while_requesting_cancels_the_request() {
    let mut ctl = controller(10);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    let generation = ctl
        .timers()
        .armed_generation(TimerKind::RequestAck)
        .expect("request timer armed");

    ctl.stop(&mut sink);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.timers().armed_count(), 0);

    // Letting the first request's deadline pass does nothing.
    sink.clear();
    ctl.advance(ACK * 2, &mut sink);
    assert_eq!(ctl.phase(), Phase::Idle);

    // Neither does force-firing the old request timer.
    assert!(ctl.post_timer_fired(TimerFired {
        kind: TimerKind::RequestAck,
        generation,
    }));
    assert_eq!(ctl.dispatch_pending(&mut sink), 0);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert!(sink.events.is_empty());
}

#[test]
fn teardown_while_active_ignores_late_countdown_fire() {
    let mut ctl = controller(10);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    ctl.advance(ACK + TICK, &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
    let generation = ctl
        .timers()
        .armed_generation(TimerKind::Countdown)
        .expect("countdown armed");

    ctl.teardown(&mut sink);
    assert_eq!(ctl.timers().armed_count(), 0);
    let after_teardown = ctl.snapshot();

    sink.clear();
    ctl.post_timer_fired(TimerFired {
        kind: TimerKind::Countdown,
        generation,
    });
    assert_eq!(ctl.dispatch_pending(&mut sink), 0);
    assert_eq!(ctl.snapshot(), after_teardown);
    assert!(sink.events.is_empty());
}

#[test]
fn stop_between_fire_and_dispatch_drops_the_fire() {
    let mut ctl = controller(10);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    ctl.advance(ACK, &mut sink);

    // The tick is due and queued, but the user stops first.
    assert_eq!(ctl.poll_timers(TICK), 1);
    ctl.stop(&mut sink);
    sink.clear();

    assert_eq!(ctl.dispatch_pending(&mut sink), 0);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.remaining_minutes(), 10);
    assert!(sink.events.is_empty());
}

#[test]
fn restart_after_stop_uses_fresh_timers() {
    let mut ctl = controller(10);
    let mut sink = RecordingSink::new();

    ctl.start(&mut sink);
    let first = ctl.timers().armed_generation(TimerKind::RequestAck);
    ctl.stop(&mut sink);
    ctl.start(&mut sink);
    let second = ctl.timers().armed_generation(TimerKind::RequestAck);
    assert_ne!(first, second);

    // Only the second request's full delay activates the session.
    ctl.advance(ACK, &mut sink);
    assert_eq!(ctl.phase(), Phase::Active);
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::PhaseChanged {
            to: Phase::Active,
            ..
        })
    ));
}
