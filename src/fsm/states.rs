//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers: no closures, no
//! dynamic dispatch.
//!
//! ```text
//!  IDLE ──[start]──▶ REQUESTING ──[request acked]──▶ ACTIVE ──┐
//!    ▲                    │                            │      │ [tick, remaining > 1]
//!    │                  [stop]                         │◀─────┘
//!    ├────────────────────┘                            │
//!    └──────────────[stop | tick, remaining <= 1]──────┘
//! ```
//!
//! Entering Idle always resets the countdown to the requested duration
//! and disarms both timers, so manual stop and auto-stop leave the same
//! state behind.

use super::context::{SessionContext, TimerCommand};
use super::{Handled, Phase, PhaseDescriptor, SessionEvent};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the phase table.  Called once per controller.
pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        // Index 0: Idle
        PhaseDescriptor {
            id: Phase::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_event: idle_event,
        },
        // Index 1: Requesting
        PhaseDescriptor {
            id: Phase::Requesting,
            name: "Requesting",
            on_enter: Some(requesting_enter),
            on_exit: Some(requesting_exit),
            on_event: requesting_event,
        },
        // Index 2: Active
        PhaseDescriptor {
            id: Phase::Active,
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: Some(active_exit),
            on_event: active_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SessionContext) {
    ctx.remaining_minutes = ctx.requested_minutes();
    ctx.timers.request = TimerCommand::Disarm;
    ctx.timers.countdown = TimerCommand::Disarm;
    info!("IDLE: appliance off, {} min ready", ctx.remaining_minutes);
}

fn idle_event(_ctx: &mut SessionContext, event: SessionEvent) -> Handled {
    match event {
        SessionEvent::Start => Handled::Goto(Phase::Requesting),
        other => {
            debug!("IDLE: ignoring {:?}", other);
            Handled::Ignored
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  REQUESTING: start command sent, waiting for the device to acknowledge
// ═══════════════════════════════════════════════════════════════════════════

fn requesting_enter(ctx: &mut SessionContext) {
    let delay = ctx.config.request_ack_delay();
    ctx.timers.request = TimerCommand::Arm(delay);
    info!("REQUESTING: start sent, ack expected in {}ms", delay.as_millis());
}

fn requesting_exit(ctx: &mut SessionContext) {
    ctx.timers.request = TimerCommand::Disarm;
}

fn requesting_event(_ctx: &mut SessionContext, event: SessionEvent) -> Handled {
    match event {
        SessionEvent::RequestAcked => Handled::Goto(Phase::Active),
        SessionEvent::Stop => {
            info!("REQUESTING: cancelled before acknowledgement");
            Handled::Goto(Phase::Idle)
        }
        other => {
            debug!("REQUESTING: ignoring {:?}", other);
            Handled::Ignored
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE: appliance running, countdown in progress
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut SessionContext) {
    ctx.remaining_minutes = ctx.config.initial_remaining_minutes();
    ctx.timers.countdown = TimerCommand::Arm(ctx.config.tick_interval());
    info!(
        "ACTIVE: running, {} of {} min remaining",
        ctx.remaining_minutes,
        ctx.requested_minutes()
    );
}

fn active_exit(ctx: &mut SessionContext) {
    ctx.timers.countdown = TimerCommand::Disarm;
}

fn active_event(ctx: &mut SessionContext, event: SessionEvent) -> Handled {
    match event {
        SessionEvent::Tick => {
            if ctx.remaining_minutes <= 1 {
                ctx.remaining_minutes = 0;
                info!("ACTIVE: countdown exhausted, auto-stop");
                return Handled::Goto(Phase::Idle);
            }
            ctx.remaining_minutes -= 1;
            debug!("ACTIVE: {} min remaining", ctx.remaining_minutes);
            Handled::Updated
        }
        SessionEvent::Stop => {
            info!(
                "ACTIVE: stopped by user with {} min remaining",
                ctx.remaining_minutes
            );
            Handled::Goto(Phase::Idle)
        }
        other => {
            debug!("ACTIVE: ignoring {:?}", other);
            Handled::Ignored
        }
    }
}
