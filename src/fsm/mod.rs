//! Function-pointer state machine for the security mode.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  StateTable                                            │
//! │  ┌────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ Mode   │ on_enter  │ on_exit  │ on_update         │ │
//! │  ├────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Normal │ fn(ctx)   │ —        │ fn(ctx)->Option<> │ │
//! │  │ Away   │ fn(ctx)   │ —        │ fn(ctx)->Option<> │ │
//! │  │ Alarm  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │ │
//! │  └────────┴───────────┴──────────┴───────────────────┘ │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The current mode lives in `ControllerContext.state.mode`, so the
//! engine itself only owns the table and tick bookkeeping.  Each tick
//! it calls `on_update` for the current mode; `Some(next)` runs
//! `on_exit`, stores the new mode, then runs `on_enter`.  The smoke
//! override is not a row here: the arbiter skips [`Fsm::tick`] entirely
//! while it is active.

pub mod context;
pub mod states;

use context::ControllerContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Security mode.  Must stay in sync with [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Mode {
    Normal = 0,
    Away = 1,
    Alarm = 2,
}

impl Mode {
    /// Total number of modes; sizes the table array.
    pub const COUNT: usize = 3;

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Away => "Away",
            Self::Alarm => "Alarm",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// `on_enter` / `on_exit` action, run once per transition.
pub type StateActionFn = fn(&mut ControllerContext);

/// Per-tick handler.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut ControllerContext) -> Option<Mode>;

/// One row of the table.
pub struct StateDescriptor {
    pub mode: Mode,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Indexed by `Mode as usize`.
    table: [StateDescriptor; Mode::COUNT],
}

impl Fsm {
    pub fn new(table: [StateDescriptor; Mode::COUNT]) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.mode as usize == i),
            "state table out of order"
        );
        Self { table }
    }

    /// Run `on_enter` for the context's starting mode.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ControllerContext) {
        let mode = ctx.state.mode;
        info!("FSM starting in mode: {}", mode.name());
        if let Some(enter) = self.row(mode).on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick: run the current mode's handler and apply any
    /// transition it requests.
    pub fn tick(&mut self, ctx: &mut ControllerContext) {
        let next = (self.row(ctx.state.mode).on_update)(ctx);

        if let Some(next) = next {
            self.transition(next, ctx);
        }
    }

    /// Jump directly to `next`, running exit/enter actions.  No-op if
    /// already there.
    pub fn force_transition(&mut self, next: Mode, ctx: &mut ControllerContext) {
        if next != ctx.state.mode {
            self.transition(next, ctx);
        }
    }

    fn row(&self, mode: Mode) -> &StateDescriptor {
        &self.table[mode as usize]
    }

    fn transition(&mut self, next: Mode, ctx: &mut ControllerContext) {
        let prev = ctx.state.mode;
        info!("FSM transition: {} -> {}", prev.name(), next.name());

        if let Some(exit) = self.row(prev).on_exit {
            exit(ctx);
        }

        ctx.state.mode = next;

        if let Some(enter) = self.row(next).on_enter {
            enter(ctx);
        }
    }
}
