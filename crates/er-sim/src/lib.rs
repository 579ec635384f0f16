//! `er-sim` — the treatment scheduler.
//!
//! # Round structure
//!
//! ```text
//! triage(oracle):
//!   ⓪ Triage   — every arrival rated once, ranked into the PrioritySelector.
//!   ⓪ Admit    — fill every doctor slot from the selector.
//!
//! advance(observer):            (one call = one round)
//!   ① Treat    — for each slot, for each occupant in admission order:
//!                  severity −1, visits +1, billing += visit_charge;
//!                  severity 0 → discharged now, record sent to observer.
//!   ② Admit    — for each slot with room, pop most urgent from selector
//!                  until the slot is full or the selector is empty.
//!   ③ Check    — selector empty and every slot empty → Finished.
//! ```
//!
//! Everything runs on the caller's thread.  Observer callbacks only ever see
//! state between phases, never mid-phase.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use er_core::ErConfig;
//! use er_sim::{NoopObserver, SimBuilder};
//! use er_triage::SeededOracle;
//!
//! let mut sim = SimBuilder::new(ErConfig::default())
//!     .intake(patients)
//!     .build()?;
//! sim.triage(&mut SeededOracle::new(42))?;
//! let rounds = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod slot;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{
    DischargeRecord, DoctorView, NoopObserver, PatientView, RoundSnapshot, SimObserver, SinkError,
    SinkResult,
};
pub use sim::{ErSim, RoundOutcome, RoundSummary, SimPhase};
pub use slot::DoctorSlot;
