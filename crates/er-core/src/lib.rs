//! `er-core` — foundational types for the `er_sim` emergency-room simulator.
//!
//! This crate is a dependency of every other `er-*` crate.  It has no `er-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PatientId`, `BillingKey`                             |
//! | [`round`]       | `Round` counter                                       |
//! | [`severity`]    | `Severity`, `TriageRating`                            |
//! | [`patient`]     | `Patient`, `TriageState`                              |
//! | [`registry`]    | `PatientRegistry` identity table                      |
//! | [`billing`]     | `BillingLedger`                                       |
//! | [`context`]     | `ErContext` (arrivals + registry + ledger)            |
//! | [`config`]      | `ErConfig`                                            |
//! | [`error`]       | `ErError`, `ErResult`                                 |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | Adds `Serialize`/`Deserialize` to public data types.     |
//! | `fx-hash` | Uses FxHash for the identity and billing tables.         |

pub mod billing;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod patient;
pub mod registry;
pub mod round;
pub mod severity;

#[cfg(test)]
mod tests;

// ── Hash map selection ────────────────────────────────────────────────────────

#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use billing::BillingLedger;
pub use config::ErConfig;
pub use context::ErContext;
pub use error::{ErError, ErResult};
pub use ids::{BillingKey, PatientId};
pub use patient::{Patient, TriageState};
pub use registry::PatientRegistry;
pub use round::Round;
pub use severity::{Severity, TriageRating};
