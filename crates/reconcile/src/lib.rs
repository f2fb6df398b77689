//! Barcode-driven inventory reconciliation.
//!
//! Given a scanned barcode, the [`ReconciliationEngine`] decides whether the item
//! already exists in the vendor's inventory, and the [`ReconcileSession`] walks
//! the vendor through either adjusting the existing record's quantity or creating
//! a new record:
//!
//! ```text
//! Idle ─start─▶ Scanning ─scan─▶ Resolved ─┬─ Found ───▶ EditingExisting ─┐
//!                                          │        └──▶ CreatingNew ─────┤
//!                                          ├─ NotFound ─▶ CreatingNew ────┤
//!                                          └─ LookupError ─▶ Idle         │
//!   ▲                                                                      │
//!   └──────────────────────────── save / cancel ──────────────────────────┘
//! ```
//!
//! A new scan in any state resets the session and discards unsaved work.

pub mod decision;
pub mod driver;
pub mod engine;
pub mod error;
pub mod form;
pub mod handle;
pub mod session;

pub use decision::ReconciliationDecision;
pub use driver::{CountIn, LookupOnly, ScanHandler, ScanReport, drive_scans, drive_scans_until};
pub use engine::ReconciliationEngine;
pub use error::{ReconcileError, ReconcileResult};
pub use form::{DraftForm, FormSession};
pub use handle::SessionHandle;
pub use session::{MAX_BLOCKED, ReconcileSession, SaveOutcome, SessionState};
