//! Core of the beneficiary self-service portal.
//!
//! A beneficiary looks themselves up by national ID, reviews their profile
//! and aid packages, edits contact details behind a 6-digit PIN, or registers
//! through a four-step wizard when no record exists.
//!
//! - [`session`]: the search/profile/registration state machine
//! - [`profile`]: tabs, package partition and the edit sub-states
//! - [`wizard`]: the registration wizard and its step validation
//! - [`config`]: TOML configuration and wiring of the real backend
//!
//! The portal talks to the outside world only through the traits in
//! `relief-store` and `relief-crypto`; see `relief-nullables` for the
//! in-memory implementations used by the tests.

pub mod badge;
mod bounded;
pub mod config;
pub mod error;
pub mod notice;
pub mod profile;
pub mod session;
pub mod wizard;

pub use badge::{Badge, Badged, Tone};
pub use config::{ConfigError, PortalConfig, SessionSettings};
pub use error::PortalError;
pub use notice::Notice;
pub use profile::{EditBuffer, EditState, PinEntry, PinNotice, ProfileView, Tab};
pub use session::{PortalSession, SaveOutcome, SearchOutcome, Stage};
pub use wizard::{BackOutcome, RegistrationDraft, RegistrationWizard, WizardStep};
