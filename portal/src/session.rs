//! The portal session: search, profile and registration as one state machine.
//!
//! A [`PortalSession`] owns its backend, hasher and clock plus every piece of
//! UI state. Each user action is a method; async actions take `&mut self`, so
//! at most one backend operation is in flight per session.
//!
//! ```text
//!   search ──found──► found (viewing ⇄ editing → pin setup)
//!     │  ▲
//!     │  └──────── register (success or cancel)
//!     ▼                 ▲
//!   not_found ──────────┘
//! ```
//!
//! On any backend failure the session stays in its last stable state and the
//! error is surfaced as a dismissible banner.

use crate::bounded::{bounded, record_audit};
use crate::config::{PortalConfig, SessionSettings};
use crate::error::PortalError;
use crate::notice::Notice;
use crate::profile::{EditState, PinEntry, PinNotice, ProfileView, Tab};
use crate::wizard::{BackOutcome, RegistrationWizard};
use relief_crypto::{Argon2PinHasher, PinHasher};
use relief_rest::RestBackend;
use relief_store::Backend;
use relief_types::validation::{
    check_national_id, check_pin_pair, check_required_with, sanitize_digits, NATIONAL_ID_LEN,
};
use relief_types::{
    AuditAction, AuditEntry, BeneficiaryId, Clock, Field, FieldErrors, NationalId, Pin,
    SystemClock, Visibility,
};

const SAVED: &str = "Changes saved";
const PIN_CREATED_AND_SAVED: &str = "PIN created and changes saved";
const REGISTERED: &str = "Registration complete. Your request is under review.";

/// Where the session currently is.
#[derive(Debug, Default)]
pub enum Stage {
    #[default]
    Search,
    Found(ProfileView),
    /// The lookup found nobody; keeps the ID exactly as entered.
    NotFound { national_id: NationalId },
    Register(RegistrationWizard),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search => "searching",
            Self::Found(_) => "viewing a profile",
            Self::NotFound { .. } => "showing no match",
            Self::Register(_) => "registering",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found,
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Changes merged into the record.
    Saved,
    /// No credential yet: the PIN prompt is now open.
    PinRequired,
}

pub struct PortalSession<B, H, C> {
    backend: B,
    hasher: H,
    clock: C,
    settings: SessionSettings,
    national_id_input: String,
    stage: Stage,
    errors: FieldErrors,
    banner: Option<String>,
    notice: Option<Notice>,
}

impl PortalSession<RestBackend, Argon2PinHasher, SystemClock> {
    /// A session wired to the configured REST backend with Argon2 hashing.
    pub fn from_config(config: &PortalConfig) -> Result<Self, PortalError> {
        let backend = config
            .rest_backend()
            .map_err(|source| PortalError::Operation {
                operation: "connect to backend",
                source,
            })?;
        Ok(Self::new(
            backend,
            config.pin_hasher(),
            SystemClock,
            config.session_settings(),
        ))
    }
}

impl<B, H, C> PortalSession<B, H, C>
where
    B: Backend,
    H: PinHasher,
    C: Clock,
{
    pub fn new(backend: B, hasher: H, clock: C, settings: SessionSettings) -> Self {
        Self {
            backend,
            hasher,
            clock,
            settings,
            national_id_input: String::new(),
            stage: Stage::Search,
            errors: FieldErrors::new(),
            banner: None,
            notice: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn national_id_input(&self) -> &str {
        &self.national_id_input
    }

    /// Field errors of the search form and the PIN prompt.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Last backend failure, until dismissed.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.banner = None;
        if let Stage::Register(wizard) = &mut self.stage {
            wizard.dismiss_operation_error();
        }
    }

    /// The success notice, while it has not expired.
    pub fn notice(&self) -> Option<&Notice> {
        let now = self.clock.now();
        self.notice.as_ref().filter(|n| n.is_active(now))
    }

    /// Drop an expired notice.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if self.notice.as_ref().is_some_and(|n| !n.is_active(now)) {
            self.notice = None;
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.notice = Some(Notice::success(
            message,
            self.clock.now(),
            self.settings.notice_duration,
        ));
    }

    // ── Search ─────────────────────────────────────────────────────────

    /// Update the ID input; non-digits are dropped and length capped at 9.
    pub fn set_national_id_input(&mut self, raw: &str) {
        self.national_id_input = sanitize_digits(raw, NATIONAL_ID_LEN);
        self.errors.remove(Field::NationalId);
    }

    /// Look up the entered national ID.
    ///
    /// A hit fetches credential and packages, opens the profile on the info
    /// tab and records a public `review` audit entry. A miss is not an error
    /// and is not audited.
    pub async fn search(&mut self) -> Result<SearchOutcome, PortalError> {
        if !matches!(self.stage, Stage::Search | Stage::NotFound { .. }) {
            return Err(PortalError::InvalidState {
                action: "search",
                state: self.stage.name(),
            });
        }

        self.banner = None;
        let mut errors = FieldErrors::new();
        errors.record(
            Field::NationalId,
            check_required_with(Field::NationalId, &self.national_id_input, check_national_id),
        );
        if let Err(errors) = errors.into_result() {
            self.errors = errors.clone();
            return Err(PortalError::Validation(errors));
        }
        let national_id = NationalId::parse(&self.national_id_input).map_err(|reason| {
            let mut errors = FieldErrors::new();
            errors.insert(Field::NationalId, reason);
            PortalError::Validation(errors)
        })?;
        self.errors = FieldErrors::new();

        let profile = match self.fetch_profile(&national_id).await {
            Ok(profile) => profile,
            Err(e) => {
                self.banner = Some(e.to_string());
                return Err(e);
            }
        };

        match profile {
            Some(profile) => {
                let beneficiary = profile.beneficiary();
                tracing::info!(
                    national_id = %national_id,
                    beneficiary = %beneficiary.id,
                    credential = profile.credential_exists(),
                    packages = profile.packages().len(),
                    "beneficiary found"
                );
                let entry = AuditEntry::new(
                    format!("profile lookup by national ID {national_id}"),
                    beneficiary.name.clone(),
                    AuditAction::Review,
                )
                .with_subject(beneficiary.id.clone())
                .with_visibility(Visibility::Public);
                record_audit(&self.backend, entry, self.settings.audit_timeout).await;
                self.stage = Stage::Found(profile);
                Ok(SearchOutcome::Found)
            }
            None => {
                tracing::info!(national_id = %national_id, "no beneficiary for national ID");
                self.stage = Stage::NotFound { national_id };
                Ok(SearchOutcome::NotFound)
            }
        }
    }

    async fn fetch_profile(
        &self,
        national_id: &NationalId,
    ) -> Result<Option<ProfileView>, PortalError> {
        let timeout = self.settings.request_timeout;
        let Some(beneficiary) = bounded(
            "look up beneficiary",
            timeout,
            self.backend.lookup_by_national_id(national_id),
        )
        .await?
        else {
            return Ok(None);
        };

        let credential = bounded(
            "check credential",
            timeout,
            self.backend.get_credential(national_id),
        )
        .await?;
        let packages = bounded(
            "list packages",
            timeout,
            self.backend.list_packages(&beneficiary.id),
        )
        .await?;

        Ok(Some(ProfileView::new(
            beneficiary,
            packages,
            credential.is_some(),
        )))
    }

    /// Back to an empty search form from anywhere.
    pub fn new_search(&mut self) {
        tracing::debug!(from = self.stage.name(), "new search");
        self.stage = Stage::Search;
        self.national_id_input.clear();
        self.errors = FieldErrors::new();
        self.banner = None;
        self.notice = None;
    }

    // ── Registration ───────────────────────────────────────────────────

    /// `not_found → register`, carrying the entered ID into the wizard.
    pub fn start_registration(&mut self) -> Result<(), PortalError> {
        let Stage::NotFound { national_id } = &self.stage else {
            return Err(PortalError::InvalidState {
                action: "start registration",
                state: self.stage.name(),
            });
        };
        tracing::info!(national_id = %national_id, "registration started");
        self.stage = Stage::Register(RegistrationWizard::new(national_id.clone()));
        Ok(())
    }

    pub fn wizard(&self) -> Option<&RegistrationWizard> {
        match &self.stage {
            Stage::Register(wizard) => Some(wizard),
            _ => None,
        }
    }

    pub fn wizard_mut(&mut self) -> Option<&mut RegistrationWizard> {
        match &mut self.stage {
            Stage::Register(wizard) => Some(wizard),
            _ => None,
        }
    }

    /// Step the wizard back; leaving the first step returns to the search.
    pub fn wizard_back(&mut self) -> Result<BackOutcome, PortalError> {
        let state = self.stage.name();
        let Stage::Register(wizard) = &mut self.stage else {
            return Err(PortalError::InvalidState {
                action: "go back",
                state,
            });
        };
        let outcome = wizard.back();
        if outcome == BackOutcome::Cancelled {
            tracing::info!("registration cancelled");
            self.new_search();
        }
        Ok(outcome)
    }

    /// Submit the wizard. On success the session returns to an empty search
    /// with a success notice; on failure the wizard keeps all its data.
    pub async fn submit_registration(&mut self) -> Result<BeneficiaryId, PortalError> {
        let settings = self.settings;
        let state = self.stage.name();
        let Stage::Register(wizard) = &mut self.stage else {
            return Err(PortalError::InvalidState {
                action: "submit registration",
                state,
            });
        };

        let id = wizard.submit(&self.backend, &self.hasher, settings).await?;
        self.new_search();
        self.show_notice(REGISTERED);
        Ok(id)
    }

    // ── Profile ────────────────────────────────────────────────────────

    pub fn profile(&self) -> Option<&ProfileView> {
        match &self.stage {
            Stage::Found(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn profile_mut(&mut self) -> Option<&mut ProfileView> {
        match &mut self.stage {
            Stage::Found(profile) => Some(profile),
            _ => None,
        }
    }

    fn require_profile(&mut self, action: &'static str) -> Result<&mut ProfileView, PortalError> {
        let state = self.stage.name();
        match &mut self.stage {
            Stage::Found(profile) => Ok(profile),
            _ => Err(PortalError::InvalidState { action, state }),
        }
    }

    pub fn pin_notice(&self) -> Option<PinNotice> {
        self.profile().and_then(ProfileView::pin_notice)
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), PortalError> {
        self.require_profile("switch tabs")?.select_tab(tab);
        Ok(())
    }

    pub fn start_edit(&mut self) -> Result<(), PortalError> {
        self.require_profile("start editing")?.start_edit()
    }

    /// Discard the edit buffer. The displayed record is untouched.
    pub fn cancel_edit(&mut self) -> Result<(), PortalError> {
        self.require_profile("cancel editing")?.cancel_edit();
        self.errors = FieldErrors::new();
        Ok(())
    }

    /// Save the edit buffer.
    ///
    /// With a credential the contact details are written at once and a
    /// public `update` entry is audited. Without one the PIN prompt opens and
    /// nothing is written until [`Self::confirm_pin_and_save`].
    pub async fn save_edit(&mut self) -> Result<SaveOutcome, PortalError> {
        let timeout = self.settings.request_timeout;
        let state = self.stage.name();
        let Stage::Found(profile) = &mut self.stage else {
            return Err(PortalError::InvalidState {
                action: "save changes",
                state,
            });
        };
        let EditState::Editing(buffer) = &profile.edit else {
            return Err(PortalError::InvalidState {
                action: "save changes",
                state: profile.edit.name(),
            });
        };
        if let Err(errors) = buffer.validate() {
            self.errors = errors.clone();
            return Err(PortalError::Validation(errors));
        }
        let contact = buffer.contact().clone();
        self.errors = FieldErrors::new();

        if !profile.credential_exists {
            if let EditState::Editing(buffer) = std::mem::take(&mut profile.edit) {
                profile.edit = EditState::PinSetup {
                    buffer,
                    entry: PinEntry::default(),
                };
            }
            tracing::info!(beneficiary = %profile.beneficiary.id, "PIN required before saving");
            return Ok(SaveOutcome::PinRequired);
        }

        let id = profile.beneficiary.id.clone();
        if let Err(e) = bounded(
            "update contact details",
            timeout,
            self.backend.update_contact(&id, &contact),
        )
        .await
        {
            self.banner = Some(e.to_string());
            return Err(e);
        }

        let name = profile.beneficiary.name.clone();
        profile.commit(contact);
        tracing::info!(beneficiary = %id, "contact details updated");
        self.banner = None;
        self.show_notice(SAVED);

        let entry = AuditEntry::new("contact details updated", name, AuditAction::Update)
            .with_subject(id)
            .with_visibility(Visibility::Public);
        record_audit(&self.backend, entry, self.settings.audit_timeout).await;
        Ok(SaveOutcome::Saved)
    }

    /// Type into the PIN prompt. Inputs are masked to six digits.
    pub fn set_pin_entry(&mut self, pin: &str, confirm: &str) -> Result<(), PortalError> {
        let profile = self.require_profile("enter a PIN")?;
        let state = profile.edit.name();
        let entry = profile.pin_entry_mut().ok_or(PortalError::InvalidState {
            action: "enter a PIN",
            state,
        })?;
        entry.set_pin(pin);
        entry.set_confirm(confirm);
        self.errors.remove(Field::Pin);
        self.errors.remove(Field::ConfirmPin);
        Ok(())
    }

    /// Create the credential and save the buffered edits as one unit.
    ///
    /// The credential is written first. If the contact update then fails the
    /// credential is revoked again; if the revoke fails too, the profile
    /// remembers that the credential exists so a retry only repeats the
    /// update. Until everything succeeds the prompt stays open and the
    /// displayed record is unchanged.
    pub async fn confirm_pin_and_save(&mut self) -> Result<(), PortalError> {
        let timeout = self.settings.request_timeout;
        let state = self.stage.name();
        let Stage::Found(profile) = &mut self.stage else {
            return Err(PortalError::InvalidState {
                action: "confirm PIN",
                state,
            });
        };
        let EditState::PinSetup { buffer, entry } = &profile.edit else {
            return Err(PortalError::InvalidState {
                action: "confirm PIN",
                state: profile.edit.name(),
            });
        };

        let errors = check_pin_pair(entry.pin(), entry.confirm());
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(PortalError::Validation(errors));
        }
        let pin = Pin::parse(entry.pin()).map_err(|reason| {
            let mut errors = FieldErrors::new();
            errors.insert(Field::Pin, reason);
            PortalError::Validation(errors)
        })?;
        let contact = buffer.contact().clone();
        self.errors = FieldErrors::new();

        let pin_hash = match self.hasher.hash_pin(&pin) {
            Ok(hash) => hash,
            Err(e) => {
                let e = PortalError::from(e);
                self.banner = Some(e.to_string());
                return Err(e);
            }
        };
        drop(pin);

        let id = profile.beneficiary.id.clone();
        let national_id = profile.beneficiary.national_id.clone();
        let created_here = !profile.credential_exists;

        if created_here {
            if let Err(e) = bounded(
                "create credential",
                timeout,
                self.backend.create_credential(&id, &national_id, &pin_hash),
            )
            .await
            {
                self.banner = Some(e.to_string());
                return Err(e);
            }
            tracing::info!(beneficiary = %id, "credential created");
        }

        if let Err(e) = bounded(
            "update contact details",
            timeout,
            self.backend.update_contact(&id, &contact),
        )
        .await
        {
            if created_here {
                match bounded(
                    "revoke credential",
                    timeout,
                    self.backend.revoke_credential(&id),
                )
                .await
                {
                    Ok(()) => {
                        tracing::info!(beneficiary = %id, "credential revoked after failed update")
                    }
                    Err(revoke) => {
                        tracing::warn!(
                            beneficiary = %id,
                            error = %revoke,
                            "credential kept after failed update; retry will only update"
                        );
                        profile.credential_exists = true;
                    }
                }
            }
            self.banner = Some(e.to_string());
            return Err(e);
        }

        let name = profile.beneficiary.name.clone();
        profile.credential_exists = true;
        profile.commit(contact);
        tracing::info!(beneficiary = %id, "PIN created and contact details updated");
        self.banner = None;
        self.show_notice(PIN_CREATED_AND_SAVED);

        let entry = AuditEntry::new(
            "credential created and profile updated",
            name,
            AuditAction::Create,
        )
        .with_subject(id);
        record_audit(&self.backend, entry, self.settings.audit_timeout).await;
        Ok(())
    }

    /// Close the PIN prompt, keeping the edits.
    pub fn dismiss_pin_prompt(&mut self) -> Result<(), PortalError> {
        self.require_profile("dismiss the PIN prompt")?
            .dismiss_pin_prompt();
        self.errors.remove(Field::Pin);
        self.errors.remove(Field::ConfirmPin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_nullables::{NullBackend, NullClock, NullPinHasher, Operation};
    use relief_types::{
        AccountStatus, Beneficiary, Gender, Rejection, VerificationStatus,
    };

    type TestSession = PortalSession<NullBackend, NullPinHasher, NullClock>;

    fn session() -> TestSession {
        PortalSession::new(
            NullBackend::new(),
            NullPinHasher::new(),
            NullClock::new(10_000),
            SessionSettings::default(),
        )
    }

    fn seed(backend: &NullBackend) {
        backend.insert_beneficiary(Beneficiary {
            id: BeneficiaryId::new("b-1"),
            national_id: NationalId::parse("123456789").unwrap(),
            name: "Amal".to_string(),
            full_name: "Amal Saleh".to_string(),
            phone: "0591111111".to_string(),
            address: "Gaza".to_string(),
            detailed_address: None,
            gender: Gender::Female,
            identity_status: VerificationStatus::Verified,
            eligibility_status: VerificationStatus::Pending,
            account_status: AccountStatus::Active,
            organization_id: None,
        });
    }

    #[test]
    fn from_config_wires_real_backend() {
        let session = PortalSession::from_config(&PortalConfig::default()).unwrap();
        assert!(matches!(session.stage(), Stage::Search));
        assert_eq!(session.settings(), SessionSettings::default());
    }

    #[test]
    fn id_input_is_masked() {
        let mut s = session();
        s.set_national_id_input("12-34 56789012");
        assert_eq!(s.national_id_input(), "123456789");
    }

    #[tokio::test]
    async fn short_id_never_reaches_backend() {
        let mut s = session();
        s.set_national_id_input("12345");
        let err = s.search().await.unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get(Field::NationalId),
            Some(Rejection::NationalIdFormat)
        );
        assert!(s.backend().calls().is_empty());
        assert!(matches!(s.stage(), Stage::Search));
    }

    #[tokio::test]
    async fn empty_id_is_required() {
        let mut s = session();
        let err = s.search().await.unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get(Field::NationalId),
            Some(Rejection::Required(Field::NationalId))
        );
    }

    #[tokio::test]
    async fn lookup_failure_keeps_search_stage() {
        let mut s = session();
        seed(s.backend());
        s.backend().fail(Operation::Lookup);
        s.set_national_id_input("123456789");
        let err = s.search().await.unwrap_err();
        assert!(err.is_operation_error());
        assert!(matches!(s.stage(), Stage::Search));
        assert!(s.banner().is_some());
        s.dismiss_error();
        assert!(s.banner().is_none());
    }

    #[tokio::test]
    async fn invalid_id_clears_stale_banner() {
        let mut s = session();
        seed(s.backend());
        s.backend().fail(Operation::Lookup);
        s.set_national_id_input("123456789");
        s.search().await.unwrap_err();
        assert!(s.banner().is_some());

        s.set_national_id_input("123");
        let err = s.search().await.unwrap_err();
        assert!(err.field_errors().is_some());
        assert!(s.banner().is_none());
    }

    #[tokio::test]
    async fn profile_actions_need_a_profile() {
        let mut s = session();
        assert!(matches!(
            s.start_edit(),
            Err(PortalError::InvalidState { .. })
        ));
        assert!(matches!(
            s.save_edit().await,
            Err(PortalError::InvalidState { .. })
        ));
        assert!(matches!(
            s.confirm_pin_and_save().await,
            Err(PortalError::InvalidState { .. })
        ));
        assert!(matches!(
            s.start_registration(),
            Err(PortalError::InvalidState { .. })
        ));
        assert!(matches!(
            s.submit_registration().await,
            Err(PortalError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn save_while_viewing_is_rejected() {
        let mut s = session();
        seed(s.backend());
        s.set_national_id_input("123456789");
        s.search().await.unwrap();
        let err = s.save_edit().await.unwrap_err();
        assert_eq!(err.to_string(), "cannot save changes while viewing");
    }

    #[tokio::test]
    async fn search_again_from_not_found() {
        let mut s = session();
        seed(s.backend());
        s.set_national_id_input("000000000");
        assert_eq!(s.search().await.unwrap(), SearchOutcome::NotFound);
        s.set_national_id_input("123456789");
        assert_eq!(s.search().await.unwrap(), SearchOutcome::Found);
    }

    #[tokio::test]
    async fn tab_resets_on_new_search() {
        let mut s = session();
        seed(s.backend());
        s.set_national_id_input("123456789");
        s.search().await.unwrap();
        s.select_tab(Tab::Organization).unwrap();
        s.new_search();
        assert!(s.national_id_input().is_empty());
        s.set_national_id_input("123456789");
        s.search().await.unwrap();
        assert_eq!(s.profile().unwrap().tab(), Tab::Info);
    }
}
