//! Four-step self-registration wizard: personal → address → social → password.
//!
//! `next` only advances when the current step validates. `back` never
//! validates and never clears data; from the first step it cancels the
//! wizard. Submission hashes the PIN and creates the beneficiary together
//! with its credential in a single backend call.

use crate::bounded::{bounded, record_audit};
use crate::config::SessionSettings;
use crate::error::PortalError;
use relief_crypto::PinHasher;
use relief_store::Backend;
use relief_types::validation::{
    check_national_id, check_phone, check_pin_pair, check_required, check_required_with,
    PIN_LEN,
};
use relief_types::{
    AuditAction, AuditEntry, BeneficiaryId, DetailedAddress, EconomicLevel, Field, FieldErrors,
    Gender, MaritalStatus, NationalId, NewBeneficiary, Pin, Rejection, Visibility,
};
use zeroize::Zeroize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Personal,
    Address,
    Social,
    Password,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Personal,
        WizardStep::Address,
        WizardStep::Social,
        WizardStep::Password,
    ];

    /// Zero-based position, for step indicators.
    pub fn index(&self) -> usize {
        match self {
            Self::Personal => 0,
            Self::Address => 1,
            Self::Social => 2,
            Self::Password => 3,
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Personal => Some(Self::Address),
            Self::Address => Some(Self::Social),
            Self::Social => Some(Self::Password),
            Self::Password => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Personal => None,
            Self::Address => Some(Self::Personal),
            Self::Social => Some(Self::Address),
            Self::Password => Some(Self::Social),
        }
    }

    /// Fields validated on this step.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Personal => &[
                Field::Name,
                Field::FullName,
                Field::NationalId,
                Field::DateOfBirth,
                Field::Phone,
            ],
            Self::Address => &[Field::Governorate, Field::City, Field::District],
            Self::Social => &[Field::Profession, Field::MembersCount],
            Self::Password => &[Field::Pin, Field::ConfirmPin],
        }
    }
}

/// Everything entered so far. Lives only as long as the wizard.
///
/// PIN inputs are zeroized on drop and are never part of the submission.
#[derive(Clone)]
pub struct RegistrationDraft {
    pub name: String,
    pub full_name: String,
    national_id: NationalId,
    pub date_of_birth: String,
    pub gender: Gender,
    pub phone: String,
    pub detailed_address: DetailedAddress,
    pub profession: String,
    pub marital_status: MaritalStatus,
    pub economic_level: EconomicLevel,
    pub members_count: u32,
    pub notes: String,
    pin: String,
    confirm_pin: String,
}

impl RegistrationDraft {
    fn new(national_id: NationalId) -> Self {
        Self {
            name: String::new(),
            full_name: String::new(),
            national_id,
            date_of_birth: String::new(),
            gender: Gender::default(),
            phone: String::new(),
            detailed_address: DetailedAddress::default(),
            profession: String::new(),
            marital_status: MaritalStatus::default(),
            economic_level: EconomicLevel::default(),
            members_count: 1,
            notes: String::new(),
            pin: String::new(),
            confirm_pin: String::new(),
        }
    }

    /// Pre-filled from the search and immutable.
    pub fn national_id(&self) -> &NationalId {
        &self.national_id
    }

    pub fn pin_len(&self) -> usize {
        self.pin.len()
    }

    pub fn confirm_pin_len(&self) -> usize {
        self.confirm_pin.len()
    }

    /// Free-text address built from the structured one.
    pub fn address(&self) -> String {
        self.detailed_address.summary()
    }

    fn to_new_beneficiary(&self, pin_hash: relief_types::PinHash) -> NewBeneficiary {
        NewBeneficiary {
            name: self.name.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            national_id: self.national_id.clone(),
            date_of_birth: self.date_of_birth.clone(),
            gender: self.gender,
            phone: self.phone.clone(),
            address: self.address(),
            detailed_address: self.detailed_address.clone(),
            profession: self.profession.trim().to_string(),
            marital_status: self.marital_status,
            economic_level: self.economic_level,
            members_count: self.members_count,
            notes: self.notes.clone(),
            pin_hash,
        }
    }
}

impl Drop for RegistrationDraft {
    fn drop(&mut self) {
        self.pin.zeroize();
        self.confirm_pin.zeroize();
    }
}

impl std::fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("name", &self.name)
            .field("national_id", &self.national_id)
            .field("phone", &self.phone)
            .field("members_count", &self.members_count)
            .finish_non_exhaustive()
    }
}

pub fn validate_personal(draft: &RegistrationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.record(Field::Name, check_required(Field::Name, &draft.name));
    errors.record(
        Field::FullName,
        check_required(Field::FullName, &draft.full_name),
    );
    errors.record(
        Field::NationalId,
        check_required_with(Field::NationalId, draft.national_id.as_str(), check_national_id),
    );
    errors.record(
        Field::DateOfBirth,
        check_required(Field::DateOfBirth, &draft.date_of_birth),
    );
    errors.record(
        Field::Phone,
        check_required_with(Field::Phone, &draft.phone, check_phone),
    );
    errors
}

pub fn validate_address(draft: &RegistrationDraft) -> FieldErrors {
    let address = &draft.detailed_address;
    let mut errors = FieldErrors::new();
    errors.record(
        Field::Governorate,
        check_required(Field::Governorate, &address.governorate),
    );
    errors.record(Field::City, check_required(Field::City, &address.city));
    errors.record(
        Field::District,
        check_required(Field::District, &address.district),
    );
    errors
}

pub fn validate_social(draft: &RegistrationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.record(
        Field::Profession,
        check_required(Field::Profession, &draft.profession),
    );
    if draft.members_count < 1 {
        errors.insert(Field::MembersCount, Rejection::MembersCount);
    }
    errors
}

pub fn validate_password(draft: &RegistrationDraft) -> FieldErrors {
    check_pin_pair(&draft.pin, &draft.confirm_pin)
}

pub fn validate_step(step: WizardStep, draft: &RegistrationDraft) -> FieldErrors {
    match step {
        WizardStep::Personal => validate_personal(draft),
        WizardStep::Address => validate_address(draft),
        WizardStep::Social => validate_social(draft),
        WizardStep::Password => validate_password(draft),
    }
}

/// Result of pressing "back".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackOutcome {
    Moved(WizardStep),
    /// Back from the first step: the caller should leave the wizard.
    Cancelled,
}

#[derive(Debug)]
pub struct RegistrationWizard {
    step: WizardStep,
    draft: RegistrationDraft,
    errors: FieldErrors,
    operation_error: Option<String>,
}

impl RegistrationWizard {
    pub fn new(national_id: NationalId) -> Self {
        Self {
            step: WizardStep::Personal,
            draft: RegistrationDraft::new(national_id),
            errors: FieldErrors::new(),
            operation_error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Errors from the most recent validation, field-scoped.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Backend error from the most recent submission attempt.
    pub fn operation_error(&self) -> Option<&str> {
        self.operation_error.as_deref()
    }

    pub fn dismiss_operation_error(&mut self) {
        self.operation_error = None;
    }

    fn touch(&mut self, field: Field) {
        self.errors.remove(field);
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.draft.name = value.into();
        self.touch(Field::Name);
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.draft.full_name = value.into();
        self.touch(Field::FullName);
    }

    /// The national ID is carried over from the search and cannot change.
    pub fn set_national_id(&mut self, _value: &str) -> Result<(), Rejection> {
        Err(Rejection::Immutable(Field::NationalId))
    }

    pub fn set_date_of_birth(&mut self, value: impl Into<String>) {
        self.draft.date_of_birth = value.into();
        self.touch(Field::DateOfBirth);
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.draft.gender = gender;
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.draft.phone = value.into();
        self.touch(Field::Phone);
    }

    pub fn set_governorate(&mut self, value: impl Into<String>) {
        self.draft.detailed_address.governorate = value.into();
        self.touch(Field::Governorate);
    }

    pub fn set_city(&mut self, value: impl Into<String>) {
        self.draft.detailed_address.city = value.into();
        self.touch(Field::City);
    }

    pub fn set_district(&mut self, value: impl Into<String>) {
        self.draft.detailed_address.district = value.into();
        self.touch(Field::District);
    }

    pub fn set_street(&mut self, value: impl Into<String>) {
        self.draft.detailed_address.street = value.into();
    }

    pub fn set_additional_info(&mut self, value: impl Into<String>) {
        self.draft.detailed_address.additional_info = value.into();
    }

    pub fn set_profession(&mut self, value: impl Into<String>) {
        self.draft.profession = value.into();
        self.touch(Field::Profession);
    }

    pub fn set_marital_status(&mut self, status: MaritalStatus) {
        self.draft.marital_status = status;
    }

    pub fn set_economic_level(&mut self, level: EconomicLevel) {
        self.draft.economic_level = level;
    }

    pub fn set_members_count(&mut self, count: u32) {
        self.draft.members_count = count;
        self.touch(Field::MembersCount);
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.draft.notes = value.into();
    }

    /// Non-digits are dropped and input is capped at six digits.
    pub fn set_pin(&mut self, raw: &str) {
        self.draft.pin.zeroize();
        self.draft.pin = relief_types::validation::sanitize_digits(raw, PIN_LEN);
        self.touch(Field::Pin);
    }

    pub fn set_confirm_pin(&mut self, raw: &str) {
        self.draft.confirm_pin.zeroize();
        self.draft.confirm_pin = relief_types::validation::sanitize_digits(raw, PIN_LEN);
        self.touch(Field::ConfirmPin);
    }

    /// Validate the current step and advance on success.
    ///
    /// On the last step there is nothing to advance to; use [`Self::submit`].
    pub fn next(&mut self) -> Result<WizardStep, PortalError> {
        let errors = validate_step(self.step, &self.draft);
        self.errors = errors.clone();
        errors.into_result().map_err(PortalError::Validation)?;

        if let Some(next) = self.step.next() {
            tracing::debug!(from = ?self.step, to = ?next, "registration step advanced");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Step back without validating. Entered data is kept.
    pub fn back(&mut self) -> BackOutcome {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                self.errors = FieldErrors::new();
                BackOutcome::Moved(previous)
            }
            None => BackOutcome::Cancelled,
        }
    }

    /// Validate the PIN pair, then create the beneficiary and its credential.
    ///
    /// On failure the wizard stays on the password step with all data kept.
    pub async fn submit<B, H>(
        &mut self,
        backend: &B,
        hasher: &H,
        settings: SessionSettings,
    ) -> Result<BeneficiaryId, PortalError>
    where
        B: Backend,
        H: PinHasher,
    {
        if self.step != WizardStep::Password {
            return Err(PortalError::InvalidState {
                action: "submit registration",
                state: "before the password step",
            });
        }

        let errors = validate_password(&self.draft);
        self.errors = errors.clone();
        errors.into_result().map_err(PortalError::Validation)?;
        self.operation_error = None;

        let result = self.create(backend, hasher, settings).await;
        if let Err(e) = &result {
            self.operation_error = Some(e.to_string());
        }
        result
    }

    async fn create<B, H>(
        &self,
        backend: &B,
        hasher: &H,
        settings: SessionSettings,
    ) -> Result<BeneficiaryId, PortalError>
    where
        B: Backend,
        H: PinHasher,
    {
        let pin = Pin::parse(&self.draft.pin).map_err(|reason| {
            let mut errors = FieldErrors::new();
            errors.insert(Field::Pin, reason);
            PortalError::Validation(errors)
        })?;
        let pin_hash = hasher.hash_pin(&pin)?;
        let new = self.draft.to_new_beneficiary(pin_hash);

        let id = bounded(
            "register beneficiary",
            settings.request_timeout,
            backend.create_beneficiary(&new),
        )
        .await?;
        tracing::info!(beneficiary = %id, national_id = %new.national_id, "beneficiary registered");

        record_audit(
            backend,
            AuditEntry::new(
                format!("new registration for national ID {}", new.national_id),
                new.name.clone(),
                AuditAction::Create,
            )
            .with_subject(id.clone())
            .with_note("self-registration from the public portal")
            .with_visibility(Visibility::Public),
            settings.audit_timeout,
        )
        .await;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> RegistrationWizard {
        RegistrationWizard::new(NationalId::parse("900123456").unwrap())
    }

    fn fill_personal(w: &mut RegistrationWizard) {
        w.set_name("Mohammed");
        w.set_full_name("Mohammed Ahmed Abdullah");
        w.set_date_of_birth("1985-04-12");
        w.set_phone("0591234567");
    }

    fn fill_address(w: &mut RegistrationWizard) {
        w.set_governorate("Gaza");
        w.set_city("Gaza");
        w.set_district("Rimal");
    }

    #[test]
    fn step_order() {
        assert_eq!(WizardStep::Personal.next(), Some(WizardStep::Address));
        assert_eq!(WizardStep::Password.next(), None);
        assert_eq!(WizardStep::Personal.previous(), None);
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn defaults_match_form() {
        let w = wizard();
        assert_eq!(w.step(), WizardStep::Personal);
        assert_eq!(w.draft().members_count, 1);
        assert_eq!(w.draft().marital_status, MaritalStatus::Single);
        assert_eq!(w.draft().economic_level, EconomicLevel::Poor);
        assert_eq!(w.draft().gender, Gender::Male);
        assert_eq!(w.draft().national_id().as_str(), "900123456");
    }

    #[test]
    fn personal_step_blocks_on_missing_fields() {
        let mut w = wizard();
        let err = w.next().unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::FullName));
        assert!(errors.contains(Field::DateOfBirth));
        assert!(errors.contains(Field::Phone));
        assert!(!errors.contains(Field::NationalId));
        assert_eq!(w.step(), WizardStep::Personal);
    }

    #[test]
    fn malformed_phone_reports_format() {
        let mut w = wizard();
        fill_personal(&mut w);
        w.set_phone("0791234567");
        assert!(w.next().is_err());
        assert_eq!(w.errors().get(Field::Phone), Some(Rejection::PhoneFormat));
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut w = wizard();
        let _ = w.next();
        assert!(w.errors().contains(Field::Name));
        w.set_name("Sara");
        assert!(!w.errors().contains(Field::Name));
        assert!(w.errors().contains(Field::Phone));
    }

    #[test]
    fn walks_all_steps() {
        let mut w = wizard();
        fill_personal(&mut w);
        assert_eq!(w.next().unwrap(), WizardStep::Address);
        fill_address(&mut w);
        assert_eq!(w.next().unwrap(), WizardStep::Social);
        w.set_profession("Teacher");
        w.set_members_count(5);
        assert_eq!(w.next().unwrap(), WizardStep::Password);
        assert!(w.errors().is_empty());
    }

    #[test]
    fn social_step_requires_members() {
        let mut w = wizard();
        fill_personal(&mut w);
        w.next().unwrap();
        fill_address(&mut w);
        w.next().unwrap();
        w.set_profession("Fisherman");
        w.set_members_count(0);
        assert!(w.next().is_err());
        assert_eq!(
            w.errors().get(Field::MembersCount),
            Some(Rejection::MembersCount)
        );
    }

    #[test]
    fn back_keeps_data_and_cancels_from_first_step() {
        let mut w = wizard();
        fill_personal(&mut w);
        w.next().unwrap();
        w.set_city("Deir al-Balah");
        assert_eq!(w.back(), BackOutcome::Moved(WizardStep::Personal));
        assert_eq!(w.draft().name, "Mohammed");
        assert_eq!(w.draft().detailed_address.city, "Deir al-Balah");
        assert_eq!(w.back(), BackOutcome::Cancelled);
        assert_eq!(w.step(), WizardStep::Personal);
    }

    #[test]
    fn back_does_not_validate() {
        let mut w = wizard();
        fill_personal(&mut w);
        w.next().unwrap();
        // Address step is empty, going back must still work.
        assert_eq!(w.back(), BackOutcome::Moved(WizardStep::Personal));
    }

    #[test]
    fn national_id_is_immutable() {
        let mut w = wizard();
        assert_eq!(
            w.set_national_id("111111111"),
            Err(Rejection::Immutable(Field::NationalId))
        );
        assert_eq!(w.draft().national_id().as_str(), "900123456");
    }

    #[test]
    fn address_joins_non_empty_parts() {
        let mut w = wizard();
        w.set_governorate("Rafah");
        w.set_district("Tal al-Sultan");
        assert_eq!(w.draft().address(), "Rafah - Tal al-Sultan");
    }

    #[test]
    fn pin_input_is_masked() {
        let mut w = wizard();
        w.set_pin("97-53-10-42");
        assert_eq!(w.draft().pin_len(), 6);
        let rendered = format!("{:?}", w.draft());
        assert!(!rendered.contains("975310"));
    }

    #[test]
    fn step_fields_cover_validators() {
        let w = wizard();
        for step in WizardStep::ALL {
            for (field, _) in validate_step(step, w.draft()).iter() {
                assert!(step.fields().contains(&field), "{field:?} not listed on {step:?}");
            }
        }
    }
}
