//! Profile view of a found beneficiary: tabs, package partition, and the
//! viewing/editing/PIN-setup sub-states.
//!
//! Everything here is pure display state over data that was already fetched.
//! Backend calls for saving live in [`crate::session`].

use crate::badge::Tone;
use crate::error::PortalError;
use relief_types::validation::{check_phone, check_required_with, sanitize_digits, PIN_LEN};
use relief_types::{AidPackage, Beneficiary, ContactDetails, DetailedAddress, Field, FieldErrors};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Info,
    Status,
    PackagesReceived,
    PackagesUpcoming,
    Organization,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Info,
        Tab::Status,
        Tab::PackagesReceived,
        Tab::PackagesUpcoming,
        Tab::Organization,
    ];
}

/// Warning shown while a beneficiary has not protected edits with a PIN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinNotice {
    NotYetCreated,
}

impl PinNotice {
    pub fn tone(&self) -> Tone {
        match self {
            Self::NotYetCreated => Tone::Warning,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NotYetCreated => {
                "No PIN yet: you will be asked to create one the first time you save changes."
            }
        }
    }
}

/// The two PIN inputs of the setup prompt. Zeroized on drop.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct PinEntry {
    pin: String,
    confirm: String,
}

impl PinEntry {
    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn confirm(&self) -> &str {
        &self.confirm
    }

    pub fn set_pin(&mut self, raw: &str) {
        self.pin.zeroize();
        self.pin = sanitize_digits(raw, PIN_LEN);
    }

    pub fn set_confirm(&mut self, raw: &str) {
        self.confirm.zeroize();
        self.confirm = sanitize_digits(raw, PIN_LEN);
    }

    /// Both inputs are full length, i.e. the submit control may be enabled.
    pub fn is_complete(&self) -> bool {
        self.pin.len() == PIN_LEN && self.confirm.len() == PIN_LEN
    }
}

impl std::fmt::Debug for PinEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinEntry")
            .field("pin_len", &self.pin.len())
            .field("confirm_len", &self.confirm.len())
            .finish()
    }
}

/// Scratch copy of the editable fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBuffer {
    contact: ContactDetails,
}

impl EditBuffer {
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.contact.phone = phone.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.contact.address = address.into();
    }

    pub fn set_detailed_address(&mut self, detailed: Option<DetailedAddress>) {
        self.contact.detailed_address = detailed;
    }

    pub(crate) fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.record(
            Field::Phone,
            check_required_with(Field::Phone, &self.contact.phone, check_phone),
        );
        errors.into_result()
    }
}

#[derive(Debug, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing(EditBuffer),
    /// Save requested without a credential: waiting for a new PIN.
    PinSetup { buffer: EditBuffer, entry: PinEntry },
}

impl EditState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Viewing => "viewing",
            Self::Editing(_) => "editing",
            Self::PinSetup { .. } => "setting up a PIN",
        }
    }
}

/// A found beneficiary with their packages and edit state.
#[derive(Debug)]
pub struct ProfileView {
    pub(crate) beneficiary: Beneficiary,
    pub(crate) packages: Vec<AidPackage>,
    pub(crate) credential_exists: bool,
    pub(crate) tab: Tab,
    pub(crate) edit: EditState,
}

impl ProfileView {
    pub fn new(beneficiary: Beneficiary, packages: Vec<AidPackage>, credential_exists: bool) -> Self {
        Self {
            beneficiary,
            packages,
            credential_exists,
            tab: Tab::default(),
            edit: EditState::Viewing,
        }
    }

    pub fn beneficiary(&self) -> &Beneficiary {
        &self.beneficiary
    }

    pub fn packages(&self) -> &[AidPackage] {
        &self.packages
    }

    pub fn credential_exists(&self) -> bool {
        self.credential_exists
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self.edit, EditState::Viewing)
    }

    pub fn pin_prompt_open(&self) -> bool {
        matches!(self.edit, EditState::PinSetup { .. })
    }

    pub fn pin_notice(&self) -> Option<PinNotice> {
        (!self.credential_exists).then_some(PinNotice::NotYetCreated)
    }

    /// Delivered packages.
    pub fn received_packages(&self) -> impl Iterator<Item = &AidPackage> {
        self.packages.iter().filter(|p| p.status.is_received())
    }

    /// Pending, assigned and in-delivery packages.
    pub fn upcoming_packages(&self) -> impl Iterator<Item = &AidPackage> {
        self.packages.iter().filter(|p| p.status.is_upcoming())
    }

    /// Packages listed under `tab`; empty for non-package tabs.
    pub fn packages_for(&self, tab: Tab) -> Vec<&AidPackage> {
        match tab {
            Tab::PackagesReceived => self.received_packages().collect(),
            Tab::PackagesUpcoming => self.upcoming_packages().collect(),
            Tab::Info | Tab::Status | Tab::Organization => Vec::new(),
        }
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.beneficiary.organization_id.as_deref()
    }

    /// `viewing → editing`: copy the editable fields into a scratch buffer.
    pub fn start_edit(&mut self) -> Result<(), PortalError> {
        if self.is_editing() {
            return Err(PortalError::InvalidState {
                action: "start editing",
                state: self.edit.name(),
            });
        }
        self.edit = EditState::Editing(EditBuffer {
            contact: self.beneficiary.contact(),
        });
        Ok(())
    }

    /// Drop the scratch buffer (and any PIN input) without touching the record.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    pub fn edit_buffer(&self) -> Option<&EditBuffer> {
        match &self.edit {
            EditState::Editing(buffer) | EditState::PinSetup { buffer, .. } => Some(buffer),
            EditState::Viewing => None,
        }
    }

    /// The buffer is only writable while editing, not while the PIN prompt is open.
    pub fn edit_buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match &mut self.edit {
            EditState::Editing(buffer) => Some(buffer),
            EditState::Viewing | EditState::PinSetup { .. } => None,
        }
    }

    pub fn pin_entry_mut(&mut self) -> Option<&mut PinEntry> {
        match &mut self.edit {
            EditState::PinSetup { entry, .. } => Some(entry),
            EditState::Viewing | EditState::Editing(_) => None,
        }
    }

    /// Close the PIN prompt, clearing the PIN input but keeping the edits.
    pub fn dismiss_pin_prompt(&mut self) {
        if !self.pin_prompt_open() {
            return;
        }
        if let EditState::PinSetup { buffer, .. } = std::mem::take(&mut self.edit) {
            self.edit = EditState::Editing(buffer);
        }
    }

    /// Merge a saved buffer into the displayed record and return to viewing.
    pub(crate) fn commit(&mut self, contact: ContactDetails) {
        self.beneficiary.apply_contact(contact);
        self.edit = EditState::Viewing;
    }
}
