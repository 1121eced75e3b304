use crate::resource::PersonRecord;
use crate::ui::mvi::UiState;

/// Editable fields of the employee form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    SecondName,
    ThirdName,
    LastName,
    Mobile,
    Address,
    DateOfBirth,
    IdentityNumber,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::FirstName,
        FormField::SecondName,
        FormField::ThirdName,
        FormField::LastName,
        FormField::Mobile,
        FormField::Address,
        FormField::DateOfBirth,
        FormField::IdentityNumber,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::SecondName => "Second name",
            FormField::ThirdName => "Third name",
            FormField::LastName => "Last name",
            FormField::Mobile => "Mobile",
            FormField::Address => "Address",
            FormField::DateOfBirth => "Date of birth",
            FormField::IdentityNumber => "ID number",
        }
    }
}

/// Text buffers behind the edit form. Missing values start out empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeForm {
    pub name1st: String,
    pub name2nd: String,
    pub name3rd: String,
    pub name_last: String,
    pub mobile_no: String,
    pub address: String,
    pub date_of_birth: String,
    pub identity_number: String,
}

impl EmployeeForm {
    pub fn from_record(record: &PersonRecord) -> Self {
        let p = &record.profile;
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name1st: p.name1st.clone(),
            name2nd: text(&p.name2nd),
            name3rd: text(&p.name3rd),
            name_last: p.name_last.clone(),
            mobile_no: p.mobile_no.clone(),
            address: text(&p.address),
            date_of_birth: text(&p.date_of_birth),
            identity_number: text(&p.identity_number),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.name1st,
            FormField::SecondName => &self.name2nd,
            FormField::ThirdName => &self.name3rd,
            FormField::LastName => &self.name_last,
            FormField::Mobile => &self.mobile_no,
            FormField::Address => &self.address,
            FormField::DateOfBirth => &self.date_of_birth,
            FormField::IdentityNumber => &self.identity_number,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FirstName => &mut self.name1st,
            FormField::SecondName => &mut self.name2nd,
            FormField::ThirdName => &mut self.name3rd,
            FormField::LastName => &mut self.name_last,
            FormField::Mobile => &mut self.mobile_no,
            FormField::Address => &mut self.address,
            FormField::DateOfBirth => &mut self.date_of_birth,
            FormField::IdentityNumber => &mut self.identity_number,
        }
    }

    /// The record to send back: edited fields replaced, empty optional
    /// fields cleared to null, everything else untouched.
    pub fn apply(&self, record: &PersonRecord) -> PersonRecord {
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
        let mut updated = record.clone();
        let p = &mut updated.profile;
        p.name1st = self.name1st.clone();
        p.name2nd = optional(&self.name2nd);
        p.name3rd = optional(&self.name3rd);
        p.name_last = self.name_last.clone();
        p.mobile_no = self.mobile_no.clone();
        p.address = optional(&self.address);
        p.date_of_birth = optional(&self.date_of_birth);
        p.identity_number = optional(&self.identity_number);
        updated
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EmployeeModalState {
    #[default]
    Hidden,
    Viewing {
        record: PersonRecord,
    },
    Editing {
        record: PersonRecord,
        form: EmployeeForm,
        focused: usize,
        saving: bool,
        /// Last save failure, shown inside the modal.
        error: Option<String>,
    },
}

impl UiState for EmployeeModalState {}

impl EmployeeModalState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn record(&self) -> Option<&PersonRecord> {
        match self {
            Self::Hidden => None,
            Self::Viewing { record } | Self::Editing { record, .. } => Some(record),
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Editing { saving: true, .. })
    }

    pub fn focused_field(&self) -> Option<FormField> {
        match self {
            Self::Editing { focused, .. } => FormField::ALL.get(*focused).copied(),
            _ => None,
        }
    }
}
