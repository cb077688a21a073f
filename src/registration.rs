use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RegistrationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Personal,
    Family,
    Address,
    Academic,
    Course,
    Documents,
    Hostel,
    Payment,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Personal,
        Section::Family,
        Section::Address,
        Section::Academic,
        Section::Course,
        Section::Documents,
        Section::Hostel,
        Section::Payment,
    ];

    fn position(self) -> usize {
        Section::ALL
            .iter()
            .position(|section| *section == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Section> {
        Section::ALL.get(self.position() + 1).copied()
    }

    pub fn previous(self) -> Option<Section> {
        self.position()
            .checked_sub(1)
            .and_then(|index| Section::ALL.get(index).copied())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Personal => "personal",
            Section::Family => "family",
            Section::Address => "address",
            Section::Academic => "academic",
            Section::Course => "course",
            Section::Documents => "documents",
            Section::Hostel => "hostel",
            Section::Payment => "payment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub section: Section,
    pub required: bool,
    pub default: &'static str,
}

const fn field(name: &'static str, section: Section, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        section,
        required,
        default: "",
    }
}

pub const FIELDS: &[FieldSpec] = &[
    field("fullName", Section::Personal, true),
    field("gender", Section::Personal, true),
    field("dateOfBirth", Section::Personal, true),
    field("bloodGroup", Section::Personal, false),
    field("category", Section::Personal, true),
    field("religion", Section::Personal, false),
    FieldSpec {
        default: "Indian",
        ..field("nationality", Section::Personal, true)
    },
    field("aadhaarNumber", Section::Personal, true),
    field("email", Section::Personal, true),
    field("mobile", Section::Personal, true),
    field("alternateMobile", Section::Personal, false),
    field("fatherName", Section::Family, true),
    field("fatherOccupation", Section::Family, true),
    field("fatherMobile", Section::Family, true),
    field("motherName", Section::Family, true),
    field("motherOccupation", Section::Family, false),
    field("guardianName", Section::Family, false),
    field("annualIncome", Section::Family, true),
    field("permanentAddress", Section::Address, true),
    field("currentAddress", Section::Address, true),
    field("state", Section::Address, true),
    field("district", Section::Address, true),
    field("pinCode", Section::Address, true),
    field("tenthSchool", Section::Academic, true),
    field("tenthBoard", Section::Academic, true),
    field("tenthYear", Section::Academic, true),
    field("tenthRoll", Section::Academic, true),
    field("tenthPercentage", Section::Academic, true),
    field("twelfthSchool", Section::Academic, true),
    field("twelfthBoard", Section::Academic, true),
    field("twelfthYear", Section::Academic, true),
    field("twelfthRoll", Section::Academic, true),
    field("twelfthPercentage", Section::Academic, true),
    field("entranceExam", Section::Academic, false),
    field("entranceRoll", Section::Academic, false),
    field("entranceRank", Section::Academic, false),
    field("entranceScore", Section::Academic, false),
    field("courseName", Section::Course, true),
    field("branch", Section::Course, true),
    field("admissionCategory", Section::Course, true),
    field("academicYear", Section::Course, true),
    field("admissionDate", Section::Course, true),
    FieldSpec {
        default: "no",
        ..field("requireHostel", Section::Hostel, false)
    },
    FieldSpec {
        default: "no",
        ..field("requireTransport", Section::Hostel, false)
    },
    field("localGuardianName", Section::Hostel, false),
    field("localGuardianAddress", Section::Hostel, false),
    field("medicalCondition", Section::Hostel, false),
    field("feeType", Section::Payment, false),
    field("transactionId", Section::Payment, false),
    field("paymentMode", Section::Payment, false),
    field("paymentDate", Section::Payment, false),
];

#[derive(Debug, Clone, Copy)]
pub struct DocumentSpec {
    pub id: &'static str,
    pub required: bool,
}

pub const DOCUMENTS: &[DocumentSpec] = &[
    DocumentSpec { id: "photo", required: true },
    DocumentSpec { id: "signature", required: true },
    DocumentSpec { id: "tenth", required: true },
    DocumentSpec { id: "twelfth", required: true },
    DocumentSpec { id: "tc", required: false },
    DocumentSpec { id: "migration", required: false },
    DocumentSpec { id: "character", required: false },
    DocumentSpec { id: "caste", required: false },
    DocumentSpec { id: "income", required: false },
    DocumentSpec { id: "domicile", required: false },
    DocumentSpec { id: "entrance", required: false },
    DocumentSpec { id: "aadhaar", required: false },
];

/// Everything the applicant has entered so far, keyed by field name.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationForm {
    pub fields: BTreeMap<&'static str, String>,
    pub documents: BTreeMap<&'static str, String>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            fields: FIELDS
                .iter()
                .map(|spec| (spec.name, spec.default.to_string()))
                .collect(),
            documents: BTreeMap::new(),
        }
    }
}

impl RegistrationForm {
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    fn missing_required(&self, section: Section) -> Vec<String> {
        let mut missing: Vec<String> = FIELDS
            .iter()
            .filter(|spec| spec.section == section && spec.required)
            .filter(|spec| self.value(spec.name).trim().is_empty())
            .map(|spec| spec.name.to_string())
            .collect();

        if section == Section::Documents {
            missing.extend(
                DOCUMENTS
                    .iter()
                    .filter(|doc| doc.required && !self.documents.contains_key(doc.id))
                    .map(|doc| doc.id.to_string()),
            );
        }

        missing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub application_id: String,
    pub submitted_on: NaiveDate,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Editing(Section),
    Submitted(Confirmation),
}

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    stage: Stage,
    form: RegistrationForm,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            stage: Stage::Editing(Section::Personal),
            form: RegistrationForm::default(),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    fn active(&self) -> Result<Section, RegistrationError> {
        match &self.stage {
            Stage::Editing(section) => Ok(*section),
            Stage::Submitted(_) => Err(RegistrationError::AlreadySubmitted),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), RegistrationError> {
        self.active()?;
        let spec = FIELDS
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| RegistrationError::UnknownField {
                name: name.to_string(),
            })?;
        self.form.fields.insert(spec.name, value.to_string());
        Ok(())
    }

    pub fn attach_document(&mut self, id: &str, file_name: &str) -> Result<(), RegistrationError> {
        self.active()?;
        let spec = DOCUMENTS
            .iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| RegistrationError::UnknownDocument { id: id.to_string() })?;
        self.form.documents.insert(spec.id, file_name.to_string());
        Ok(())
    }

    /// Copies the permanent address into the current address.
    pub fn copy_permanent_address(&mut self) -> Result<(), RegistrationError> {
        let permanent = self.form.value("permanentAddress").to_string();
        self.set_field("currentAddress", &permanent)
    }

    /// Selecting a tab directly skips the required-field check.
    pub fn jump_to(&mut self, section: Section) -> Result<(), RegistrationError> {
        self.active()?;
        self.stage = Stage::Editing(section);
        Ok(())
    }

    pub fn next(&mut self) -> Result<Section, RegistrationError> {
        let section = self.active()?;
        let fields = self.form.missing_required(section);
        if !fields.is_empty() {
            return Err(RegistrationError::MissingFields { section, fields });
        }
        let next = section
            .next()
            .ok_or(RegistrationError::NoNextSection { section })?;
        debug!(from = %section, to = %next, "registration section advanced");
        self.stage = Stage::Editing(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<Section, RegistrationError> {
        let section = self.active()?;
        let previous = section
            .previous()
            .ok_or(RegistrationError::NoPreviousSection { section })?;
        self.stage = Stage::Editing(previous);
        Ok(previous)
    }

    /// Closes the form. The accumulated fields are logged and then dropped;
    /// nothing is added to the registration collection.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<Confirmation, RegistrationError> {
        let section = self.active()?;
        if section != Section::Payment {
            return Err(RegistrationError::NotOnFinalSection { section });
        }

        let form = serde_json::to_string(&self.form).unwrap_or_default();
        info!(form = %form, "registration submitted");

        let confirmation = Confirmation {
            application_id: application_id(now),
            submitted_on: now.date_naive(),
            email: self.form.value("email").to_string(),
        };
        self.stage = Stage::Submitted(confirmation.clone());
        Ok(confirmation)
    }
}

/// `REG-` followed by the last eight digits of the Unix time in
/// milliseconds.
pub fn application_id(now: DateTime<Utc>) -> String {
    format!("REG-{:08}", now.timestamp_millis().rem_euclid(100_000_000))
}

/// A filled-in form as read from disk: field values keyed by field name,
/// plus the uploaded document file names keyed by document id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAnswers {
    #[serde(default)]
    pub documents: BTreeMap<String, String>,
    #[serde(default)]
    pub same_as_permanent: bool,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// Fills in every section from `answers` and walks the wizard through to
/// submission.
pub fn complete(
    answers: &RegistrationAnswers,
    now: DateTime<Utc>,
) -> Result<Confirmation, RegistrationError> {
    let mut wizard = RegistrationWizard::new();

    for (name, value) in &answers.fields {
        wizard.set_field(name, value)?;
    }
    for (id, file_name) in &answers.documents {
        wizard.attach_document(id, file_name)?;
    }
    if answers.same_as_permanent {
        wizard.copy_permanent_address()?;
    }

    while wizard.next().is_ok_and(|section| section != Section::Payment) {}

    if let Stage::Editing(section) = wizard.stage() {
        if *section != Section::Payment {
            // Surface the error that stopped the walk.
            wizard.next()?;
        }
    }

    wizard.submit(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled_answers() -> RegistrationAnswers {
        let mut answers = RegistrationAnswers::default();
        for spec in FIELDS.iter().filter(|spec| spec.required) {
            answers
                .fields
                .insert(spec.name.to_string(), format!("value for {}", spec.name));
        }
        answers
            .fields
            .insert("email".to_string(), "asha@example.com".to_string());
        for doc in DOCUMENTS.iter().filter(|doc| doc.required) {
            answers
                .documents
                .insert(doc.id.to_string(), format!("{}.pdf", doc.id));
        }
        answers
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_737_012_345_678).unwrap()
    }

    #[test]
    fn sections_are_linear() {
        assert_eq!(Section::Personal.next(), Some(Section::Family));
        assert_eq!(Section::Hostel.next(), Some(Section::Payment));
        assert_eq!(Section::Payment.next(), None);
        assert_eq!(Section::Personal.previous(), None);
        assert_eq!(Section::Family.previous(), Some(Section::Personal));
    }

    #[test]
    fn defaults_are_prefilled() {
        let wizard = RegistrationWizard::new();
        assert_eq!(wizard.form.value("nationality"), "Indian");
        assert_eq!(wizard.form.value("requireHostel"), "no");
        assert_eq!(wizard.form.value("fullName"), "");
        assert_eq!(wizard.stage(), &Stage::Editing(Section::Personal));
    }

    #[test]
    fn next_requires_active_section_fields() {
        let mut wizard = RegistrationWizard::new();
        let err = wizard.next().unwrap_err();
        match err {
            RegistrationError::MissingFields { section, fields } => {
                assert_eq!(section, Section::Personal);
                assert!(fields.contains(&"fullName".to_string()));
                assert!(!fields.contains(&"nationality".to_string()));
                assert!(!fields.contains(&"religion".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(wizard.stage(), &Stage::Editing(Section::Personal));
    }

    #[test]
    fn back_moves_without_validation() {
        let mut wizard = RegistrationWizard::new();
        wizard.jump_to(Section::Address).unwrap();
        assert_eq!(wizard.back().unwrap(), Section::Family);
        wizard.jump_to(Section::Personal).unwrap();
        assert_eq!(
            wizard.back().unwrap_err(),
            RegistrationError::NoPreviousSection {
                section: Section::Personal
            }
        );
    }

    #[test]
    fn unknown_fields_and_documents_are_rejected() {
        let mut wizard = RegistrationWizard::new();
        assert!(matches!(
            wizard.set_field("shoeSize", "9"),
            Err(RegistrationError::UnknownField { .. })
        ));
        assert!(matches!(
            wizard.attach_document("passport", "p.pdf"),
            Err(RegistrationError::UnknownDocument { .. })
        ));
    }

    #[test]
    fn documents_section_needs_required_uploads() {
        let mut wizard = RegistrationWizard::new();
        wizard.jump_to(Section::Documents).unwrap();
        wizard.attach_document("photo", "photo.jpg").unwrap();
        match wizard.next().unwrap_err() {
            RegistrationError::MissingFields { fields, .. } => {
                assert_eq!(fields, vec!["signature", "tenth", "twelfth"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_as_permanent_copies_address() {
        let mut wizard = RegistrationWizard::new();
        wizard.set_field("permanentAddress", "7 Hill Road").unwrap();
        wizard.copy_permanent_address().unwrap();
        assert_eq!(wizard.form.value("currentAddress"), "7 Hill Road");
    }

    #[test]
    fn submit_only_from_payment() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(
            wizard.submit(fixed_now()).unwrap_err(),
            RegistrationError::NotOnFinalSection {
                section: Section::Personal
            }
        );
    }

    #[test]
    fn full_walk_ends_in_submitted_state() {
        let confirmation = complete(&filled_answers(), fixed_now()).unwrap();
        assert_eq!(confirmation.application_id, "REG-12345678");
        assert_eq!(confirmation.email, "asha@example.com");
        assert_eq!(
            confirmation.submitted_on,
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
        );
    }

    #[test]
    fn walk_stops_at_first_incomplete_section() {
        let mut answers = filled_answers();
        answers.fields.remove("pinCode");
        let err = complete(&answers, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::MissingFields {
                section: Section::Address,
                fields: vec!["pinCode".to_string()],
            }
        );
    }

    #[test]
    fn submitted_form_is_closed() {
        let mut wizard = RegistrationWizard::new();
        wizard.jump_to(Section::Payment).unwrap();
        wizard.set_field("email", "asha@example.com").unwrap();
        let confirmation = wizard.submit(fixed_now()).unwrap();
        assert_eq!(wizard.stage(), &Stage::Submitted(confirmation.clone()));
        assert_eq!(confirmation.email, "asha@example.com");
        assert_eq!(
            wizard.submit(fixed_now()).unwrap_err(),
            RegistrationError::AlreadySubmitted
        );
        assert_eq!(
            wizard.set_field("email", "late@example.com").unwrap_err(),
            RegistrationError::AlreadySubmitted
        );
        assert_eq!(wizard.next().unwrap_err(), RegistrationError::AlreadySubmitted);
    }

    #[test]
    fn application_id_keeps_leading_zeros() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_042).unwrap();
        let id = application_id(now);
        assert_eq!(id, "REG-00000042");
        assert_eq!(id.len(), 12);
        assert!(id[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn answers_parse_from_flat_json() {
        let raw = r#"{"fullName":"Asha Rao","sameAsPermanent":true,
            "documents":{"photo":"asha.jpg"}}"#;
        let answers: RegistrationAnswers = serde_json::from_str(raw).unwrap();
        assert_eq!(answers.fields.get("fullName").map(String::as_str), Some("Asha Rao"));
        assert!(answers.same_as_permanent);
        assert_eq!(answers.documents.len(), 1);
        assert!(!answers.fields.contains_key("documents"));
    }
}
