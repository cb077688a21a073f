use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Hod,
    Dean,
    Accountant,
    Registrar,
    Director,
}

impl Role {
    pub fn audience(self) -> Audience {
        match self {
            Role::Student => Audience::Students,
            Role::Faculty => Audience::Faculty,
            Role::Hod => Audience::Hod,
            Role::Dean => Audience::Dean,
            Role::Accountant => Audience::Accountant,
            Role::Registrar => Audience::Registrar,
            Role::Director => Audience::Director,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Hod => "HOD",
            Role::Dean => "Dean",
            Role::Accountant => "Accountant",
            Role::Registrar => "Registrar",
            Role::Director => "Director",
        }
    }
}

/// Who a notice is addressed to. Students are addressed in the plural,
/// every other role by its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Students,
    Faculty,
    Hod,
    Dean,
    Accountant,
    Registrar,
    Director,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub department: String,
    pub semester: u8,
    pub cgpa: f64,
    pub attendance_percentage: f64,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub blood_group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub email: String,
    pub employee_id: String,
    pub department: String,
    pub designation: String,
    pub subjects: Vec<String>,
    pub phone: String,
    pub experience: u32,
    pub qualification: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Tuition,
    Hostel,
    Library,
    Exam,
    Lab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub id: String,
    pub student_id: String,
    #[serde(rename = "type")]
    pub fee_type: FeeType,
    pub amount: u64,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub subject: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeCategory {
    Academic,
    Administrative,
    Event,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub category: NoticeCategory,
    pub created_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    pub target_audience: Vec<Audience>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub semester: u8,
    pub faculty_id: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    pub id: String,
    pub subject_id: String,
    pub faculty_id: String,
    /// 0 is Sunday, 6 is Saturday.
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantType {
    Student,
    Faculty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Casual,
    Emergency,
    Maternity,
    Study,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplication {
    pub id: String,
    pub applicant_id: String,
    pub applicant_type: ApplicantType,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: ReviewStatus,
    pub applied_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Midterm,
    Final,
    Practical,
    Assignment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub exam_type: ExamType,
    pub marks: u32,
    pub max_marks: u32,
    pub grade: String,
    pub percentage: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub code: String,
    pub hod_id: String,
    pub total_students: u32,
    pub total_faculty: u32,
    pub established_year: u16,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub blood_group: Option<String>,
    pub category: String,
    pub nationality: String,
    pub email: String,
    pub mobile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDetails {
    pub father_name: String,
    pub father_occupation: String,
    pub mother_name: String,
    pub guardian_name: Option<String>,
    pub annual_income: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetails {
    pub permanent_address: String,
    pub current_address: String,
    pub state: String,
    pub district: String,
    pub pin_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    pub school: String,
    pub board: String,
    pub year: u16,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicDetails {
    pub tenth: SchoolRecord,
    pub twelfth: SchoolRecord,
    pub entrance_exam: Option<String>,
    pub entrance_rank: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub course_name: String,
    pub branch: String,
    pub admission_category: String,
    pub academic_year: String,
    pub admission_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub kind: String,
    pub file_name: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelTransport {
    pub require_hostel: bool,
    pub require_transport: bool,
    pub local_guardian_name: Option<String>,
    pub medical_condition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayment {
    pub fee_type: String,
    pub payment_mode: String,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegistration {
    pub id: String,
    pub status: ReviewStatus,
    pub submitted_date: NaiveDate,
    pub personal_info: PersonalInfo,
    pub family_details: FamilyDetails,
    pub address_details: AddressDetails,
    pub academic_details: AcademicDetails,
    pub course_details: CourseDetails,
    pub documents: Vec<DocumentUpload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostel_transport: Option<HostelTransport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payment: Option<FeePayment>,
}

/// Implements `as_str` and `Display` with the same literal the enum uses in
/// fixture JSON.
macro_rules! literals {
    ($($ty:ident { $($variant:ident => $text:literal),* $(,)? })*) => {
        $(
            impl $ty {
                pub fn as_str(self) -> &'static str {
                    match self {
                        $($ty::$variant => $text,)*
                    }
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

literals! {
    Audience {
        Students => "students",
        Faculty => "faculty",
        Hod => "hod",
        Dean => "dean",
        Accountant => "accountant",
        Registrar => "registrar",
        Director => "director",
    }

    FeeType {
        Tuition => "tuition",
        Hostel => "hostel",
        Library => "library",
        Exam => "exam",
        Lab => "lab",
    }

    FeeStatus {
        Paid => "paid",
        Pending => "pending",
        Overdue => "overdue",
    }

    AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
    }

    Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }

    NoticeCategory {
        Academic => "academic",
        Administrative => "administrative",
        Event => "event",
        General => "general",
    }

    ApplicantType {
        Student => "student",
        Faculty => "faculty",
    }

    LeaveType {
        Sick => "sick",
        Casual => "casual",
        Emergency => "emergency",
        Maternity => "maternity",
        Study => "study",
    }

    ReviewStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }

    ExamType {
        Midterm => "midterm",
        Final => "final",
        Practical => "practical",
        Assignment => "assignment",
    }
}

pub fn day_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Unknown",
    }
}

/// Serde adapter for `HH:MM` wall-clock times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_literals_render_lowercase() {
        assert_eq!(FeeStatus::Overdue.to_string(), "overdue");
        assert_eq!(Audience::Students.to_string(), "students");
        assert_eq!(ExamType::Midterm.to_string(), "midterm");
        assert_eq!(format!("{}", LeaveType::Maternity), "maternity");
    }

    #[test]
    fn display_literals_match_fixture_json() {
        let statuses = [FeeStatus::Paid, FeeStatus::Pending, FeeStatus::Overdue];
        for status in statuses {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status.as_str())
            );
        }
        for category in [
            NoticeCategory::Academic,
            NoticeCategory::Administrative,
            NoticeCategory::Event,
            NoticeCategory::General,
        ] {
            let parsed: NoticeCategory =
                serde_json::from_str(&format!("\"{category}\"")).unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!(Audience::Hod.as_str(), "hod");
        assert_eq!(ReviewStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn unknown_status_literal_is_rejected() {
        let raw = r#"{"id":"9","studentId":"1","type":"tuition","amount":10,
            "dueDate":"2025-01-31","status":"partial"}"#;
        assert!(serde_json::from_str::<FeeRecord>(raw).is_err());
    }

    #[test]
    fn schedule_times_use_hours_and_minutes() {
        let raw = r#"{"id":"1","subjectId":"1","facultyId":"1","dayOfWeek":1,
            "startTime":"09:00","endTime":"10:30","room":"CS101"}"#;
        let slot: ClassSchedule = serde_json::from_str(raw).unwrap();
        assert_eq!(slot.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["endTime"], "10:30");
        assert!(json.get("batch").is_none());
    }

    #[test]
    fn roles_map_to_their_audience() {
        assert_eq!(Role::Student.audience(), Audience::Students);
        assert_eq!(Role::Hod.audience(), Audience::Hod);
        assert_eq!(day_name(2), "Tuesday");
    }
}
