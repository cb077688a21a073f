use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{
    AcademicDetails, AddressDetails, ApplicantType, AttendanceRecord, AttendanceStatus, Audience,
    ClassSchedule, CourseDetails, Department, DocumentUpload, ExamResult, ExamType, Faculty,
    FamilyDetails, FeePayment, FeeRecord, FeeStatus, FeeType, HostelTransport, LeaveApplication,
    LeaveType, Notice, NoticeCategory, PersonalInfo, Priority, ReviewStatus, SchoolRecord,
    Student, StudentRegistration, Subject,
};

/// Every collection the dashboards read from. Built once at startup and
/// only ever borrowed immutably afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub students: Vec<Student>,
    pub faculty: Vec<Faculty>,
    pub fee_records: Vec<FeeRecord>,
    pub attendance_records: Vec<AttendanceRecord>,
    pub notices: Vec<Notice>,
    pub subjects: Vec<Subject>,
    pub class_schedule: Vec<ClassSchedule>,
    pub leave_applications: Vec<LeaveApplication>,
    pub exam_results: Vec<ExamResult>,
    pub departments: Vec<Department>,
    #[serde(default)]
    pub registrations: Vec<StudentRegistration>,
}

impl Dataset {
    pub fn from_json_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixtures from {}", path.display()))?;
        let dataset = serde_json::from_str(&raw)
            .with_context(|| format!("invalid fixture file {}", path.display()))?;
        Ok(dataset)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn builtin() -> anyhow::Result<Self> {
        Ok(Self {
            students: students()?,
            faculty: faculty(),
            fee_records: fee_records()?,
            attendance_records: attendance_records()?,
            notices: notices()?,
            subjects: subjects(),
            class_schedule: class_schedule()?,
            leave_applications: leave_applications()?,
            exam_results: exam_results()?,
            departments: departments(),
            registrations: registrations()?,
        })
    }
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
}

fn time(hour: u32, minute: u32) -> anyhow::Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).context("invalid time")
}

fn students() -> anyhow::Result<Vec<Student>> {
    let rows = vec![
        ("1", "John Doe", "john.doe", "CS2023001", "Computer Science", 6, 8.7, 94.0, "+91-9876543210", "123", date(2001, 5, 15)?, "O+"),
        ("2", "Jane Smith", "jane.smith", "CS2023002", "Computer Science", 6, 9.2, 98.0, "+91-9876543211", "124", date(2001, 3, 22)?, "A+"),
        ("3", "Mike Johnson", "mike.johnson", "ME2023001", "Mechanical Engineering", 4, 7.8, 87.0, "+91-9876543212", "125", date(2002, 1, 10)?, "B+"),
    ];

    Ok(rows
        .into_iter()
        .map(
            |(id, name, handle, roll, department, semester, cgpa, attendance, phone, room, dob, blood)| {
                Student {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: format!("{handle}@student.university.edu"),
                    roll_number: roll.to_string(),
                    department: department.to_string(),
                    semester,
                    cgpa,
                    attendance_percentage: attendance,
                    phone: phone.to_string(),
                    address: format!("{room} Student Hostel, University Campus"),
                    date_of_birth: dob,
                    blood_group: blood.to_string(),
                }
            },
        )
        .collect())
}

fn faculty() -> Vec<Faculty> {
    let rows = [
        ("1", "Dr. Sarah Wilson", "sarah.wilson", "FAC001", "Computer Science", "Professor",
            ["Data Structures", "Algorithms", "Machine Learning"], "+91-9876543001", 12, "PhD Computer Science"),
        ("2", "Prof. Robert Brown", "robert.brown", "FAC002", "Computer Science", "Associate Professor",
            ["Database Systems", "Software Engineering", "Web Development"], "+91-9876543002", 8, "MTech Computer Science"),
        ("3", "Dr. Emily Davis", "emily.davis", "FAC003", "Mechanical Engineering", "Assistant Professor",
            ["Thermodynamics", "Fluid Mechanics", "CAD/CAM"], "+91-9876543003", 6, "PhD Mechanical Engineering"),
    ];

    rows.into_iter()
        .map(
            |(id, name, handle, employee_id, department, designation, subjects, phone, experience, qualification)| {
                Faculty {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: format!("{handle}@university.edu"),
                    employee_id: employee_id.to_string(),
                    department: department.to_string(),
                    designation: designation.to_string(),
                    subjects: subjects.iter().map(|s| s.to_string()).collect(),
                    phone: phone.to_string(),
                    experience,
                    qualification: qualification.to_string(),
                }
            },
        )
        .collect()
}

fn fee_records() -> anyhow::Result<Vec<FeeRecord>> {
    let rows = vec![
        ("1", "1", FeeType::Tuition, 45000, date(2025, 1, 31)?, FeeStatus::Paid, Some((date(2025, 1, 15)?, "Online"))),
        ("2", "1", FeeType::Hostel, 12500, date(2025, 2, 15)?, FeeStatus::Pending, None),
        ("3", "1", FeeType::Library, 500, date(2025, 1, 20)?, FeeStatus::Overdue, None),
        ("4", "2", FeeType::Tuition, 45000, date(2025, 1, 31)?, FeeStatus::Paid, Some((date(2025, 1, 10)?, "Bank Transfer"))),
    ];

    Ok(rows
        .into_iter()
        .map(|(id, student_id, fee_type, amount, due_date, status, payment)| FeeRecord {
            id: id.to_string(),
            student_id: student_id.to_string(),
            fee_type,
            amount,
            due_date,
            status,
            paid_date: payment.map(|(paid, _)| paid),
            payment_method: payment.map(|(_, method)| method.to_string()),
        })
        .collect())
}

fn attendance_records() -> anyhow::Result<Vec<AttendanceRecord>> {
    let day = date(2025, 1, 15)?;
    let rows = [
        ("1", "1", "Data Structures", AttendanceStatus::Present, 1),
        ("2", "1", "Algorithms", AttendanceStatus::Present, 2),
        ("3", "1", "Machine Learning", AttendanceStatus::Absent, 3),
        ("4", "2", "Data Structures", AttendanceStatus::Present, 1),
    ];

    Ok(rows
        .into_iter()
        .map(|(id, student_id, subject, status, period)| AttendanceRecord {
            id: id.to_string(),
            student_id: student_id.to_string(),
            subject: subject.to_string(),
            date: day,
            status,
            period: Some(period),
        })
        .collect())
}

fn notices() -> anyhow::Result<Vec<Notice>> {
    Ok(vec![
        Notice {
            id: "1".to_string(),
            title: "Mid-term Exam Schedule Released".to_string(),
            content: "The mid-term examination schedule for the current semester has been released. \
                Students are advised to check the examination portal for detailed timetables."
                .to_string(),
            priority: Priority::High,
            category: NoticeCategory::Academic,
            created_date: date(2025, 1, 15)?,
            expiry_date: Some(date(2025, 2, 15)?),
            target_audience: vec![Audience::Students],
        },
        Notice {
            id: "2".to_string(),
            title: "Fee Payment Reminder".to_string(),
            content: "This is a reminder that the last date for fee payment for the current semester \
                is approaching. Please ensure all dues are cleared before the deadline."
                .to_string(),
            priority: Priority::Medium,
            category: NoticeCategory::Administrative,
            created_date: date(2025, 1, 14)?,
            expiry_date: None,
            target_audience: vec![Audience::Students],
        },
        Notice {
            id: "3".to_string(),
            title: "Campus Placement Drive".to_string(),
            content: "Leading tech companies will be conducting placement drives next month. \
                Eligible students are encouraged to register on the placement portal."
                .to_string(),
            priority: Priority::Low,
            category: NoticeCategory::Event,
            created_date: date(2025, 1, 13)?,
            expiry_date: None,
            target_audience: vec![Audience::Students],
        },
        Notice {
            id: "4".to_string(),
            title: "Faculty Meeting Schedule".to_string(),
            content: "Monthly faculty meeting has been scheduled for next Friday. \
                All faculty members are required to attend."
                .to_string(),
            priority: Priority::Medium,
            category: NoticeCategory::Administrative,
            created_date: date(2025, 1, 12)?,
            expiry_date: None,
            target_audience: vec![Audience::Faculty, Audience::Hod],
        },
    ])
}

fn subjects() -> Vec<Subject> {
    let rows = [
        ("1", "CS301", "Data Structures", 4, 3, "1"),
        ("2", "CS302", "Algorithms", 4, 3, "1"),
        ("3", "CS401", "Machine Learning", 3, 4, "1"),
        ("4", "CS303", "Database Systems", 3, 3, "2"),
    ];

    rows.into_iter()
        .map(|(id, code, name, credits, semester, faculty_id)| Subject {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            credits,
            semester,
            faculty_id: faculty_id.to_string(),
            department: "Computer Science".to_string(),
        })
        .collect()
}

fn class_schedule() -> anyhow::Result<Vec<ClassSchedule>> {
    let rows = vec![
        ("1", "1", 1, time(9, 0)?, time(10, 30)?, "CS101"),
        ("2", "2", 1, time(11, 0)?, time(12, 30)?, "CS102"),
        ("3", "3", 2, time(14, 0)?, time(15, 30)?, "CS201"),
    ];

    Ok(rows
        .into_iter()
        .map(|(id, subject_id, day_of_week, start_time, end_time, room)| ClassSchedule {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            faculty_id: "1".to_string(),
            day_of_week,
            start_time,
            end_time,
            room: room.to_string(),
            batch: None,
        })
        .collect())
}

fn leave_applications() -> anyhow::Result<Vec<LeaveApplication>> {
    Ok(vec![
        LeaveApplication {
            id: "1".to_string(),
            applicant_id: "1".to_string(),
            applicant_type: ApplicantType::Student,
            leave_type: LeaveType::Sick,
            start_date: date(2025, 1, 20)?,
            end_date: date(2025, 1, 22)?,
            reason: "High fever and medical treatment required".to_string(),
            status: ReviewStatus::Approved,
            applied_date: date(2025, 1, 19)?,
            approved_by: Some("2".to_string()),
            approved_date: Some(date(2025, 1, 19)?),
            comments: Some("Approved with medical certificate".to_string()),
        },
        LeaveApplication {
            id: "2".to_string(),
            applicant_id: "1".to_string(),
            applicant_type: ApplicantType::Faculty,
            leave_type: LeaveType::Casual,
            start_date: date(2025, 2, 1)?,
            end_date: date(2025, 2, 3)?,
            reason: "Family function".to_string(),
            status: ReviewStatus::Pending,
            applied_date: date(2025, 1, 16)?,
            approved_by: None,
            approved_date: None,
            comments: None,
        },
    ])
}

fn exam_results() -> anyhow::Result<Vec<ExamResult>> {
    let rows = vec![
        ("1", "1", "1", 78, "A", date(2025, 1, 10)?),
        ("2", "1", "2", 85, "A+", date(2025, 1, 12)?),
        ("3", "2", "1", 92, "A+", date(2025, 1, 10)?),
    ];

    Ok(rows
        .into_iter()
        .map(|(id, student_id, subject_id, marks, grade, day)| ExamResult {
            id: id.to_string(),
            student_id: student_id.to_string(),
            subject_id: subject_id.to_string(),
            exam_type: ExamType::Midterm,
            marks,
            max_marks: 100,
            grade: grade.to_string(),
            percentage: f64::from(marks),
            date: day,
        })
        .collect())
}

fn departments() -> Vec<Department> {
    vec![
        Department {
            id: "1".to_string(),
            name: "Computer Science".to_string(),
            code: "CS".to_string(),
            hod_id: "1".to_string(),
            total_students: 180,
            total_faculty: 15,
            established_year: 2010,
            description: "Department of Computer Science and Engineering".to_string(),
        },
        Department {
            id: "2".to_string(),
            name: "Mechanical Engineering".to_string(),
            code: "ME".to_string(),
            hod_id: "3".to_string(),
            total_students: 120,
            total_faculty: 12,
            established_year: 2008,
            description: "Department of Mechanical Engineering".to_string(),
        },
    ]
}

fn registrations() -> anyhow::Result<Vec<StudentRegistration>> {
    let documents = |verified: bool| -> Vec<DocumentUpload> {
        ["photo", "signature", "tenth", "twelfth"]
            .iter()
            .map(|kind| DocumentUpload {
                kind: kind.to_string(),
                file_name: format!("{kind}.pdf"),
                verified,
            })
            .collect()
    };

    Ok(vec![
        StudentRegistration {
            id: "REG-1".to_string(),
            status: ReviewStatus::Pending,
            submitted_date: date(2025, 1, 18)?,
            personal_info: PersonalInfo {
                full_name: "Priya Sharma".to_string(),
                gender: "female".to_string(),
                date_of_birth: date(2006, 8, 2)?,
                blood_group: Some("B+".to_string()),
                category: "general".to_string(),
                nationality: "Indian".to_string(),
                email: "priya.sharma@example.com".to_string(),
                mobile: "+91-9811122233".to_string(),
            },
            family_details: FamilyDetails {
                father_name: "Rakesh Sharma".to_string(),
                father_occupation: "Engineer".to_string(),
                mother_name: "Sunita Sharma".to_string(),
                guardian_name: None,
                annual_income: 900_000,
            },
            address_details: AddressDetails {
                permanent_address: "14 Lake Road, Bhopal".to_string(),
                current_address: "14 Lake Road, Bhopal".to_string(),
                state: "Madhya Pradesh".to_string(),
                district: "Bhopal".to_string(),
                pin_code: "462001".to_string(),
            },
            academic_details: AcademicDetails {
                tenth: SchoolRecord {
                    school: "Kendriya Vidyalaya No. 1".to_string(),
                    board: "CBSE".to_string(),
                    year: 2022,
                    percentage: 91.4,
                },
                twelfth: SchoolRecord {
                    school: "Kendriya Vidyalaya No. 1".to_string(),
                    board: "CBSE".to_string(),
                    year: 2024,
                    percentage: 88.2,
                },
                entrance_exam: Some("JEE Main".to_string()),
                entrance_rank: Some(18_452),
            },
            course_details: CourseDetails {
                course_name: "B.Tech".to_string(),
                branch: "Computer Science".to_string(),
                admission_category: "merit".to_string(),
                academic_year: "2025-26".to_string(),
                admission_date: date(2025, 7, 15)?,
            },
            documents: documents(false),
            hostel_transport: Some(HostelTransport {
                require_hostel: true,
                require_transport: false,
                local_guardian_name: None,
                medical_condition: None,
            }),
            fee_payment: None,
        },
        StudentRegistration {
            id: "REG-2".to_string(),
            status: ReviewStatus::Approved,
            submitted_date: date(2025, 1, 11)?,
            personal_info: PersonalInfo {
                full_name: "Arjun Mehta".to_string(),
                gender: "male".to_string(),
                date_of_birth: date(2006, 2, 19)?,
                blood_group: None,
                category: "obc".to_string(),
                nationality: "Indian".to_string(),
                email: "arjun.mehta@example.com".to_string(),
                mobile: "+91-9822233344".to_string(),
            },
            family_details: FamilyDetails {
                father_name: "Vikram Mehta".to_string(),
                father_occupation: "Farmer".to_string(),
                mother_name: "Kavita Mehta".to_string(),
                guardian_name: None,
                annual_income: 350_000,
            },
            address_details: AddressDetails {
                permanent_address: "Village Rampur, Nashik".to_string(),
                current_address: "Boys Hostel B, University Campus".to_string(),
                state: "Maharashtra".to_string(),
                district: "Nashik".to_string(),
                pin_code: "422001".to_string(),
            },
            academic_details: AcademicDetails {
                tenth: SchoolRecord {
                    school: "Zilla Parishad High School".to_string(),
                    board: "State Board".to_string(),
                    year: 2022,
                    percentage: 84.0,
                },
                twelfth: SchoolRecord {
                    school: "Nashik Junior College".to_string(),
                    board: "State Board".to_string(),
                    year: 2024,
                    percentage: 79.5,
                },
                entrance_exam: None,
                entrance_rank: None,
            },
            course_details: CourseDetails {
                course_name: "B.Tech".to_string(),
                branch: "Mechanical Engineering".to_string(),
                admission_category: "management".to_string(),
                academic_year: "2025-26".to_string(),
                admission_date: date(2025, 7, 15)?,
            },
            documents: documents(true),
            hostel_transport: None,
            fee_payment: Some(FeePayment {
                fee_type: "Registration Fee".to_string(),
                payment_mode: "UPI".to_string(),
                transaction_id: "TXN20250111001".to_string(),
                payment_date: date(2025, 1, 11)?,
            }),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_collection_sizes_match_fixture() {
        let data = Dataset::builtin().unwrap();
        assert_eq!(data.students.len(), 3);
        assert_eq!(data.faculty.len(), 3);
        assert_eq!(data.fee_records.len(), 4);
        assert_eq!(data.attendance_records.len(), 4);
        assert_eq!(data.notices.len(), 4);
        assert_eq!(data.subjects.len(), 4);
        assert_eq!(data.class_schedule.len(), 3);
        assert_eq!(data.leave_applications.len(), 2);
        assert_eq!(data.exam_results.len(), 3);
        assert_eq!(data.departments.len(), 2);
        assert_eq!(data.registrations.len(), 2);
    }

    #[test]
    fn foreign_keys_resolve_in_builtin_seed() {
        let data = Dataset::builtin().unwrap();
        let student_ids: Vec<&str> = data.students.iter().map(|s| s.id.as_str()).collect();
        let faculty_ids: Vec<&str> = data.faculty.iter().map(|f| f.id.as_str()).collect();
        let subject_ids: Vec<&str> = data.subjects.iter().map(|s| s.id.as_str()).collect();

        assert!(data.fee_records.iter().all(|r| student_ids.contains(&r.student_id.as_str())));
        assert!(data.exam_results.iter().all(|r| subject_ids.contains(&r.subject_id.as_str())));
        assert!(data.class_schedule.iter().all(|s| faculty_ids.contains(&s.faculty_id.as_str())));
        assert!(data.subjects.iter().all(|s| faculty_ids.contains(&s.faculty_id.as_str())));
    }

    #[test]
    fn fixture_json_reloads_identically() {
        let data = Dataset::builtin().unwrap();
        let json = data.to_json_pretty().unwrap();
        assert!(json.contains("\"studentId\": \"1\""));
        assert!(json.contains("\"startTime\": \"09:00\""));

        let path = std::env::temp_dir().join(format!("college-erp-fixture-{}.json", std::process::id()));
        std::fs::write(&path, &json).unwrap();
        let reloaded = Dataset::from_json_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(reloaded.notices[0].expiry_date, data.notices[0].expiry_date);
        assert_eq!(reloaded.fee_records[2].status, FeeStatus::Overdue);
    }

    #[test]
    fn missing_fixture_file_reports_path() {
        let err = Dataset::from_json_path(Path::new("/nonexistent/fixtures.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fixtures.json"));
    }
}
