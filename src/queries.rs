use chrono::NaiveDate;

use crate::models::{
    AttendanceRecord, AttendanceStatus, Audience, ClassSchedule, Department, ExamResult, Faculty,
    FeeRecord, FeeStatus, LeaveApplication, Notice, ReviewStatus, Student, StudentRegistration,
    Subject,
};
use crate::seed::Dataset;

/// A record with an opaque string identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A record that belongs to another record through a foreign key.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

macro_rules! keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.id
            }
        })*
    };
}

keyed!(
    Student,
    Faculty,
    FeeRecord,
    AttendanceRecord,
    Notice,
    Subject,
    ClassSchedule,
    LeaveApplication,
    ExamResult,
    Department,
    StudentRegistration,
);

impl Owned for FeeRecord {
    fn owner_id(&self) -> &str {
        &self.student_id
    }
}

impl Owned for AttendanceRecord {
    fn owner_id(&self) -> &str {
        &self.student_id
    }
}

impl Owned for ExamResult {
    fn owner_id(&self) -> &str {
        &self.student_id
    }
}

impl Owned for ClassSchedule {
    fn owner_id(&self) -> &str {
        &self.faculty_id
    }
}

impl Owned for Subject {
    fn owner_id(&self) -> &str {
        &self.faculty_id
    }
}

impl Owned for LeaveApplication {
    fn owner_id(&self) -> &str {
        &self.applicant_id
    }
}

pub fn by_id<'a, T: Keyed>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|record| record.key() == id)
}

pub fn records_for_owner<'a, T: Owned>(records: &'a [T], owner_id: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| record.owner_id() == owner_id)
        .collect()
}

/// Notices addressed to `audience` that have not expired as of `now`.
/// A notice expires at the start of its expiry date.
pub fn notices_for_audience(data: &Dataset, audience: Audience, now: NaiveDate) -> Vec<&Notice> {
    data.notices
        .iter()
        .filter(|notice| notice.target_audience.contains(&audience))
        .filter(|notice| notice.expiry_date.map_or(true, |expiry| expiry > now))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Students,
    Faculty,
}

#[derive(Debug)]
pub enum DepartmentMembers<'a> {
    Students(Vec<&'a Student>),
    Faculty(Vec<&'a Faculty>),
}

/// Members are matched on the department's name, not its id.
pub fn department_members<'a>(
    data: &'a Dataset,
    department_id: &str,
    kind: MemberKind,
) -> DepartmentMembers<'a> {
    let department = by_id(&data.departments, department_id);
    match kind {
        MemberKind::Students => DepartmentMembers::Students(
            department
                .map(|dept| {
                    data.students
                        .iter()
                        .filter(|student| student.department == dept.name)
                        .collect()
                })
                .unwrap_or_default(),
        ),
        MemberKind::Faculty => DepartmentMembers::Faculty(
            department
                .map(|dept| {
                    data.faculty
                        .iter()
                        .filter(|faculty| faculty.department == dept.name)
                        .collect()
                })
                .unwrap_or_default(),
        ),
    }
}

pub fn department_students<'a>(data: &'a Dataset, department_id: &str) -> Vec<&'a Student> {
    match department_members(data, department_id, MemberKind::Students) {
        DepartmentMembers::Students(students) => students,
        DepartmentMembers::Faculty(_) => Vec::new(),
    }
}

pub fn department_faculty<'a>(data: &'a Dataset, department_id: &str) -> Vec<&'a Faculty> {
    match department_members(data, department_id, MemberKind::Faculty) {
        DepartmentMembers::Faculty(faculty) => faculty,
        DepartmentMembers::Students(_) => Vec::new(),
    }
}

pub fn pending_leave_applications(data: &Dataset) -> Vec<&LeaveApplication> {
    data.leave_applications
        .iter()
        .filter(|application| application.status == ReviewStatus::Pending)
        .collect()
}

pub fn all_registrations(data: &Dataset) -> &[StudentRegistration] {
    &data.registrations
}

pub fn pending_registrations(data: &Dataset) -> Vec<&StudentRegistration> {
    data.registrations
        .iter()
        .filter(|registration| registration.status == ReviewStatus::Pending)
        .collect()
}

pub fn registration_by_id<'a>(data: &'a Dataset, id: &str) -> Option<&'a StudentRegistration> {
    by_id(&data.registrations, id)
}

/// Overdue wins over pending, pending over paid. A student with no fee
/// records counts as paid.
pub fn student_fee_status(data: &Dataset, student_id: &str) -> FeeStatus {
    let records = records_for_owner(&data.fee_records, student_id);
    if records.iter().any(|record| record.status == FeeStatus::Overdue) {
        FeeStatus::Overdue
    } else if records.iter().any(|record| record.status == FeeStatus::Pending) {
        FeeStatus::Pending
    } else {
        FeeStatus::Paid
    }
}

pub fn faculty_schedule<'a>(data: &'a Dataset, faculty_id: &str) -> Vec<&'a ClassSchedule> {
    records_for_owner(&data.class_schedule, faculty_id)
}

pub fn schedule_for_day<'a>(
    data: &'a Dataset,
    faculty_id: &str,
    day_of_week: u8,
) -> Vec<&'a ClassSchedule> {
    let mut slots: Vec<&ClassSchedule> = faculty_schedule(data, faculty_id)
        .into_iter()
        .filter(|slot| slot.day_of_week == day_of_week)
        .collect();
    slots.sort_by_key(|slot| slot.start_time);
    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyAttendance {
    Marked(AttendanceStatus),
    NotMarked,
}

/// The first attendance mark a student received on `date`.
pub fn attendance_on(data: &Dataset, student_id: &str, date: NaiveDate) -> DailyAttendance {
    records_for_owner(&data.attendance_records, student_id)
        .into_iter()
        .find(|record| record.date == date)
        .map_or(DailyAttendance::NotMarked, |record| {
            DailyAttendance::Marked(record.status)
        })
}

/// Students who have at least one exam result in `subject_id`.
pub fn students_with_result_in<'a>(
    data: &Dataset,
    students: &[&'a Student],
    subject_id: &str,
) -> Vec<&'a Student> {
    students
        .iter()
        .copied()
        .filter(|student| {
            records_for_owner(&data.exam_results, &student.id)
                .iter()
                .any(|result| result.subject_id == subject_id)
        })
        .collect()
}

pub fn search_students<'a>(students: &[&'a Student], query: &str) -> Vec<&'a Student> {
    let needle = query.to_lowercase();
    students
        .iter()
        .copied()
        .filter(|student| {
            student.name.to_lowercase().contains(&needle)
                || student.roll_number.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn by_id_returns_first_match_or_none() {
        let data = Dataset::builtin().unwrap();
        assert_eq!(by_id(&data.students, "2").map(|s| s.name.as_str()), Some("Jane Smith"));
        assert!(by_id(&data.faculty, "99").is_none());
    }

    #[test]
    fn owner_filter_keeps_source_order() {
        let data = Dataset::builtin().unwrap();
        let fees = records_for_owner(&data.fee_records, "1");
        let ids: Vec<&str> = fees.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        for student in &data.students {
            let expected: Vec<&FeeRecord> = data
                .fee_records
                .iter()
                .filter(|r| r.student_id == student.id)
                .collect();
            let actual = records_for_owner(&data.fee_records, &student.id);
            assert_eq!(actual.len(), expected.len());
            assert!(actual.iter().zip(&expected).all(|(a, b)| a.id == b.id));
        }

        assert!(records_for_owner(&data.fee_records, "missing").is_empty());
    }

    #[test]
    fn student_notices_respect_expiry() {
        let data = Dataset::builtin().unwrap();
        let before = notices_for_audience(&data, Audience::Students, date(2025, 1, 16));
        assert!(before.iter().any(|n| n.id == "1"));
        assert_eq!(before.len(), 3);

        let after = notices_for_audience(&data, Audience::Students, date(2025, 2, 16));
        assert!(after.iter().all(|n| n.id != "1"));
        assert_eq!(after.len(), 2);

        let on_expiry = notices_for_audience(&data, Audience::Students, date(2025, 2, 15));
        assert!(on_expiry.iter().all(|n| n.id != "1"));
    }

    #[test]
    fn notices_filter_by_audience() {
        let data = Dataset::builtin().unwrap();
        let hod = notices_for_audience(&data, Audience::Hod, date(2025, 1, 16));
        assert_eq!(hod.len(), 1);
        assert_eq!(hod[0].id, "4");
        assert!(notices_for_audience(&data, Audience::Director, date(2025, 1, 16)).is_empty());
    }

    #[test]
    fn department_join_uses_name() {
        let data = Dataset::builtin().unwrap();
        let students = department_students(&data, "1");
        assert_eq!(students.len(), 2);
        let faculty = department_faculty(&data, "2");
        assert_eq!(faculty.len(), 1);
        assert_eq!(faculty[0].name, "Dr. Emily Davis");
        assert!(matches!(
            department_members(&data, "9", MemberKind::Students),
            DepartmentMembers::Students(students) if students.is_empty()
        ));
    }

    #[test]
    fn overdue_takes_precedence_in_fee_status() {
        let data = Dataset::builtin().unwrap();
        assert_eq!(student_fee_status(&data, "1"), FeeStatus::Overdue);
        assert_eq!(student_fee_status(&data, "2"), FeeStatus::Paid);
        assert_eq!(student_fee_status(&data, "3"), FeeStatus::Paid);
    }

    #[test]
    fn only_pending_leaves_and_registrations_are_listed() {
        let data = Dataset::builtin().unwrap();
        let leaves = pending_leave_applications(&data);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].id, "2");

        assert_eq!(all_registrations(&data).len(), 2);
        let pending = pending_registrations(&data);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "REG-1");
        assert!(registration_by_id(&data, "REG-2").is_some());
        assert!(registration_by_id(&data, "REG-3").is_none());
    }

    #[test]
    fn schedule_is_grouped_by_day() {
        let data = Dataset::builtin().unwrap();
        assert_eq!(faculty_schedule(&data, "1").len(), 3);
        let monday = schedule_for_day(&data, "1", 1);
        let rooms: Vec<&str> = monday.iter().map(|s| s.room.as_str()).collect();
        assert_eq!(rooms, vec!["CS101", "CS102"]);
        assert!(schedule_for_day(&data, "2", 1).is_empty());
    }

    #[test]
    fn attendance_on_reports_first_mark() {
        let data = Dataset::builtin().unwrap();
        assert_eq!(
            attendance_on(&data, "1", date(2025, 1, 15)),
            DailyAttendance::Marked(AttendanceStatus::Present)
        );
        assert_eq!(attendance_on(&data, "3", date(2025, 1, 15)), DailyAttendance::NotMarked);
    }

    #[test]
    fn search_matches_name_or_roll_number() {
        let data = Dataset::builtin().unwrap();
        let all: Vec<&Student> = data.students.iter().collect();
        assert_eq!(search_students(&all, "jane").len(), 1);
        assert_eq!(search_students(&all, "me2023").len(), 1);
        assert_eq!(search_students(&all, "CS2023").len(), 2);
    }

    #[test]
    fn subject_filter_keeps_students_with_results() {
        let data = Dataset::builtin().unwrap();
        let all: Vec<&Student> = data.students.iter().collect();
        let names = |students: Vec<&Student>| -> Vec<String> {
            students.iter().map(|s| s.name.clone()).collect()
        };
        assert_eq!(
            names(students_with_result_in(&data, &all, "1")),
            vec!["John Doe", "Jane Smith"]
        );
        assert_eq!(names(students_with_result_in(&data, &all, "2")), vec!["John Doe"]);
        assert!(students_with_result_in(&data, &all, "4").is_empty());
    }
}
