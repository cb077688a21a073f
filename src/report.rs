use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use crate::models::{day_name, Audience, Role, Student};
use crate::queries::{self, DailyAttendance};
use crate::seed::Dataset;
use crate::summary;

#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub role: Role,
    /// Student or faculty id for the personal dashboards.
    pub member_id: String,
    /// Department for the hod dashboard and the accountant and registrar
    /// rosters. `None` lists every department.
    pub department_id: Option<String>,
    /// Subject filter for the faculty roster.
    pub subject_id: Option<String>,
    pub today: NaiveDate,
    pub search: Option<String>,
}

/// Department the hod dashboard opens on when none is chosen.
const DEFAULT_HOD_DEPARTMENT: &str = "1";

pub fn build_dashboard(data: &Dataset, request: &DashboardRequest) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {} Dashboard", request.role.title());
    let _ = writeln!(output, "As of {}", request.today);
    let _ = writeln!(output);

    match request.role {
        Role::Student => student_dashboard(&mut output, data, request),
        Role::Faculty => faculty_dashboard(&mut output, data, request),
        Role::Hod => hod_dashboard(&mut output, data, request),
        Role::Dean => dean_dashboard(&mut output, data),
        Role::Accountant => accountant_dashboard(&mut output, data, request),
        Role::Registrar => registrar_dashboard(&mut output, data, request),
        Role::Director => director_dashboard(&mut output, data),
    }

    notices_section(&mut output, data, request.role.audience(), request.today);
    output
}

fn student_dashboard(output: &mut String, data: &Dataset, request: &DashboardRequest) {
    let Some(student) = queries::by_id(&data.students, &request.member_id) else {
        let _ = writeln!(output, "No student with id {}.", request.member_id);
        return;
    };

    let _ = writeln!(output, "## Profile");
    let _ = writeln!(
        output,
        "- {} ({}), {} semester {}",
        student.name, student.roll_number, student.department, student.semester
    );
    let _ = writeln!(
        output,
        "- CGPA {:.1}, attendance {:.0}%",
        student.cgpa, student.attendance_percentage
    );

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Fees ({})",
        queries::student_fee_status(data, &student.id)
    );
    let fees = queries::records_for_owner(&data.fee_records, &student.id);
    if fees.is_empty() {
        let _ = writeln!(output, "No fee records.");
    }
    for fee in fees {
        let _ = writeln!(
            output,
            "- {} ₹{} due {}: {}",
            fee.fee_type, fee.amount, fee.due_date, fee.status
        );
    }

    let records = queries::records_for_owner(&data.attendance_records, &student.id);
    let attendance = summary::attendance_summary(records.iter().copied());
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Attendance ({:.1}% of {} classes)",
        attendance.attendance_rate, attendance.total_records
    );
    for record in records {
        let _ = writeln!(
            output,
            "- {} {}: {}",
            record.date, record.subject, record.status
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Exam Results");
    let results = queries::records_for_owner(&data.exam_results, &student.id);
    if results.is_empty() {
        let _ = writeln!(output, "No results published.");
    }
    for result in results {
        let subject = queries::by_id(&data.subjects, &result.subject_id)
            .map(|subject| subject.name.as_str())
            .unwrap_or("Unknown subject");
        let _ = writeln!(
            output,
            "- {} {}: {}/{} ({})",
            subject, result.exam_type, result.marks, result.max_marks, result.grade
        );
    }
}

fn faculty_dashboard(output: &mut String, data: &Dataset, request: &DashboardRequest) {
    let Some(faculty) = queries::by_id(&data.faculty, &request.member_id) else {
        let _ = writeln!(output, "No faculty member with id {}.", request.member_id);
        return;
    };

    let _ = writeln!(output, "## Profile");
    let _ = writeln!(
        output,
        "- {} ({}), {} in {}",
        faculty.name, faculty.employee_id, faculty.designation, faculty.department
    );
    let _ = writeln!(output, "- Teaches {}", faculty.subjects.join(", "));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Schedule");
    let schedule = queries::faculty_schedule(data, &faculty.id);
    if schedule.is_empty() {
        let _ = writeln!(output, "No classes scheduled.");
    }
    for slot in schedule {
        let subject = queries::by_id(&data.subjects, &slot.subject_id)
            .map(|subject| subject.name.as_str())
            .unwrap_or("Unknown subject");
        let _ = writeln!(
            output,
            "- {} {}-{} {} in {}",
            day_name(slot.day_of_week),
            slot.start_time.format("%H:%M"),
            slot.end_time.format("%H:%M"),
            subject,
            slot.room
        );
    }

    let weekday = request.today.weekday().num_days_from_sunday() as u8;
    let today = queries::schedule_for_day(data, &faculty.id, weekday);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Today ({})", day_name(weekday));
    let _ = writeln!(output, "{} classes today.", today.len());

    let students: Vec<&Student> = data
        .students
        .iter()
        .filter(|student| student.department == faculty.department)
        .collect();
    let shown = match (request.search.as_deref(), request.subject_id.as_deref()) {
        (Some(query), _) => queries::search_students(&students, query),
        (None, Some(subject_id)) => queries::students_with_result_in(data, &students, subject_id),
        (None, None) => students.clone(),
    };

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");
    if shown.is_empty() {
        let _ = writeln!(output, "No students match.");
    }
    for student in shown {
        let label = match queries::attendance_on(data, &student.id, request.today) {
            DailyAttendance::Marked(status) => status.to_string(),
            DailyAttendance::NotMarked => "not marked".to_string(),
        };
        let _ = writeln!(output, "- {} ({}): {}", student.name, student.roll_number, label);
    }

    let tally = summary::daily_attendance(data, &students, request.today);
    let _ = writeln!(
        output,
        "{} of {} present, {} absent.",
        tally.present,
        students.len(),
        tally.absent
    );
}

fn hod_dashboard(output: &mut String, data: &Dataset, request: &DashboardRequest) {
    let department_id = request
        .department_id
        .as_deref()
        .unwrap_or(DEFAULT_HOD_DEPARTMENT);
    let Some(department) = queries::by_id(&data.departments, department_id) else {
        let _ = writeln!(output, "No department with id {}.", department_id);
        return;
    };

    let faculty = queries::department_faculty(data, &department.id);
    let students = queries::department_students(data, &department.id);
    let subject_count = data
        .subjects
        .iter()
        .filter(|subject| subject.department == department.name)
        .count();

    let _ = writeln!(output, "## {} ({})", department.name, department.code);
    let _ = writeln!(
        output,
        "{} students, {} faculty, {} subjects",
        students.len(),
        faculty.len(),
        subject_count
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Faculty Workload");
    for member in faculty {
        let _ = writeln!(
            output,
            "- {} ({}): {} workload",
            member.name,
            member.designation,
            summary::workload_level(data, &member.id).label()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");
    for student in students {
        let _ = writeln!(
            output,
            "- {} ({}) CGPA {:.1}",
            student.name, student.roll_number, student.cgpa
        );
    }

    leave_section(output, data);
}

fn dean_dashboard(output: &mut String, data: &Dataset) {
    college_stats(output, data);
    comparison_section(output, data);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Faculty Performance");
    for member in &data.faculty {
        let performance = summary::faculty_performance(data, &member.id);
        let _ = writeln!(
            output,
            "- {} ({}): {:.1}% ({})",
            member.name,
            member.department,
            performance,
            summary::performance_band(performance).label()
        );
    }
}

fn accountant_dashboard(output: &mut String, data: &Dataset, request: &DashboardRequest) {
    let stats = summary::payment_stats(data);
    let _ = writeln!(output, "## Collection");
    let _ = writeln!(output, "- {} students on the rolls", stats.total_students);
    let _ = writeln!(
        output,
        "- Collected ₹{} of ₹{} ({:.1}%)",
        stats.financial.paid_fees, stats.financial.total_fees, stats.financial.collection_rate
    );
    let _ = writeln!(
        output,
        "- Pending ₹{} across {} records",
        stats.financial.pending_fees, stats.pending_records
    );
    let _ = writeln!(
        output,
        "- Overdue ₹{} across {} records",
        stats.financial.overdue_fees, stats.overdue_records
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Payments");
    for fee in summary::recent_payments(data, 5) {
        let _ = writeln!(
            output,
            "- {} {} ₹{} on {}",
            student_name(data, &fee.student_id),
            fee.fee_type,
            fee.amount,
            fee.paid_date
                .map(|date| date.to_string())
                .unwrap_or_default()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Outstanding Payments");
    for fee in summary::outstanding_payments(data, 10) {
        let _ = writeln!(
            output,
            "- {} {} ₹{} due {} ({})",
            student_name(data, &fee.student_id),
            fee.fee_type,
            fee.amount,
            fee.due_date,
            fee.status
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Fee Status");
    for student in roster(data, request) {
        let total: u64 = queries::records_for_owner(&data.fee_records, &student.id)
            .iter()
            .map(|fee| fee.amount)
            .sum();
        let _ = writeln!(
            output,
            "- {} ({}): {} (₹{} billed)",
            student.name,
            student.roll_number,
            queries::student_fee_status(data, &student.id),
            total
        );
    }
}

fn registrar_dashboard(output: &mut String, data: &Dataset, request: &DashboardRequest) {
    let _ = writeln!(output, "## Pending Registrations");
    let pending = queries::pending_registrations(data);
    if pending.is_empty() {
        let _ = writeln!(output, "No registrations awaiting review.");
    }
    for registration in pending {
        let _ = writeln!(
            output,
            "- {} {} for {} {} (submitted {})",
            registration.id,
            registration.personal_info.full_name,
            registration.course_details.course_name,
            registration.course_details.branch,
            registration.submitted_date
        );
    }

    leave_section(output, data);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Roster");
    for student in roster(data, request) {
        let _ = writeln!(
            output,
            "- {} {} ({}, semester {})",
            student.roll_number, student.name, student.department, student.semester
        );
    }
}

fn director_dashboard(output: &mut String, data: &Dataset) {
    college_stats(output, data);

    let attendance = summary::attendance_summary(&data.attendance_records);
    let academic = summary::academic_performance(&data.exam_results);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance");
    let _ = writeln!(
        output,
        "- {} present, {} absent of {} records ({:.1}%)",
        attendance.present_records,
        attendance.absent_records,
        attendance.total_records,
        attendance.attendance_rate
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Distribution");
    let _ = writeln!(output, "- Average marks {:.1}%", academic.avg_marks);
    for (grade, count) in &academic.grade_distribution {
        let _ = writeln!(output, "- {}: {}", grade, count);
    }

    comparison_section(output, data);
}

fn college_stats(output: &mut String, data: &Dataset) {
    let academic = summary::academic_performance(&data.exam_results);
    let financial = summary::financial_summary(data);
    let _ = writeln!(output, "## College Overview");
    let _ = writeln!(
        output,
        "- {} students, {} faculty, {} departments",
        data.students.len(),
        data.faculty.len(),
        data.departments.len()
    );
    let _ = writeln!(output, "- Pass rate {:.1}%", academic.pass_rate);
    let _ = writeln!(
        output,
        "- Revenue ₹{} collected ({:.1}% of billed)",
        financial.paid_fees, financial.collection_rate
    );
    let _ = writeln!(
        output,
        "- {} leave applications pending approval",
        queries::pending_leave_applications(data).len()
    );
}

fn comparison_section(output: &mut String, data: &Dataset) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Department Comparison");
    for standing in summary::department_comparison(data) {
        let _ = writeln!(
            output,
            "- {} ({}): {} students, {} faculty, avg performance {:.1}% ({})",
            standing.name,
            standing.code,
            standing.student_count,
            standing.faculty_count,
            standing.avg_performance,
            summary::performance_band(standing.avg_performance).label()
        );
    }
}

fn leave_section(output: &mut String, data: &Dataset) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Pending Leave Applications");
    let pending = queries::pending_leave_applications(data);
    if pending.is_empty() {
        let _ = writeln!(output, "No leave applications awaiting review.");
    }
    for leave in pending {
        let _ = writeln!(
            output,
            "- {} {} ({}) {} to {}: {}",
            leave.applicant_type,
            leave.applicant_id,
            leave.leave_type,
            leave.start_date,
            leave.end_date,
            leave.reason
        );
    }
}

fn notices_section(output: &mut String, data: &Dataset, audience: Audience, today: NaiveDate) {
    let notices = queries::notices_for_audience(data, audience, today);
    if notices.is_empty() {
        return;
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Notices");
    for notice in notices {
        let _ = writeln!(
            output,
            "- [{}] {} ({})",
            notice.priority, notice.title, notice.created_date
        );
    }
}

/// A search wins over the department filter.
fn roster<'a>(data: &'a Dataset, request: &DashboardRequest) -> Vec<&'a Student> {
    let all: Vec<&Student> = data.students.iter().collect();
    match (request.search.as_deref(), request.department_id.as_deref()) {
        (Some(query), _) => queries::search_students(&all, query),
        (None, Some(department_id)) => queries::department_students(data, department_id),
        (None, None) => all,
    }
}

fn student_name<'a>(data: &'a Dataset, student_id: &str) -> &'a str {
    queries::by_id(&data.students, student_id)
        .map(|student| student.name.as_str())
        .unwrap_or("Unknown student")
}
