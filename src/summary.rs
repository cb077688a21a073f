use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    AttendanceRecord, AttendanceStatus, ExamResult, FeeRecord, FeeStatus, Student,
};
use crate::queries;
use crate::seed::Dataset;

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub total_fees: u64,
    pub paid_fees: u64,
    pub pending_fees: u64,
    pub overdue_fees: u64,
    pub collection_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSummary {
    pub total_records: usize,
    pub present_records: usize,
    pub absent_records: usize,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcademicPerformance {
    pub total_results: usize,
    pub avg_marks: f64,
    pub grade_distribution: BTreeMap<String, usize>,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentStanding {
    pub name: String,
    pub code: String,
    pub student_count: usize,
    pub faculty_count: usize,
    pub avg_performance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStats {
    pub total_students: usize,
    pub paid_records: usize,
    pub pending_records: usize,
    pub overdue_records: usize,
    pub financial: FinancialSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadLevel {
    High,
    Medium,
    Low,
}

impl WorkloadLevel {
    pub fn label(self) -> &'static str {
        match self {
            WorkloadLevel::High => "high",
            WorkloadLevel::Medium => "medium",
            WorkloadLevel::Low => "low",
        }
    }
}

/// Students counted on a single day. One student can land in both counts
/// when marked present in one class and absent in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyTally {
    pub present: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceBand {
    Excellent,
    Good,
    NeedsAttention,
}

impl PerformanceBand {
    pub fn label(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::Good => "Good",
            PerformanceBand::NeedsAttention => "Needs Attention",
        }
    }
}

/// `part / total * 100`, or 0 when there is nothing to divide by.
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

fn fee_total(records: &[FeeRecord], status: Option<FeeStatus>) -> u64 {
    records
        .iter()
        .filter(|record| status.map_or(true, |wanted| record.status == wanted))
        .map(|record| record.amount)
        .sum()
}

pub fn financial_summary(data: &Dataset) -> FinancialSummary {
    let total_fees = fee_total(&data.fee_records, None);
    let paid_fees = fee_total(&data.fee_records, Some(FeeStatus::Paid));

    FinancialSummary {
        total_fees,
        paid_fees,
        pending_fees: fee_total(&data.fee_records, Some(FeeStatus::Pending)),
        overdue_fees: fee_total(&data.fee_records, Some(FeeStatus::Overdue)),
        collection_rate: percentage(paid_fees as f64, total_fees as f64),
    }
}

pub fn attendance_summary<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        total_records: 0,
        present_records: 0,
        absent_records: 0,
        attendance_rate: 0.0,
    };

    for record in records {
        summary.total_records += 1;
        match record.status {
            AttendanceStatus::Present => summary.present_records += 1,
            AttendanceStatus::Absent => summary.absent_records += 1,
            AttendanceStatus::Late => {}
        }
    }

    summary.attendance_rate = percentage(
        summary.present_records as f64,
        summary.total_records as f64,
    );
    summary
}

pub fn daily_attendance(data: &Dataset, students: &[&Student], date: NaiveDate) -> DailyTally {
    let mut tally = DailyTally::default();
    for student in students {
        let marks: Vec<&AttendanceRecord> =
            queries::records_for_owner(&data.attendance_records, &student.id)
                .into_iter()
                .filter(|record| record.date == date)
                .collect();
        if marks.iter().any(|record| record.status == AttendanceStatus::Present) {
            tally.present += 1;
        }
        if marks.iter().any(|record| record.status == AttendanceStatus::Absent) {
            tally.absent += 1;
        }
    }
    tally
}

pub fn academic_performance<'a>(
    results: impl IntoIterator<Item = &'a ExamResult>,
) -> AcademicPerformance {
    let mut total_results = 0usize;
    let mut percentage_sum = 0.0;
    let mut passed = 0usize;
    let mut grade_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for result in results {
        total_results += 1;
        percentage_sum += result.percentage;
        if result.grade != "F" {
            passed += 1;
        }
        *grade_distribution.entry(result.grade.clone()).or_insert(0) += 1;
    }

    AcademicPerformance {
        total_results,
        avg_marks: if total_results == 0 {
            0.0
        } else {
            percentage_sum / total_results as f64
        },
        grade_distribution,
        pass_rate: percentage(passed as f64, total_results as f64),
    }
}

pub fn department_comparison(data: &Dataset) -> Vec<DepartmentStanding> {
    data.departments
        .iter()
        .map(|dept| {
            let students = queries::department_students(data, &dept.id);
            let faculty = queries::department_faculty(data, &dept.id);
            let results = data.exam_results.iter().filter(|result| {
                students
                    .iter()
                    .any(|student| student.id == result.student_id)
            });

            DepartmentStanding {
                name: dept.name.clone(),
                code: dept.code.clone(),
                student_count: students.len(),
                faculty_count: faculty.len(),
                avg_performance: academic_performance(results).avg_marks,
            }
        })
        .collect()
}

/// Mean exam percentage of the students in the faculty member's department.
pub fn faculty_performance(data: &Dataset, faculty_id: &str) -> f64 {
    let Some(faculty) = queries::by_id(&data.faculty, faculty_id) else {
        return 0.0;
    };
    let results = data.exam_results.iter().filter(|result| {
        queries::by_id(&data.students, &result.student_id)
            .map_or(false, |student| student.department == faculty.department)
    });
    academic_performance(results).avg_marks
}

pub fn performance_band(avg_performance: f64) -> PerformanceBand {
    if avg_performance >= 85.0 {
        PerformanceBand::Excellent
    } else if avg_performance >= 70.0 {
        PerformanceBand::Good
    } else {
        PerformanceBand::NeedsAttention
    }
}

pub fn workload_level(data: &Dataset, faculty_id: &str) -> WorkloadLevel {
    let credits: u32 = queries::records_for_owner(&data.subjects, faculty_id)
        .iter()
        .map(|subject| subject.credits)
        .sum();

    match credits {
        20..=u32::MAX => WorkloadLevel::High,
        15..=19 => WorkloadLevel::Medium,
        _ => WorkloadLevel::Low,
    }
}

pub fn payment_stats(data: &Dataset) -> PaymentStats {
    let count = |status: FeeStatus| {
        data.fee_records
            .iter()
            .filter(|record| record.status == status)
            .count()
    };

    PaymentStats {
        total_students: data.students.len(),
        paid_records: count(FeeStatus::Paid),
        pending_records: count(FeeStatus::Pending),
        overdue_records: count(FeeStatus::Overdue),
        financial: financial_summary(data),
    }
}

/// Paid records, most recent payment first.
pub fn recent_payments(data: &Dataset, limit: usize) -> Vec<&FeeRecord> {
    let mut paid: Vec<&FeeRecord> = data
        .fee_records
        .iter()
        .filter(|record| record.status == FeeStatus::Paid)
        .collect();
    paid.sort_by(|a, b| b.paid_date.cmp(&a.paid_date));
    paid.truncate(limit);
    paid
}

/// Pending and overdue records, earliest due date first.
pub fn outstanding_payments(data: &Dataset, limit: usize) -> Vec<&FeeRecord> {
    let mut outstanding: Vec<&FeeRecord> = data
        .fee_records
        .iter()
        .filter(|record| record.status != FeeStatus::Paid)
        .collect();
    outstanding.sort_by_key(|record| record.due_date);
    outstanding.truncate(limit);
    outstanding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn financial_summary_partitions_total() {
        let data = Dataset::builtin().unwrap();
        let summary = financial_summary(&data);
        assert_eq!(summary.total_fees, 103_000);
        assert_eq!(summary.paid_fees, 90_000);
        assert_eq!(summary.pending_fees, 12_500);
        assert_eq!(summary.overdue_fees, 500);
        assert_eq!(
            summary.paid_fees + summary.pending_fees + summary.overdue_fees,
            summary.total_fees
        );
        let expected = 90_000.0 / 103_000.0 * 100.0;
        assert!((summary.collection_rate - expected).abs() < 0.001);
    }

    #[test]
    fn attendance_summary_counts_by_status() {
        let data = Dataset::builtin().unwrap();
        let summary = attendance_summary(&data.attendance_records);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.present_records, 3);
        assert_eq!(summary.absent_records, 1);
        assert!((summary.attendance_rate - 75.0).abs() < 0.001);
    }

    #[test]
    fn grade_distribution_sums_to_total() {
        let data = Dataset::builtin().unwrap();
        let performance = academic_performance(&data.exam_results);
        assert_eq!(performance.total_results, 3);
        assert_eq!(
            performance.grade_distribution.values().sum::<usize>(),
            performance.total_results
        );
        assert_eq!(performance.grade_distribution.get("A+"), Some(&2));
        assert!((performance.avg_marks - 85.0).abs() < 0.001);
        assert_eq!(performance.pass_rate, 100.0);
    }

    #[test]
    fn empty_inputs_yield_zero_rates() {
        let empty = Dataset::default();
        assert_eq!(financial_summary(&empty).collection_rate, 0.0);
        assert_eq!(attendance_summary(&empty.attendance_records).attendance_rate, 0.0);
        let performance = academic_performance(&empty.exam_results);
        assert_eq!(performance.avg_marks, 0.0);
        assert_eq!(performance.pass_rate, 0.0);
    }

    #[test]
    fn failing_grades_lower_pass_rate() {
        let data = Dataset::builtin().unwrap();
        let mut results = data.exam_results.clone();
        results[0].grade = "F".to_string();
        let performance = academic_performance(&results);
        assert!((performance.pass_rate - 200.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn department_comparison_averages_member_results() {
        let data = Dataset::builtin().unwrap();
        let standings = department_comparison(&data);
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].student_count, 2);
        assert_eq!(standings[0].faculty_count, 2);
        assert!((standings[0].avg_performance - 85.0).abs() < 0.001);
        assert_eq!(standings[1].avg_performance, 0.0);
    }

    #[test]
    fn daily_attendance_counts_any_mark_of_the_day() {
        let data = Dataset::builtin().unwrap();
        let cs = queries::department_students(&data, "1");
        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            daily_attendance(&data, &cs, day),
            DailyTally { present: 2, absent: 1 }
        );

        let next_day = day.succ_opt().unwrap();
        assert_eq!(daily_attendance(&data, &cs, next_day), DailyTally::default());
    }

    #[test]
    fn faculty_performance_follows_department_results() {
        let data = Dataset::builtin().unwrap();
        assert!((faculty_performance(&data, "1") - 85.0).abs() < 0.001);
        assert!((faculty_performance(&data, "2") - 85.0).abs() < 0.001);
        assert_eq!(faculty_performance(&data, "3"), 0.0);
        assert_eq!(faculty_performance(&data, "missing"), 0.0);
    }

    #[test]
    fn performance_bands_split_at_85_and_70() {
        assert_eq!(performance_band(92.0), PerformanceBand::Excellent);
        assert_eq!(performance_band(85.0), PerformanceBand::Excellent);
        assert_eq!(performance_band(84.9), PerformanceBand::Good);
        assert_eq!(performance_band(70.0), PerformanceBand::Good);
        assert_eq!(performance_band(0.0).label(), "Needs Attention");
    }

    #[test]
    fn workload_follows_credit_tiers() {
        let data = Dataset::builtin().unwrap();
        assert_eq!(workload_level(&data, "1"), WorkloadLevel::Low);

        let mut heavy = data.clone();
        for subject in heavy.subjects.iter_mut() {
            subject.faculty_id = "1".to_string();
            subject.credits = 5;
        }
        assert_eq!(workload_level(&heavy, "1"), WorkloadLevel::High);

        heavy.subjects[0].credits = 1;
        assert_eq!(workload_level(&heavy, "1"), WorkloadLevel::Medium);
    }

    #[test]
    fn payments_are_ordered_for_the_ledger() {
        let data = Dataset::builtin().unwrap();
        let recent = recent_payments(&data, 5);
        let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);

        let outstanding = outstanding_payments(&data, 10);
        let ids: Vec<&str> = outstanding.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);

        let stats = payment_stats(&data);
        assert_eq!(stats.paid_records, 2);
        assert_eq!(stats.overdue_records, 1);
    }
}
