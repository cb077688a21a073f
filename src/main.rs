use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::info;

mod error;
mod export;
mod models;
mod queries;
mod registration;
mod report;
mod seed;
mod summary;

use models::{Audience, Role};
use seed::Dataset;

#[derive(Parser)]
#[command(name = "college-erp")]
#[command(about = "Role-based college administration dashboards over a mock dataset", long_about = None)]
struct Cli {
    /// JSON fixture file to use instead of the built-in seed data
    #[arg(long, global = true, env = "COLLEGE_ERP_FIXTURES")]
    fixtures: Option<PathBuf>,
    /// Date to evaluate notices and schedules against (defaults to today)
    #[arg(long, global = true, env = "COLLEGE_ERP_TODAY")]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard for a role
    Dashboard {
        #[arg(long, value_enum)]
        role: Role,
        /// Student or faculty id for the personal dashboards
        #[arg(long, default_value = "1")]
        id: String,
        /// Department id; the hod dashboard opens on department 1 without it
        #[arg(long)]
        department: Option<String>,
        /// Keep faculty roster students with a result in this subject id
        #[arg(long)]
        subject: Option<String>,
        /// Filter the student roster by name or roll number
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the college-wide financial, attendance and academic summaries
    Summary,
    /// List current notices for an audience
    Notices {
        #[arg(long, value_enum)]
        audience: Audience,
    },
    /// Show a student's fee records and resolved fee status
    Fees {
        #[arg(long)]
        student: String,
    },
    /// List leave applications awaiting approval
    Leaves,
    /// List student registrations
    #[command(group(
        ArgGroup::new("scope")
            .args(["pending", "id"])
            .multiple(false)
    ))]
    Registrations {
        #[arg(long)]
        pending: bool,
        #[arg(long)]
        id: Option<String>,
    },
    /// Walk the registration wizard with answers from a JSON file
    Register {
        #[arg(long)]
        answers: PathBuf,
    },
    /// Write the fee ledger as CSV
    ExportFees {
        #[arg(long, default_value = "fees.csv")]
        out: PathBuf,
    },
    /// Write the active dataset as a JSON fixture file
    DumpFixtures {
        #[arg(long, default_value = "fixtures.json")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dataset(fixtures: Option<&PathBuf>) -> anyhow::Result<Dataset> {
    match fixtures {
        Some(path) => {
            let data = Dataset::from_json_path(path)?;
            info!(path = %path.display(), "loaded fixtures");
            Ok(data)
        }
        None => Dataset::builtin(),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data = load_dataset(cli.fixtures.as_ref())?;
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());

    match cli.command {
        Commands::Dashboard {
            role,
            id,
            department,
            subject,
            search,
            out,
        } => {
            let request = report::DashboardRequest {
                role,
                member_id: id,
                department_id: department,
                subject_id: subject,
                today,
                search,
            };
            let dashboard = report::build_dashboard(&data, &request);
            match out {
                Some(path) => {
                    std::fs::write(&path, dashboard)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Dashboard written to {}.", path.display());
                }
                None => print!("{dashboard}"),
            }
        }
        Commands::Summary => {
            let financial = summary::financial_summary(&data);
            let attendance = summary::attendance_summary(&data.attendance_records);
            let academic = summary::academic_performance(&data.exam_results);

            println!(
                "Fees: ₹{} billed, ₹{} paid, ₹{} pending, ₹{} overdue ({:.2}% collected)",
                financial.total_fees,
                financial.paid_fees,
                financial.pending_fees,
                financial.overdue_fees,
                financial.collection_rate
            );
            println!(
                "Attendance: {} of {} records present, {} absent ({:.2}%)",
                attendance.present_records,
                attendance.total_records,
                attendance.absent_records,
                attendance.attendance_rate
            );
            println!(
                "Results: {} graded, average {:.2}%, pass rate {:.2}%",
                academic.total_results, academic.avg_marks, academic.pass_rate
            );
            for (grade, count) in &academic.grade_distribution {
                println!("- {grade}: {count}");
            }
        }
        Commands::Notices { audience } => {
            let notices = queries::notices_for_audience(&data, audience, today);
            if notices.is_empty() {
                println!("No current notices for {audience}.");
                return Ok(());
            }
            for notice in notices {
                println!(
                    "- [{}] {} ({}, {})",
                    notice.priority, notice.title, notice.category, notice.created_date
                );
            }
        }
        Commands::Fees { student } => {
            let Some(record) = queries::by_id(&data.students, &student) else {
                println!("No student with id {student}.");
                return Ok(());
            };
            println!(
                "{} ({}): {}",
                record.name,
                record.roll_number,
                queries::student_fee_status(&data, &record.id)
            );
            for fee in queries::records_for_owner(&data.fee_records, &record.id) {
                println!(
                    "- {} {} ₹{} due {}: {}",
                    fee.id, fee.fee_type, fee.amount, fee.due_date, fee.status
                );
            }
        }
        Commands::Leaves => {
            let pending = queries::pending_leave_applications(&data);
            if pending.is_empty() {
                println!("No leave applications pending.");
                return Ok(());
            }
            for leave in pending {
                println!(
                    "- {} {} {} ({}) {} to {}: {}",
                    leave.id,
                    leave.applicant_type,
                    leave.applicant_id,
                    leave.leave_type,
                    leave.start_date,
                    leave.end_date,
                    leave.reason
                );
            }
        }
        Commands::Registrations { pending, id } => {
            let selected: Vec<&models::StudentRegistration> = match (pending, id) {
                (_, Some(id)) => queries::registration_by_id(&data, &id).into_iter().collect(),
                (true, None) => queries::pending_registrations(&data),
                (false, None) => queries::all_registrations(&data).iter().collect(),
            };
            if selected.is_empty() {
                println!("No matching registrations.");
                return Ok(());
            }
            for registration in selected {
                println!(
                    "- {} [{}] {} <{}> for {} {}",
                    registration.id,
                    registration.status,
                    registration.personal_info.full_name,
                    registration.personal_info.email,
                    registration.course_details.course_name,
                    registration.course_details.branch
                );
            }
        }
        Commands::Register { answers } => {
            let raw = std::fs::read_to_string(&answers)
                .with_context(|| format!("failed to read {}", answers.display()))?;
            let parsed: registration::RegistrationAnswers = serde_json::from_str(&raw)
                .with_context(|| format!("invalid answers file {}", answers.display()))?;
            let confirmation = registration::complete(&parsed, Utc::now())?;

            println!("Registration submitted.");
            println!("Application ID: {}", confirmation.application_id);
            println!("Submitted On: {}", confirmation.submitted_on);
            println!("Updates will be sent to {}.", confirmation.email);
        }
        Commands::ExportFees { out } => {
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let written = export::write_fee_ledger(&data, file)?;
            println!("Wrote {written} fee records to {}.", out.display());
        }
        Commands::DumpFixtures { out } => {
            std::fs::write(&out, data.to_json_pretty()?)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Fixtures written to {}.", out.display());
        }
    }

    Ok(())
}
