use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{FeeStatus, FeeType};
use crate::queries;
use crate::seed::Dataset;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LedgerRow<'a> {
    id: &'a str,
    student_id: &'a str,
    student_name: &'a str,
    #[serde(rename = "type")]
    fee_type: FeeType,
    amount: u64,
    due_date: NaiveDate,
    status: FeeStatus,
    paid_date: Option<NaiveDate>,
    payment_method: Option<&'a str>,
}

/// Writes one CSV row per fee record and returns the number of rows.
pub fn write_fee_ledger<W: Write>(data: &Dataset, writer: W) -> anyhow::Result<usize> {
    let mut ledger = csv::Writer::from_writer(writer);
    let mut written = 0usize;

    for record in &data.fee_records {
        let student_name = queries::by_id(&data.students, &record.student_id)
            .map(|student| student.name.as_str())
            .unwrap_or_default();

        ledger.serialize(LedgerRow {
            id: &record.id,
            student_id: &record.student_id,
            student_name,
            fee_type: record.fee_type,
            amount: record.amount,
            due_date: record.due_date,
            status: record.status,
            paid_date: record.paid_date,
            payment_method: record.payment_method.as_deref(),
        })?;
        written += 1;
    }

    ledger.flush()?;
    Ok(written)
}
