use clap::Args;
use institute_admin::error::AppError;
use institute_admin::workflows::enquiries::{EnquiryDraft, EnquiryImporter, FeeLedger};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EnquiryCheckArgs {
    /// Enquiry CSV export to validate
    pub(crate) csv: PathBuf,
    /// Print the checked rows as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_enquiry_check(args: EnquiryCheckArgs) -> Result<(), AppError> {
    let drafts = EnquiryImporter::drafts_from_path(&args.csv)?;

    if args.json {
        let rows: Vec<Value> = drafts.iter().map(preview).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    println!("Enquiry export {}", args.csv.display());
    println!("{} row(s) valid", drafts.len());
    for draft in &drafts {
        let row = preview(draft);
        println!(
            "  {:<24} {:<16} {:<24} balance {}",
            row["name"].as_str().unwrap_or_default(),
            row["phone"].as_str().unwrap_or_default(),
            row["module"].as_str().unwrap_or("-"),
            row["balance_amount"]
        );
    }
    Ok(())
}

/// What the importer would store for a row, with the derived balance.
fn preview(draft: &EnquiryDraft) -> Value {
    let balance = FeeLedger::new(draft.fee_changes()).balance_amount();
    json!({
        "name": draft.name.as_deref().map(str::trim),
        "phone": draft.phone.as_deref().map(str::trim),
        "module": draft.module,
        "consent": draft.consent,
        "balance_amount": balance,
    })
}
