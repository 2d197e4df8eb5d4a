use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use crate::infra::{
    parse_date, seed_candidates, seed_workers, InMemoryFilingRepository,
    InMemoryMedicalRepository, InMemoryOverseasRepository, SeededCandidateDirectory,
    SeededWorkerDirectory,
};
use laborlink::error::AppError;
use laborlink::tracking::directory::{CandidateId, WorkerId};
use laborlink::tracking::entry_filing::{EntryFilingService, EntryFilingUpdate, FilingView};
use laborlink::tracking::medical::{MedicalExceptionCreate, MedicalExceptionService};
use laborlink::tracking::overseas::{OverseasProgressService, OverseasProgressUpdate};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for deadline math (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Walk the three tracking workflows against seeded registries and print
/// what a case officer would see.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let workers = Arc::new(SeededWorkerDirectory::with(seed_workers()));
    let candidates = Arc::new(SeededCandidateDirectory::with(seed_candidates()));

    let filings = EntryFilingService::new(
        Arc::new(InMemoryFilingRepository::default()),
        workers.clone(),
    );
    let overseas = OverseasProgressService::new(
        Arc::new(InMemoryOverseasRepository::default()),
        candidates,
    );
    let medical = MedicalExceptionService::new(
        Arc::new(InMemoryMedicalRepository::default()),
        workers,
    );

    println!("=== Entry filings (evaluated {today}) ===");

    let diligent = EntryFilingUpdate {
        entry_date: Some((today - Duration::days(2)).to_string()),
        flight_no: Some("BR-225".to_string()),
        entry_report_ref_no: Some("EN-2024-0117".to_string()),
        initial_exam_date: Some((today - Duration::days(1)).to_string()),
        initial_exam_result: Some("PASS".to_string()),
        arc_receipt_no: Some("ARC-R-5513".to_string()),
        permit_receipt_no: Some("WP-R-2208".to_string()),
        ..EntryFilingUpdate::default()
    };
    let view = filings
        .upsert(&WorkerId("W-1001".to_string()), diligent, today)
        .map_err(AppError::tracking)?;
    print_filing(&view);

    let lapsed = EntryFilingUpdate {
        entry_date: Some((today - Duration::days(20)).to_string()),
        ..EntryFilingUpdate::default()
    };
    let view = filings
        .upsert(&WorkerId("W-1002".to_string()), lapsed, today)
        .map_err(AppError::tracking)?;
    print_filing(&view);

    let dashboard = filings.dashboard().map_err(AppError::tracking)?;
    println!(
        "dashboard: {} filings, {} compliant, {} overdue, {} pending ({}% compliance)",
        dashboard.total,
        dashboard.compliant,
        dashboard.overdue,
        dashboard.pending,
        dashboard.compliance_rate
    );

    println!();
    println!("=== Overseas progress ===");

    let cleared = OverseasProgressUpdate {
        medical_exam_date: Some((today - Duration::days(30)).to_string()),
        medical_result: Some("PASS".to_string()),
        police_clearance_date: Some((today - Duration::days(21)).to_string()),
        police_status: Some("ISSUED".to_string()),
        passport_checked: Some(true),
        arc_checked: Some(true),
        ..OverseasProgressUpdate::default()
    };
    let view = overseas
        .upsert(&CandidateId("C-501".to_string()), cleared, today)
        .map_err(AppError::tracking)?;
    println!(
        "{:<16} {:<20} {}",
        view.candidate_id.0,
        view.candidate_name_en,
        view.overall_status.label()
    );

    let short_passport = OverseasProgressUpdate {
        passport_checked: Some(true),
        ..OverseasProgressUpdate::default()
    };
    overseas
        .upsert(&CandidateId("C-502".to_string()), short_passport, today)
        .map_err(AppError::tracking)?;

    let report = overseas
        .report(&CandidateId("C-502".to_string()))
        .map_err(AppError::tracking)?;
    println!(
        "{:<16} {:<20} {}",
        report.candidate_id.0,
        report.candidate_name_en,
        report.overall_status.label()
    );
    for checkpoint in &report.checkpoints {
        println!("    {:<18} {}", checkpoint.checkpoint, checkpoint.status);
    }

    println!();
    println!("=== Medical exceptions ===");

    let case = medical
        .create(MedicalExceptionCreate {
            worker_id: Some("W-1003".to_string()),
            diagnosis_date: Some((today - Duration::days(3)).to_string()),
            disease_type: Some("TUBERCULOSIS".to_string()),
            description: Some("sputum smear positive".to_string()),
            ..MedicalExceptionCreate::default()
        })
        .map_err(AppError::tracking)?;
    let case = medical
        .mark_health_dept_notified(&case.case_id)
        .map_err(AppError::tracking)?;
    println!(
        "{:<12} {:<20} {:<14} health dept notified: {}",
        case.case_id.0,
        case.worker_name_en,
        case.disease_type.label(),
        case.health_dept_notified
    );

    let dashboard = medical.dashboard().map_err(AppError::tracking)?;
    println!(
        "dashboard: {} cases, {} pending, {} in treatment, {} recovered, {} deported",
        dashboard.total,
        dashboard.pending,
        dashboard.in_treatment,
        dashboard.recovered,
        dashboard.deported
    );

    Ok(())
}

fn print_filing(view: &FilingView) {
    println!(
        "{:<12} {:<20} {:<10} report={} exam={} arc={} permit={}",
        view.worker_id.0,
        view.worker_name_en,
        view.overall_compliance.label(),
        view.entry_report_status.label(),
        view.initial_exam_status.label(),
        view.arc_status.label(),
        view.permit_status.label()
    );
}
