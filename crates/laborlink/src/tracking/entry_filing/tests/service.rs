use super::common::*;
use crate::tracking::directory::WorkerId;
use crate::tracking::entry_filing::domain::EntryFilingUpdate;
use crate::tracking::entry_filing::service::FilingServiceError;
use crate::tracking::paging::PageRequest;
use crate::tracking::status::ComplianceStatus;

#[test]
fn receipt_number_alone_yields_compliant_arc_status() {
    let (service, _repository) = build_service();

    let view = service
        .upsert(&worker_id(), arc_receipt_update("2024-01-01", "R123"), today())
        .expect("upsert succeeds");
    assert_eq!(view.arc_status, ComplianceStatus::Compliant);

    // Stable across repeated reads without further writes.
    for _ in 0..3 {
        let fetched = service.get(&worker_id()).expect("get succeeds");
        assert_eq!(fetched.arc_status, ComplianceStatus::Compliant);
    }
}

#[test]
fn twenty_days_without_arc_filing_is_overdue_overall() {
    let (service, _repository) = build_service();

    let view = service
        .upsert(&worker_id(), entry_only_update("2024-06-01"), date(2024, 6, 21))
        .expect("upsert succeeds");

    assert_eq!(view.arc_status, ComplianceStatus::Overdue);
    assert_eq!(view.overall_compliance, ComplianceStatus::Overdue);
}

#[test]
fn fourteen_days_without_arc_filing_is_a_warning() {
    let (service, _repository) = build_service();

    let view = service
        .upsert(&worker_id(), entry_only_update("2024-06-01"), date(2024, 6, 15))
        .expect("upsert succeeds");

    assert_eq!(view.arc_status, ComplianceStatus::Warning);
    assert_eq!(view.permit_status, ComplianceStatus::Warning);
    // The 3-day items breached long ago, which dominates the record.
    assert_eq!(view.entry_report_status, ComplianceStatus::Overdue);
    assert_eq!(view.overall_compliance, ComplianceStatus::Overdue);
}

#[test]
fn fresh_entry_with_all_evidence_is_compliant() {
    let (service, _repository) = build_service();

    let update = EntryFilingUpdate {
        entry_date: Some("2024-06-18".to_string()),
        entry_report_ref_no: Some("EN-44".to_string()),
        initial_exam_date: Some("2024-06-19".to_string()),
        initial_exam_result: Some("PASS".to_string()),
        arc_receipt_no: Some("ARC-R-9".to_string()),
        permit_no: Some("P-7731".to_string()),
        ..EntryFilingUpdate::default()
    };

    let view = service
        .upsert(&worker_id(), update, today())
        .expect("upsert succeeds");

    assert_eq!(view.entry_report_status, ComplianceStatus::Compliant);
    assert_eq!(view.initial_exam_status, ComplianceStatus::Compliant);
    assert_eq!(view.arc_status, ComplianceStatus::Compliant);
    assert_eq!(view.permit_status, ComplianceStatus::Compliant);
    assert_eq!(view.overall_compliance, ComplianceStatus::Compliant);
}

#[test]
fn exam_date_without_pass_result_is_submitted() {
    let (service, _repository) = build_service();

    let update = EntryFilingUpdate {
        entry_date: Some("2024-06-01".to_string()),
        initial_exam_date: Some("2024-06-02".to_string()),
        initial_exam_result: Some("PENDING".to_string()),
        ..EntryFilingUpdate::default()
    };

    let view = service
        .upsert(&worker_id(), update, today())
        .expect("upsert succeeds");
    assert_eq!(view.initial_exam_status, ComplianceStatus::Submitted);
}

#[test]
fn later_upserts_merge_instead_of_erasing() {
    let (service, _repository) = build_service();

    service
        .upsert(&worker_id(), arc_receipt_update("2024-06-01", "R123"), today())
        .expect("first upsert");

    let update = EntryFilingUpdate {
        entry_date: Some("2024-06-01".to_string()),
        flight_no: Some("BR-225".to_string()),
        ..EntryFilingUpdate::default()
    };
    let view = service
        .upsert(&worker_id(), update, today())
        .expect("second upsert");

    assert_eq!(view.flight_no.as_deref(), Some("BR-225"));
    assert_eq!(view.arc_receipt_no.as_deref(), Some("R123"));
    assert_eq!(view.arc_status, ComplianceStatus::Compliant);
}

#[test]
fn entry_date_cannot_change_once_set() {
    let (service, _repository) = build_service();

    service
        .upsert(&worker_id(), entry_only_update("2024-06-01"), today())
        .expect("first upsert");

    match service.upsert(&worker_id(), entry_only_update("2024-06-02"), today()) {
        Err(FilingServiceError::Validation(error)) => {
            assert!(error.details[0].contains("entryDate"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn invalid_dates_are_collected_into_details() {
    let (service, _repository) = build_service();

    let update = EntryFilingUpdate {
        entry_date: Some("not-a-date".to_string()),
        arc_apply_date: Some("2024-13-40".to_string()),
        initial_exam_result: Some("MAYBE".to_string()),
        ..EntryFilingUpdate::default()
    };

    match service.upsert(&worker_id(), update, today()) {
        Err(FilingServiceError::Validation(error)) => {
            assert_eq!(error.details.len(), 3);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn unknown_worker_is_rejected() {
    let (service, _repository) = build_service();
    let unknown = WorkerId("W-9999".to_string());

    match service.get(&unknown) {
        Err(FilingServiceError::UnknownWorker(id)) => assert_eq!(id, unknown),
        other => panic!("expected unknown worker, got {other:?}"),
    }
}

#[test]
fn worker_without_filing_gets_the_pending_stub() {
    let (service, _repository) = build_service();

    let view = service.get(&worker_id()).expect("stub synthesized");
    assert!(view.entry_date.is_none());
    assert_eq!(view.overall_compliance, ComplianceStatus::Pending);
    assert_eq!(view.worker_name_en, "NGUYEN THI HUONG");
}

#[test]
fn list_filters_by_status_and_name() {
    let (service, _repository) = build_service();

    service
        .upsert(&worker_id(), arc_receipt_update("2024-06-19", "R1"), today())
        .expect("upsert W-1001");
    service
        .upsert(
            &WorkerId("W-1002".to_string()),
            entry_only_update("2024-05-01"),
            today(),
        )
        .expect("upsert W-1002");

    let overdue = service
        .list(Some("OVERDUE"), None, PageRequest::default())
        .expect("list by status");
    assert_eq!(overdue.total, 1);
    assert_eq!(overdue.items[0].worker_name_en, "SITI RAHAYU");

    let by_name = service
        .list(None, Some("rahayu"), PageRequest::default())
        .expect("list by name");
    assert_eq!(by_name.total, 1);

    let bad_filter = service.list(Some("SOMEDAY"), None, PageRequest::default());
    assert!(matches!(bad_filter, Err(FilingServiceError::Validation(_))));
}

#[test]
fn dashboard_counts_and_rate() {
    let (service, _repository) = build_service();

    let empty = service.dashboard().expect("dashboard on empty store");
    assert_eq!(empty.total, 0);
    assert_eq!(empty.compliance_rate, 0);

    // One fully compliant record, one overdue record.
    let update = EntryFilingUpdate {
        entry_date: Some("2024-06-18".to_string()),
        entry_report_ref_no: Some("EN-1".to_string()),
        initial_exam_result: Some("PASS".to_string()),
        arc_no: Some("ARC-1".to_string()),
        permit_no: Some("P-1".to_string()),
        ..EntryFilingUpdate::default()
    };
    service
        .upsert(&worker_id(), update, today())
        .expect("compliant record");
    service
        .upsert(
            &WorkerId("W-1002".to_string()),
            entry_only_update("2024-05-01"),
            today(),
        )
        .expect("overdue record");

    let dashboard = service.dashboard().expect("dashboard");
    assert_eq!(dashboard.total, 2);
    assert_eq!(dashboard.compliant, 1);
    assert_eq!(dashboard.overdue, 1);
    assert_eq!(dashboard.pending, 0);
    assert_eq!(dashboard.compliance_rate, 50);
}
