//! Demonstration records loaded at startup

use chrono::{DateTime, NaiveDate, Utc};
use nfeasy_common::models::{
    Divergence, DivergenceStatus, EbsRecord, EdapResponse, EdapStatus, Invoice, InvoiceStatus,
    Severity, ValidationStatus, Workflow, WorkflowStatus,
};
use nfeasy_common::time::parse_rfc3339;
use nfeasy_common::{Error, Result};
use serde_json::json;

use super::SeedRecords;

const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><nfeProc>...</nfeProc>"#;

/// Build the fixture set: three invoices, three workflows, three EBS source
/// records and three EDAP responses.
pub fn seed_records() -> Result<SeedRecords> {
    Ok(SeedRecords {
        invoices: invoices()?,
        workflows: workflows()?,
        ebs_records: ebs_records()?,
        edap_responses: edap_responses()?,
    })
}

fn ts(value: &str) -> Result<DateTime<Utc>> {
    parse_rfc3339(value).map_err(|e| Error::Internal(format!("fixture timestamp: {}", e)))
}

fn date(value: &str) -> Result<NaiveDate> {
    value
        .parse()
        .map_err(|e| Error::Internal(format!("fixture date '{}': {}", value, e)))
}

fn invoices() -> Result<Vec<Invoice>> {
    let inv003_created = ts("2024-01-13T09:15:00Z")?;

    Ok(vec![
        Invoice {
            id: "INV001".to_string(),
            invoice_id: "NF001-2024".to_string(),
            supplier: "Vale Alumínio".to_string(),
            total: 10234.50,
            status: InvoiceStatus::PendingValidation,
            validation_status: ValidationStatus::Reading,
            xml_data: Some(SAMPLE_XML.to_string()),
            divergences: Vec::new(),
            created_at: ts("2024-01-15T10:00:00Z")?,
            updated_at: None,
        },
        Invoice {
            id: "INV002".to_string(),
            invoice_id: "NF002-2024".to_string(),
            supplier: "Alcoa Brasil".to_string(),
            total: 5421.00,
            status: InvoiceStatus::Validated,
            validation_status: ValidationStatus::Ready,
            xml_data: Some(SAMPLE_XML.to_string()),
            divergences: Vec::new(),
            created_at: ts("2024-01-14T15:30:00Z")?,
            updated_at: None,
        },
        Invoice {
            id: "INV003".to_string(),
            invoice_id: "NF003-2024".to_string(),
            supplier: "Hydro Alunorte".to_string(),
            total: 8756.25,
            status: InvoiceStatus::Error,
            validation_status: ValidationStatus::Validating,
            xml_data: Some(SAMPLE_XML.to_string()),
            divergences: vec![
                Divergence::pending(
                    "DIV001",
                    "XML_VALIDATION_ERROR",
                    "Invalid XML structure detected",
                    inv003_created,
                ),
                Divergence::pending("DIV002", "MISSING_FIELD", "CNPJ field is missing", inv003_created),
            ],
            created_at: inv003_created,
            updated_at: None,
        },
    ])
}

fn workflows() -> Result<Vec<Workflow>> {
    let wf002_resolved = ts("2024-01-12T16:45:00Z")?;

    let mut div003 = Divergence::pending(
        "DIV003",
        "TAX_CALCULATION_ERROR",
        "ICMS calculation does not match",
        ts("2024-01-12T14:30:00Z")?,
    )
    .with_severity(Severity::High);
    div003.status = DivergenceStatus::Resolved;
    div003.resolved_at = Some(wf002_resolved);

    Ok(vec![
        Workflow {
            id: "WF001".to_string(),
            invoice_id: "NF003-2024".to_string(),
            supplier: "Hydro Alunorte".to_string(),
            total: 8756.25,
            status: WorkflowStatus::DivergenceDetected,
            divergences: vec![
                Divergence::pending(
                    "DIV001",
                    "XML_VALIDATION_ERROR",
                    "Invalid XML structure detected",
                    ts("2024-01-13T09:15:00Z")?,
                )
                .with_severity(Severity::High),
                Divergence::pending(
                    "DIV002",
                    "MISSING_FIELD",
                    "CNPJ field is missing",
                    ts("2024-01-13T09:16:00Z")?,
                )
                .with_severity(Severity::Medium),
            ],
            created_at: ts("2024-01-13T09:15:00Z")?,
            resolved_at: None,
        },
        Workflow {
            id: "WF002".to_string(),
            invoice_id: "NF004-2024".to_string(),
            supplier: "Rusal Brasil".to_string(),
            total: 12345.67,
            status: WorkflowStatus::Resolved,
            divergences: vec![div003],
            created_at: ts("2024-01-12T14:30:00Z")?,
            resolved_at: Some(wf002_resolved),
        },
        Workflow {
            id: "WF003".to_string(),
            invoice_id: "NF005-2024".to_string(),
            supplier: "Mineração Rio do Norte".to_string(),
            total: 9876.54,
            status: WorkflowStatus::PendingValidation,
            divergences: Vec::new(),
            created_at: ts("2024-01-11T11:20:00Z")?,
            resolved_at: None,
        },
    ])
}

fn ebs_record(
    id: u32,
    invoice_id: &str,
    supplier: &str,
    cnpj: &str,
    total: f64,
    status: &str,
    day: &str,
) -> Result<EbsRecord> {
    Ok(EbsRecord {
        id,
        invoice_id: invoice_id.to_string(),
        supplier: supplier.to_string(),
        total,
        status: status.to_string(),
        date: date(day)?,
        xml_data: SAMPLE_XML.to_string(),
        json_data: json!({
            "emit": { "nome": supplier, "cnpj": cnpj },
            "dest": { "nome": "Alumar", "cnpj": "98765432000198" },
            "total": { "ICMSTot": { "vNF": total } }
        }),
    })
}

fn ebs_records() -> Result<Vec<EbsRecord>> {
    Ok(vec![
        ebs_record(1, "NF001-2024", "Vale Alumínio", "12345678000123", 10234.50, "Pending Validation", "2024-01-15")?,
        ebs_record(2, "NF002-2024", "Alcoa Brasil", "11111111000111", 5421.00, "Validated", "2024-01-14")?,
        ebs_record(3, "NF003-2024", "Hydro Alunorte", "22222222000122", 8756.25, "Processing", "2024-01-13")?,
    ])
}

fn edap_responses() -> Result<Vec<EdapResponse>> {
    Ok(vec![
        EdapResponse {
            id: "EDAP001".to_string(),
            status: EdapStatus::Success,
            message: "NF-e successfully processed and sent to SEFAZ".to_string(),
            timestamp: ts("2024-01-15T10:30:00Z")?,
            invoice_id: "NF001-2024".to_string(),
            errors: None,
        },
        EdapResponse {
            id: "EDAP002".to_string(),
            status: EdapStatus::Pending,
            message: "NF-e is being processed by EDAP".to_string(),
            timestamp: ts("2024-01-15T11:15:00Z")?,
            invoice_id: "NF002-2024".to_string(),
            errors: None,
        },
        EdapResponse {
            id: "EDAP003".to_string(),
            status: EdapStatus::Error,
            message: "Validation error in NF-e data".to_string(),
            timestamp: ts("2024-01-15T12:00:00Z")?,
            invoice_id: "NF003-2024".to_string(),
            errors: Some(vec![
                "Invalid CNPJ format".to_string(),
                "Missing fiscal information".to_string(),
            ]),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_build() {
        let seed = seed_records().unwrap();
        assert_eq!(seed.invoices.len(), 3);
        assert_eq!(seed.workflows.len(), 3);
    }

    #[test]
    fn test_fixture_workflow_statuses_are_consistent() {
        let seed = seed_records().unwrap();
        for workflow in &seed.workflows {
            let resolved = workflow.status == WorkflowStatus::Resolved;
            if resolved {
                assert!(workflow.all_divergences_resolved(), "{}", workflow.id);
                assert!(workflow.resolved_at.is_some());
            }
        }
    }

    #[test]
    fn test_fixture_totals_non_negative() {
        let seed = seed_records().unwrap();
        assert!(seed.invoices.iter().all(|i| i.total >= 0.0));
        assert!(seed.workflows.iter().all(|w| w.total >= 0.0));
    }

    #[test]
    fn test_ebs_json_payload_carries_total() {
        let seed = seed_records().unwrap();
        let first = &seed.ebs_records[0];
        assert_eq!(first.json_data["total"]["ICMSTot"]["vNF"], 10234.50);
        assert_eq!(first.json_data["emit"]["nome"], "Vale Alumínio");
    }
}
