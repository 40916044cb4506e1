//! Field, seizure, lab and legal workflows.
//!
//! These are the multi-step actions the enforcement views trigger. Each one
//! reads the records it needs, validates the step, and then applies its
//! mutations through the store so every change is audited and published.

use agri_model::{
    AuthenticityScore, FirStatus, LabSampleStatus, NewFirCase, NewLabSample, PRODUCT_DATABASE,
    ProductRecord, RecordId, SeizureDetails, SeizureStatus, StatusMachine,
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::{Result, StateError};
use crate::store::AppState;

/// Geolocation reported when the device has no fix.
pub const DEFAULT_GEO_LOCATION: &str = "16.7050° N, 74.2433° E";

const GENERIC_MARKERS: &str = "Generic counterfeit markers";
const UNKNOWN_ACCUSED: &str = "Unknown Dealer/Retailer";

// =============================================================================
// FIELD SCAN
// =============================================================================

/// Product presented for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub company: String,
    pub product: String,
    pub batch_number: String,
    pub geo_location: Option<String>,
}

/// Raw reading from an authenticity device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReading {
    pub counterfeit: bool,
    /// Authenticity in percent.
    pub score: u8,
}

/// Source of authenticity readings.
pub trait AuthenticityProbe {
    fn read(&self, request: &ScanRequest) -> ProbeReading;
}

/// Deterministic stand-in for the handheld spectrometer.
///
/// Hashes company, product and batch with SHA-256; roughly 30% of inputs read
/// as counterfeit. Counterfeit scores land in 10..=49, authentic in 80..=99.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProbe;

/// SHA-256 of the normalized company, product and batch.
fn scan_digest(request: &ScanRequest) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in [&request.company, &request.product, &request.batch_number] {
        hasher.update(part.trim().to_lowercase().as_bytes());
        hasher.update([0x1f]);
    }
    hasher.finalize().into()
}

/// Hex fingerprint of the scanned identity, printed on the scan slip.
pub fn scan_fingerprint(request: &ScanRequest) -> String {
    hex::encode(scan_digest(request))
}

impl AuthenticityProbe for SimulatedProbe {
    fn read(&self, request: &ScanRequest) -> ProbeReading {
        let digest = scan_digest(request);
        let counterfeit = digest[0] < 77;
        let score = if counterfeit {
            10 + digest[1] % 40
        } else {
            80 + digest[1] % 20
        };
        ProbeReading { counterfeit, score }
    }
}

/// Outcome of a field scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub details: SeizureDetails,
    pub counterfeit: bool,
    /// Hex SHA-256 of company, product and batch.
    pub fingerprint: String,
    /// Registered product the scan matched, if any.
    pub reference: Option<&'static ProductRecord>,
}

impl ScanResult {
    pub fn active_ingredient(&self) -> Option<&'static str> {
        self.reference.and_then(|product| product.active_ingredient)
    }

    pub fn mrp(&self) -> Option<u32> {
        self.reference.and_then(|product| product.mrp.reference_price())
    }

    pub fn is_seizable(&self) -> bool {
        self.details.authenticity_score.is_suspect()
    }
}

/// Scan a product with `probe`.
pub fn scan_product(probe: &dyn AuthenticityProbe, request: &ScanRequest) -> Result<ScanResult> {
    scan_product_at(probe, request, Utc::now())
}

pub fn scan_product_at(
    probe: &dyn AuthenticityProbe,
    request: &ScanRequest,
    now: DateTime<Utc>,
) -> Result<ScanResult> {
    let reference = PRODUCT_DATABASE.iter().find(|record| {
        record.brand.eq_ignore_ascii_case(request.company.trim())
            && record.name.eq_ignore_ascii_case(request.product.trim())
    });
    let reading = probe.read(request);

    let issues = if reading.counterfeit {
        match reference {
            Some(product) if !product.counterfeit_markers.is_empty() => product
                .counterfeit_markers
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
            _ => vec![GENERIC_MARKERS.to_string()],
        }
    } else {
        Vec::new()
    };

    let details = SeizureDetails {
        company: request.company.trim().to_string(),
        product: request.product.trim().to_string(),
        batch_number: request.batch_number.trim().to_string(),
        authenticity_score: AuthenticityScore::new(u32::from(reading.score))?,
        issues,
        recommendation: if reading.counterfeit {
            "Suspected Counterfeit".to_string()
        } else {
            "Authentic".to_string()
        },
        geo_location: request
            .geo_location
            .clone()
            .unwrap_or_else(|| DEFAULT_GEO_LOCATION.to_string()),
        timestamp: now,
        quantity: None,
        estimated_value: None,
        witness_name: None,
        evidence_photos: Vec::new(),
        video_evidence: None,
    };
    details.validate()?;

    if reading.counterfeit {
        warn!(
            company = %details.company,
            product = %details.product,
            batch = %details.batch_number,
            score = reading.score,
            "scan flagged suspected counterfeit"
        );
    } else {
        info!(product = %details.product, score = reading.score, "scan verified authentic");
    }

    Ok(ScanResult {
        details,
        counterfeit: reading.counterfeit,
        fingerprint: scan_fingerprint(request),
        reference,
    })
}

// =============================================================================
// SEIZURE PROTOCOL
// =============================================================================

/// Parameters of a seizure taken from a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeizureProtocol {
    pub units: u32,
    pub witness_name: String,
    /// Overrides the sample type derived from the product category.
    pub sample_type: Option<String>,
    pub lab_destination: String,
    pub evidence_photos: Vec<String>,
    pub video_evidence: Option<String>,
}

impl Default for SeizureProtocol {
    fn default() -> Self {
        Self {
            units: 50,
            witness_name: "Shop Owner".to_string(),
            sample_type: None,
            lab_destination: "SPTL Ghaziabad".to_string(),
            evidence_photos: Vec::new(),
            video_evidence: None,
        }
    }
}

/// Records created by the seizure protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeizureRecords {
    pub seizure_id: RecordId,
    pub lab_sample_id: RecordId,
}

impl AppState {
    /// Log a seizure and its linked lab sample from a suspect scan.
    pub fn log_seizure_from_scan(
        &mut self,
        scan: &ScanResult,
        protocol: &SeizureProtocol,
    ) -> Result<SeizureRecords> {
        let score = scan.details.authenticity_score;
        if !score.is_suspect() {
            return Err(StateError::NotSuspect {
                score: score.value(),
            });
        }

        let unit_price = u64::from(scan.mrp().unwrap_or(100));
        let mut details = scan.details.clone();
        details.quantity = Some(format!("{} units", protocol.units));
        details.estimated_value = Some(format!("₹{}", unit_price * u64::from(protocol.units)));
        details.witness_name = Some(protocol.witness_name.clone());
        details.evidence_photos = protocol.evidence_photos.clone();
        details.video_evidence = protocol.video_evidence.clone();

        let sample_type = protocol.sample_type.clone().unwrap_or_else(|| {
            scan.reference
                .map_or("Pesticide", |product| product.category.sample_type())
                .to_string()
        });

        let seizure_id = self.add_seizure(details.clone());
        let lab_sample_id = self.add_lab_sample(NewLabSample {
            seizure_id: Some(seizure_id.clone()),
            details,
            sample_type,
            lab_destination: protocol.lab_destination.clone(),
        });
        info!(seizure = %seizure_id, sample = %lab_sample_id, "seizure logged and sample prepared");
        Ok(SeizureRecords {
            seizure_id,
            lab_sample_id,
        })
    }

    /// Mark a pending seizure as dispatched to the lab.
    pub fn dispatch_seizure_to_lab(&mut self, id: &RecordId) -> Result<()> {
        if self.find_seizure(id).is_none() {
            return Err(StateError::SeizureNotFound(id.clone()));
        }
        let _ = self.update_seizure_status(id, SeizureStatus::Dispatched)?;
        info!(seizure = %id, "dispatched to lab");
        Ok(())
    }

    /// Draft an FIR against a seizure and mark the seizure fir-filed.
    pub fn initiate_legal_action(&mut self, id: &RecordId) -> Result<RecordId> {
        let seizure = self
            .find_seizure(id)
            .ok_or_else(|| StateError::SeizureNotFound(id.clone()))?;
        if seizure.status == SeizureStatus::FirFiled {
            return Err(StateError::LegalActionExists(id.clone()));
        }

        let violation_type = if seizure.details.issues.is_empty() {
            "Suspected Counterfeit".to_string()
        } else {
            seizure.details.issues.join(", ")
        };
        let draft = NewFirCase {
            seizure_id: Some(id.clone()),
            lab_report_id: format!("REQ-{id}"),
            violation_type,
            accused: UNKNOWN_ACCUSED.to_string(),
            location: seizure.details.geo_location.clone(),
            details: None,
        };

        let _ = self.update_seizure_status(id, SeizureStatus::FirFiled)?;
        let fir_id = self.add_fir_case(draft);
        info!(seizure = %id, fir = %fir_id, "legal action initiated");
        Ok(fir_id)
    }

    /// Record a lab result for a sample.
    ///
    /// A violation drafts an FIR. Violation and compliant results move the
    /// linked seizure to report-generated unless it is already further along.
    pub fn record_lab_result(
        &mut self,
        id: &RecordId,
        result: LabSampleStatus,
        notes: &str,
    ) -> Result<LabResultOutcome> {
        let sample = self
            .find_lab_sample(id)
            .ok_or_else(|| StateError::LabSampleNotFound(id.clone()))?
            .clone();

        let _ = self.update_lab_sample_status(id, result)?;

        let mut outcome = LabResultOutcome::default();
        if result == LabSampleStatus::Violation {
            let violation = if sample.details.issues.is_empty() {
                "Counterfeit Product".to_string()
            } else {
                sample.details.issues.join(", ")
            };
            let fir_id = self.add_fir_case(NewFirCase {
                seizure_id: sample.seizure_id.clone(),
                lab_report_id: id.to_string(),
                violation_type: format!("Lab Confirmed Violation: {violation}"),
                accused: UNKNOWN_ACCUSED.to_string(),
                location: sample.details.geo_location.clone(),
                details: Some(format!("Lab result: Violation. Notes: {notes}")),
            });
            warn!(sample = %id, fir = %fir_id, "lab confirmed violation");
            outcome.fir_case = Some(fir_id);
        }

        if matches!(
            result,
            LabSampleStatus::Violation | LabSampleStatus::Compliant
        ) && let Some(seizure_id) = &sample.seizure_id
        {
            outcome.seizure_updated = self.mark_report_generated(seizure_id)?;
        }

        self.audit(
            format!("Sample {id} results uploaded"),
            if notes.is_empty() {
                result.as_str().to_string()
            } else {
                format!("{result}: {notes}")
            },
        );
        Ok(outcome)
    }

    fn mark_report_generated(&mut self, seizure_id: &RecordId) -> Result<bool> {
        let Some(seizure) = self.find_seizure(seizure_id) else {
            warn!(seizure = %seizure_id, "linked seizure missing, not updated");
            return Ok(false);
        };
        if !seizure
            .status
            .can_transition_to(SeizureStatus::ReportGenerated)
        {
            warn!(
                seizure = %seizure_id,
                status = %seizure.status,
                "linked seizure already past report-generated, not updated"
            );
            return Ok(false);
        }
        let outcome = self.update_seizure_status(seizure_id, SeizureStatus::ReportGenerated)?;
        Ok(outcome.is_applied())
    }

    /// Submit a drafted FIR to the e-FIR system.
    pub fn submit_fir(&mut self, id: &RecordId) -> Result<()> {
        if self.find_fir_case(id).is_none() {
            return Err(StateError::FirCaseNotFound(id.clone()));
        }
        let _ = self.update_fir_case_status(id, FirStatus::Submitted)?;
        info!(fir = %id, "FIR submitted");
        Ok(())
    }
}

/// Side effects of a lab result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabResultOutcome {
    pub fir_case: Option<RecordId>,
    pub seizure_updated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(ProbeReading);

    impl AuthenticityProbe for FixedProbe {
        fn read(&self, _request: &ScanRequest) -> ProbeReading {
            self.0
        }
    }

    fn request(batch: &str) -> ScanRequest {
        ScanRequest {
            company: "UPL".to_string(),
            product: "Saaf".to_string(),
            batch_number: batch.to_string(),
            geo_location: None,
        }
    }

    #[test]
    fn simulated_probe_scores_fall_in_their_bands() {
        let mut counterfeit = 0;
        for n in 0..200 {
            let reading = SimulatedProbe.read(&request(&format!("UPL-SAAF-202405-{n:05}")));
            if reading.counterfeit {
                counterfeit += 1;
                assert!((10..=49).contains(&reading.score));
            } else {
                assert!((80..=99).contains(&reading.score));
            }
        }
        assert!(counterfeit > 20 && counterfeit < 110, "{counterfeit} of 200");
    }

    #[test]
    fn simulated_probe_is_deterministic() {
        let a = SimulatedProbe.read(&request("B-42"));
        let b = SimulatedProbe.read(&request("  b-42 "));
        assert_eq!(a, b);
        assert_eq!(scan_fingerprint(&request("B-42")), scan_fingerprint(&request(" b-42")));
    }

    #[test]
    fn counterfeit_scan_lists_known_markers() {
        let probe = FixedProbe(ProbeReading {
            counterfeit: true,
            score: 31,
        });
        let scan = scan_product(&probe, &request("B-1")).unwrap();
        assert_eq!(scan.details.issues.len(), 3);
        assert_eq!(scan.details.recommendation, "Suspected Counterfeit");
        assert_eq!(scan.details.geo_location, DEFAULT_GEO_LOCATION);
        assert_eq!(scan.mrp(), Some(120));
        assert!(scan.is_seizable());
    }

    #[test]
    fn scan_carries_the_identity_fingerprint() {
        let scan = scan_product(&SimulatedProbe, &request("B-7")).unwrap();
        assert_eq!(scan.fingerprint.len(), 64);
        assert!(scan.fingerprint.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(scan.fingerprint, scan_fingerprint(&request("B-7")));
    }

    #[test]
    fn unknown_product_falls_back_to_generic_markers() {
        let probe = FixedProbe(ProbeReading {
            counterfeit: true,
            score: 12,
        });
        let mut req = request("B-1");
        req.product = "Mystery Powder".to_string();
        let scan = scan_product(&probe, &req).unwrap();
        assert_eq!(scan.details.issues, vec![GENERIC_MARKERS.to_string()]);
        assert!(scan.reference.is_none());
    }

    #[test]
    fn scan_requires_batch_number() {
        let err = scan_product(&SimulatedProbe, &request("   ")).unwrap_err();
        assert!(err.to_string().contains("batch_number"));
    }

    #[test]
    fn authentic_scan_cannot_be_seized() {
        let probe = FixedProbe(ProbeReading {
            counterfeit: false,
            score: 91,
        });
        let scan = scan_product(&probe, &request("B-2")).unwrap();
        let mut state = AppState::new();
        let err = state
            .log_seizure_from_scan(&scan, &SeizureProtocol::default())
            .unwrap_err();
        assert_eq!(err, StateError::NotSuspect { score: 91 });
        assert!(state.seizures().is_empty());
    }
}
