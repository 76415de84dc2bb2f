//! Certificate extraction pipeline.
//!
//! Four steps, each usable on its own: [`fetch_cpcl`] pulls the CPCL data
//! object, [`detect_application`] finds which payment scheme the card
//! implements, [`find_certificates`] scans the SFI/record address space
//! for the ICC and issuer public key certificates, and [`extract_all`]
//! runs the whole pipeline and assembles the merged output buffer.
//! [`find_pan`] walks the same record space for the Application PAN when
//! a card label is wanted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::apdu::commands;
use crate::error::ExtractError;
use crate::transceiver::Transceiver;

/// Known EMV Application Identifiers (AIDs)
pub mod aids {
    /// Mastercard
    pub const MASTERCARD: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x04, 0x10, 0x10];

    /// Visa
    pub const VISA: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10];

    /// American Express
    pub const AMEX: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x00, 0x25, 0x10];
}

/// Highest short file identifier probed by the scan (exclusive).
const SFI_SPAN: u8 = 32;
/// Highest record number probed within one SFI (exclusive).
const RECORD_SPAN: u8 = 17;

/// How the record scan terminates.
///
/// With `stop_when_complete` set (the default) the scan ends as soon as
/// both certificates have been seen once. Records further into the
/// address space may hold additional certificates; those are deliberately
/// left behind. Clear the flag to walk the whole space.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
    pub stop_when_complete: bool,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            stop_when_complete: true,
        }
    }
}

/// Shared flag to abort a scan between record attempts.
///
/// A full scan is up to 32 x 17 blocking round trips; a stalled reader
/// would otherwise hold the caller indefinitely. The flag is checked
/// before each READ RECORD, never mid-exchange.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect before the next record attempt.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration for one extraction run.
///
/// The candidate AID order is significant: on cards implementing more
/// than one scheme, the first match wins.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub candidate_aids: Vec<Vec<u8>>,
    pub scan: ScanPolicy,
    pub cancel: CancelToken,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            candidate_aids: vec![
                aids::MASTERCARD.to_vec(),
                aids::VISA.to_vec(),
                aids::AMEX.to_vec(),
            ],
            scan: ScanPolicy::default(),
            cancel: CancelToken::new(),
        }
    }
}

/// Try each candidate AID in order and return the first one the card
/// accepts, or `None` when no candidate matches.
///
/// A card that holds the application answers the SELECT with status
/// `61 xx` (response data waiting); anything else means "not this AID"
/// and the next candidate is tried. No SELECT is issued after a match.
pub fn detect_application<T: Transceiver + ?Sized>(
    card: &mut T,
    candidate_aids: &[Vec<u8>],
) -> Result<Option<Vec<u8>>, ExtractError> {
    for aid in candidate_aids {
        let response = card.transmit(&commands::select(aid).build())?;
        if response.sw1 == 0x61 {
            debug!(aid = %hex::encode_upper(aid), "application present");
            return Ok(Some(aid.clone()));
        }
        trace!(
            aid = %hex::encode_upper(aid),
            status = %response.status_string(),
            "application not present"
        );
    }
    Ok(None)
}

/// Certificates recovered by [`find_certificates`]. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateScan {
    /// ICC Public Key Certificate (tag `9F46`).
    pub icc_cert: Option<Vec<u8>>,
    /// Issuer Public Key Certificate (tag `90`).
    pub issuer_cert: Option<Vec<u8>>,
}

impl CertificateScan {
    /// Both certificates found.
    pub fn is_complete(&self) -> bool {
        self.icc_cert.is_some() && self.issuer_cert.is_some()
    }

    /// Neither certificate found.
    pub fn is_empty(&self) -> bool {
        self.icc_cert.is_none() && self.issuer_cert.is_none()
    }
}

/// Walk the 32 x 17 SFI/record address space of the selected application
/// and pick up the ICC and issuer public key certificates.
///
/// Per address: status `6A xx` means no record there and the scan moves
/// on; `6C xx` means wrong length and the identical READ RECORD is
/// reissued with the corrected length from SW2 before decoding. A record
/// whose payload fails to decode is skipped, not fatal. Exhausting the
/// space returns whatever was found; missing certificates are reported as
/// `None`, not as errors.
pub fn find_certificates<T: Transceiver + ?Sized>(
    card: &mut T,
    policy: &ScanPolicy,
    cancel: &CancelToken,
) -> Result<CertificateScan, ExtractError> {
    let mut scan = CertificateScan::default();

    for sfi in 0..SFI_SPAN {
        for record in 0..RECORD_SPAN {
            if cancel.is_cancelled() {
                return Err(ExtractError::Cancelled);
            }

            let payload = match read_record_payload(card, sfi, record)? {
                Some(payload) => payload,
                None => continue,
            };

            let roots = match emv_tlv::decode_tree(&payload) {
                Ok(roots) => roots,
                Err(err) => {
                    debug!(sfi, record, %err, "undecodable record skipped");
                    continue;
                }
            };

            if scan.icc_cert.is_none() {
                if let Some(node) = emv_tlv::find(&roots, emv_tlv::tags::ICC_PK_CERTIFICATE) {
                    debug!(sfi, record, len = node.length, "ICC certificate found");
                    scan.icc_cert = Some(node.value.clone());
                }
            }
            if scan.issuer_cert.is_none() {
                if let Some(node) = emv_tlv::find(&roots, emv_tlv::tags::ISSUER_PK_CERTIFICATE) {
                    debug!(sfi, record, len = node.length, "issuer certificate found");
                    scan.issuer_cert = Some(node.value.clone());
                }
            }

            if policy.stop_when_complete && scan.is_complete() {
                return Ok(scan);
            }
        }
    }

    Ok(scan)
}

/// One READ RECORD probe with the shared status handling.
///
/// `6A xx` (no record at this address) and any other refusal yield
/// `None`; `6C xx` reissues the identical command with the corrected
/// length from SW2.
fn read_record_payload<T: Transceiver + ?Sized>(
    card: &mut T,
    sfi: u8,
    record: u8,
) -> Result<Option<Vec<u8>>, ExtractError> {
    let response = card.transmit(&commands::read_record(record, sfi).build())?;
    match response.sw1 {
        0x6A => Ok(None),
        0x6C => {
            let retry =
                card.transmit(&commands::read_record(record, sfi).le(response.sw2).build())?;
            if retry.is_success() || retry.sw1 == 0x61 {
                Ok(Some(retry.data))
            } else {
                trace!(
                    sfi,
                    record,
                    status = %retry.status_string(),
                    "corrected-length reread refused"
                );
                Ok(None)
            }
        }
        0x90 | 0x61 if !response.data.is_empty() => Ok(Some(response.data)),
        _ => {
            trace!(
                sfi,
                record,
                status = %response.status_string(),
                "record skipped"
            );
            Ok(None)
        }
    }
}

/// Walk the record space of the selected application for the Application
/// PAN (tag `5A`) and render its last four digits.
///
/// The PAN is BCD-coded, two digits per byte, so the final two bytes of
/// an eight-byte-or-longer PAN hold the four digits conventionally used
/// to label a card. The first qualifying record wins; records carrying a
/// shorter PAN are passed over. Returns `None` when no record in the
/// space carries one.
pub fn find_pan<T: Transceiver + ?Sized>(
    card: &mut T,
    cancel: &CancelToken,
) -> Result<Option<String>, ExtractError> {
    for sfi in 0..SFI_SPAN {
        for record in 0..RECORD_SPAN {
            if cancel.is_cancelled() {
                return Err(ExtractError::Cancelled);
            }

            let payload = match read_record_payload(card, sfi, record)? {
                Some(payload) => payload,
                None => continue,
            };

            let roots = match emv_tlv::decode_tree(&payload) {
                Ok(roots) => roots,
                Err(err) => {
                    debug!(sfi, record, %err, "undecodable record skipped");
                    continue;
                }
            };

            if let Some(node) = emv_tlv::find(&roots, emv_tlv::tags::APPLICATION_PAN) {
                if node.value.len() >= 8 {
                    debug!(sfi, record, "PAN found");
                    return Ok(Some(hex::encode(&node.value[6..8])));
                }
                trace!(sfi, record, len = node.length, "short PAN passed over");
            }
        }
    }

    Ok(None)
}

/// Like [`find_certificates`], but demand both certificates.
pub fn require_certificates<T: Transceiver + ?Sized>(
    card: &mut T,
    policy: &ScanPolicy,
    cancel: &CancelToken,
) -> Result<(Vec<u8>, Vec<u8>), ExtractError> {
    let scan = find_certificates(card, policy, cancel)?;
    match (scan.icc_cert, scan.issuer_cert) {
        (Some(icc), Some(issuer)) => Ok((icc, issuer)),
        _ => Err(ExtractError::CertificateNotFound),
    }
}

/// Fetch the CPCL data object (`9F7F`) with a single GET DATA exchange.
///
/// `6A xx` means the card carries no CPCL data and maps to
/// [`ExtractError::CpclNotPresent`]; `6C xx` triggers one reissue with
/// the corrected length. The payload is returned as-is, without TLV
/// decoding. Any other failure status is surfaced literally.
pub fn fetch_cpcl<T: Transceiver + ?Sized>(card: &mut T) -> Result<Vec<u8>, ExtractError> {
    let response = card.transmit(&commands::get_data(emv_tlv::tags::CPCL_DATA).build())?;
    match response.sw1 {
        0x6A => Err(ExtractError::CpclNotPresent),
        0x6C => {
            let retry =
                card.transmit(&commands::get_data(emv_tlv::tags::CPCL_DATA).le(response.sw2).build())?;
            if retry.is_success() || retry.sw1 == 0x61 {
                Ok(retry.data)
            } else {
                Err(ExtractError::CardStatus {
                    sw1: retry.sw1,
                    sw2: retry.sw2,
                })
            }
        }
        _ if response.is_success() && !response.data.is_empty() => Ok(response.data),
        _ => Err(ExtractError::CardStatus {
            sw1: response.sw1,
            sw2: response.sw2,
        }),
    }
}

/// Output of one extraction run, immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionBundle {
    /// CPCL data object payload, when the card carries one.
    pub cpcl: Option<Vec<u8>>,
    /// ICC Public Key Certificate, when found.
    pub icc_cert: Option<Vec<u8>>,
    /// Issuer Public Key Certificate, when found.
    pub issuer_cert: Option<Vec<u8>>,
    data: Vec<u8>,
}

impl ExtractionBundle {
    fn assemble(cpcl: Option<Vec<u8>>, scan: CertificateScan) -> Self {
        let mut data = Vec::new();
        for piece in [&cpcl, &scan.icc_cert, &scan.issuer_cert] {
            if let Some(bytes) = piece {
                data.extend_from_slice(bytes);
            }
        }
        Self {
            cpcl,
            icc_cert: scan.icc_cert,
            issuer_cert: scan.issuer_cert,
            data,
        }
    }

    /// The merged buffer: CPCL, then ICC certificate, then issuer
    /// certificate, absent pieces omitted.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Run the full pipeline against a connected card.
///
/// CPCL absence is recorded, not fatal. Failing to match any candidate
/// AID aborts with [`ExtractError::UnknownCardType`]; a card that yields
/// neither CPCL data nor any certificate aborts with
/// [`ExtractError::NoExtractableData`]. No partial bundle escapes a
/// failed run, and no state persists across runs.
pub fn extract_all<T: Transceiver + ?Sized>(
    card: &mut T,
    config: &ExtractConfig,
) -> Result<ExtractionBundle, ExtractError> {
    let cpcl = match fetch_cpcl(card) {
        Ok(bytes) => Some(bytes),
        Err(ExtractError::CpclNotPresent) => {
            debug!("no CPCL data on the card");
            None
        }
        Err(err) => return Err(err),
    };

    let aid = detect_application(card, &config.candidate_aids)?
        .ok_or(ExtractError::UnknownCardType)?;
    info!(aid = %hex::encode_upper(&aid), "application detected");

    let scan = find_certificates(card, &config.scan, &config.cancel)?;

    if cpcl.is_none() && scan.is_empty() {
        return Err(ExtractError::NoExtractableData);
    }

    Ok(ExtractionBundle::assemble(cpcl, scan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apdu::ApduResponse;

    /// Scripted card: answers each command through a closure and keeps a
    /// log of everything sent.
    struct ScriptedCard<F: FnMut(&[u8]) -> ApduResponse> {
        respond: F,
        sent: Vec<Vec<u8>>,
    }

    impl<F: FnMut(&[u8]) -> ApduResponse> ScriptedCard<F> {
        fn new(respond: F) -> Self {
            Self {
                respond,
                sent: Vec::new(),
            }
        }
    }

    impl<F: FnMut(&[u8]) -> ApduResponse> Transceiver for ScriptedCard<F> {
        fn transmit(&mut self, command: &[u8]) -> Result<ApduResponse, ExtractError> {
            self.sent.push(command.to_vec());
            Ok((self.respond)(command))
        }
    }

    fn status(sw1: u8, sw2: u8) -> ApduResponse {
        ApduResponse {
            data: vec![],
            sw1,
            sw2,
        }
    }

    fn success(data: &[u8]) -> ApduResponse {
        ApduResponse {
            data: data.to_vec(),
            sw1: 0x90,
            sw2: 0x00,
        }
    }

    fn is_select(cmd: &[u8]) -> bool {
        cmd[1] == 0xA4
    }

    fn is_read_record(cmd: &[u8]) -> bool {
        cmd[1] == 0xB2
    }

    fn is_get_data(cmd: &[u8]) -> bool {
        cmd[1] == 0xCA
    }

    // Record template wrapping an ICC certificate of four bytes.
    const ICC_RECORD: &[u8] = &[0x70, 0x07, 0x9F, 0x46, 0x04, 0xDE, 0xAD, 0xBE, 0xEF];
    // Record template wrapping both certificates.
    const FULL_RECORD: &[u8] = &[
        0x70, 0x0B, //
        0x9F, 0x46, 0x04, 0xDE, 0xAD, 0xBE, 0xEF, //
        0x90, 0x02, 0xCA, 0xFE,
    ];

    #[test]
    fn scanner_recovers_from_wrong_length() {
        // Empty everywhere except (sfi=3, record=5), which wants Le=1A.
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            assert!(is_read_record(cmd));
            if cmd[2] == 5 && cmd[3] == (3 << 3) | 4 {
                if cmd[4] == 0x00 {
                    status(0x6C, 0x1A)
                } else {
                    assert_eq!(cmd[4], 0x1A);
                    success(ICC_RECORD)
                }
            } else {
                status(0x6A, 0x82)
            }
        });

        let scan =
            find_certificates(&mut card, &ScanPolicy::default(), &CancelToken::new()).unwrap();
        assert_eq!(scan.icc_cert, Some(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(scan.issuer_cert, None);
        assert!(!scan.is_complete());
        assert!(!scan.is_empty());
    }

    #[test]
    fn scanner_skips_undecodable_records() {
        // (0,0) answers garbage TLV, (0,1) a good record.
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            if cmd[2] == 0 && cmd[3] == 0x04 {
                success(&[0x8F, 0x85]) // declares 5 bytes, carries none
            } else if cmd[2] == 1 && cmd[3] == 0x04 {
                success(FULL_RECORD)
            } else {
                status(0x6A, 0x83)
            }
        });

        let scan =
            find_certificates(&mut card, &ScanPolicy::default(), &CancelToken::new()).unwrap();
        assert!(scan.is_complete());
    }

    #[test]
    fn scanner_stops_once_complete() {
        let mut card = ScriptedCard::new(|_: &[u8]| success(FULL_RECORD));
        let scan =
            find_certificates(&mut card, &ScanPolicy::default(), &CancelToken::new()).unwrap();
        assert!(scan.is_complete());
        // First address already yielded both; nothing further was read.
        assert_eq!(card.sent.len(), 1);
    }

    #[test]
    fn scanner_walks_full_space_when_asked() {
        let mut card = ScriptedCard::new(|_: &[u8]| success(FULL_RECORD));
        let policy = ScanPolicy {
            stop_when_complete: false,
        };
        let scan = find_certificates(&mut card, &policy, &CancelToken::new()).unwrap();
        assert!(scan.is_complete());
        assert_eq!(card.sent.len(), 32 * 17);
    }

    #[test]
    fn scanner_honors_cancellation() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut card = ScriptedCard::new(|_: &[u8]| status(0x6A, 0x82));
        let err = find_certificates(&mut card, &ScanPolicy::default(), &cancel).unwrap_err();
        assert!(matches!(err, ExtractError::Cancelled));
        assert!(card.sent.is_empty());
    }

    // Record template wrapping an eight-byte BCD PAN ending in 3456.
    const PAN_RECORD: &[u8] = &[
        0x70, 0x0A, //
        0x5A, 0x08, 0x45, 0x71, 0x23, 0x88, 0x90, 0x12, 0x34, 0x56,
    ];

    #[test]
    fn pan_scan_renders_last_four_digits() {
        // Only (sfi=2, record=3) carries data; it wants Le=0C first.
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            assert!(is_read_record(cmd));
            if cmd[2] == 3 && cmd[3] == (2 << 3) | 4 {
                if cmd[4] == 0x00 {
                    status(0x6C, 0x0C)
                } else {
                    assert_eq!(cmd[4], 0x0C);
                    success(PAN_RECORD)
                }
            } else {
                status(0x6A, 0x82)
            }
        });

        let pan = find_pan(&mut card, &CancelToken::new()).unwrap();
        assert_eq!(pan.as_deref(), Some("3456"));
    }

    #[test]
    fn pan_scan_stops_at_first_match() {
        let mut card = ScriptedCard::new(|_: &[u8]| success(PAN_RECORD));
        let pan = find_pan(&mut card, &CancelToken::new()).unwrap();
        assert_eq!(pan.as_deref(), Some("3456"));
        assert_eq!(card.sent.len(), 1);
    }

    #[test]
    fn pan_scan_passes_over_short_pans() {
        // (0,0) holds a truncated four-byte PAN, nothing else anywhere.
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            if cmd[2] == 0 && cmd[3] == 0x04 {
                success(&[0x70, 0x06, 0x5A, 0x04, 0x12, 0x34, 0x56, 0x78])
            } else {
                status(0x6A, 0x82)
            }
        });
        let pan = find_pan(&mut card, &CancelToken::new()).unwrap();
        assert_eq!(pan, None);
        assert_eq!(card.sent.len(), 32 * 17);
    }

    #[test]
    fn require_certificates_demands_both() {
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            if cmd[2] == 0 && cmd[3] == 0x04 {
                success(ICC_RECORD)
            } else {
                status(0x6A, 0x83)
            }
        });
        let err = require_certificates(&mut card, &ScanPolicy::default(), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ExtractError::CertificateNotFound));
    }

    #[test]
    fn locator_picks_first_matching_candidate() {
        let candidates = vec![
            vec![0xA0, 0x00, 0x00, 0x00, 0x04, 0x10, 0x10],
            vec![0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10],
            vec![0xA0, 0x00, 0x00, 0x00, 0x00, 0x25, 0x10],
            vec![0xA0, 0x00, 0x00, 0x00, 0x99, 0x99, 0x99],
        ];
        let mut selects = 0;
        let mut card = ScriptedCard::new(move |cmd: &[u8]| {
            assert!(is_select(cmd));
            selects += 1;
            if selects == 3 {
                status(0x61, 0x23)
            } else {
                status(0x6A, 0x82)
            }
        });

        let matched = detect_application(&mut card, &candidates).unwrap();
        assert_eq!(matched, Some(candidates[2].clone()));
        // First match wins; no SELECT issued afterwards.
        assert_eq!(card.sent.len(), 3);
    }

    #[test]
    fn locator_reports_no_match() {
        let mut card = ScriptedCard::new(|_: &[u8]| status(0x6A, 0x82));
        let matched =
            detect_application(&mut card, &ExtractConfig::default().candidate_aids).unwrap();
        assert_eq!(matched, None);
        assert_eq!(card.sent.len(), 3);
    }

    #[test]
    fn cpcl_fetch_retries_with_corrected_length() {
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            assert!(is_get_data(cmd));
            assert_eq!(&cmd[..4], &[0x80, 0xCA, 0x9F, 0x7F]);
            if cmd[4] == 0x00 {
                status(0x6C, 0x08)
            } else {
                assert_eq!(cmd[4], 0x08);
                success(&[1, 2, 3, 4, 5, 6, 7, 8])
            }
        });
        let cpcl = fetch_cpcl(&mut card).unwrap();
        assert_eq!(cpcl, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn cpcl_fetch_reports_absence() {
        let mut card = ScriptedCard::new(|_: &[u8]| status(0x6A, 0x88));
        assert!(matches!(
            fetch_cpcl(&mut card),
            Err(ExtractError::CpclNotPresent)
        ));
    }

    #[test]
    fn cpcl_fetch_surfaces_unexpected_status() {
        let mut card = ScriptedCard::new(|_: &[u8]| status(0x69, 0x85));
        assert!(matches!(
            fetch_cpcl(&mut card),
            Err(ExtractError::CardStatus {
                sw1: 0x69,
                sw2: 0x85
            })
        ));
    }

    #[test]
    fn extract_all_fails_on_unknown_card() {
        // No CPCL, no AID match: pipeline must stop before scanning.
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            assert!(!is_read_record(cmd));
            status(0x6A, 0x82)
        });
        let err = extract_all(&mut card, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownCardType));
    }

    #[test]
    fn extract_all_fails_without_any_data() {
        // AID matches but the card has neither CPCL nor certificates.
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            if is_select(cmd) {
                status(0x61, 0x10)
            } else {
                status(0x6A, 0x82)
            }
        });
        let err = extract_all(&mut card, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::NoExtractableData));
    }

    #[test]
    fn extract_all_assembles_in_fixed_order() {
        let cpcl = [0x10u8, 0x11, 0x12];
        let mut card = ScriptedCard::new(move |cmd: &[u8]| {
            if is_get_data(cmd) {
                if cmd[4] == 0x00 {
                    status(0x6C, cpcl.len() as u8)
                } else {
                    success(&cpcl)
                }
            } else if is_select(cmd) {
                status(0x61, 0x20)
            } else if cmd[2] == 2 && cmd[3] == 0x0C {
                // Only (sfi=1, record=2) holds data.
                success(FULL_RECORD)
            } else {
                status(0x6A, 0x83)
            }
        });

        let bundle = extract_all(&mut card, &ExtractConfig::default()).unwrap();
        assert_eq!(bundle.cpcl, Some(vec![0x10, 0x11, 0x12]));
        assert_eq!(bundle.icc_cert, Some(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(bundle.issuer_cert, Some(vec![0xCA, 0xFE]));
        assert_eq!(
            bundle.data(),
            &[0x10, 0x11, 0x12, 0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
        );
    }

    #[test]
    fn extract_all_tolerates_missing_cpcl() {
        let mut card = ScriptedCard::new(|cmd: &[u8]| {
            if is_get_data(cmd) {
                status(0x6A, 0x88)
            } else if is_select(cmd) {
                status(0x61, 0x20)
            } else if cmd[2] == 0 && cmd[3] == 0x04 {
                success(FULL_RECORD)
            } else {
                status(0x6A, 0x83)
            }
        });

        let bundle = extract_all(&mut card, &ExtractConfig::default()).unwrap();
        assert_eq!(bundle.cpcl, None);
        assert_eq!(bundle.data(), &[0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]);
    }
}
