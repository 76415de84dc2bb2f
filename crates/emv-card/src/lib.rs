//! EMV Card - Smart card access and certificate extraction
//!
//! This crate talks to EMV payment cards through PC/SC readers and
//! implements the extraction pipeline that pulls certificate material off
//! a card: application detection over a configurable AID list, the
//! SFI/record scan for the ICC and issuer public key certificates, the
//! CPCL data object fetch, and the final assembly into one bundle. A
//! companion scan recovers the Application PAN's last four digits for
//! labelling a card.
//!
//! Card access goes through the [`Transceiver`] trait, so the whole
//! pipeline runs unchanged against a simulated card in tests.

pub mod apdu;
pub mod error;
pub mod extract;
pub mod reader;
pub mod transceiver;

pub use apdu::{ApduCommand, ApduResponse};
pub use error::ExtractError;
pub use extract::{
    aids, detect_application, extract_all, fetch_cpcl, find_certificates, find_pan,
    require_certificates, CancelToken, CertificateScan, ExtractConfig, ExtractionBundle,
    ScanPolicy,
};
pub use reader::CardReader;
pub use transceiver::{CardSession, Transceiver};

/// Re-export commonly used types
pub use pcsc::{Card, Context, Error as PcscError};
