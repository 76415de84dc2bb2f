//! Error type shared across the extraction pipeline.

use emv_tlv::TlvError;
use thiserror::Error;

/// Failures surfaced by the reader layer and the extraction pipeline.
///
/// The `0x6A` (no record) and `0x6C` (wrong length) status words are
/// handled inside the scanner and fetcher and never surface here; any
/// other unexpected status is reported with its literal SW1/SW2 so a
/// caller can tell "this card does not support this" apart from "the
/// reader or connection is broken".
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No reader could be found or the PC/SC context is unusable.
    #[error("card reader unavailable: {0}")]
    ReaderUnavailable(#[source] pcsc::Error),

    /// An APDU round trip to the card failed at the transport level.
    #[error("APDU transmission failed: {0}")]
    TransmitFailed(#[source] pcsc::Error),

    /// The card answered with fewer than the two status word bytes.
    #[error("card response shorter than a status word")]
    ShortResponse,

    /// The card answered with a status word the pipeline does not handle.
    #[error("unexpected card status {sw1:02X} {sw2:02X}")]
    CardStatus { sw1: u8, sw2: u8 },

    /// A card response could not be decoded as BER-TLV.
    #[error("malformed TLV in card response: {0}")]
    Decode(#[from] TlvError),

    /// The record scan finished without finding a required certificate.
    #[error("certificate not found in any record")]
    CertificateNotFound,

    /// The card carries no CPCL data object.
    #[error("no CPCL data on the card")]
    CpclNotPresent,

    /// No candidate application identifier matched the card.
    #[error("unknown card type: no candidate application matched")]
    UnknownCardType,

    /// The card yielded neither CPCL data nor any certificate.
    #[error("no extractable data on the card")]
    NoExtractableData,

    /// The extraction was cancelled between record attempts.
    #[error("extraction cancelled")]
    Cancelled,
}
