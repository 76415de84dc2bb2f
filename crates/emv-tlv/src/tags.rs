//! EMV tag identifiers relevant to certificate extraction.

/// Record Template wrapping the data objects of a read record.
pub const RECORD_TEMPLATE: u16 = 0x70;
/// File Control Information template from a SELECT response.
pub const FCI_TEMPLATE: u16 = 0x6F;
/// Application Primary Account Number.
pub const APPLICATION_PAN: u16 = 0x5A;
/// Certification Authority Public Key Index.
pub const CA_PUBLIC_KEY_INDEX: u16 = 0x8F;
/// Issuer Public Key Certificate.
pub const ISSUER_PK_CERTIFICATE: u16 = 0x90;
/// Issuer Public Key Remainder.
pub const ISSUER_PK_REMAINDER: u16 = 0x92;
/// ICC Public Key Certificate.
pub const ICC_PK_CERTIFICATE: u16 = 0x9F46;
/// ICC Public Key Exponent.
pub const ICC_PK_EXPONENT: u16 = 0x9F47;
/// ICC Public Key Remainder.
pub const ICC_PK_REMAINDER: u16 = 0x9F48;
/// Card Production Life Cycle data object (fetched via GET DATA).
pub const CPCL_DATA: u16 = 0x9F7F;

/// Human-readable name for a tag, for logs and CLI output.
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        RECORD_TEMPLATE => "Record Template",
        FCI_TEMPLATE => "FCI Template",
        APPLICATION_PAN => "Application PAN",
        CA_PUBLIC_KEY_INDEX => "CA Public Key Index",
        ISSUER_PK_CERTIFICATE => "Issuer Public Key Certificate",
        ISSUER_PK_REMAINDER => "Issuer Public Key Remainder",
        ICC_PK_CERTIFICATE => "ICC Public Key Certificate",
        ICC_PK_EXPONENT => "ICC Public Key Exponent",
        ICC_PK_REMAINDER => "ICC Public Key Remainder",
        CPCL_DATA => "Card Production Life Cycle Data",
        _ => "Unknown Tag",
    }
}
