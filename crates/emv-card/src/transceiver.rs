//! Card transceiver abstraction and the PC/SC-backed session.

use pcsc::{Card, Disposition, MAX_BUFFER_SIZE};

use crate::apdu::ApduResponse;
use crate::error::ExtractError;

/// Capability to exchange one APDU with a connected card.
///
/// One command is in flight at a time; a session must not be shared
/// between threads without external serialization. The extraction
/// pipeline is generic over this trait so tests can script a card.
pub trait Transceiver {
    /// Send `command` to the card and return its payload and status word.
    fn transmit(&mut self, command: &[u8]) -> Result<ApduResponse, ExtractError>;
}

/// A connected card plus its receive scratch buffer.
///
/// Owns the `pcsc::Card` handle for the duration of an extraction run;
/// dropping the session releases the handle. This replaces any notion of
/// process-wide card state: everything an exchange needs lives here.
pub struct CardSession {
    card: Card,
    recv_buf: Box<[u8; MAX_BUFFER_SIZE]>,
}

impl CardSession {
    /// Wrap an already-connected card.
    pub fn new(card: Card) -> Self {
        Self {
            card,
            recv_buf: Box::new([0; MAX_BUFFER_SIZE]),
        }
    }

    /// Access the underlying PC/SC card handle.
    pub fn card(&self) -> &Card {
        &self.card
    }

    /// Disconnect, unpowering the card.
    pub fn disconnect(self) -> Result<(), ExtractError> {
        self.card
            .disconnect(Disposition::UnpowerCard)
            .map_err(|(_, err)| ExtractError::ReaderUnavailable(err))
    }
}

impl Transceiver for CardSession {
    fn transmit(&mut self, command: &[u8]) -> Result<ApduResponse, ExtractError> {
        let rapdu = self
            .card
            .transmit(command, &mut self.recv_buf[..])
            .map_err(ExtractError::TransmitFailed)?;

        if rapdu.len() < 2 {
            return Err(ExtractError::ShortResponse);
        }

        let sw1 = rapdu[rapdu.len() - 2];
        let sw2 = rapdu[rapdu.len() - 1];
        let data = rapdu[..rapdu.len() - 2].to_vec();

        Ok(ApduResponse { data, sw1, sw2 })
    }
}
