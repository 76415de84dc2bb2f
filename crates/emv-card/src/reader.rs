//! PC/SC card reader management

use pcsc::{Context, Protocols, Scope, ShareMode};
use tracing::debug;

use crate::error::ExtractError;
use crate::transceiver::CardSession;

/// Card reader wrapper for managing PC/SC connections
pub struct CardReader {
    context: Context,
}

impl CardReader {
    /// Create a new CardReader by establishing a PC/SC context
    pub fn new() -> Result<Self, ExtractError> {
        let context =
            Context::establish(Scope::User).map_err(ExtractError::ReaderUnavailable)?;
        Ok(Self { context })
    }

    /// List all available card readers
    pub fn list_readers(&self) -> Result<Vec<String>, ExtractError> {
        let mut readers_buf = [0; 2048];
        let readers = self
            .context
            .list_readers(&mut readers_buf)
            .map_err(ExtractError::ReaderUnavailable)?;

        Ok(readers
            .map(|r| r.to_str().unwrap_or("Unknown").to_string())
            .collect())
    }

    /// Connect to the reader at `index` in the enumeration order of
    /// [`list_readers`](Self::list_readers).
    pub fn connect_index(&self, index: usize) -> Result<(CardSession, String), ExtractError> {
        let mut readers_buf = [0; 2048];
        let readers = self
            .context
            .list_readers(&mut readers_buf)
            .map_err(ExtractError::ReaderUnavailable)?;

        let reader = readers
            .into_iter()
            .nth(index)
            .ok_or(ExtractError::ReaderUnavailable(
                pcsc::Error::NoReadersAvailable,
            ))?;
        let reader_name = reader.to_str().unwrap_or("Unknown").to_string();
        debug!(reader = %reader_name, "connecting to card");

        let card = self
            .context
            .connect(reader, ShareMode::Shared, Protocols::ANY)
            .map_err(ExtractError::ReaderUnavailable)?;
        Ok((CardSession::new(card), reader_name))
    }

    /// Connect to the first available reader
    pub fn connect_first(&self) -> Result<(CardSession, String), ExtractError> {
        self.connect_index(0)
    }

    /// Connect to a specific reader by name (CStr)
    pub fn connect(&self, reader_name: &std::ffi::CStr) -> Result<CardSession, ExtractError> {
        let card = self
            .context
            .connect(reader_name, ShareMode::Shared, Protocols::ANY)
            .map_err(ExtractError::ReaderUnavailable)?;
        Ok(CardSession::new(card))
    }
}
