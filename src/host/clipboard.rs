//! System clipboard

use super::Clipboard;
use crate::errors::{KubedevError, Result};

/// Writes to the desktop clipboard through arboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_text(text.to_string()))
            .map_err(|e| KubedevError::Clipboard(e.to_string()))
    }
}
