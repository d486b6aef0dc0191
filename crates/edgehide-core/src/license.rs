//! Activation code check that gates the window picker.
//!
//! The expected code is derived locally from the machine fingerprint,
//! so this is a nag screen rather than a security boundary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Sidecar file holding the activation code, relative to the working directory.
pub const LICENSE_FILE_NAME: &str = "edgehide.lic";

/// Number of trailing hex digits of the fingerprint digest that form the code.
const CODE_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("could not determine machine fingerprint: {0}")]
    Fingerprint(String),
    #[error("activation code does not match this machine")]
    Mismatch,
    #[error("could not save activation code to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns this machine's stable identifier.
pub fn machine_fingerprint() -> Result<String, LicenseError> {
    machine_uid::get().map_err(|e| LicenseError::Fingerprint(e.to_string()))
}

/// Returns the activation code for a fingerprint: the last eight hex
/// digits of its SHA-256 digest, upper-cased.
pub fn expected_code(fingerprint: &str) -> String {
    let digest = Sha256::digest(fingerprint.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02X}")).collect();
    hex[hex.len() - CODE_LEN..].to_string()
}

/// Returns the default sidecar path in the working directory.
pub fn license_path() -> PathBuf {
    PathBuf::from(LICENSE_FILE_NAME)
}

/// Whether `candidate` matches `expected`, ignoring case and surrounding whitespace.
fn code_matches(candidate: &str, expected: &str) -> bool {
    candidate.trim().eq_ignore_ascii_case(expected)
}

/// Fingerprint, expected code, and the persisted authorization.
#[derive(Debug)]
pub struct LicenseGate {
    fingerprint: String,
    expected: String,
    path: PathBuf,
    authorized: bool,
}

impl LicenseGate {
    /// Builds a gate for `fingerprint`, reading any saved code from `path`.
    ///
    /// A missing or unreadable file leaves the gate closed.
    pub fn load(fingerprint: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let fingerprint = fingerprint.into();
        let mut gate = Self {
            expected: expected_code(&fingerprint),
            fingerprint,
            path: path.into(),
            authorized: false,
        };
        gate.refresh();
        gate
    }

    /// Builds a gate for this machine using the default sidecar path.
    pub fn open() -> Result<Self, LicenseError> {
        Ok(Self::load(machine_fingerprint()?, license_path()))
    }

    /// Re-reads the sidecar file, e.g. after another process activated.
    pub fn refresh(&mut self) {
        self.authorized = fs::read_to_string(&self.path)
            .map(|saved| code_matches(&saved, &self.expected))
            .unwrap_or(false);
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// The fingerprint shown to the user when asking for a code.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks `code` and, when it matches, saves it and opens the gate.
    ///
    /// `hide` is applied to the saved file; its failure is logged and
    /// otherwise ignored.
    pub fn activate(
        &mut self,
        code: &str,
        hide: impl FnOnce(&Path) -> io::Result<()>,
    ) -> Result<(), LicenseError> {
        if !code_matches(code, &self.expected) {
            return Err(LicenseError::Mismatch);
        }

        fs::write(&self.path, &self.expected).map_err(|source| LicenseError::Persist {
            path: self.path.clone(),
            source,
        })?;

        if let Err(e) = hide(&self.path) {
            crate::log_warn!("Could not hide {}: {e}", self.path.display());
        }

        self.authorized = true;
        crate::log_info!("Activation code accepted");
        Ok(())
    }
}
