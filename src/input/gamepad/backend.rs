//! Platform backend selection
//!
//! XInput is preferred where it exists (Windows). gilrs covers everything
//! else when the `gilrs-backend` feature is enabled. Without either, the
//! bank still runs against a backend that reports every slot as empty.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::frame::{DisconnectedSource, FrameSource, NullSink, RawFrame, Vibration, VibrationSink};

#[cfg(feature = "gilrs-backend")]
use super::gilrs_convert::GilrsBackend;
#[cfg(windows)]
use super::xinput_convert::XInputBackend;

/// Errors raised while opening a platform backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("XInput library not available: {0}")]
    XInputUnavailable(String),

    #[error("gilrs initialization failed: {0}")]
    GilrsUnavailable(String),

    #[error("{0} backend is not available in this build")]
    NotCompiled(&'static str),
}

/// Which backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// XInput, then gilrs, then no backend
    #[default]
    Auto,
    Xinput,
    Gilrs,
    /// Every slot stays disconnected
    None,
}

/// Opened backend; clones share the same device context
#[derive(Clone)]
pub enum PlatformBackend {
    #[cfg(windows)]
    XInput(XInputBackend),
    #[cfg(feature = "gilrs-backend")]
    Gilrs(GilrsBackend),
    Null,
}

impl PlatformBackend {
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(windows)]
            PlatformBackend::XInput(_) => "xinput",
            #[cfg(feature = "gilrs-backend")]
            PlatformBackend::Gilrs(_) => "gilrs",
            PlatformBackend::Null => "none",
        }
    }
}

impl FrameSource for PlatformBackend {
    fn read_frame(&mut self, slot: usize) -> RawFrame {
        match self {
            #[cfg(windows)]
            PlatformBackend::XInput(backend) => backend.read_frame(slot),
            #[cfg(feature = "gilrs-backend")]
            PlatformBackend::Gilrs(backend) => backend.read_frame(slot),
            PlatformBackend::Null => DisconnectedSource.read_frame(slot),
        }
    }
}

impl VibrationSink for PlatformBackend {
    fn set_vibration(&mut self, slot: usize, vibration: Vibration) {
        match self {
            #[cfg(windows)]
            PlatformBackend::XInput(backend) => backend.set_vibration(slot, vibration),
            #[cfg(feature = "gilrs-backend")]
            PlatformBackend::Gilrs(backend) => backend.set_vibration(slot, vibration),
            PlatformBackend::Null => NullSink.set_vibration(slot, vibration),
        }
    }
}

#[cfg(windows)]
fn open_xinput() -> Result<PlatformBackend, BackendError> {
    XInputBackend::load().map(PlatformBackend::XInput)
}

#[cfg(not(windows))]
fn open_xinput() -> Result<PlatformBackend, BackendError> {
    Err(BackendError::NotCompiled("xinput"))
}

#[cfg(feature = "gilrs-backend")]
fn open_gilrs() -> Result<PlatformBackend, BackendError> {
    GilrsBackend::load().map(PlatformBackend::Gilrs)
}

#[cfg(not(feature = "gilrs-backend"))]
fn open_gilrs() -> Result<PlatformBackend, BackendError> {
    Err(BackendError::NotCompiled("gilrs"))
}

/// Open the requested backend
///
/// `Auto` never fails: it falls back to the null backend with a warning.
pub fn open(kind: BackendKind) -> Result<PlatformBackend, BackendError> {
    let backend = match kind {
        BackendKind::Xinput => open_xinput()?,
        BackendKind::Gilrs => open_gilrs()?,
        BackendKind::None => PlatformBackend::Null,
        BackendKind::Auto => match open_xinput() {
            Ok(backend) => backend,
            Err(xinput_err) => match open_gilrs() {
                Ok(backend) => backend,
                Err(gilrs_err) => {
                    warn!(
                        "⚠️  No gamepad backend available ({}; {}). All slots will stay disconnected.",
                        xinput_err, gilrs_err
                    );
                    PlatformBackend::Null
                },
            },
        },
    };

    info!("Gamepad backend: {}", backend.name());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_backend() {
        let mut backend = open(BackendKind::None).unwrap();
        assert_eq!(backend.name(), "none");
        assert_eq!(backend.read_frame(0), RawFrame::disconnected());
        backend.set_vibration(0, Vibration::new(1, 1));
    }

    #[test]
    fn test_auto_never_fails() {
        assert!(open(BackendKind::Auto).is_ok());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_xinput_missing_off_windows() {
        let err = open(BackendKind::Xinput).err().unwrap();
        assert!(matches!(err, BackendError::NotCompiled("xinput")));
        assert_eq!(err.to_string(), "xinput backend is not available in this build");
    }

    #[test]
    fn test_backend_kind_from_yaml() {
        let kind: BackendKind = serde_yaml::from_str("gilrs").unwrap();
        assert_eq!(kind, BackendKind::Gilrs);
        assert_eq!(BackendKind::default(), BackendKind::Auto);
    }
}
