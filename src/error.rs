// ── Central error type ────────────────────────────────────────────────────────
//
// Only the Rust-facing helpers return `error::Result<T>`.  The exported C
// surface never reports a `ShimError`: it surfaces whatever the wrapped
// native primitive reports (null handle, negative status, errno).

/// Which way a failed conversion was going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// UTF-8 → UTF-16.
    ToWide,
    /// UTF-16 → UTF-8.
    ToNarrow,
}

/// Every error the Rust-facing helpers can produce.
#[derive(Debug)]
pub enum ShimError {
    /// The codepage length query returned zero or the C heap was exhausted.
    Conversion { direction: Direction },

    /// The text contains a NUL before its end, so it cannot cross the C
    /// boundary without being truncated.
    InteriorNul { position: usize },

    /// A converted narrow buffer did not hold valid UTF-8.
    Utf8(std::str::Utf8Error),

    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

impl std::fmt::Display for ShimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conversion { direction: Direction::ToWide } => {
                write!(f, "UTF-8 to UTF-16 conversion failed")
            }
            Self::Conversion { direction: Direction::ToNarrow } => {
                write!(f, "UTF-16 to UTF-8 conversion failed")
            }
            Self::InteriorNul { position } => {
                write!(f, "string contains a NUL at byte {position}")
            }
            Self::Utf8(e) => write!(f, "invalid UTF-8: {e}"),
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
        }
    }
}

impl std::error::Error for ShimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::str::Utf8Error> for ShimError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Utf8(e)
    }
}

impl From<std::ffi::NulError> for ShimError {
    fn from(e: std::ffi::NulError) -> Self {
        Self::InteriorNul {
            position: e.nul_position(),
        }
    }
}

// Lets `?` work on `windows::core::Result<T>` inside `platform::win32`.
#[cfg(windows)]
impl From<windows::core::Error> for ShimError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_conversion() {
        let e = ShimError::Conversion {
            direction: Direction::ToWide,
        };
        assert_eq!(e.to_string(), "UTF-8 to UTF-16 conversion failed");
        let e = ShimError::Conversion {
            direction: Direction::ToNarrow,
        };
        assert_eq!(e.to_string(), "UTF-16 to UTF-8 conversion failed");
    }

    #[test]
    fn display_win32_is_hex() {
        let e = ShimError::Win32 {
            function: "LoadLibraryExW",
            code: 126,
        };
        assert_eq!(e.to_string(), "LoadLibraryExW failed (error 0x0000007e)");
    }

    #[test]
    fn nul_error_keeps_position() {
        let err = std::ffi::CString::new("ab\0cd").expect_err("interior nul");
        match ShimError::from(err) {
            ShimError::InteriorNul { position } => assert_eq!(position, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn utf8_error_has_source() {
        let mut bad = b"f".to_vec();
        bad.push(0xFF);
        let err = std::str::from_utf8(&bad).expect_err("invalid");
        let e = ShimError::from(err);
        assert!(std::error::Error::source(&e).is_some());
    }
}
