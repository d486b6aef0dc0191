pub mod init;
pub mod license;

#[cfg(windows)]
mod client;
#[cfg(windows)]
pub mod daemon;
#[cfg(windows)]
pub mod list;
#[cfg(windows)]
pub mod pick;
#[cfg(windows)]
pub mod start;
#[cfg(windows)]
pub mod status;
#[cfg(windows)]
pub mod stop;
#[cfg(windows)]
pub mod window;

/// Parses a window handle written as `0x1A2B` or as a decimal number.
pub fn parse_hwnd(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    match parsed {
        Ok(0) => Err("window handle cannot be zero".into()),
        Ok(hwnd) => Ok(hwnd),
        Err(_) => Err(format!("'{s}' is not a window handle")),
    }
}

/// Reports that the daemon commands need Windows.
#[cfg(not(windows))]
pub fn unsupported() {
    eprintln!("Error: this command is only available on Windows.");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::parse_hwnd;

    #[test]
    fn hwnd_accepts_hex_and_decimal() {
        assert_eq!(parse_hwnd("0x1A2B"), Ok(0x1A2B));
        assert_eq!(parse_hwnd("0x1a2b"), Ok(0x1A2B));
        assert_eq!(parse_hwnd("6699"), Ok(6699));
    }

    #[test]
    fn hwnd_rejects_garbage_and_zero() {
        assert!(parse_hwnd("notepad").is_err());
        assert!(parse_hwnd("0xZZ").is_err());
        assert!(parse_hwnd("0").is_err());
    }
}
