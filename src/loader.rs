//! Address list loader.
//!
//! An address file holds one candidate address per line. A line is kept
//! only if its first character is an ASCII digit, so comments and headers
//! can be mixed freely into the file. No syntax validation is done beyond
//! that check: `999.1.2.3` passes through untouched.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::Result;

/// Ordered list of addresses read from a filter file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList {
    addresses: Vec<String>,
    /// Number of lines dropped by the leading-digit filter
    skipped: usize,
}

impl AddressList {
    /// Build a list from already-filtered addresses.
    pub fn new(addresses: Vec<String>) -> Self {
        Self {
            addresses,
            skipped: 0,
        }
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Lines that were read but did not start with a digit.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_inner(self) -> Vec<String> {
        self.addresses
    }
}

/// Whether a line qualifies as an address entry.
pub fn is_address_line(line: &str) -> bool {
    line.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Parse addresses from a reader.
///
/// Input must be UTF-8; a decoding failure is returned as an IO error.
pub fn parse_addresses<R: Read>(reader: R) -> Result<AddressList> {
    let mut list = AddressList::default();

    for line in BufReader::new(reader).lines() {
        let line = line?;

        if is_address_line(&line) {
            list.addresses.push(line.trim_end().to_string());
        } else {
            if !line.trim().is_empty() {
                log::debug!("Skipping non-address line: {:?}", line);
            }
            list.skipped += 1;
        }
    }

    Ok(list)
}

/// Load addresses from a file.
pub fn load_addresses(path: impl AsRef<Path>) -> Result<AddressList> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let list = parse_addresses(file)?;

    log::info!(
        "Loaded {} addresses from {:?} ({} lines skipped)",
        list.len(),
        path,
        list.skipped()
    );

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_filters_non_digit_lines() {
        let text = "# header\n10.0.0.1\nfoo\n192.168.1.0/24\n";
        let list = parse_addresses(text.as_bytes()).unwrap();

        assert_eq!(list.addresses(), ["10.0.0.1", "192.168.1.0/24"]);
        assert_eq!(list.skipped(), 2);
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let text = "3.3.3.3\n1.1.1.1\n3.3.3.3\n";
        let list = parse_addresses(text.as_bytes()).unwrap();

        assert_eq!(list.addresses(), ["3.3.3.3", "1.1.1.1", "3.3.3.3"]);
    }

    #[test]
    fn test_no_syntax_validation() {
        let text = "999.999.999.999\n12abc\n";
        let list = parse_addresses(text.as_bytes()).unwrap();

        assert_eq!(list.addresses(), ["999.999.999.999", "12abc"]);
    }

    #[test]
    fn test_leading_whitespace_rejected() {
        let text = " 10.0.0.1\n\t10.0.0.2\n\n10.0.0.3\r\n";
        let list = parse_addresses(text.as_bytes()).unwrap();

        assert_eq!(list.addresses(), ["10.0.0.3"]);
        assert_eq!(list.skipped(), 3);
    }

    #[test]
    fn test_ipv6_hex_start_rejected() {
        // Only the leading character is inspected.
        let text = "2001:db8::/32\nfe80::1\n";
        let list = parse_addresses(text.as_bytes()).unwrap();

        assert_eq!(list.addresses(), ["2001:db8::/32"]);
    }

    #[test]
    fn test_empty_input() {
        let list = parse_addresses("".as_bytes()).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.skipped(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let bytes: &[u8] = &[0x31, 0xff, 0xfe, b'\n'];
        let err = parse_addresses(bytes).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# blocklist").unwrap();
        writeln!(file, "1.2.3.4").unwrap();
        writeln!(file, "5.6.7.0/24").unwrap();

        let list = load_addresses(file.path()).unwrap();
        assert_eq!(list.into_inner(), vec!["1.2.3.4", "5.6.7.0/24"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_addresses(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
