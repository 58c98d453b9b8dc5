//! IP address validation for submitted candidates.

use std::net::IpAddr;

/// Returns true iff `candidate` is a standard-form IPv4 or IPv6 literal.
///
/// No hostname resolution, no CIDR suffixes, no zone ids, no whitespace.
pub fn is_valid_address(candidate: &str) -> bool {
    candidate.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ipv4_and_ipv6() {
        assert!(is_valid_address("192.168.1.1"));
        assert!(is_valid_address("::1"));
        assert!(is_valid_address("2001:db8::8a2e:370:7334"));
        assert!(is_valid_address("::ffff:10.0.0.1"));
    }

    #[test]
    fn test_rejects_non_addresses() {
        assert!(!is_valid_address("999.1.1.1"));
        assert!(!is_valid_address("not-an-ip"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("10.0.0.0/8"));
        assert!(!is_valid_address(" 10.0.0.1"));
        assert!(!is_valid_address("localhost"));
    }
}
