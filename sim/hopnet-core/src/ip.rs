//! Syntactic validation of dotted-quad IPv4 addresses.
//!
//! Addresses are kept as the strings the operator typed. Nothing here
//! canonicalizes them, so `"10.0.0.01"` and `"10.0.0.1"` are both valid but
//! remain different keys everywhere else in the crate.

/// Number of octets in an IPv4 address.
pub const OCTETS: usize = 4;

/// Returns `true` if `ip` is four dot-separated decimal octets, each in
/// `0..=255`.
///
/// # Examples
///
/// ```
/// use hopnet_core::ip::validate;
///
/// assert!(validate("192.168.1.1"));
/// assert!(!validate("192.168.1"));
/// assert!(!validate("192.168.1.256"));
/// ```
pub fn validate(ip: &str) -> bool {
    octets(ip).is_some()
}

/// Parses `ip` into its four octets, or returns `None` if it is not a valid
/// dotted-quad address.
///
/// Leading zeros are accepted and read numerically, so `"01.2.3.4"` gives
/// `[1, 2, 3, 4]`.
pub fn octets(ip: &str) -> Option<[u8; OCTETS]> {
    let mut result = [0u8; OCTETS];
    let mut count = 0;
    for token in ip.split('.') {
        if count == OCTETS {
            return None;
        }
        result[count] = octet(token)?;
        count += 1;
    }
    (count == OCTETS).then_some(result)
}

fn octet(token: &str) -> Option<u8> {
    // `str::parse` accepts a leading '+', which is not part of an address
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
