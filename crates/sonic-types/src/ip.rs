//! IP address and prefix types with safe parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// An IPv4 address wrapper with additional SONiC-specific utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    pub const UNSPECIFIED: Self = Ipv4Address(Ipv4Addr::UNSPECIFIED);

    pub const fn inner(&self) -> Ipv4Addr {
        self.0
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv4Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Ipv4Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

/// An IPv6 address wrapper with additional SONiC-specific utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv6Address(Ipv6Addr);

impl Ipv6Address {
    pub const fn inner(&self) -> Ipv6Addr {
        self.0
    }

    pub const fn octets(&self) -> [u8; 16] {
        self.0.octets()
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv6Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv6Addr>()
            .map(Ipv6Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

/// An IP address that can be either IPv4 or IPv6.
///
/// Addresses order by family first (every IPv4 address sorts before every
/// IPv6 address), then by octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => addr.fmt(f),
            IpAddress::V6(addr) => addr.fmt(f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            s.parse::<Ipv6Address>().map(IpAddress::V6)
        } else {
            s.parse::<Ipv4Address>().map(IpAddress::V4)
        }
    }
}

/// An IP prefix in CIDR notation (e.g., 10.0.0.0/24 or 2001:db8::/32).
///
/// The address keeps its host bits, so an interface prefix such as
/// `10.0.0.1/24` remembers both the interface address and its subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    address: IpAddress,
    prefix_len: u8,
}

impl IpPrefix {
    /// Creates a new IP prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length is invalid for the address type
    /// (>32 for IPv4, >128 for IPv6).
    pub fn new(address: IpAddress, prefix_len: u8) -> Result<Self, ParseError> {
        let max_len = match address {
            IpAddress::V4(_) => 32,
            IpAddress::V6(_) => 128,
        };

        if prefix_len > max_len {
            return Err(ParseError::InvalidIpPrefix(format!(
                "prefix length {} exceeds maximum {} for address type",
                prefix_len, max_len
            )));
        }

        Ok(IpPrefix {
            address,
            prefix_len,
        })
    }

    /// Returns the network address of this prefix.
    pub const fn address(&self) -> &IpAddress {
        &self.address
    }

    /// Returns the prefix length in bits.
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns true if `addr` lies in this prefix's subnet.
    ///
    /// Addresses of the other family are never contained.
    pub fn contains(&self, addr: &IpAddress) -> bool {
        match (&self.address, addr) {
            (IpAddress::V4(net), IpAddress::V4(host)) => {
                let mask = u32::MAX
                    .checked_shl(32 - u32::from(self.prefix_len))
                    .unwrap_or(0);
                u32::from(net.inner()) & mask == u32::from(host.inner()) & mask
            }
            (IpAddress::V6(net), IpAddress::V6(host)) => {
                let mask = u128::MAX
                    .checked_shl(128 - u32::from(self.prefix_len))
                    .unwrap_or(0);
                u128::from(net.inner()) & mask == u128::from(host.inner()) & mask
            }
            _ => false,
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;

        let address: IpAddress = addr_str.parse()?;
        let prefix_len: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;

        IpPrefix::new(address, prefix_len)
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> String {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ip_address_parse() {
        let v4: IpAddress = "10.0.0.1".parse().unwrap();
        assert!(matches!(v4, IpAddress::V4(_)));
        assert_eq!(v4.to_string(), "10.0.0.1");

        let v6: IpAddress = "2001:DB8::1".parse().unwrap();
        assert!(matches!(v6, IpAddress::V6(_)));
        assert_eq!(v6.to_string(), "2001:db8::1");

        assert!("10.0.0.256".parse::<IpAddress>().is_err());
        assert!("2001:db8:::1".parse::<IpAddress>().is_err());
    }

    #[test]
    fn test_ip_prefix_parse() {
        let prefix: IpPrefix = "10.0.0.0/24".parse().unwrap();
        assert_eq!(prefix.address(), &"10.0.0.0".parse::<IpAddress>().unwrap());
        assert_eq!(prefix.prefix_len(), 24);

        let v6_prefix: IpPrefix = "2001:db8::/32".parse().unwrap();
        assert_eq!(v6_prefix.prefix_len(), 32);
        assert!("10.0.0.0".parse::<IpPrefix>().is_err());
    }

    #[test]
    fn test_invalid_prefix_length() {
        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());
        assert!("2001:db8::/129".parse::<IpPrefix>().is_err());
    }

    #[test]
    fn test_ip_address_ordering() {
        let a: IpAddress = "10.0.0.1".parse().unwrap();
        let b: IpAddress = "10.0.0.2".parse().unwrap();
        let v6: IpAddress = "::1".parse().unwrap();
        assert!(a < b);
        assert!(b < v6);
        assert!(a < v6);
    }

    #[test]
    fn test_ip_prefix_contains() {
        let intf: IpPrefix = "10.0.0.1/24".parse().unwrap();
        assert!(intf.contains(&"10.0.0.200".parse().unwrap()));
        assert!(!intf.contains(&"10.0.1.1".parse().unwrap()));
        assert!(!intf.contains(&"::1".parse().unwrap()));

        let host: IpPrefix = "10.0.0.1/32".parse().unwrap();
        assert!(host.contains(&"10.0.0.1".parse().unwrap()));
        assert!(!host.contains(&"10.0.0.2".parse().unwrap()));

        let any: IpPrefix = "0.0.0.0/0".parse().unwrap();
        assert!(any.contains(&"192.0.2.7".parse().unwrap()));

        let v6: IpPrefix = "2001:db8::1/64".parse().unwrap();
        assert!(v6.contains(&"2001:db8::ffff".parse().unwrap()));
        assert!(!v6.contains(&"2001:db9::1".parse().unwrap()));
    }

    #[test]
    fn test_ip_prefix_serde_text_form() {
        let prefix: IpPrefix = "192.168.1.1/24".parse().unwrap();
        let json = serde_json::to_string(&prefix).unwrap();
        assert_eq!(json, "\"192.168.1.1/24\"");
        let back: IpPrefix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefix);
        assert!(serde_json::from_str::<IpPrefix>("\"10.0.0.0/40\"").is_err());
    }

    #[test]
    fn test_display() {
        let prefix: IpPrefix = "192.168.0.0/16".parse().unwrap();
        assert_eq!(prefix.to_string(), "192.168.0.0/16");
    }
}
