//! Next-hop key and its string encodings.
//!
//! A next-hop represents a single forwarding destination. It comes in three
//! shapes, each with its own `@`-delimited encoding:
//!
//! | shape   | encoding               |
//! |---------|------------------------|
//! | plain   | `ip@alias`             |
//! | overlay | `ip@alias@vni@mac`     |
//! | SRv6    | `ip@segment@source`    |
//!
//! Identity (equality, ordering, hashing) is the flat tuple
//! `(ip_address, alias, vni, mac_address, srv6_segment, srv6_source)`, with
//! fields a shape does not carry taking their empty/zero values.

use crate::error::{EncodingFault, NextHopKeyError, Result};
use crate::resolver::IntfsAliasResolver;
use crate::tokenize::tokenize;
use sonic_types::{IpAddress, Ipv4Address, MacAddress};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::debug;

/// Separates the fields of one next-hop.
pub const NH_DELIMITER: char = '@';
/// Separates next-hops within a next-hop group string.
pub const NHG_DELIMITER: char = ',';
/// Aliases starting with this name a VRF rather than an interface.
pub const VRF_PREFIX: &str = "Vrf";

/// Encoding selected by the caller for explicit-mode parsing and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextHopEncoding {
    /// `ip@alias`
    #[default]
    Plain,
    /// `ip@alias@vni@mac`
    Overlay,
    /// `ip@segment@source`
    Srv6,
}

impl fmt::Display for NextHopEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NextHopEncoding::Plain => "plain",
            NextHopEncoding::Overlay => "overlay",
            NextHopEncoding::Srv6 => "srv6",
        };
        f.write_str(s)
    }
}

impl FromStr for NextHopEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(NextHopEncoding::Plain),
            "overlay" => Ok(NextHopEncoding::Overlay),
            "srv6" => Ok(NextHopEncoding::Srv6),
            _ => Err(format!("unknown next-hop encoding: {}", s)),
        }
    }
}

/// Shape-specific part of a [`NextHopKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHopKind {
    /// Neighbor reached through an interface (possibly VRF-resolved).
    Plain { alias: String },
    /// VxLAN overlay next-hop.
    Overlay {
        alias: String,
        vni: u32,
        mac: MacAddress,
    },
    /// SRv6 next-hop. Both strings are non-empty.
    Srv6 { segment: String, source: String },
}

/// A key identifying a single next-hop.
///
/// Keys are immutable once built. `weight` rides along for next-hop group
/// members but is not part of the key's identity: two keys that differ only
/// in weight are equal, order equal and hash equal.
#[derive(Debug, Clone)]
pub struct NextHopKey {
    ip_address: IpAddress,
    kind: NextHopKind,
    weight: u32,
}

fn parse_ip(input: &str, token: &str) -> Result<IpAddress> {
    token
        .parse()
        .map_err(|_| NextHopKeyError::invalid(input, EncodingFault::IpAddress(token.to_string())))
}

/// Returns the delimiter fault for a field that would split on re-parse.
fn delimiter_fault(field: &'static str, value: &str) -> Option<EncodingFault> {
    if value.contains(NH_DELIMITER) || value.contains(NHG_DELIMITER) {
        return Some(EncodingFault::Delimiter(field, value.to_string()));
    }
    None
}

/// Mirrors the IPv4 word of the address: the whole address for IPv4, the
/// leading 32 bits for IPv6.
fn ipv4_component_is_zero(ip: &IpAddress) -> bool {
    match ip {
        IpAddress::V4(addr) => *addr == Ipv4Address::UNSPECIFIED,
        IpAddress::V6(addr) => addr.octets()[..4] == [0; 4],
    }
}

fn reject_group(input: &str) -> Result<()> {
    if input.contains(NHG_DELIMITER) {
        return Err(NextHopKeyError::invalid(input, EncodingFault::GroupDelimiter));
    }
    Ok(())
}

impl NextHopKey {
    /// Creates a plain next-hop from a parsed address and interface alias.
    ///
    /// `alias` is taken as given. It should be non-empty and free of `@` and
    /// `,` for the key's encoding to parse back.
    pub fn new(ip_address: IpAddress, alias: impl Into<String>) -> Self {
        Self {
            ip_address,
            kind: NextHopKind::Plain {
                alias: alias.into(),
            },
            weight: 0,
        }
    }

    /// Creates a plain next-hop from address text and interface alias.
    pub fn from_parts(ip: &str, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        let ip_address = ip.parse().map_err(|_| {
            NextHopKeyError::invalid(
                format!("{}{}{}", ip, NH_DELIMITER, alias),
                EncodingFault::IpAddress(ip.to_string()),
            )
        })?;
        Ok(Self::new(ip_address, alias))
    }

    /// Creates an interface-only next-hop (`0.0.0.0@alias`).
    pub fn interface_only(alias: impl Into<String>) -> Self {
        Self::new(IpAddress::V4(Ipv4Address::UNSPECIFIED), alias)
    }

    /// Creates a VxLAN overlay next-hop.
    ///
    /// # Errors
    ///
    /// Fails if `alias` contains `@` or `,`.
    pub fn overlay(
        ip_address: IpAddress,
        alias: impl Into<String>,
        vni: u32,
        mac: MacAddress,
    ) -> Result<Self> {
        let alias = alias.into();
        if let Some(fault) = delimiter_fault("alias", &alias) {
            let input = format!(
                "{ip}{d}{alias}{d}{vni}{d}{mac}",
                ip = ip_address,
                d = NH_DELIMITER,
            );
            return Err(NextHopKeyError::invalid(input, fault));
        }
        Ok(Self {
            ip_address,
            kind: NextHopKind::Overlay { alias, vni, mac },
            weight: 0,
        })
    }

    /// Creates an SRv6 next-hop.
    ///
    /// # Errors
    ///
    /// Fails if `segment` or `source` is empty or contains `@` or `,`.
    pub fn srv6(
        ip_address: IpAddress,
        segment: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        let segment = segment.into();
        let source = source.into();
        let fault = if segment.is_empty() {
            Some(EncodingFault::EmptySrv6Field("segment"))
        } else if source.is_empty() {
            Some(EncodingFault::EmptySrv6Field("source"))
        } else {
            delimiter_fault("segment", &segment).or_else(|| delimiter_fault("source", &source))
        };
        if let Some(fault) = fault {
            let input = format!(
                "{}{}{}{}{}",
                ip_address, NH_DELIMITER, segment, NH_DELIMITER, source
            );
            return Err(NextHopKeyError::invalid(input, fault));
        }
        Ok(Self {
            ip_address,
            kind: NextHopKind::Srv6 { segment, source },
            weight: 0,
        })
    }

    /// Sets the group member weight. Does not affect identity.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Parses a key, inferring its shape from the number of fields.
    ///
    /// - `ip`: the alias is the router interface whose subnet holds `ip`.
    /// - `ip@alias`: taken as-is, unless `alias` names a VRF (`Vrf...`), in
    ///   which case it is replaced by the interface in that VRF holding `ip`.
    ///
    /// Anything else, including a string holding a whole next-hop group, is
    /// rejected. Resolution failures are parse failures.
    pub fn parse<R>(s: &str, resolver: &R) -> Result<Self>
    where
        R: IntfsAliasResolver + ?Sized,
    {
        reject_group(s)?;

        let tokens = tokenize(s, NH_DELIMITER);
        match tokens.as_slice() {
            [ip] => {
                let ip_address = parse_ip(s, ip)?;
                let alias = resolver.router_intfs_alias(&ip_address).ok_or_else(|| {
                    NextHopKeyError::invalid(s, EncodingFault::Unresolved(ip.to_string()))
                })?;
                debug!(key = s, alias = %alias, "Resolved next-hop interface");
                Ok(Self::new(ip_address, alias))
            }
            [ip, alias] => {
                let ip_address = parse_ip(s, ip)?;
                if !alias.starts_with(VRF_PREFIX) {
                    return Ok(Self::new(ip_address, *alias));
                }
                let resolved = resolver
                    .vrf_router_intfs_alias(&ip_address, alias)
                    .ok_or_else(|| {
                        NextHopKeyError::invalid(
                            s,
                            EncodingFault::Unresolved(format!("{} in {}", ip, alias)),
                        )
                    })?;
                debug!(key = s, vrf = *alias, alias = %resolved, "Resolved VRF next-hop interface");
                Ok(Self::new(ip_address, resolved))
            }
            _ => Err(NextHopKeyError::invalid(
                s,
                EncodingFault::FieldCount {
                    expected: "1 or 2",
                    found: tokens.len(),
                },
            )),
        }
    }

    /// Parses a key in an encoding chosen by the caller.
    ///
    /// Overlay and SRv6 encodings require exactly four and three fields.
    /// [`NextHopEncoding::Plain`] requires exactly `ip@alias` and performs no
    /// interface resolution.
    pub fn parse_with(s: &str, encoding: NextHopEncoding) -> Result<Self> {
        reject_group(s)?;

        let tokens = tokenize(s, NH_DELIMITER);
        let field_count = |expected| {
            NextHopKeyError::invalid(
                s,
                EncodingFault::FieldCount {
                    expected,
                    found: tokens.len(),
                },
            )
        };

        match encoding {
            NextHopEncoding::Plain => {
                let [ip, alias] = tokens.as_slice() else {
                    return Err(field_count("2"));
                };
                Ok(Self::new(parse_ip(s, ip)?, *alias))
            }
            NextHopEncoding::Srv6 => {
                let [ip, segment, source] = tokens.as_slice() else {
                    return Err(field_count("3"));
                };
                let ip_address = parse_ip(s, ip)?;
                Self::srv6(ip_address, *segment, *source).map_err(|e| {
                    NextHopKeyError::invalid(s, e.reason().clone())
                })
            }
            NextHopEncoding::Overlay => {
                let [ip, alias, vni, mac] = tokens.as_slice() else {
                    return Err(field_count("4"));
                };
                let ip_address = parse_ip(s, ip)?;
                let vni: u32 = vni
                    .parse()
                    .map_err(|_| NextHopKeyError::invalid(s, EncodingFault::Vni(vni.to_string())))?;
                let mac: MacAddress = mac.parse().map_err(|_| {
                    NextHopKeyError::invalid(s, EncodingFault::MacAddress(mac.to_string()))
                })?;
                Self::overlay(ip_address, *alias, vni, mac)
                    .map_err(|e| NextHopKeyError::invalid(s, e.reason().clone()))
            }
        }
    }

    /// Returns the IP address.
    pub fn ip_address(&self) -> &IpAddress {
        &self.ip_address
    }

    /// Returns the shape-specific fields.
    pub fn kind(&self) -> &NextHopKind {
        &self.kind
    }

    /// Returns the interface alias (empty for SRv6).
    pub fn alias(&self) -> &str {
        match &self.kind {
            NextHopKind::Plain { alias } | NextHopKind::Overlay { alias, .. } => alias,
            NextHopKind::Srv6 { .. } => "",
        }
    }

    /// Returns the VNI (0 if not an overlay next-hop).
    pub fn vni(&self) -> u32 {
        match &self.kind {
            NextHopKind::Overlay { vni, .. } => *vni,
            _ => 0,
        }
    }

    /// Returns the overlay MAC ([`MacAddress::ZERO`] if not an overlay next-hop).
    pub fn mac_address(&self) -> MacAddress {
        match &self.kind {
            NextHopKind::Overlay { mac, .. } => *mac,
            _ => MacAddress::ZERO,
        }
    }

    /// Returns the SRv6 segment (empty if not SRv6).
    pub fn srv6_segment(&self) -> &str {
        match &self.kind {
            NextHopKind::Srv6 { segment, .. } => segment,
            _ => "",
        }
    }

    /// Returns the SRv6 source (empty if not SRv6).
    pub fn srv6_source(&self) -> &str {
        match &self.kind {
            NextHopKind::Srv6 { source, .. } => source,
            _ => "",
        }
    }

    /// Returns the group member weight.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Returns true if this next-hop is reached only through its interface.
    ///
    /// That is the case when the IPv4 component of the address is zero and
    /// the key is not SRv6. For IPv6 the IPv4 component is the leading 32
    /// bits, so `::1` and `::ffff:10.0.0.1` qualify.
    pub fn is_intf_nexthop(&self) -> bool {
        ipv4_component_is_zero(&self.ip_address) && !self.is_srv6_nexthop()
    }

    /// Returns true if this is an SRv6 next-hop.
    pub fn is_srv6_nexthop(&self) -> bool {
        matches!(self.kind, NextHopKind::Srv6 { .. })
    }

    /// Returns true if this is a VxLAN overlay next-hop.
    pub fn is_overlay_nexthop(&self) -> bool {
        matches!(self.kind, NextHopKind::Overlay { .. })
    }

    /// Returns the encoding that [`encode`](Self::encode) uses for this key.
    pub fn encoding(&self) -> NextHopEncoding {
        match self.kind {
            NextHopKind::Plain { .. } => NextHopEncoding::Plain,
            NextHopKind::Overlay { .. } => NextHopEncoding::Overlay,
            NextHopKind::Srv6 { .. } => NextHopEncoding::Srv6,
        }
    }

    /// Encodes the key in the form matching its shape.
    ///
    /// Overlay and SRv6 keys, and plain keys whose alias is non-empty and
    /// free of delimiters, parse back to an equal key with
    /// [`parse_with`](Self::parse_with) and [`encoding`](Self::encoding).
    pub fn encode(&self) -> String {
        self.encode_as(self.encoding())
    }

    /// Encodes the key in the given form, using default values for fields
    /// the key does not carry.
    pub fn encode_as(&self, encoding: NextHopEncoding) -> String {
        match encoding {
            NextHopEncoding::Plain => self.to_string(),
            NextHopEncoding::Overlay => format!(
                "{ip}{d}{alias}{d}{vni}{d}{mac}",
                ip = self.ip_address,
                alias = self.alias(),
                vni = self.vni(),
                mac = self.mac_address(),
                d = NH_DELIMITER,
            ),
            NextHopEncoding::Srv6 => format!(
                "{ip}{d}{segment}{d}{source}",
                ip = self.ip_address,
                segment = self.srv6_segment(),
                source = self.srv6_source(),
                d = NH_DELIMITER,
            ),
        }
    }

    fn identity(&self) -> (&IpAddress, &str, u32, MacAddress, &str, &str) {
        (
            &self.ip_address,
            self.alias(),
            self.vni(),
            self.mac_address(),
            self.srv6_segment(),
            self.srv6_source(),
        )
    }
}

impl PartialEq for NextHopKey {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for NextHopKey {}

impl PartialOrd for NextHopKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NextHopKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl Hash for NextHopKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // weight is not hashed: same NH with different weights is same NH
        self.identity().hash(state);
    }
}

/// Formats as `ip@alias`, whatever the shape.
impl fmt::Display for NextHopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.ip_address, NH_DELIMITER, self.alias())
    }
}
