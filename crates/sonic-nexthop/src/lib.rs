//! Next-hop keys for SONiC route orchestration.
//!
//! [`NextHopKey`] names one forwarding next-hop and converts to and from the
//! `@`-delimited strings used as config and IPC keys:
//!
//! - `ip@alias` for a neighbor behind an interface
//! - `ip@alias@vni@mac` for a VxLAN overlay next-hop
//! - `ip@segment@source` for an SRv6 next-hop
//!
//! Keys compare, order and hash on their identity fields only, so they can be
//! used directly in the sorted sets that make up next-hop groups.
//!
//! Parsing a key without an explicit interface (`10.0.0.1`) or with a VRF in
//! place of one (`10.0.0.1@VrfRed`) needs an [`IntfsAliasResolver`], passed
//! in by the caller. [`RouterIntfsTable`] is an in-memory implementation.
//!
//! ```
//! use sonic_nexthop::{NextHopEncoding, NextHopKey, RouterIntfsTable};
//!
//! let mut intfs = RouterIntfsTable::new();
//! intfs.add_interface("Ethernet0", None, vec!["10.0.0.0/31".parse().unwrap()]);
//!
//! let nh = NextHopKey::parse("10.0.0.1", &intfs).unwrap();
//! assert_eq!(nh.to_string(), "10.0.0.1@Ethernet0");
//!
//! let overlay =
//!     NextHopKey::parse_with("10.0.0.1@Vxlan1@100@00:11:22:33:44:55", NextHopEncoding::Overlay)
//!         .unwrap();
//! assert_eq!(overlay.vni(), 100);
//! ```

mod error;
mod nexthop;
mod resolver;
mod tokenize;

pub use error::{EncodingFault, NextHopKeyError, Result, RouterIntfsError};
pub use nexthop::{
    NextHopEncoding, NextHopKey, NextHopKind, NHG_DELIMITER, NH_DELIMITER, VRF_PREFIX,
};
pub use resolver::{
    IntfsAliasResolver, RouterIntfConfig, RouterIntfEntry, RouterIntfsConfig, RouterIntfsTable,
};
pub use tokenize::tokenize;
