//! Interface alias resolution for next-hop parsing.
//!
//! A next-hop written without an interface (`10.0.0.1`) or with a VRF name
//! in place of the interface (`10.0.0.1@VrfRed`) names its outgoing router
//! interface only implicitly. [`IntfsAliasResolver`] turns the neighbor
//! address into the concrete interface alias. The resolver is handed to
//! [`NextHopKey::parse`](crate::NextHopKey::parse) by the caller.

use crate::error::RouterIntfsError;
use serde::{Deserialize, Serialize};
use sonic_types::{IpAddress, IpPrefix};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Maps a neighbor address to the router interface it is reached through.
///
/// Implementations are read concurrently from any thread that parses keys.
pub trait IntfsAliasResolver: Send + Sync {
    /// Returns the alias of the default-VRF interface whose subnet holds `ip`.
    fn router_intfs_alias(&self, ip: &IpAddress) -> Option<String>;

    /// Returns the alias of the interface in `vrf` whose subnet holds `ip`.
    fn vrf_router_intfs_alias(&self, ip: &IpAddress, vrf: &str) -> Option<String>;
}

impl<R: IntfsAliasResolver + ?Sized> IntfsAliasResolver for &R {
    fn router_intfs_alias(&self, ip: &IpAddress) -> Option<String> {
        (**self).router_intfs_alias(ip)
    }

    fn vrf_router_intfs_alias(&self, ip: &IpAddress, vrf: &str) -> Option<String> {
        (**self).vrf_router_intfs_alias(ip, vrf)
    }
}

impl<R: IntfsAliasResolver + ?Sized> IntfsAliasResolver for Arc<R> {
    fn router_intfs_alias(&self, ip: &IpAddress) -> Option<String> {
        (**self).router_intfs_alias(ip)
    }

    fn vrf_router_intfs_alias(&self, ip: &IpAddress, vrf: &str) -> Option<String> {
        (**self).vrf_router_intfs_alias(ip, vrf)
    }
}

/// A router interface as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterIntfConfig {
    pub alias: String,
    /// VRF the interface is bound to; absent means the default VRF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf: Option<String>,
    #[serde(default)]
    pub ip_prefixes: Vec<IpPrefix>,
}

/// Router interface table config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterIntfsConfig {
    #[serde(default)]
    pub interfaces: Vec<RouterIntfConfig>,
}

/// Router interface state held by [`RouterIntfsTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterIntfEntry {
    pub vrf: Option<String>,
    pub ip_prefixes: Vec<IpPrefix>,
}

impl RouterIntfEntry {
    fn holds(&self, ip: &IpAddress, vrf: Option<&str>) -> bool {
        self.vrf.as_deref() == vrf && self.ip_prefixes.iter().any(|p| p.contains(ip))
    }
}

/// In-memory router interface table, keyed by interface alias.
///
/// Lookups scan interfaces in alias order and return the first one bound to
/// the requested VRF with a subnet containing the address.
#[derive(Debug, Clone, Default)]
pub struct RouterIntfsTable {
    intfs: BTreeMap<String, RouterIntfEntry>,
}

impl RouterIntfsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a parsed config.
    ///
    /// # Errors
    ///
    /// Fails if the same alias is listed twice.
    pub fn from_config(config: RouterIntfsConfig) -> Result<Self, RouterIntfsError> {
        let mut table = Self::new();
        for intf in config.interfaces {
            if table.intfs.contains_key(&intf.alias) {
                return Err(RouterIntfsError::DuplicateInterface(intf.alias));
            }
            table.add_interface(intf.alias, intf.vrf, intf.ip_prefixes);
        }
        Ok(table)
    }

    /// Loads a table from a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouterIntfsError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| RouterIntfsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RouterIntfsConfig = serde_json::from_str(&data)?;
        let table = Self::from_config(config)?;
        info!(
            "Loaded {} router interfaces from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Adds or replaces an interface.
    pub fn add_interface(
        &mut self,
        alias: impl Into<String>,
        vrf: Option<String>,
        ip_prefixes: Vec<IpPrefix>,
    ) {
        let alias = alias.into();
        debug!(alias = %alias, vrf = ?vrf, prefixes = ip_prefixes.len(), "Adding router interface");
        self.intfs.insert(alias, RouterIntfEntry { vrf, ip_prefixes });
    }

    /// Removes an interface, returning its entry if it existed.
    pub fn remove_interface(&mut self, alias: &str) -> Option<RouterIntfEntry> {
        self.intfs.remove(alias)
    }

    pub fn get(&self, alias: &str) -> Option<&RouterIntfEntry> {
        self.intfs.get(alias)
    }

    pub fn len(&self) -> usize {
        self.intfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intfs.is_empty()
    }

    fn lookup(&self, ip: &IpAddress, vrf: Option<&str>) -> Option<String> {
        let found = self
            .intfs
            .iter()
            .find(|(_, entry)| entry.holds(ip, vrf))
            .map(|(alias, _)| alias.clone());
        debug!(ip = %ip, vrf = ?vrf, alias = ?found, "Router interface lookup");
        found
    }
}

impl IntfsAliasResolver for RouterIntfsTable {
    fn router_intfs_alias(&self, ip: &IpAddress) -> Option<String> {
        self.lookup(ip, None)
    }

    fn vrf_router_intfs_alias(&self, ip: &IpAddress, vrf: &str) -> Option<String> {
        self.lookup(ip, Some(vrf))
    }
}
