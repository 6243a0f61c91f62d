/*!
 * DNS Cache
 * Resolver state refreshed by network-info reports
 */

use crate::core::data::{NetInfo, QueryFamily};
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Resolver snapshot for consumers outside the dispatch path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSnapshot {
    pub servers: Vec<SocketAddr>,
    pub family: QueryFamily,
}

/// DNS server state owned by the dispatcher core.
///
/// The net-info report adapter refreshes this whether or not a user callback
/// is registered; name resolution must track the modem's PDN even when the
/// application ignores network reports.
pub struct DnsCache {
    inner: Mutex<DnsSnapshot>,
}

impl DnsCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DnsSnapshot::default()),
        }
    }

    /// Replace the server list and re-derive the query family from the
    /// report's first PDN.
    pub fn refresh(&self, servers: &[SocketAddr], info: &NetInfo) {
        let mut inner = self.inner.lock();
        inner.servers = servers.to_vec();
        inner.family = info.query_family();
        debug!(
            "dns cache refreshed: {} servers, family {:?}",
            inner.servers.len(),
            inner.family
        );
    }

    pub fn snapshot(&self) -> DnsSnapshot {
        self.inner.lock().clone()
    }
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new()
    }
}
