//! Host name resolution for the health report

use crate::error::{HeroError, HeroResult};
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

/// Resolve `host` to all of its addresses, joined with `,`.
///
/// Addresses keep resolver order; duplicates are dropped.
pub async fn resolve(host: &str) -> HeroResult<String> {
    let addrs = lookup_host((host, 0))
        .await
        .map_err(|e| HeroError::DnsResolution {
            host: host.to_string(),
            reason: e.to_string(),
        })?;

    let mut ips: Vec<IpAddr> = Vec::new();
    for addr in addrs {
        if !ips.contains(&addr.ip()) {
            ips.push(addr.ip());
        }
    }

    if ips.is_empty() {
        return Err(HeroError::DnsResolution {
            host: host.to_string(),
            reason: "no addresses returned".to_string(),
        });
    }

    debug!("Resolved {} to {} address(es)", host, ips.len());
    Ok(join_addrs(&ips))
}

fn join_addrs(ips: &[IpAddr]) -> String {
    ips.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
