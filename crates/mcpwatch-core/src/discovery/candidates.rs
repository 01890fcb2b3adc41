//! Candidate address list

use super::types::DiscoveryOptions;

/// How many of the candidate ports are also tried on `127.0.0.1`
pub const LOOPBACK_IP_PORTS: usize = 5;

/// Known endpoints first, then `localhost` for every candidate port, then
/// `127.0.0.1` for the first few ports. Empty without loopback probing.
pub fn build_candidates(known_endpoints: &[String], options: &DiscoveryOptions) -> Vec<String> {
    if !options.include_loopback {
        return Vec::new();
    }

    let mut candidates: Vec<String> = Vec::new();
    let mut push = |url: String| {
        let normalized = url.trim_end_matches('/');
        if !candidates.iter().any(|c| c.trim_end_matches('/') == normalized) {
            candidates.push(url);
        }
    };

    for url in known_endpoints {
        push(url.clone());
    }
    for port in &options.port_candidates {
        push(format!("https://localhost:{}", port));
    }
    for port in options.port_candidates.iter().take(LOOPBACK_IP_PORTS) {
        push(format!("https://127.0.0.1:{}", port));
    }

    candidates
}
