//! Heuristic security checks — coarse filters against naive scripted access,
//! not proofs. The accepted false-positive rate is unbounded.

/// Default automation signatures for the client-agent check
/// (case-insensitive substring match).
pub const DEFAULT_SUSPICIOUS_AGENT_PATTERNS: &[&str] =
    &["bot", "crawler", "spider", "scraper", "curl", "wget"];

/// True if the declared agent string is empty or matches any configured
/// automation signature.
pub fn is_suspicious_user_agent(agent: &str, patterns: &[String]) -> bool {
    if agent.trim().is_empty() {
        return true;
    }
    let lowered = agent.to_lowercase();
    patterns.iter().any(|p| lowered.contains(&p.to_lowercase()))
}

/// Pluggable remote-address reputation predicate. Deployments inject a
/// threat-intel lookup here; the shipped default never flags.
pub trait IpReputation: Send + Sync {
    fn is_suspicious(&self, ip: &str) -> bool;
}

/// Permissive placeholder reputation: never flags an address.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllReputation;

impl IpReputation for AllowAllReputation {
    fn is_suspicious(&self, _ip: &str) -> bool {
        false
    }
}
