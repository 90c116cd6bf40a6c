//! Reporting API query parameters

use crate::types::StringMap;

/// Default parameters for an earnings report over `[start, end]`
///
/// Entries in `extra` override or extend the defaults.
pub fn build_earnings_params(start: &str, end: &str, extra: Option<&StringMap>) -> StringMap {
    let mut params: StringMap = [
        ("report", "earnings"),
        ("v3", ""),
        ("list", ""),
        ("start", start),
        ("end", end),
        ("breakdown_level", "earnings"),
        ("structure", "flat"),
        ("export", "json"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    if let Some(extra) = extra {
        params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    params
}
