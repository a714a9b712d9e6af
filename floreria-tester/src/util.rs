use chrono::Utc;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds, accepting decimal or `0x` hex.
pub fn parse_seeds(s: &str) -> anyhow::Result<Vec<u64>> {
    split_csv(s)
        .iter()
        .map(|token| {
            let parsed = token.strip_prefix("0x").map_or_else(
                || token.parse::<u64>(),
                |hex| u64::from_str_radix(hex, 16),
            );
            parsed.map_err(|err| anyhow::anyhow!("invalid seed {token:?}: {err}"))
        })
        .collect()
}

/// RFC 3339 timestamp stamped into reports.
pub fn report_timestamp() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
