//! Kilometre-post chainage such as `12+500` (12 km + 500 m).

/// Chainage in metres. Accepts `12+500`, `12+500.5`, `KP 12+500` or a bare
/// metre value.
pub fn parse_kp(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("KP")
        .or_else(|| trimmed.strip_prefix("kp"))
        .unwrap_or(trimmed)
        .trim();
    let metres = match trimmed.split_once('+') {
        Some((km, m)) => {
            let km = km.trim().parse::<f64>().ok()?;
            let m = m.trim().parse::<f64>().ok()?;
            km * 1000.0 + m
        }
        None => trimmed.parse::<f64>().ok()?,
    };
    metres.is_finite().then_some(metres)
}

/// `end - start` in metres when both ends parse.
pub fn span_metres(start: Option<&str>, end: Option<&str>) -> Option<f64> {
    Some(parse_kp(end?)? - parse_kp(start?)?)
}
