/// "m:ss" for elapsed session time and recorded totals.
pub fn format_mm_ss(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// "m:ss.t" for the rest countdown; tenths match the 100 ms tick resolution.
pub fn format_rest(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!(
        "{}:{:02}.{}",
        total_secs / 60,
        total_secs % 60,
        (ms % 1000) / 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "0:00");
        assert_eq!(format_mm_ss(999), "0:00");
        assert_eq!(format_mm_ss(61_000), "1:01");
        assert_eq!(format_mm_ss(3_599_000), "59:59");
        assert_eq!(format_mm_ss(3_600_000), "60:00");
    }

    #[test]
    fn test_format_rest() {
        assert_eq!(format_rest(0), "0:00.0");
        assert_eq!(format_rest(100), "0:00.1");
        assert_eq!(format_rest(179_900), "2:59.9");
        assert_eq!(format_rest(180_000), "3:00.0");
    }
}
