const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human readable size with 1024 scaling, e.g. `1536` -> `1.5 KB`.
pub fn format_bytes(size: u64) -> String {
    if size == 0 {
        return "0 B".to_string();
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SUFFIXES.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SUFFIXES[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn scales_by_1024() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1.2345 MB
        assert_eq!(format_bytes(1_294_467), "1.23 MB");
    }

    #[test]
    fn stays_in_terabytes_past_the_last_suffix() {
        assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048 TB");
    }
}
