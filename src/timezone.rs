use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use super::get_local_offset;

    #[test]
    fn gets_offset_of_canonical_timezone() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
        assert!(get_local_offset("Pacific/Auckland").is_some());
    }

    #[test]
    fn unknown_timezone_has_no_offset() {
        assert_eq!(get_local_offset("Not/AZone"), None);
    }
}
