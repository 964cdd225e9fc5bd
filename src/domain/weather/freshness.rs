use chrono::{DateTime, Utc};

/// Age of an entity's last change, in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeAge {
    Minutes(i64),
    Hours(i64),
}

#[must_use]
pub fn relative_age(last_changed: DateTime<Utc>, now: DateTime<Utc>) -> RelativeAge {
    let minutes = (now - last_changed).num_minutes().max(0);
    let hours = minutes / 60;
    if hours > 0 {
        RelativeAge::Hours(hours)
    } else {
        RelativeAge::Minutes(minutes)
    }
}

impl std::fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Minutes(0) => f.write_str("this minute"),
            Self::Minutes(1) => f.write_str("1 minute ago"),
            Self::Minutes(n) => write!(f, "{n} minutes ago"),
            Self::Hours(1) => f.write_str("1 hour ago"),
            Self::Hours(n) => write!(f, "{n} hours ago"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_recent_change() {
        let now = Utc::now();
        assert_eq!(relative_age(now, now), RelativeAge::Minutes(0));
        assert_eq!(
            relative_age(now - Duration::seconds(90), now),
            RelativeAge::Minutes(1)
        );
        assert_eq!(relative_age(now, now).to_string(), "this minute");
    }

    #[test]
    fn test_boundaries() {
        let now = Utc::now();
        // 59 minutes stays in minutes
        assert_eq!(
            relative_age(now - Duration::minutes(59), now),
            RelativeAge::Minutes(59)
        );
        // 60 minutes rolls over to hours
        assert_eq!(
            relative_age(now - Duration::minutes(60), now),
            RelativeAge::Hours(1)
        );
        assert_eq!(
            relative_age(now - Duration::minutes(135), now).to_string(),
            "2 hours ago"
        );
    }

    #[test]
    fn test_future_timestamps_clamp() {
        let now = Utc::now();
        assert_eq!(
            relative_age(now + Duration::minutes(5), now),
            RelativeAge::Minutes(0)
        );
    }
}
