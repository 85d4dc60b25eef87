//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the expiry
//! kinds accepted by `SET`.

use chrono::{DateTime, Utc};

// == Expiry Kind ==
/// How an entry's `ttl` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryKind {
    /// No expiry, the entry lives until evicted
    #[default]
    None,
    /// Relative, in seconds
    Ex,
    /// Relative, in milliseconds
    Px,
    /// Unix time, in seconds
    ExAt,
    /// Unix time, in milliseconds
    PxAt,
}

impl ExpiryKind {
    /// Parses a `SET` option name, ignoring ASCII case.
    ///
    /// Returns `None` for anything that is not an expiry option.
    pub fn from_option(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "EX" => Some(ExpiryKind::Ex),
            "PX" => Some(ExpiryKind::Px),
            "EXAT" => Some(ExpiryKind::ExAt),
            "PXAT" => Some(ExpiryKind::PxAt),
            _ => None,
        }
    }

    /// Wire name of the option.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryKind::None => "NONE",
            ExpiryKind::Ex => "EX",
            ExpiryKind::Px => "PX",
            ExpiryKind::ExAt => "EXAT",
            ExpiryKind::PxAt => "PXAT",
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Time to live, in the unit implied by `expiry`
    pub ttl: Option<i64>,
    /// How `ttl` is evaluated
    pub expiry: ExpiryKind,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: String, ttl: Option<i64>, expiry: ExpiryKind) -> Self {
        Self {
            value,
            created_at: Utc::now(),
            ttl,
            expiry,
        }
    }

    // == Lifespan ==
    /// Age of the entry at `now`, in the unit implied by the expiry kind.
    ///
    /// `Ex` counts whole elapsed seconds and `Px` elapsed milliseconds.
    /// The absolute kinds difference the two epoch-second stamps, and
    /// `PxAt` scales that difference to milliseconds. Returns `None` for
    /// entries without an expiry kind.
    pub fn lifespan(&self, now: DateTime<Utc>) -> Option<i64> {
        let elapsed = now.signed_duration_since(self.created_at);
        match self.expiry {
            ExpiryKind::None => None,
            ExpiryKind::Ex => Some(elapsed.num_seconds()),
            ExpiryKind::Px => Some(elapsed.num_milliseconds()),
            ExpiryKind::ExAt => Some(now.timestamp() - self.created_at.timestamp()),
            ExpiryKind::PxAt => Some((now.timestamp() - self.created_at.timestamp()) * 1000),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once its lifespan is greater
    /// than or equal to its ttl.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.ttl, self.lifespan(now)) {
            (Some(ttl), Some(lifespan)) => lifespan >= ttl,
            _ => false,
        }
    }

    /// Checks whether the entry has expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::thread::sleep;

    fn entry(ttl: Option<i64>, expiry: ExpiryKind) -> CacheEntry {
        CacheEntry::new("value".to_string(), ttl, expiry)
    }

    #[test]
    fn test_expiry_kind_from_option() {
        assert_eq!(ExpiryKind::from_option("EX"), Some(ExpiryKind::Ex));
        assert_eq!(ExpiryKind::from_option("px"), Some(ExpiryKind::Px));
        assert_eq!(ExpiryKind::from_option("ExAt"), Some(ExpiryKind::ExAt));
        assert_eq!(ExpiryKind::from_option("PXAT"), Some(ExpiryKind::PxAt));
        assert_eq!(ExpiryKind::from_option("KEEPTTL"), None);
        assert_eq!(ExpiryKind::from_option(""), None);
    }

    #[test]
    fn test_entry_without_expiry_never_expires() {
        let e = entry(None, ExpiryKind::None);
        let far_future = e.created_at + Duration::days(365);

        assert!(e.lifespan(far_future).is_none());
        assert!(!e.is_expired_at(far_future));
    }

    #[test]
    fn test_ttl_without_kind_is_ignored() {
        let e = entry(Some(1), ExpiryKind::None);
        assert!(!e.is_expired_at(e.created_at + Duration::seconds(10)));
    }

    #[test]
    fn test_ex_counts_whole_seconds() {
        let e = entry(Some(2), ExpiryKind::Ex);

        assert_eq!(e.lifespan(e.created_at + Duration::milliseconds(1999)), Some(1));
        assert!(!e.is_expired_at(e.created_at + Duration::milliseconds(1999)));
        assert!(e.is_expired_at(e.created_at + Duration::seconds(2)));
    }

    #[test]
    fn test_px_counts_milliseconds() {
        let e = entry(Some(1500), ExpiryKind::Px);

        assert!(!e.is_expired_at(e.created_at + Duration::milliseconds(1499)));
        assert!(e.is_expired_at(e.created_at + Duration::milliseconds(1500)));
    }

    #[test]
    fn test_absolute_kinds_use_epoch_seconds() {
        let e = entry(Some(3), ExpiryKind::ExAt);
        let later = e.created_at + Duration::seconds(3);
        assert_eq!(e.lifespan(later), Some(3));
        assert!(e.is_expired_at(later));

        let e = entry(Some(3000), ExpiryKind::PxAt);
        let later = e.created_at + Duration::seconds(3);
        assert_eq!(e.lifespan(later), Some(3000));
        assert!(e.is_expired_at(later));
        assert!(!e.is_expired_at(e.created_at));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        // A zero ttl is expired at the moment of creation
        let e = entry(Some(0), ExpiryKind::Px);
        assert!(e.is_expired_at(e.created_at));
    }

    #[test]
    fn test_entry_expiration_real_clock() {
        let e = entry(Some(1), ExpiryKind::Ex);
        assert!(!e.is_expired());

        sleep(std::time::Duration::from_millis(1100));

        assert!(e.is_expired());
    }
}
