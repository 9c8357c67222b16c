use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single deal listing read out of an offer block.
///
/// Numeric fields hold zero when the markup is missing or unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    pub url: String,
    pub price: f64,
    pub promo_price: f64,
    pub bought: i64,
    pub limit: i64,
    #[serde(with = "duration_secs")]
    pub remaining: Duration,
}

impl Offer {
    /// Promotional price, or `None` when the block carried no usable value.
    pub fn promo_price_opt(&self) -> Option<f64> {
        (self.promo_price != 0.0).then_some(self.promo_price)
    }

    /// Per-customer limit, or `None` when there is no limit or it could not be read.
    pub fn limit_opt(&self) -> Option<i64> {
        (self.limit != 0).then_some(self.limit)
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} - {:.2} - {:.2} bought {} limit '{}' time {}]",
            self.title,
            self.price,
            self.promo_price,
            self.bought,
            self.limit,
            self.remaining.as_secs()
        )
    }
}

/// Offers extracted from one page, tagged with the category they were requested for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub offers: Vec<Offer>,
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
