use std::str::FromStr;
use std::time::Duration;

/// Errors parsing a staleness scale specification.
#[derive(Debug, thiserror::Error)]
pub enum StalenessParseError {
    #[error("empty staleness specification")]
    Empty,

    #[error("invalid band `{0}` (expected DURATION=LABEL)")]
    InvalidBand(String),

    #[error("invalid duration `{0}` (expected e.g. 5s or 500ms)")]
    InvalidDuration(String),

    #[error("band boundaries must be strictly ascending (saw `{0}` out of order)")]
    NotAscending(String),

    #[error("missing overflow label after the last band")]
    MissingOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Band {
    max_age: Duration,
    label: String,
}

/// Ordered age bands mapping an indicator's age to a display tier.
///
/// Thresholds are configuration, not constants: field deployments
/// disagree on what counts as stale. The default scale is
/// `5s=fresh,60s=updated,120s=stale,archived`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessScale {
    bands: Vec<Band>,
    overflow: String,
}

impl Default for StalenessScale {
    fn default() -> Self {
        Self {
            bands: vec![
                Band {
                    max_age: Duration::from_secs(5),
                    label: "fresh".to_string(),
                },
                Band {
                    max_age: Duration::from_secs(60),
                    label: "updated".to_string(),
                },
                Band {
                    max_age: Duration::from_secs(120),
                    label: "stale".to_string(),
                },
            ],
            overflow: "archived".to_string(),
        }
    }
}

impl StalenessScale {
    /// Classify an age into a tier label.
    ///
    /// Pure function of the age: the first band whose boundary the age
    /// does not exceed wins; ages beyond every boundary get the overflow
    /// label.
    pub fn classify(&self, age: Duration) -> &str {
        self.bands
            .iter()
            .find(|band| age <= band.max_age)
            .map(|band| band.label.as_str())
            .unwrap_or(&self.overflow)
    }

    /// Tier labels in ascending-age order, overflow last.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.bands.iter().map(|b| b.label.as_str()).collect();
        labels.push(&self.overflow);
        labels
    }
}

impl FromStr for StalenessScale {
    type Err = StalenessParseError;

    /// Parse `5s=fresh,60s=updated,120s=stale,archived`: ascending
    /// `DURATION=LABEL` bands with a bare overflow label last.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err(StalenessParseError::Empty);
        }

        let mut bands = Vec::new();
        let mut overflow = None;

        for part in input.split(',') {
            let part = part.trim();
            if overflow.is_some() {
                // Bands after the overflow label would be unreachable.
                return Err(StalenessParseError::InvalidBand(part.to_string()));
            }
            match part.split_once('=') {
                Some((duration, label)) => {
                    if label.trim().is_empty() {
                        return Err(StalenessParseError::InvalidBand(part.to_string()));
                    }
                    let max_age = parse_duration(duration.trim())
                        .ok_or_else(|| StalenessParseError::InvalidDuration(duration.to_string()))?;
                    if let Some(Band { max_age: prev, .. }) = bands.last() {
                        if max_age <= *prev {
                            return Err(StalenessParseError::NotAscending(part.to_string()));
                        }
                    }
                    bands.push(Band {
                        max_age,
                        label: label.trim().to_string(),
                    });
                }
                None => overflow = Some(part.to_string()),
            }
        }

        let overflow = overflow.ok_or(StalenessParseError::MissingOverflow)?;
        Ok(Self { bands, overflow })
    }
}

fn parse_duration(input: &str) -> Option<Duration> {
    if let Some(millis) = input.strip_suffix("ms") {
        return millis.parse().ok().map(Duration::from_millis);
    }
    if let Some(secs) = input.strip_suffix('s') {
        return secs.parse().ok().map(Duration::from_secs);
    }
    input.parse().ok().map(Duration::from_secs)
}
