//! Custom serde helpers for backend wire formats.

/// Deserializes an optional share volume that may arrive as an integer or a float.
///
/// The quote endpoint sums volumes server-side and occasionally emits `1.2e7`-style
/// floats. Negative or non-finite values are rejected.
pub mod volume {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVolume {
        Int(u64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawVolume>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawVolume::Int(v)) => Ok(Some(v)),
            Some(RawVolume::Float(v)) if v.is_finite() && v >= 0.0 => Ok(Some(v.round() as u64)),
            Some(RawVolume::Float(v)) => {
                Err(serde::de::Error::custom(format!("Invalid volume: {}", v)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, with = "super::volume")]
        volume: Option<u64>,
    }

    #[test]
    fn test_volume_int_and_float() {
        let p: Probe = serde_json::from_str(r#"{"volume": 1200}"#).unwrap();
        assert_eq!(p.volume, Some(1200));
        let p: Probe = serde_json::from_str(r#"{"volume": 1.2e7}"#).unwrap();
        assert_eq!(p.volume, Some(12_000_000));
    }

    #[test]
    fn test_volume_missing_or_null() {
        let p: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.volume, None);
        let p: Probe = serde_json::from_str(r#"{"volume": null}"#).unwrap();
        assert_eq!(p.volume, None);
    }

    #[test]
    fn test_volume_negative_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{"volume": -5.0}"#).is_err());
    }
}
