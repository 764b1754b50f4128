use serde::{self, Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serialize a [`Duration`] as a whole number of milliseconds.
pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis())
        .map_err(|_| serde::ser::Error::custom("Duration does not fit into u64 milliseconds"))?;
    serializer.serialize_u64(millis)
}

/// Deserialize a millisecond count like `5000` into a [`Duration`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}
