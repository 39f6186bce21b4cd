const SUBNET_COUNT: &str = "SUBNET_COUNT";

pub fn get_subnet_count() -> Option<u32> {
    std::env::var(SUBNET_COUNT)
        .ok()
        .and_then(|count| count.parse().ok())
}

const MONITOR_WORKERS: &str = "MONITOR_WORKERS";

pub fn get_workers() -> Option<usize> {
    std::env::var(MONITOR_WORKERS)
        .ok()
        .and_then(|workers| workers.parse().ok())
}

/// Serialize a [`std::time::Duration`] as fractional seconds
pub mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}
