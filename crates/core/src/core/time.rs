pub use core::time::Duration;

// `std::time::Instant::now()` panics on `wasm32-unknown-unknown`. `web-time`
// backs the same API with `performance.now()` in the browser.
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Whole milliseconds, saturating at `u32::MAX`. Browser timer APIs take an `i32`
/// millisecond delay; callers clamp further if needed.
pub fn millis_u32(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_saturate() {
        assert_eq!(millis_u32(Duration::from_millis(250)), 250);
        assert_eq!(millis_u32(Duration::from_secs(u64::MAX / 2)), u32::MAX);
    }
}
