//! After-sunset window from the local hour.

/// `true` when `hour` falls in `[sunset, sunrise)`, wrapping past
/// midnight when sunset is the later hour.  Without a synced wall clock
/// the room is assumed dark so motion lighting still works.
pub fn is_after_sunset(hour: Option<u8>, sunset_hour: u8, sunrise_hour: u8) -> bool {
    let Some(h) = hour else {
        return true;
    };
    if sunset_hour > sunrise_hour {
        h >= sunset_hour || h < sunrise_hour
    } else {
        h >= sunset_hour && h < sunrise_hour
    }
}
