//! Ad trigger policy.

use splice_ipc::PlaybackStatus;

/// Whether the ad player should be initialized now.
///
/// Only true during pre-ad main playback, before the ad initialize has been
/// issued, once main playback reaches `ad_start_offset`.
pub fn should_prepare_ad(
    status: PlaybackStatus,
    current_time: f64,
    ad_start_offset: f64,
    ad_player_initialized: bool,
) -> bool {
    status == PlaybackStatus::MainPlaying
        && !ad_player_initialized
        && current_time >= ad_start_offset
}

/// Whether the ad has played up to its end offset.
pub fn ad_break_finished(current_time: f64, ad_end_offset: f64) -> bool {
    current_time >= ad_end_offset
}
