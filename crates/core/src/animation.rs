//! Timing of the visual transitions.

use std::time::Duration;

/// Delay before an optimistically rendered message starts its enter
/// transition.
pub const ENTER_DELAY: Duration = Duration::from_millis(10);
/// How long messages take to fade out when the transcript is cleared.
pub const FADE_OUT: Duration = Duration::from_millis(300);
/// Pause between the last message leaving and the welcome message.
pub const WELCOME_DELAY: Duration = Duration::from_millis(300);
/// Delay before leaving the chat after the session was found missing.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(3000);

/// The fastest progressive reveal, per character.
pub const MIN_CHAR_DELAY: Duration = Duration::from_millis(20);
/// The slowest progressive reveal, per character.
pub const MAX_CHAR_DELAY: Duration = Duration::from_millis(50);

/// Returns the per-character delay for revealing a text of `len`
/// characters: `clamp(1000 / len, 20, 50)` milliseconds, so short
/// replies type slowly and long ones quickly.
pub fn char_delay(len: usize) -> Duration {
    if len == 0 {
        return MAX_CHAR_DELAY;
    }
    let micros = 1_000_000 / len as u128;
    let min = MIN_CHAR_DELAY.as_micros();
    let max = MAX_CHAR_DELAY.as_micros();
    Duration::from_micros(micros.clamp(min, max) as u64)
}
