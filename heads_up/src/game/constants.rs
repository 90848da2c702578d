use std::time::Duration;

/// Lives a Three Lives session starts with.
pub const STARTING_LIVES: u32 = 3;

/// How long the device is held in the passing state before the next
/// Hot Potato turn starts.
pub const PASS_DELAY: Duration = Duration::from_secs(2);

/// Player id used for the guest player. Guests never get statistics.
pub const GUEST_PLAYER_ID: i64 = 0;

/// Placeholder players synthesized when a Hot Potato team has nobody.
pub const RED_PLACEHOLDER_ID: i64 = -1;
pub const RED_PLACEHOLDER_NAME: &str = "Red Team Player";
pub const BLUE_PLACEHOLDER_ID: i64 = -2;
pub const BLUE_PLACEHOLDER_NAME: &str = "Blue Team Player";

pub const DEFAULT_CARD_TIME_SECS: u32 = 20;
pub const DEFAULT_CARD_COUNT: usize = 10;
pub const DEFAULT_TEAM_TIME_SECS: u32 = 300;
pub const DEFAULT_MAX_SKIPS_PER_TEAM: u32 = 2;

pub const MIN_TEAM_TIME_SECS: u32 = 60;
pub const MAX_TEAM_TIME_SECS: u32 = 600;
pub const MIN_SKIPS_PER_TEAM: u32 = 1;
pub const MAX_SKIPS_PER_TEAM: u32 = 5;
