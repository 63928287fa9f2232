use crate::{
    error::{ClockError, ClockResult},
    types::Seconds,
};
use serde::{Deserialize, Serialize};

// ── Presets ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockPreset {
    NflRegularSeason,
    NflPlayoff,
    College,
    Practice,
    /// Hand-built or file-loaded configuration.
    Custom,
}

impl ClockPreset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NflRegularSeason => "nfl_regular_season",
            Self::NflPlayoff       => "nfl_playoff",
            Self::College          => "college",
            Self::Practice         => "practice",
            Self::Custom           => "custom",
        }
    }

    /// Parse the short names accepted on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "nfl" | "nfl_regular_season" | "regular" => Some(Self::NflRegularSeason),
            "playoff" | "nfl_playoff"                => Some(Self::NflPlayoff),
            "college" | "ncaa"                       => Some(Self::College),
            "practice"                               => Some(Self::Practice),
            _ => None,
        }
    }

    pub fn is_named(&self) -> bool {
        !matches!(self, Self::Custom)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeType {
    /// Any score ends the game.
    SuddenDeath,
    /// A field goal on the opening possession does not end the game.
    ModifiedSuddenDeath,
    /// College-style periods with no game clock.
    Untimed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureFlags {
    pub two_minute_warning:    bool,
    pub overtime:              bool,
    /// Stop on a first down inside the two-minute window of each half.
    pub clock_stop_first_down: bool,
    pub clock_stop_penalty:    bool,
}

// ── ClockConfig ────────────────────────────────────────────────────

/// Timing constants and feature toggles attached to one GameClock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockConfig {
    #[serde(default = "custom_preset")]
    pub preset:                  ClockPreset,
    pub quarter_length:          Seconds,
    pub overtime_length:         Seconds,
    pub play_clock_normal:       Seconds,
    pub play_clock_short:        Seconds,
    pub two_minute_warning_time: Seconds,
    /// Snap-to-whistle time when the play handler reports none.
    pub default_play_duration:   Seconds,
    /// Runoff for a spike (the minimum snap time).
    pub spike_runoff:            Seconds,
    pub kneel_runoff:            Seconds,
    pub overtime_type:           OvertimeType,
    /// None = periods continue until the tie is broken.
    pub overtime_max_periods:    Option<u32>,
    pub timeouts_per_half:       u8,
    pub overtime_timeouts:       u8,
    pub challenges_per_game:     u8,
    pub playoff_rules:           bool,
    pub features:                FeatureFlags,
}

fn custom_preset() -> ClockPreset {
    ClockPreset::Custom
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::nfl_regular_season()
    }
}

impl ClockConfig {
    pub fn for_preset(preset: ClockPreset) -> Self {
        match preset {
            ClockPreset::NflRegularSeason => Self::nfl_regular_season(),
            ClockPreset::NflPlayoff       => Self::nfl_playoff(),
            ClockPreset::College          => Self::college(),
            ClockPreset::Practice         => Self::practice(),
            ClockPreset::Custom           => Self { preset, ..Self::nfl_regular_season() },
        }
    }

    /// 15-minute quarters, one 10-minute sudden-death period.
    pub fn nfl_regular_season() -> Self {
        Self {
            preset:                  ClockPreset::NflRegularSeason,
            quarter_length:          900,
            overtime_length:         600,
            play_clock_normal:       40,
            play_clock_short:        25,
            two_minute_warning_time: 120,
            default_play_duration:   6,
            spike_runoff:            1,
            kneel_runoff:            2,
            overtime_type:           OvertimeType::SuddenDeath,
            overtime_max_periods:    Some(1),
            timeouts_per_half:       3,
            overtime_timeouts:       2,
            challenges_per_game:     2,
            playoff_rules:           false,
            features: FeatureFlags {
                two_minute_warning:    true,
                overtime:              true,
                clock_stop_first_down: false,
                clock_stop_penalty:    true,
            },
        }
    }

    /// 15-minute overtime periods that continue until someone scores.
    pub fn nfl_playoff() -> Self {
        Self {
            preset:               ClockPreset::NflPlayoff,
            overtime_length:      900,
            overtime_type:        OvertimeType::ModifiedSuddenDeath,
            overtime_max_periods: None,
            overtime_timeouts:    3,
            playoff_rules:        true,
            ..Self::nfl_regular_season()
        }
    }

    /// First-down stops, no two-minute warning, untimed overtime periods.
    pub fn college() -> Self {
        Self {
            preset:               ClockPreset::College,
            overtime_length:      0,
            overtime_type:        OvertimeType::Untimed,
            overtime_max_periods: None,
            overtime_timeouts:    1,
            challenges_per_game:  0,
            features: FeatureFlags {
                two_minute_warning:    false,
                overtime:              true,
                clock_stop_first_down: true,
                clock_stop_penalty:    true,
            },
            ..Self::nfl_regular_season()
        }
    }

    /// 10-minute quarters, no overtime, penalties do not stop the clock.
    pub fn practice() -> Self {
        Self {
            preset:               ClockPreset::Practice,
            quarter_length:       600,
            overtime_length:      0,
            overtime_max_periods: Some(0),
            overtime_timeouts:    0,
            challenges_per_game:  0,
            features: FeatureFlags {
                two_minute_warning:    true,
                overtime:              false,
                clock_stop_first_down: false,
                clock_stop_penalty:    false,
            },
            ..Self::nfl_regular_season()
        }
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::nfl_regular_season()
    }

    /// Load a JSON config file and run the static checks.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ClockConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
        log::info!("Loaded clock config from {path} (preset {})", config.preset.name());
        Ok(config)
    }

    pub fn untimed_overtime(&self) -> bool {
        self.overtime_type == OvertimeType::Untimed
    }

    /// Static range checks. Presets always pass.
    pub fn validate(&self) -> ClockResult<()> {
        if self.quarter_length == 0 {
            return Err(ClockError::invalid_config("quarter_length must be positive"));
        }
        if self.play_clock_normal == 0 {
            return Err(ClockError::invalid_config("play_clock_normal must be positive"));
        }
        if self.play_clock_short > self.play_clock_normal {
            return Err(ClockError::invalid_config(format!(
                "play_clock_short {}s exceeds play_clock_normal {}s",
                self.play_clock_short, self.play_clock_normal
            )));
        }
        if self.two_minute_warning_time >= self.quarter_length {
            return Err(ClockError::invalid_config(format!(
                "two_minute_warning_time {}s must be below quarter_length {}s",
                self.two_minute_warning_time, self.quarter_length
            )));
        }
        for (name, value) in [
            ("default_play_duration", self.default_play_duration),
            ("spike_runoff", self.spike_runoff),
            ("kneel_runoff", self.kneel_runoff),
        ] {
            if value > self.play_clock_normal {
                return Err(ClockError::invalid_config(format!(
                    "{name} {value}s exceeds play_clock_normal {}s",
                    self.play_clock_normal
                )));
            }
        }
        if self.features.overtime && !self.untimed_overtime() && self.overtime_length == 0 {
            return Err(ClockError::invalid_config(
                "timed overtime needs a positive overtime_length",
            ));
        }
        Ok(())
    }

    /// Dynamic check for swapping this config for `new` while the
    /// regulation clock reads `time_remaining`.
    pub fn check_compatible_change(&self, new: &ClockConfig, time_remaining: Seconds) -> ClockResult<()> {
        new.validate()?;
        if new.quarter_length < time_remaining {
            return Err(ClockError::invalid_config(format!(
                "quarter_length {}s is below the {}s remaining",
                new.quarter_length, time_remaining
            )));
        }
        Ok(())
    }

    pub fn is_compatible_change(&self, new: &ClockConfig, time_remaining: Seconds) -> bool {
        self.check_compatible_change(new, time_remaining).is_ok()
    }

    /// Time remaining after switching to `new`. Only a move between two
    /// named presets with different quarter lengths rescales.
    pub fn rescaled_time(&self, new: &ClockConfig, time_remaining: Seconds) -> Seconds {
        let deliberate = self.preset.is_named()
            && new.preset.is_named()
            && self.preset != new.preset
            && self.quarter_length != new.quarter_length;
        if !deliberate {
            return time_remaining;
        }
        let scaled = time_remaining as u64 * new.quarter_length as u64 / self.quarter_length as u64;
        (scaled as Seconds).min(new.quarter_length)
    }
}
