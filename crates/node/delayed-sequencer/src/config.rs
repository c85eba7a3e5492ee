//! Delayed sequencer configuration.

use clap::{ArgAction, Args};
use serde::{Deserialize, Serialize};

/// Runtime settings of the delayed sequencer.
///
/// Every field can be changed while the sequencer runs; the new values apply from the next L1
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DelayedSequencerConfig {
    /// Sequence delayed messages at all.
    pub enable: bool,
    /// How many blocks behind the L1 head a block is considered final, when merge finality is
    /// not used.
    pub finalize_distance: u64,
    /// Wait for the finalized block rather than the safe block under merge finality.
    pub require_full_finality: bool,
    /// Use the beacon chain's finality once L1 is post-merge.
    pub use_merge_finality: bool,
}

impl DelayedSequencerConfig {
    /// Production defaults. Sequencing is off until enabled.
    pub const DEFAULT: Self = Self {
        enable: false,
        finalize_distance: 20,
        require_full_finality: true,
        use_merge_finality: true,
    };

    /// Defaults for tests, with sequencing on.
    pub const TEST: Self = Self { enable: true, ..Self::DEFAULT };
}

impl Default for DelayedSequencerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Command line flags for the delayed sequencer.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedSequencerArgs {
    /// Enable the delayed sequencer.
    #[arg(long = "delayed-sequencer.enable", env = "ARB_DELAYED_SEQUENCER_ENABLE")]
    pub enable: bool,

    /// How many blocks in the past an L1 block is considered final (ignored under merge
    /// finality).
    #[arg(
        long = "delayed-sequencer.finalize-distance",
        env = "ARB_DELAYED_SEQUENCER_FINALIZE_DISTANCE",
        default_value_t = DelayedSequencerConfig::DEFAULT.finalize_distance
    )]
    pub finalize_distance: u64,

    /// Wait for full finality before sequencing delayed messages.
    #[arg(
        long = "delayed-sequencer.require-full-finality",
        env = "ARB_DELAYED_SEQUENCER_REQUIRE_FULL_FINALITY",
        default_value_t = DelayedSequencerConfig::DEFAULT.require_full_finality,
        action = ArgAction::Set
    )]
    pub require_full_finality: bool,

    /// Use the merge's notion of finality before sequencing delayed messages.
    #[arg(
        long = "delayed-sequencer.use-merge-finality",
        env = "ARB_DELAYED_SEQUENCER_USE_MERGE_FINALITY",
        default_value_t = DelayedSequencerConfig::DEFAULT.use_merge_finality,
        action = ArgAction::Set
    )]
    pub use_merge_finality: bool,
}

impl From<DelayedSequencerArgs> for DelayedSequencerConfig {
    fn from(args: DelayedSequencerArgs) -> Self {
        Self {
            enable: args.enable,
            finalize_distance: args.finalize_distance,
            require_full_finality: args.require_full_finality,
            use_merge_finality: args.use_merge_finality,
        }
    }
}
