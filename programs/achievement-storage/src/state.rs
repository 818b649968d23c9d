use anchor_lang::prelude::*;

use crate::error::AchievementError;

/// PDA seed of the global configuration account
pub const CONFIG_SEED: &[u8] = b"config";

/// PDA seed prefix of achievement records: [seed, owner, id_le]
pub const ACHIEVEMENT_SEED: &[u8] = b"achievement";

/// PDA seed prefix of last-update records: [seed, owner, id_le]
pub const ACHIEVEMENT_UPDATE_SEED: &[u8] = b"achievement_update";

/// PDA seed prefix of per-owner indexes: [seed, owner]
pub const OWNER_INDEX_SEED: &[u8] = b"owner_index";

/// Anchor account discriminator length
pub const DISCRIMINATOR_LEN: usize = 8;

/// Global storage configuration
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct StorageConfig {
    /// Admin principal, the only signer allowed to change limits and fees
    pub authority: Pubkey,

    /// Next achievement ID to assign (never reused, survives deletes)
    pub next_achievement_id: u64,

    /// Maximum number of live achievements per owner
    pub max_per_owner: u64,

    /// Lamports requested from the owner on every successful create
    pub creation_fee: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl StorageConfig {
    /// Space required for StorageConfig account
    /// 8 (discriminator) + 32 (authority) + 8 (next_achievement_id)
    /// + 8 (max_per_owner) + 8 (creation_fee) + 1 (bump)
    pub const SIZE: usize = DISCRIMINATOR_LEN + 32 + 8 + 8 + 8 + 1;

    pub const DEFAULT_MAX_PER_OWNER: u64 = 100;

    pub const DEFAULT_CREATION_FEE: u64 = 500;

    /// Count of achievements ever created, deleted ones included
    pub fn total_created(&self) -> u64 {
        self.next_achievement_id
    }

    /// Client helper: config PDA
    pub fn address() -> (Pubkey, u8) {
        Pubkey::find_program_address(&[CONFIG_SEED], &crate::ID)
    }
}

/// Closed set of achievement categories
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AchievementCategory {
    #[default]
    Academic,
    Extracurricular,
    Award,
    Project,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 4] = [
        AchievementCategory::Academic,
        AchievementCategory::Extracurricular,
        AchievementCategory::Award,
        AchievementCategory::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Academic => "academic",
            AchievementCategory::Extracurricular => "extracurricular",
            AchievementCategory::Award => "award",
            AchievementCategory::Project => "project",
        }
    }

    /// Exact, case-sensitive match against the category names
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }
}

/// Achievement record, keyed by (owner, achievement_id)
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct Achievement {
    /// Principal that created the record
    pub owner: Pubkey,

    /// Globally sequential ID assigned at creation
    pub achievement_id: u64,

    /// Digest of the off-chain credential content
    pub content_hash: [u8; 32],

    /// Title (1-100 characters)
    pub title: String,

    /// Description (0-500 characters)
    pub description: String,

    pub category: AchievementCategory,

    /// Slot of creation, refreshed by every update
    pub created_at: u64,

    pub visibility: bool,

    /// Optional metadata (max 200 characters)
    pub metadata: Option<String>,

    /// Optional expiry slot, later than the slot it was written at
    pub expiry: Option<u64>,

    pub status: bool,

    /// Rating (0-5)
    pub rating: u8,

    /// Optional comment (max 200 characters)
    pub comment: Option<String>,

    /// Optional attachment (max 64 bytes)
    pub attachment: Option<Vec<u8>>,

    /// Score (0-100)
    pub score: u8,

    /// Level (0-10)
    pub level: u8,

    /// PDA bump seed
    pub bump: u8,
}

impl Achievement {
    /// Maximum size for Achievement account. Text limits are in characters,
    /// so 4 bytes are reserved per character.
    /// 8 (discriminator) + 32 (owner) + 8 (achievement_id) + 32 (content_hash)
    /// + 4 + 400 (title) + 4 + 2000 (description) + 1 (category)
    /// + 8 (created_at) + 1 (visibility) + 1 + 4 + 800 (metadata)
    /// + 1 + 8 (expiry) + 1 (status) + 1 (rating) + 1 + 4 + 800 (comment)
    /// + 1 + 4 + 64 (attachment) + 1 (score) + 1 (level) + 1 (bump)
    pub const MAX_SIZE: usize = DISCRIMINATOR_LEN
        + 32
        + 8
        + 32
        + (4 + Self::MAX_TITLE_CHARS * 4)
        + (4 + Self::MAX_DESCRIPTION_CHARS * 4)
        + 1
        + 8
        + 1
        + (1 + 4 + Self::MAX_METADATA_CHARS * 4)
        + (1 + 8)
        + 1
        + 1
        + (1 + 4 + Self::MAX_COMMENT_CHARS * 4)
        + (1 + 4 + Self::MAX_ATTACHMENT_LEN)
        + 1
        + 1
        + 1;

    pub const HASH_LEN: usize = 32;
    pub const MAX_TITLE_CHARS: usize = 100;
    pub const MAX_DESCRIPTION_CHARS: usize = 500;
    pub const MAX_METADATA_CHARS: usize = 200;
    pub const MAX_COMMENT_CHARS: usize = 200;
    pub const MAX_ATTACHMENT_LEN: usize = 64;
    pub const MAX_RATING: u8 = 5;
    pub const MAX_SCORE: u8 = 100;
    pub const MAX_LEVEL: u8 = 10;

    /// A zeroed account (fresh `init_if_needed`) has no owner
    pub fn is_live(&self) -> bool {
        self.owner != Pubkey::default()
    }

    /// Client helper: record PDA of `(owner, achievement_id)`, which is how
    /// a full achievement is read
    pub fn address(owner: &Pubkey, achievement_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[ACHIEVEMENT_SEED, owner.as_ref(), &achievement_id.to_le_bytes()],
            &crate::ID,
        )
    }
}

/// Audit entry for the most recent update of an achievement
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct AchievementUpdate {
    pub owner: Pubkey,

    pub achievement_id: u64,

    /// Slot of the update
    pub update_height: u64,

    /// Signer that performed the update
    pub updater: Pubkey,

    pub change_summary: String,

    /// PDA bump seed
    pub bump: u8,
}

impl AchievementUpdate {
    /// 8 (discriminator) + 32 (owner) + 8 (achievement_id) + 8 (update_height)
    /// + 32 (updater) + 4 + 64 (change_summary) + 1 (bump)
    pub const SIZE: usize =
        DISCRIMINATOR_LEN + 32 + 8 + 8 + 32 + (4 + Self::MAX_SUMMARY_LEN) + 1;

    pub const MAX_SUMMARY_LEN: usize = 64;

    pub const CHANGE_SUMMARY: &'static str = "Updated title, description, visibility";

    /// Client helper: last-update PDA of `(owner, achievement_id)`
    pub fn address(owner: &Pubkey, achievement_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                ACHIEVEMENT_UPDATE_SEED,
                owner.as_ref(),
                &achievement_id.to_le_bytes(),
            ],
            &crate::ID,
        )
    }
}

/// Live achievement IDs of one owner, in creation order
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct OwnerIndex {
    pub owner: Pubkey,

    /// Live count, always equal to `ids.len()`
    pub count: u64,

    pub ids: Vec<u64>,

    /// PDA bump seed
    pub bump: u8,
}

impl OwnerIndex {
    /// Account size for an index holding `ids` entries; the account grows as
    /// the owner creates achievements.
    /// 8 (discriminator) + 32 (owner) + 8 (count) + 4 + (ids * 8) (ids) + 1 (bump)
    pub const fn space_for(ids: usize) -> usize {
        DISCRIMINATOR_LEN + 32 + 8 + 4 + (ids * 8) + 1
    }

    /// Lists longer than this no longer fit the 1024 byte return data of the
    /// `achievement_ids` view; clients fetch the account instead.
    pub const MAX_RETURNED_IDS: usize = (1024 - 4) / 8;

    pub fn record(&mut self, achievement_id: u64) -> Result<()> {
        self.ids.push(achievement_id);
        self.count = self
            .count
            .checked_add(1)
            .ok_or(AchievementError::Overflow)?;

        Ok(())
    }

    /// Drops every occurrence of the id; the count goes down by exactly one
    pub fn forget(&mut self, achievement_id: u64) -> Result<()> {
        self.ids.retain(|id| *id != achievement_id);
        self.count = self
            .count
            .checked_sub(1)
            .ok_or(AchievementError::Overflow)?;

        Ok(())
    }

    /// Client helper: index PDA of an owner
    pub fn address(owner: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[OWNER_INDEX_SEED, owner.as_ref()], &crate::ID)
    }
}
