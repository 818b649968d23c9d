use anchor_lang::prelude::*;

/// Event emitted when the storage configuration is created
#[event]
pub struct StorageInitialized {
    pub authority: Pubkey,
    pub max_per_owner: u64,
    pub creation_fee: u64,
}

/// Event emitted when a new achievement is stored
#[event]
pub struct AchievementCreated {
    pub owner: Pubkey,
    pub achievement_id: u64,
    pub content_hash: [u8; 32],
    pub created_at: u64,
}

/// Event emitted when title, description or visibility change
#[event]
pub struct AchievementUpdated {
    pub owner: Pubkey,
    pub achievement_id: u64,
    pub updater: Pubkey,
    pub update_height: u64,
}

#[event]
pub struct AchievementDeleted {
    pub owner: Pubkey,
    pub achievement_id: u64,
}

/// Event emitted for every creation fee handed to the system program,
/// in request order
#[event]
pub struct CreationFeeRequested {
    pub amount: u64,
    pub from: Pubkey,
    pub to: Pubkey,
}

#[event]
pub struct MaxPerOwnerChanged {
    pub old_max: u64,
    pub new_max: u64,
}

#[event]
pub struct CreationFeeChanged {
    pub old_fee: u64,
    pub new_fee: u64,
}
