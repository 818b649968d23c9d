//! Achievement bookkeeping, independent of account plumbing.
//!
//! Instruction handlers load the accounts for a key, call into this module and
//! let the runtime persist the result. Every function validates before it
//! mutates, so an `Err` leaves its arguments untouched.

use anchor_lang::prelude::*;

use crate::error::AchievementError;
use crate::state::{Achievement, AchievementUpdate, OwnerIndex, StorageConfig};
use crate::validation::{self, AchievementInput};

/// Execution context of one instruction: the authenticated signer and the
/// current slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub caller: Pubkey,
    pub height: u64,
}

/// Lamport transfer the store asks the ledger to perform
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub amount: u64,
    pub from: Pubkey,
    pub to: Pubkey,
}

/// Transfer requests queued during an instruction, drained by the caller
/// once the store call has returned `Ok`.
#[derive(Debug, Default)]
pub struct FeeQueue {
    requests: Vec<TransferRequest>,
}

impl FeeQueue {
    pub fn request(&mut self, amount: u64, from: Pubkey, to: Pubkey) {
        self.requests.push(TransferRequest { amount, from, to });
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, TransferRequest> {
        self.requests.drain(..)
    }
}

fn validate_max_per_owner(max_per_owner: u64) -> Result<()> {
    require!(
        max_per_owner > 0,
        AchievementError::InvalidConfig
    );
    Ok(())
}

pub fn initialize(
    config: &mut StorageConfig,
    authority: Pubkey,
    max_per_owner: u64,
    creation_fee: u64,
) -> Result<()> {
    validate_max_per_owner(max_per_owner)?;

    config.authority = authority;
    config.next_achievement_id = 0;
    config.max_per_owner = max_per_owner;
    config.creation_fee = creation_fee;

    Ok(())
}

/// Creates the achievement `(caller, config.next_achievement_id)` in `slot`.
///
/// `slot` is the record currently stored under that key (default when
/// absent). On success the creation fee is queued from the owner to the admin
/// and the assigned ID is returned.
///
/// # Errors
/// * `QuotaExceeded` - If the owner already holds `max_per_owner` achievements
/// * Any field error from [`validation::validate_input`]
/// * `AlreadyExists` - If `slot` already holds a live record
/// * `Overflow` - If the ID counter or owner count would overflow
pub fn create_achievement(
    invocation: &Invocation,
    config: &mut StorageConfig,
    index: &mut OwnerIndex,
    slot: &mut Achievement,
    input: AchievementInput,
    fees: &mut FeeQueue,
) -> Result<u64> {
    let owner = invocation.caller;

    require!(
        index.count < config.max_per_owner,
        AchievementError::QuotaExceeded
    );

    let validated = validation::validate_input(&input, invocation.height)?;

    require!(!slot.is_live(), AchievementError::AlreadyExists);

    let achievement_id = config.next_achievement_id;
    let next_achievement_id = achievement_id
        .checked_add(1)
        .ok_or(AchievementError::Overflow)?;

    // Pay to store: the fee request precedes the write
    fees.request(config.creation_fee, owner, config.authority);

    *slot = Achievement {
        owner,
        achievement_id,
        content_hash: validated.content_hash,
        title: input.title,
        description: input.description,
        category: validated.category,
        created_at: invocation.height,
        visibility: input.visibility,
        metadata: input.metadata,
        expiry: input.expiry,
        status: input.status,
        rating: validated.rating,
        comment: input.comment,
        attachment: input.attachment,
        score: validated.score,
        level: validated.level,
        bump: slot.bump,
    };

    index.owner = owner;
    index.record(achievement_id)?;

    config.next_achievement_id = next_achievement_id;

    Ok(achievement_id)
}

/// Replaces title, description and visibility of an achievement and
/// overwrites its last-update record.
///
/// `created_at` is refreshed to the current height as well, so after the
/// first update it reads as "last touched".
///
/// # Errors
/// * `NotFound` - If no achievement is stored under the key
/// * `NotAuthorized` - If the caller is not the achievement owner
/// * `InvalidTitle` / `InvalidDescription` - Same rules as create
pub fn update_achievement(
    invocation: &Invocation,
    achievement: Option<&mut Achievement>,
    last_update: &mut AchievementUpdate,
    new_title: String,
    new_description: String,
    new_visibility: bool,
) -> Result<()> {
    let achievement = achievement
        .filter(|achievement| achievement.is_live())
        .ok_or(AchievementError::NotFound)?;

    require_keys_eq!(
        invocation.caller,
        achievement.owner,
        AchievementError::NotAuthorized
    );

    validation::validate_title(&new_title)?;
    validation::validate_description(&new_description)?;

    achievement.title = new_title;
    achievement.description = new_description;
    achievement.visibility = new_visibility;
    achievement.created_at = invocation.height;

    last_update.owner = achievement.owner;
    last_update.achievement_id = achievement.achievement_id;
    last_update.update_height = invocation.height;
    last_update.updater = invocation.caller;
    last_update.change_summary = AchievementUpdate::CHANGE_SUMMARY.to_string();

    Ok(())
}

/// Removes an achievement ID from its owner's index.
///
/// Closing the record and its last-update entry is left to the caller,
/// which must only do so after this returns `Ok`.
///
/// # Errors
/// * `NotFound` - If no achievement (or owner index) is stored under the key
/// * `NotAuthorized` - If the caller is not the achievement owner
pub fn delete_achievement(
    invocation: &Invocation,
    index: Option<&mut OwnerIndex>,
    achievement: Option<&Achievement>,
) -> Result<u64> {
    let achievement = achievement
        .filter(|achievement| achievement.is_live())
        .ok_or(AchievementError::NotFound)?;

    require_keys_eq!(
        invocation.caller,
        achievement.owner,
        AchievementError::NotAuthorized
    );

    let index = index.ok_or(AchievementError::NotFound)?;
    index.forget(achievement.achievement_id)?;

    Ok(achievement.achievement_id)
}

/// Changes the quota applied to future creates; holders already above the
/// new limit keep their records.
pub fn set_max_per_owner(
    invocation: &Invocation,
    config: &mut StorageConfig,
    new_max: u64,
) -> Result<()> {
    require_keys_eq!(
        invocation.caller,
        config.authority,
        AchievementError::NotAuthorized
    );
    validate_max_per_owner(new_max)?;

    config.max_per_owner = new_max;

    Ok(())
}

/// Changes the fee requested by future creates. Fees are unsigned, so every
/// value is in range.
pub fn set_creation_fee(
    invocation: &Invocation,
    config: &mut StorageConfig,
    new_fee: u64,
) -> Result<()> {
    require_keys_eq!(
        invocation.caller,
        config.authority,
        AchievementError::NotAuthorized
    );

    config.creation_fee = new_fee;

    Ok(())
}

pub fn achievement_ids(index: Option<&OwnerIndex>) -> Vec<u64> {
    index.map(|index| index.ids.clone()).unwrap_or_default()
}

pub fn achievement_count(index: Option<&OwnerIndex>) -> u64 {
    index.map_or(0, |index| index.count)
}

pub fn last_update(update: Option<&AchievementUpdate>) -> Option<AchievementUpdate> {
    update
        .filter(|update| update.updater != Pubkey::default())
        .cloned()
}
