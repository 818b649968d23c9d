//! Field rules shared by every write path.
//!
//! Each rule maps to exactly one [`AchievementError`] variant. `create` runs
//! them in the order of [`validate_input`]; `update` reuses [`validate_title`]
//! and [`validate_description`] so both entry points accept the same text.

use anchor_lang::prelude::*;

use crate::error::AchievementError;
use crate::state::{Achievement, AchievementCategory};

/// Fields supplied by the owner when creating an achievement
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq)]
pub struct AchievementInput {
    pub content_hash: Vec<u8>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub visibility: bool,
    pub metadata: Option<String>,
    pub expiry: Option<u64>,
    pub status: bool,
    pub rating: u64,
    pub comment: Option<String>,
    pub attachment: Option<Vec<u8>>,
    pub score: u64,
    pub level: u64,
}

/// Input fields whose stored type differs from the wire type
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidatedInput {
    pub content_hash: [u8; 32],
    pub category: AchievementCategory,
    pub rating: u8,
    pub score: u8,
    pub level: u8,
}

/// Runs every create rule in order; the first failure wins.
pub fn validate_input(input: &AchievementInput, height: u64) -> Result<ValidatedInput> {
    let content_hash = validate_hash(&input.content_hash)?;
    validate_title(&input.title)?;
    validate_description(&input.description)?;
    let category = validate_category(&input.category)?;
    validate_metadata(input.metadata.as_deref())?;
    validate_expiry(input.expiry, height)?;
    let rating = validate_rating(input.rating)?;
    validate_comment(input.comment.as_deref())?;
    validate_attachment(input.attachment.as_deref())?;
    let score = validate_score(input.score)?;
    let level = validate_level(input.level)?;

    Ok(ValidatedInput {
        content_hash,
        category,
        rating,
        score,
        level,
    })
}

pub fn validate_hash(hash: &[u8]) -> Result<[u8; 32]> {
    <[u8; 32]>::try_from(hash).map_err(|_| error!(AchievementError::InvalidHash))
}

pub fn validate_title(title: &str) -> Result<()> {
    let len = title.chars().count();
    require!(
        len > 0 && len <= Achievement::MAX_TITLE_CHARS,
        AchievementError::InvalidTitle
    );
    Ok(())
}

pub fn validate_description(description: &str) -> Result<()> {
    require!(
        description.chars().count() <= Achievement::MAX_DESCRIPTION_CHARS,
        AchievementError::InvalidDescription
    );
    Ok(())
}

pub fn validate_category(category: &str) -> Result<AchievementCategory> {
    AchievementCategory::parse(category).ok_or_else(|| error!(AchievementError::InvalidCategory))
}

pub fn validate_metadata(metadata: Option<&str>) -> Result<()> {
    if let Some(metadata) = metadata {
        require!(
            metadata.chars().count() <= Achievement::MAX_METADATA_CHARS,
            AchievementError::InvalidMetadata
        );
    }
    Ok(())
}

/// An expiry must lie strictly after the height of the write that sets it
pub fn validate_expiry(expiry: Option<u64>, height: u64) -> Result<()> {
    if let Some(expiry) = expiry {
        require!(expiry > height, AchievementError::InvalidExpiry);
    }
    Ok(())
}

/// Checks `value <= max` and narrows it to its stored width
fn bounded(value: u64, max: u8, error: AchievementError) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|value| *value <= max)
        .ok_or_else(|| error.into())
}

pub fn validate_rating(rating: u64) -> Result<u8> {
    bounded(rating, Achievement::MAX_RATING, AchievementError::InvalidRating)
}

pub fn validate_comment(comment: Option<&str>) -> Result<()> {
    if let Some(comment) = comment {
        require!(
            comment.chars().count() <= Achievement::MAX_COMMENT_CHARS,
            AchievementError::InvalidComment
        );
    }
    Ok(())
}

pub fn validate_attachment(attachment: Option<&[u8]>) -> Result<()> {
    if let Some(attachment) = attachment {
        require!(
            attachment.len() <= Achievement::MAX_ATTACHMENT_LEN,
            AchievementError::InvalidAttachment
        );
    }
    Ok(())
}

pub fn validate_score(score: u64) -> Result<u8> {
    bounded(score, Achievement::MAX_SCORE, AchievementError::InvalidScore)
}

pub fn validate_level(level: u64) -> Result<u8> {
    bounded(level, Achievement::MAX_LEVEL, AchievementError::InvalidLevel)
}
