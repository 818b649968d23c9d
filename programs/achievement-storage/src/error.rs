use anchor_lang::prelude::*;

#[error_code]
pub enum AchievementError {
    #[msg("Caller is not allowed to perform this action")]
    NotAuthorized,

    #[msg("Content hash must be exactly 32 bytes")]
    InvalidHash,

    #[msg("Title must be between 1 and 100 characters")]
    InvalidTitle,

    #[msg("Description exceeds maximum length of 500 characters")]
    InvalidDescription,

    #[msg("Category must be one of academic, extracurricular, award, project")]
    InvalidCategory,

    #[msg("Metadata exceeds maximum length of 200 characters")]
    InvalidMetadata,

    #[msg("Expiry must be later than the current height")]
    InvalidExpiry,

    #[msg("Rating must be between 0 and 5")]
    InvalidRating,

    #[msg("Comment exceeds maximum length of 200 characters")]
    InvalidComment,

    #[msg("Attachment exceeds maximum length of 64 bytes")]
    InvalidAttachment,

    #[msg("Score must be between 0 and 100")]
    InvalidScore,

    #[msg("Level must be between 0 and 10")]
    InvalidLevel,

    #[msg("Owner has reached the maximum number of achievements")]
    QuotaExceeded,

    #[msg("Achievement already exists")]
    AlreadyExists,

    #[msg("Achievement not found")]
    NotFound,

    #[msg("Configuration value out of range")]
    InvalidConfig,

    #[msg("Arithmetic overflow occurred")]
    Overflow,
}
