use anchor_lang::prelude::*;
use anchor_lang::system_program;

declare_id!("MXEv1nw16VU5Ex5LVuLaQVhFgRFFfPYd8uk8NMtgxHn");

pub mod error;
pub mod events;
pub mod loader;
pub mod state;
pub mod store;
pub mod validation;

use error::*;
use events::*;
use state::*;
use store::{FeeQueue, Invocation};
use validation::AchievementInput;

/// Caller and current slot of the running instruction
fn invocation(caller: Pubkey) -> Result<Invocation> {
    Ok(Invocation {
        caller,
        height: Clock::get()?.slot,
    })
}

/// Hands queued creation fees to the system program, in request order
fn drain_fees<'info>(
    fees: &mut FeeQueue,
    payer: AccountInfo<'info>,
    payee: AccountInfo<'info>,
    system_program_info: AccountInfo<'info>,
) -> Result<()> {
    for request in fees.drain() {
        // Nothing moves for a zero fee or when the admin stores for itself
        if request.amount > 0 && request.from != request.to {
            system_program::transfer(
                CpiContext::new(
                    system_program_info.clone(),
                    system_program::Transfer {
                        from: payer.clone(),
                        to: payee.clone(),
                    },
                ),
                request.amount,
            )?;
        }

        emit!(CreationFeeRequested {
            amount: request.amount,
            from: request.from,
            to: request.to,
        });
    }

    Ok(())
}

/// Reallocates the owner index so its ids fit, topping up rent from `payer`
fn grow_owner_index<'info>(
    index: &Account<'info, OwnerIndex>,
    payer: AccountInfo<'info>,
    system_program_info: AccountInfo<'info>,
) -> Result<()> {
    let info = index.to_account_info();
    let required = OwnerIndex::space_for(index.ids.len());
    if info.data_len() >= required {
        return Ok(());
    }

    let shortfall = Rent::get()?
        .minimum_balance(required)
        .saturating_sub(info.lamports());
    if shortfall > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program_info,
                system_program::Transfer {
                    from: payer,
                    to: info.clone(),
                },
            ),
            shortfall,
        )?;
    }

    info.realloc(required, false)?;

    Ok(())
}

#[program]
pub mod achievement_storage {
    use super::*;

    /// Initialize the achievement storage
    ///
    /// Creates the global StorageConfig account. The signer becomes the admin.
    ///
    /// # Arguments
    /// * `max_per_owner` - Live achievements allowed per owner, at least 1
    /// * `creation_fee` - Lamports requested from the owner on every create
    ///
    /// # Errors
    /// * `InvalidConfig` - If max_per_owner is 0
    pub fn initialize(
        ctx: Context<Initialize>,
        max_per_owner: u64,
        creation_fee: u64,
    ) -> Result<()> {
        let config = &mut ctx.accounts.config;

        store::initialize(
            config,
            ctx.accounts.authority.key(),
            max_per_owner,
            creation_fee,
        )?;
        config.bump = ctx.bumps.config;

        emit!(StorageInitialized {
            authority: config.authority,
            max_per_owner,
            creation_fee,
        });

        msg!(
            "Achievement storage initialized by {}",
            ctx.accounts.authority.key()
        );

        Ok(())
    }

    /// Store a new achievement for the signer
    ///
    /// Assigns the next global achievement ID, appends it to the owner's index
    /// and requests the creation fee from the owner to the admin. The index
    /// account grows by one slot whenever it is full, paid by the owner.
    ///
    /// # Events
    /// * `CreationFeeRequested` - One per fee handed to the system program
    /// * `AchievementCreated` - Emitted when the achievement is stored
    ///
    /// # Errors
    /// * `QuotaExceeded` - If the owner already holds max_per_owner achievements
    /// * `InvalidHash` ... `InvalidLevel` - First field rule that fails
    /// * `AlreadyExists` - If the record PDA is already in use
    pub fn create_achievement(
        ctx: Context<CreateAchievement>,
        input: AchievementInput,
    ) -> Result<u64> {
        let owner = ctx.accounts.owner.key();
        let invocation = invocation(owner)?;
        let mut fees = FeeQueue::default();
        let accounts = &mut *ctx.accounts;

        let achievement_id = store::create_achievement(
            &invocation,
            &mut accounts.config,
            &mut accounts.owner_index,
            &mut accounts.achievement,
            input,
            &mut fees,
        )?;
        accounts.achievement.bump = ctx.bumps.achievement;
        accounts.owner_index.bump = ctx.bumps.owner_index;

        grow_owner_index(
            &accounts.owner_index,
            accounts.owner.to_account_info(),
            accounts.system_program.to_account_info(),
        )?;

        drain_fees(
            &mut fees,
            accounts.owner.to_account_info(),
            accounts.authority.to_account_info(),
            accounts.system_program.to_account_info(),
        )?;

        emit!(AchievementCreated {
            owner,
            achievement_id,
            content_hash: accounts.achievement.content_hash,
            created_at: accounts.achievement.created_at,
        });

        msg!(
            "Achievement {} created by {} at slot {}",
            achievement_id,
            owner,
            invocation.height
        );

        Ok(achievement_id)
    }

    /// Update title, description and visibility of an achievement
    ///
    /// Only the achievement owner can call this. Overwrites the single
    /// AchievementUpdate record of the key.
    ///
    /// # Errors
    /// * `NotFound` - If no achievement is stored under (owner, achievement_id)
    /// * `NotAuthorized` - If the signer is not the owner
    /// * `InvalidTitle` / `InvalidDescription` - Same rules as create
    pub fn update_achievement(
        ctx: Context<UpdateAchievement>,
        owner: Pubkey,
        achievement_id: u64,
        new_title: String,
        new_description: String,
        new_visibility: bool,
    ) -> Result<()> {
        let invocation = invocation(ctx.accounts.caller.key())?;
        let accounts = &mut *ctx.accounts;

        let achievement_info = accounts.achievement.to_account_info();
        let mut achievement = loader::load::<Achievement>(&achievement_info)?;

        store::update_achievement(
            &invocation,
            achievement.as_mut(),
            &mut accounts.achievement_update,
            new_title,
            new_description,
            new_visibility,
        )?;
        accounts.achievement_update.bump = ctx.bumps.achievement_update;

        if let Some(achievement) = &achievement {
            loader::store_back(achievement, &achievement_info)?;
        }

        emit!(AchievementUpdated {
            owner,
            achievement_id,
            updater: invocation.caller,
            update_height: invocation.height,
        });

        msg!(
            "Achievement {} of {} updated at slot {}",
            achievement_id,
            owner,
            invocation.height
        );

        Ok(())
    }

    /// Delete an achievement and its last update record
    ///
    /// Only the achievement owner can call this. Rent of the closed accounts
    /// goes back to the signer.
    ///
    /// # Errors
    /// * `NotFound` - If no achievement is stored under (owner, achievement_id)
    /// * `NotAuthorized` - If the signer is not the owner
    pub fn delete_achievement(
        ctx: Context<DeleteAchievement>,
        owner: Pubkey,
        achievement_id: u64,
    ) -> Result<()> {
        let invocation = invocation(ctx.accounts.caller.key())?;
        let accounts = &mut *ctx.accounts;

        let achievement_info = accounts.achievement.to_account_info();
        let update_info = accounts.achievement_update.to_account_info();
        let index_info = accounts.owner_index.to_account_info();
        let achievement = loader::load::<Achievement>(&achievement_info)?;
        let mut index = loader::load::<OwnerIndex>(&index_info)?;

        store::delete_achievement(&invocation, index.as_mut(), achievement.as_ref())?;

        if let Some(index) = &index {
            loader::store_back(index, &index_info)?;
        }

        let rent_destination = accounts.caller.to_account_info();
        loader::close(&achievement_info, &rent_destination)?;
        if loader::is_initialized::<AchievementUpdate>(&update_info) {
            loader::close(&update_info, &rent_destination)?;
        }

        emit!(AchievementDeleted {
            owner,
            achievement_id,
        });

        msg!("Achievement {} of {} deleted", achievement_id, owner);

        Ok(())
    }

    /// Change the per-owner quota (admin only)
    ///
    /// # Errors
    /// * `NotAuthorized` - If the signer is not the admin
    /// * `InvalidConfig` - If new_max is 0
    pub fn set_max_per_owner(ctx: Context<Configure>, new_max: u64) -> Result<()> {
        let invocation = invocation(ctx.accounts.authority.key())?;
        let config = &mut ctx.accounts.config;
        let old_max = config.max_per_owner;

        store::set_max_per_owner(&invocation, config, new_max)?;

        emit!(MaxPerOwnerChanged { old_max, new_max });

        msg!("Max achievements per owner: {} -> {}", old_max, new_max);

        Ok(())
    }

    /// Change the creation fee (admin only)
    ///
    /// # Errors
    /// * `NotAuthorized` - If the signer is not the admin
    pub fn set_creation_fee(ctx: Context<Configure>, new_fee: u64) -> Result<()> {
        let invocation = invocation(ctx.accounts.authority.key())?;
        let config = &mut ctx.accounts.config;
        let old_fee = config.creation_fee;

        store::set_creation_fee(&invocation, config, new_fee)?;

        emit!(CreationFeeChanged { old_fee, new_fee });

        msg!("Creation fee: {} -> {}", old_fee, new_fee);

        Ok(())
    }

    /// Number of achievements ever created, across all owners
    pub fn total_created(ctx: Context<TotalCreated>) -> Result<u64> {
        Ok(ctx.accounts.config.total_created())
    }

    /// Live achievement count of an owner (0 without an index)
    pub fn achievement_count(ctx: Context<OwnerIndexView>, _owner: Pubkey) -> Result<u64> {
        Ok(store::achievement_count(ctx.accounts.owner_index.as_deref()))
    }

    /// Live achievement IDs of an owner, in creation order
    ///
    /// Return data is capped at 1024 bytes, so owners holding more than
    /// `OwnerIndex::MAX_RETURNED_IDS` ids are read by fetching the index account.
    pub fn achievement_ids(ctx: Context<OwnerIndexView>, _owner: Pubkey) -> Result<Vec<u64>> {
        Ok(store::achievement_ids(ctx.accounts.owner_index.as_deref()))
    }

    /// Most recent update of an achievement, if any
    pub fn last_update(
        ctx: Context<LastUpdateView>,
        _owner: Pubkey,
        _achievement_id: u64,
    ) -> Result<Option<AchievementUpdate>> {
        Ok(store::last_update(ctx.accounts.achievement_update.as_deref()))
    }
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = StorageConfig::SIZE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, StorageConfig>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CreateAchievement<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, StorageConfig>,

    #[account(
        init_if_needed,
        payer = owner,
        space = OwnerIndex::space_for(1),
        seeds = [OWNER_INDEX_SEED, owner.key().as_ref()],
        bump
    )]
    pub owner_index: Account<'info, OwnerIndex>,

    /// Record PDA for (owner, next_achievement_id); an initialized account
    /// here is rejected with AlreadyExists
    #[account(
        init_if_needed,
        payer = owner,
        space = Achievement::MAX_SIZE,
        seeds = [
            ACHIEVEMENT_SEED,
            owner.key().as_ref(),
            &config.next_achievement_id.to_le_bytes()
        ],
        bump
    )]
    pub achievement: Account<'info, Achievement>,

    /// Admin wallet receiving the creation fee
    #[account(
        mut,
        address = config.authority @ AchievementError::NotAuthorized
    )]
    pub authority: SystemAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey, achievement_id: u64)]
pub struct UpdateAchievement<'info> {
    /// CHECK: record PDA of (owner, achievement_id); an empty account is
    /// reported as NotFound by the handler
    #[account(
        mut,
        seeds = [ACHIEVEMENT_SEED, owner.as_ref(), &achievement_id.to_le_bytes()],
        bump
    )]
    pub achievement: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = caller,
        space = AchievementUpdate::SIZE,
        seeds = [ACHIEVEMENT_UPDATE_SEED, owner.as_ref(), &achievement_id.to_le_bytes()],
        bump
    )]
    pub achievement_update: Account<'info, AchievementUpdate>,

    #[account(mut)]
    pub caller: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey, achievement_id: u64)]
pub struct DeleteAchievement<'info> {
    /// CHECK: record PDA of (owner, achievement_id); an empty account is
    /// reported as NotFound by the handler
    #[account(
        mut,
        seeds = [ACHIEVEMENT_SEED, owner.as_ref(), &achievement_id.to_le_bytes()],
        bump
    )]
    pub achievement: UncheckedAccount<'info>,

    /// CHECK: last-update PDA of (owner, achievement_id); closed whenever it
    /// holds an update record
    #[account(
        mut,
        seeds = [ACHIEVEMENT_UPDATE_SEED, owner.as_ref(), &achievement_id.to_le_bytes()],
        bump
    )]
    pub achievement_update: UncheckedAccount<'info>,

    /// CHECK: index PDA of the owner, deserialized by the handler
    #[account(
        mut,
        seeds = [OWNER_INDEX_SEED, owner.as_ref()],
        bump
    )]
    pub owner_index: UncheckedAccount<'info>,

    #[account(mut)]
    pub caller: Signer<'info>,
}

#[derive(Accounts)]
pub struct Configure<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, StorageConfig>,

    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct TotalCreated<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, StorageConfig>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct OwnerIndexView<'info> {
    #[account(seeds = [OWNER_INDEX_SEED, owner.as_ref()], bump)]
    pub owner_index: Option<Account<'info, OwnerIndex>>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey, achievement_id: u64)]
pub struct LastUpdateView<'info> {
    #[account(
        seeds = [ACHIEVEMENT_UPDATE_SEED, owner.as_ref(), &achievement_id.to_le_bytes()],
        bump
    )]
    pub achievement_update: Option<Account<'info, AchievementUpdate>>,
}
