//! Reads and writes program accounts that may not exist yet.
//!
//! Record PDAs are passed as seed-checked `UncheckedAccount`s so a missing
//! key reaches the store as `None` instead of failing account validation.

use anchor_lang::prelude::*;
use anchor_lang::{AccountDeserialize, AccountSerialize, Owner};

use crate::error::AchievementError;

/// True when the account holds data owned by this program
pub fn is_initialized<T: Owner>(info: &AccountInfo) -> bool {
    info.owner == &T::owner() && !info.data_is_empty()
}

/// Deserializes the account, or `None` when nothing is stored under it
pub fn load<T: AccountDeserialize + Owner>(info: &AccountInfo) -> Result<Option<T>> {
    if !is_initialized::<T>(info) {
        return Ok(None);
    }

    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..]).map(Some)
}

/// Writes `value` back over the account data, discriminator included
pub fn store_back<T: AccountSerialize>(value: &T, info: &AccountInfo) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    value.try_serialize(&mut writer)
}

/// Moves every lamport of `info` to `destination`
pub fn release_lamports<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let released = info.lamports();
    let credited = destination
        .lamports()
        .checked_add(released)
        .ok_or(AchievementError::Overflow)?;

    **destination.try_borrow_mut_lamports()? = credited;
    **info.try_borrow_mut_lamports()? = 0;

    Ok(())
}

/// Closes a program account, refunding its rent to `destination`
pub fn close<'info>(info: &AccountInfo<'info>, destination: &AccountInfo<'info>) -> Result<()> {
    release_lamports(info, destination)?;
    info.assign(&System::id());
    info.realloc(0, false)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Achievement, AchievementUpdate, OwnerIndex};

    fn serialized<T: AccountSerialize>(value: &T, len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        value.try_serialize(&mut &mut data[..]).unwrap();
        data
    }

    #[test]
    fn test_missing_account_loads_as_none() {
        let key = Pubkey::new_unique();
        let system = System::id();
        let mut lamports = 0;
        let mut data = vec![];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &system, false, 0);

        assert!(!is_initialized::<Achievement>(&info));
        assert_eq!(load::<Achievement>(&info).unwrap(), None);
    }

    #[test]
    fn test_foreign_account_loads_as_none() {
        let key = Pubkey::new_unique();
        let foreign = Pubkey::new_unique();
        let mut lamports = 1;
        let mut data = serialized(&Achievement::default(), Achievement::MAX_SIZE);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &foreign, false, 0);

        assert!(!is_initialized::<Achievement>(&info));
        assert_eq!(load::<Achievement>(&info).unwrap(), None);
    }

    #[test]
    fn test_load_and_store_back() {
        let key = Pubkey::new_unique();
        let program = crate::ID;
        let owner = Pubkey::new_unique();
        let achievement = Achievement {
            owner,
            achievement_id: 7,
            title: "Old".to_string(),
            ..Achievement::default()
        };
        let mut lamports = 1;
        let mut data = serialized(&achievement, Achievement::MAX_SIZE);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program, false, 0);

        let mut loaded = load::<Achievement>(&info).unwrap().unwrap();
        assert_eq!(loaded, achievement);

        loaded.title = "New".to_string();
        store_back(&loaded, &info).unwrap();
        assert_eq!(load::<Achievement>(&info).unwrap().unwrap().title, "New");
    }

    #[test]
    fn test_wrong_account_type_is_rejected() {
        let key = Pubkey::new_unique();
        let program = crate::ID;
        let mut lamports = 1;
        let mut data = serialized(&OwnerIndex::default(), OwnerIndex::space_for(0));
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program, false, 0);

        assert!(load::<Achievement>(&info).is_err());
    }

    #[test]
    fn test_updated_record_audit_entry_is_seen_for_closing() {
        let key = Pubkey::new_unique();
        let program = crate::ID;
        let update = AchievementUpdate {
            owner: Pubkey::new_unique(),
            update_height: 3,
            change_summary: AchievementUpdate::CHANGE_SUMMARY.to_string(),
            ..AchievementUpdate::default()
        };
        let mut lamports = 1;
        let mut data = serialized(&update, AchievementUpdate::SIZE);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program, false, 0);

        assert!(is_initialized::<AchievementUpdate>(&info));
    }

    #[test]
    fn test_release_lamports() {
        let key = Pubkey::new_unique();
        let caller = Pubkey::new_unique();
        let program = crate::ID;
        let system = System::id();
        let mut record_lamports = 2_000;
        let mut caller_lamports = 500;
        let mut record_data = vec![1u8; 16];
        let mut caller_data = vec![];
        let record = AccountInfo::new(
            &key,
            false,
            true,
            &mut record_lamports,
            &mut record_data,
            &program,
            false,
            0,
        );
        let destination = AccountInfo::new(
            &caller,
            true,
            true,
            &mut caller_lamports,
            &mut caller_data,
            &system,
            false,
            0,
        );

        release_lamports(&record, &destination).unwrap();
        assert_eq!(record.lamports(), 0);
        assert_eq!(destination.lamports(), 2_500);
    }
}
