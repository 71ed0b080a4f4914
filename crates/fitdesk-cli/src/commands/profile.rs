//! Client profile commands
//!
//! Usage: fitdesk profile show <CLIENT_ID>
//!        fitdesk profile set <CLIENT_ID> <CATEGORY> <FIELD> <VALUE>

use super::{parse_cell, StoreArgs};
use clap::{Args, Subcommand};
use fitdesk_core::model::ProfileCategory;
use fitdesk_store::{UserRepository, UserStore};

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Print every set field as `Category.Field = value`
    Show { client_id: i64 },
    /// Set one field and save the profile
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub client_id: i64,

    /// General, Functional, Morphological, ROM, Lifestyle, Medical or Additional
    pub category: String,

    /// Field (column) name; any key for Additional
    pub field: String,

    pub value: String,
}

pub fn execute(args: ProfileArgs, store: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = store.open()?;
    let repo = UserRepository::with_config(&engine, &config);

    match args.command {
        ProfileCommand::Show { client_id } => {
            let profile = repo
                .get_client_profile(client_id)
                .ok_or_else(|| format!("profile of client {} could not be read", client_id))?;
            for category in ProfileCategory::ALL {
                for (column, value) in profile.columns(category) {
                    if value.is_supplied() {
                        println!("{}.{} = {}", category.name(), column, value);
                    }
                }
            }
        }
        ProfileCommand::Set(set) => {
            let category = ProfileCategory::parse(&set.category)
                .ok_or_else(|| format!("unknown profile category {}", set.category))?;
            let mut profile = repo
                .get_client_profile(set.client_id)
                .ok_or_else(|| format!("profile of client {} could not be read", set.client_id))?;
            profile.set_in(category, &set.field, parse_cell(&set.value))?;
            if !repo.save_client_profile(set.client_id, &profile) {
                return Err("profile could not be saved".into());
            }
            println!("✓ {}.{} saved for client {}", category.name(), set.field, set.client_id);
        }
    }

    Ok(())
}
