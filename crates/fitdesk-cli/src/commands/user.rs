//! User commands
//!
//! Usage: fitdesk user <show|list|add-client|delete|check-name> ...

use super::StoreArgs;
use clap::{Args, Subcommand};
use fitdesk_core::model::{User, UserField, UserType, NEW_ID};
use fitdesk_store::{UserRepository, UserStore};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Print a user as JSON (password redacted)
    Show {
        user_id: i64,
    },
    /// List users of one type
    List {
        /// client, trainer or admin
        #[arg(short = 't', long = "type", default_value = "client")]
        user_type: String,
    },
    /// Create a client with a newly allocated id
    AddClient(AddClientArgs),
    /// Delete a user from every table that references them
    Delete {
        user_id: i64,
    },
    /// Report whether a user name is still free
    CheckName {
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct AddClientArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long, default_value = "")]
    pub plan: String,
}

pub fn execute(args: UserArgs, store: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = store.open()?;
    let repo = UserRepository::with_config(&engine, &config);

    match args.command {
        UserCommand::Show { user_id } => {
            let user = repo
                .get_user_by_id(user_id)
                .ok_or_else(|| format!("user {} not found", user_id))?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserCommand::List { user_type } => {
            let user_type: UserType = user_type.parse()?;
            let rows = repo.list_users(user_type);
            if rows.is_error() {
                return Err("users could not be read".into());
            }
            for row in 0..rows.row_count() {
                println!(
                    "{}\t{}\t{}",
                    rows.value(row, UserField::IdUser.column_name()),
                    rows.value(row, UserField::UserName.column_name()),
                    rows.value(row, UserField::Email.column_name()),
                );
            }
        }
        UserCommand::AddClient(add) => {
            if !repo.check_user_name(&add.name) {
                return Err(format!("user name {} is taken", add.name).into());
            }
            let mut user = User::client(NEW_ID, add.name, add.email, add.password, add.plan);
            if !repo.save_user(&mut user) {
                return Err("client could not be saved".into());
            }
            println!("✓ Saved client {}", user.id());
        }
        UserCommand::Delete { user_id } => {
            if !repo.delete_user(user_id) {
                return Err(format!("user {} could not be fully deleted", user_id).into());
            }
            println!("✓ Deleted user {}", user_id);
        }
        UserCommand::CheckName { name } => {
            if repo.check_user_name(&name) {
                println!("{} is available", name);
            } else {
                println!("{} is taken", name);
            }
        }
    }

    Ok(())
}
