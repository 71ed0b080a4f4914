//! Preferences commands
//!
//! Usage: fitdesk prefs show <USER_ID>
//!        fitdesk prefs set <USER_ID> [--mute true] [--connect 11,13] ...

use super::StoreArgs;
use clap::{Args, Subcommand};
use fitdesk_core::model::UserPreferences;
use fitdesk_store::{UserRepository, UserStore};

#[derive(Debug, Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Print the stored preferences as JSON
    Show { user_id: i64 },
    /// Change flags or add keypoint connections; unset options keep their value
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub user_id: i64,

    #[arg(long)]
    pub dual_mode: Option<bool>,

    #[arg(long)]
    pub info_sound: Option<bool>,

    #[arg(long)]
    pub alert_sound: Option<bool>,

    #[arg(long)]
    pub mute: Option<bool>,

    /// Keypoint pair `A,B`; repeatable
    #[arg(long, value_parser = parse_pair)]
    pub connect: Vec<(u32, u32)>,
}

fn parse_pair(raw: &str) -> Result<(u32, u32), String> {
    let (a, b) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected A,B but got {}", raw))?;
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|e| format!("{}: {}", s, e));
    Ok((parse(a)?, parse(b)?))
}

pub fn execute(args: PrefsArgs, store: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = store.open()?;
    let repo = UserRepository::with_config(&engine, &config);

    match args.command {
        PrefsCommand::Show { user_id } => {
            let prefs = repo
                .get_user_preferences(user_id)
                .ok_or_else(|| format!("no preferences stored for user {}", user_id))?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsCommand::Set(set) => {
            let mut prefs = repo
                .get_user_preferences(set.user_id)
                .unwrap_or_else(|| UserPreferences::new(set.user_id));
            if let Some(v) = set.dual_mode {
                prefs.dual_mode = v;
            }
            if let Some(v) = set.info_sound {
                prefs.info_sound = v;
            }
            if let Some(v) = set.alert_sound {
                prefs.alert_sound = v;
            }
            if let Some(v) = set.mute {
                prefs.mute = v;
            }
            for (a, b) in set.connect {
                prefs.connect(a, b);
            }
            if !repo.save_user_preferences(&prefs) {
                return Err("preferences could not be saved".into());
            }
            println!("✓ Preferences saved for user {}", set.user_id);
        }
    }

    Ok(())
}
