//! User profile commands for CLI.

use clap::Subcommand;
use habitloom_core::{Database, User};

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a new user profile
    Create {
        /// User name
        name: String,
    },
    /// List user profiles
    List,
    /// Delete a user and, via cascade, their habits and logs
    Delete {
        /// User ID
        id: String,
    },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        UserAction::Create { name } => {
            let user = User::new(name)?;
            db.create_user(&user)?;
            println!("User created: {}", user.id);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserAction::List => {
            let users = db.list_users()?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        UserAction::Delete { id } => {
            if db.delete_user(&id)? {
                println!("User deleted: {id}");
            } else {
                return Err(format!("User not found: {id}").into());
            }
        }
    }
    Ok(())
}
