pub mod config;
pub mod habit;
pub mod log;
pub mod user;

use habitloom_core::{Config, CoreError, Database, User};

/// Resolve the user a command acts as: the `--user` flag if given,
/// otherwise the configured active user.
pub fn resolve_user(
    db: &Database,
    flag: Option<String>,
    config: &Config,
) -> Result<User, Box<dyn std::error::Error>> {
    let name = flag
        .or_else(|| config.active_user.clone())
        .ok_or("no user given: pass --user or set active_user in the config")?;
    let user = db
        .user_by_name(&name)?
        .ok_or(CoreError::UserNotFound { name })?;
    Ok(user)
}
