//! Acting user resolution.
//!
//! Resolution order:
//! 1) CLI --actor, which clap also fills from TASKBOARD_ACTOR
//! 2) Config default (actor.default)
//!
//! The resolved id must exist in the user directory.

use crate::config::Config;
use crate::error::Result;
use crate::model::UserDirectory;

/// Resolve the acting user id from the CLI value or the config default.
pub fn resolve_actor(
    cli_actor: Option<&str>,
    config: &Config,
    users: &UserDirectory,
) -> Result<String> {
    let candidate = non_empty(cli_actor).unwrap_or(config.actor.default.trim());
    let user = users.require(candidate)?;
    Ok(user.id.clone())
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::error::Error;

    fn users() -> UserDirectory {
        UserDirectory::new(Dataset::seed(chrono::Utc::now()).users)
    }

    #[test]
    fn explicit_actor_wins() {
        let actor = resolve_actor(Some(" u-2 "), &Config::default(), &users()).expect("actor");
        assert_eq!(actor, "u-2");
    }

    #[test]
    fn unknown_actor_is_rejected() {
        let err = resolve_actor(Some("nobody"), &Config::default(), &users()).expect_err("err");
        assert!(matches!(err, Error::UnknownUser(_)));
    }

    #[test]
    fn blank_actor_falls_back_to_config() {
        let mut config = Config::default();
        config.actor.default = "u-4".to_string();
        assert_eq!(resolve_actor(Some("  "), &config, &users()).expect("actor"), "u-4");
        assert_eq!(resolve_actor(None, &config, &users()).expect("actor"), "u-4");
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" a ")), Some("a"));
        assert_eq!(non_empty(None), None);
    }
}
