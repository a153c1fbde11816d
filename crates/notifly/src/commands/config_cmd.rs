use notifly_config::Config;

use crate::error::CliError;

pub fn handle(config: &Config) -> Result<(), CliError> {
    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
