use anyhow::Result;
use simple_logger::init_with_level;
use std::env;

const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

pub fn init() -> Result<()> {
    init_with_level(level_from(env::var(LOG_LEVEL_VAR).ok().as_deref()))?;

    Ok(())
}

fn level_from(value: Option<&str>) -> log::Level {
    value
        .and_then(|level| level.trim().parse::<log::Level>().ok())
        .unwrap_or(log::Level::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_info() {
        assert_eq!(level_from(None), log::Level::Info);
        assert_eq!(level_from(Some("loud")), log::Level::Info);
    }

    #[test]
    fn should_parse_level_case_insensitively() {
        assert_eq!(level_from(Some("DEBUG")), log::Level::Debug);
        assert_eq!(level_from(Some(" warn ")), log::Level::Warn);
    }
}
