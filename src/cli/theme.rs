use super::ui;
use crate::core::BlobStore;
use crate::core::theme::{self, Theme};
use anyhow::{Result, anyhow};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set(Theme),
}

impl FromStr for ThemeAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "toggle" => Ok(ThemeAction::Toggle),
            other => other
                .parse::<Theme>()
                .map(ThemeAction::Set)
                .map_err(|_| anyhow!("Invalid theme action: {s} (expected light, dark or toggle)")),
        }
    }
}

/// Applies `action` and returns the theme now in effect.
pub fn apply(store: &dyn BlobStore, action: ThemeAction) -> Result<Theme> {
    let current = theme::load(store);
    let next = match action {
        ThemeAction::Show => return Ok(current),
        ThemeAction::Toggle => current.toggled(),
        ThemeAction::Set(theme) => theme,
    };
    theme::save(store, next)?;
    Ok(next)
}

pub fn run(store: &dyn BlobStore, action: ThemeAction) -> Result<()> {
    let theme = apply(store, action)?;
    println!(
        "Theme: {}",
        ui::style_text(theme.as_str(), ui::StyleType::TotalLabel)
    );
    Ok(())
}
