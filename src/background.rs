//! Decorative background selection.

use crate::preferences;
use crate::random::random_int;
use crate::storage::Storage;
use rand::Rng;

/// Animated backgrounds shipped with the widget.
pub const CATALOG: &[&str] = &[
    "party-time",
    "ya",
    "bw-dance",
    "chu",
    "dance-1",
    "dance-2",
    "glasses",
    "omg",
    "yuha",
    "suran",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualMode {
    #[default]
    Animated,
    Static,
}

/// Where a background ends up. Implemented by the screen state.
pub trait BackgroundSurface {
    fn set_background(&mut self, asset: Option<&str>);
    fn set_visual_mode(&mut self, mode: VisualMode);
}

pub fn asset_path(name: &str) -> String {
    format!("i/bg/{name}.gif")
}

/// Pick a random catalog entry when animation is enabled, otherwise clear the
/// background and switch to static mode.
pub fn apply_random_background<S, R>(
    store: &Storage,
    surface: &mut S,
    rng: &mut R,
) -> anyhow::Result<()>
where
    S: BackgroundSurface + ?Sized,
    R: Rng + ?Sized,
{
    if preferences::get_animation_preference(store)? {
        let choice = CATALOG[random_int(rng, 0, CATALOG.len())];
        tracing::info!(background = choice, "background selected");
        surface.set_visual_mode(VisualMode::Animated);
        surface.set_background(Some(&asset_path(choice)));
    } else {
        surface.set_visual_mode(VisualMode::Static);
        surface.set_background(None);
    }
    Ok(())
}

/// Flip the stored preference and redraw the background. Returns the new value.
pub fn toggle_animation_preference<S, R>(
    store: &Storage,
    surface: &mut S,
    rng: &mut R,
) -> anyhow::Result<bool>
where
    S: BackgroundSurface + ?Sized,
    R: Rng + ?Sized,
{
    let enabled = !preferences::get_animation_preference(store)?;
    preferences::set_animation_preference(store, enabled)?;
    apply_random_background(store, surface, rng)?;
    Ok(enabled)
}
