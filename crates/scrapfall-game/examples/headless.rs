//! Run the simulation without a window: a few seconds of world time, some
//! scripted input, then a save/load round trip.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example headless
//! ```

use anyhow::Result;
use scrapfall_game::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut world = WorldSystem::new(GameConfig::default());
    let mut renderer = NullRenderer::default();
    let mut audio = NullAudio::default();

    // Walk right for two seconds, then stop and swing once.
    world.on_key(Key::Right, KeyAction::Press, &mut audio);
    for _ in 0..125 {
        world.step(16.0, &mut renderer, &mut audio);
    }
    world.on_key(Key::Right, KeyAction::Release, &mut audio);
    world.on_mouse_button(MouseButton::Left, KeyAction::Press, &mut audio);
    for _ in 0..125 {
        world.step(16.0, &mut renderer, &mut audio);
    }

    let player = world.player();
    let motion = world.registry.motions.get(player);
    println!(
        "after 4s: player at ({:.0}, {:.0}), level {}, tutorial {:?}, {} sounds played",
        motion.position.x,
        motion.position.y,
        world.current_level(),
        world.tutorial().state(),
        audio.played.len()
    );

    let json = save_to_string(&world)?;
    let mut restored = WorldSystem::new(GameConfig::default());
    load_from_str(&mut restored, &json)?;
    println!(
        "save round trip ok ({} bytes, {} motions restored)",
        json.len(),
        restored.registry.motions.len()
    );
    Ok(())
}
