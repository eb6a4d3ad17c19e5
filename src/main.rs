//! Holdout headless demo
//!
//! Runs a scripted host and joiner against each other over an in-process
//! channel and logs how the defence goes. Balance can be overridden with a
//! JSON object in `HOLDOUT_SETTINGS`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use holdout::Game;
    use holdout::consts::SIM_DT;
    use holdout::game::InputState;
    use holdout::net::LoopbackChannel;
    use holdout::settings::Settings;
    use holdout::sim::{GameEvent, Role};

    /// Simulated seconds to run
    const DEMO_SECONDS: f32 = 90.0;

    fn load_settings() -> Settings {
        match std::env::var("HOLDOUT_SETTINGS") {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring HOLDOUT_SETTINGS: {}", e);
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    /// Aim at the closest zombie and keep the trigger and repair key down
    fn script(game: &Game, input: &mut InputState) {
        let state = game.state();
        let me = state.player.pos;
        let target = state
            .visible_zombies()
            .into_iter()
            .map(|z| z.pos())
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));

        input.repair = true;
        match target {
            Some(pos) => {
                input.pointer = game.camera().world_to_screen(pos);
                input.fire = true;
            }
            None => {
                input.pointer = game.camera().world_to_screen(me + Vec2::X);
                input.reload = state.player.ammo < state.player.stats.mag_size;
            }
        }
    }

    fn report(name: &str, game: &Game) {
        let hud = game.hud();
        log::info!(
            "[{}] wave {} | hp {:.0}/{:.0} | ammo {}/{} | ${} | zombies left {} | planks {:?}",
            name,
            hud.wave,
            hud.health,
            hud.max_health,
            hud.ammo,
            hud.mag_size,
            hud.money,
            hud.zombies_remaining,
            game.state().building.plank_counts()
        );
    }

    pub fn run() {
        let settings = load_settings();
        let (a, b) = LoopbackChannel::pair();
        let mut host = Game::networked(settings.clone(), Role::Host, Box::new(a));
        let mut joiner = Game::networked(settings, Role::Joiner, Box::new(b));
        let mut host_input = InputState::default();
        let mut joiner_input = InputState::default();

        let mut kills = 0;
        let steps = (DEMO_SECONDS / SIM_DT) as u32;
        for step in 0..steps {
            script(&host, &mut host_input);
            script(&joiner, &mut joiner_input);
            host.frame(SIM_DT, &mut host_input);
            joiner.frame(SIM_DT, &mut joiner_input);

            for event in host.frame_events() {
                match event {
                    GameEvent::WaveStarted { wave } => log::info!("Wave {} incoming", wave),
                    GameEvent::ZombieKilled { .. } => kills += 1,
                    GameEvent::PlankBroken { window } => {
                        log::debug!("Window {} lost a plank", window)
                    }
                    _ => {}
                }
            }

            if step % (5.0 / SIM_DT) as u32 == 0 {
                report("host", &host);
                report("joiner", &joiner);
            }
            if host.hud().health <= 0.0 && joiner.hud().health <= 0.0 {
                log::info!("Both players down after {:.1}s", step as f32 * SIM_DT);
                break;
            }
        }

        // Spend whatever was earned
        for index in 0..holdout::sim::UPGRADES.len() {
            while host.buy_upgrade(index) {}
        }
        report("host", &host);
        log::info!("{} zombies killed, joiner sees: {:?}", kills, joiner.net_status());
    }
}

fn main() {
    holdout::init_logging();

    #[cfg(not(target_arch = "wasm32"))]
    demo::run();
}
