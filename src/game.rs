//! Fixed-step frame loop and camera
//!
//! The platform layer calls [`Game::frame`] once per display frame with the
//! elapsed wall time and the current input, then draws from the accessors.

use glam::Vec2;

use crate::consts::*;
use crate::net::{Channel, NetSession};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Hud, Role, TickInput, buy_upgrade, tick};

/// Viewport used until the platform reports one
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Scrolling camera, top-left corner in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            viewport,
        }
    }

    /// Centre on `target`, never showing beyond the world edge
    pub fn follow(&mut self, target: Vec2) {
        let max = (Vec2::new(WORLD_W, WORLD_H) - self.viewport).max(Vec2::ZERO);
        self.pos = (target - self.viewport / 2.0).clamp(Vec2::ZERO, max);
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.pos
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }
}

/// Raw input as the platform sees it
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer in screen space
    pub pointer: Vec2,
    pub fire: bool,
    pub reload: bool,
    pub repair: bool,
    pub weapon_slot: Option<u8>,
}

impl InputState {
    fn to_tick(&self, camera: &Camera) -> TickInput {
        TickInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            pointer_world: camera.screen_to_world(self.pointer),
            fire: self.fire,
            reload: self.reload,
            repair: self.repair,
            weapon_slot: self.weapon_slot,
        }
    }

    /// Forget presses that should act only once
    pub fn clear_one_shots(&mut self) {
        self.fire = false;
        self.reload = false;
        self.weapon_slot = None;
    }
}

/// A running session: simulation, optional peer, camera
pub struct Game {
    state: GameState,
    session: Option<NetSession>,
    accumulator: f32,
    camera: Camera,
    /// Events from every step of the last frame
    frame_events: Vec<GameEvent>,
}

impl Game {
    pub fn solo(settings: Settings) -> Self {
        Self::with_session(GameState::new(settings, Role::Solo), None)
    }

    /// Host or joiner over an already-connecting channel
    pub fn networked(settings: Settings, role: Role, channel: Box<dyn Channel>) -> Self {
        Self::with_session(GameState::new(settings, role), Some(NetSession::new(channel)))
    }

    fn with_session(state: GameState, session: Option<NetSession>) -> Self {
        log::info!("New {:?} game (seed {:#x})", state.role, state.settings.seed);
        let mut camera = Camera::new(DEFAULT_VIEWPORT);
        camera.follow(state.player.pos);
        Self {
            state,
            session,
            accumulator: 0.0,
            camera,
            frame_events: Vec::new(),
        }
    }

    /// Advance by `elapsed` seconds of wall time. Returns the number of
    /// simulation steps run.
    pub fn frame(&mut self, elapsed: f32, input: &mut InputState) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DT);
        self.frame_events.clear();

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.state.events.clear();
            if let Some(session) = &mut self.session {
                session.poll(&mut self.state);
            }

            let tick_input = input.to_tick(&self.camera);
            tick(&mut self.state, &tick_input, SIM_DT);

            if let Some(session) = &mut self.session {
                session.flush(&self.state, SIM_DT);
            }
            self.frame_events.extend(self.state.events.iter().cloned());

            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.clear_one_shots();
        }

        self.camera.follow(self.state.player.pos);
        substeps
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.camera.viewport = viewport;
        self.camera.follow(self.state.player.pos);
    }

    /// Shop purchase, applied between frames
    pub fn buy_upgrade(&mut self, index: usize) -> bool {
        buy_upgrade(&mut self.state, index)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> Hud {
        Hud {
            net_status: self.net_status().map(str::to_string),
            ..self.state.hud()
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    /// Connection status line, if networked
    pub fn net_status(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::LoopbackChannel;
    use crate::net::session::STATUS_DISCONNECTED;

    #[test]
    fn test_camera_clamped_to_world() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(10.0, 10.0));
        assert_eq!(camera.pos, Vec2::ZERO);
        camera.follow(Vec2::new(WORLD_W, WORLD_H));
        assert_eq!(camera.pos, Vec2::new(WORLD_W - 800.0, WORLD_H - 600.0));
        camera.follow(Vec2::new(1600.0, 1200.0));
        assert_eq!(camera.pos, Vec2::new(1200.0, 900.0));
    }

    #[test]
    fn test_camera_larger_than_world() {
        let mut camera = Camera::new(Vec2::new(5000.0, 5000.0));
        camera.follow(Vec2::new(1600.0, 1200.0));
        assert_eq!(camera.pos, Vec2::ZERO);
    }

    #[test]
    fn test_frame_runs_fixed_steps() {
        let mut game = Game::solo(Settings::default());
        let mut input = InputState::default();
        assert_eq!(game.frame(SIM_DT * 0.5, &mut input), 0);
        assert_eq!(game.frame(SIM_DT * 0.6, &mut input), 1);
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_long_frame_clamped() {
        let mut game = Game::solo(Settings::default());
        let mut input = InputState::default();
        let steps = game.frame(5.0, &mut input);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(game.state().time_ticks <= (MAX_FRAME_DT / SIM_DT).ceil() as u64);
    }

    #[test]
    fn test_fire_is_one_shot() {
        let mut game = Game::solo(Settings::default());
        let mut input = InputState {
            fire: true,
            ..Default::default()
        };
        game.frame(SIM_DT * 4.0 + 0.001, &mut input);
        assert!(!input.fire);
        assert_eq!(game.state().player.ammo, MAG_SIZE - 1);
        assert!(
            game.frame_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BulletFired { .. }))
        );
    }

    #[test]
    fn test_pointer_is_screen_space() {
        let mut game = Game::solo(Settings::default());
        let player = game.state().player.pos;
        // Pointer straight below the player on screen
        let mut input = InputState {
            pointer: game.camera().world_to_screen(player + Vec2::new(0.0, 100.0)),
            ..Default::default()
        };
        game.frame(SIM_DT, &mut input);
        let angle = game.state().player.angle;
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 0.01);
    }

    #[test]
    fn test_host_and_joiner_share_world() {
        let (a, b) = LoopbackChannel::pair();
        let mut host = Game::networked(Settings::default(), Role::Host, Box::new(a));
        let mut joiner = Game::networked(Settings::default(), Role::Joiner, Box::new(b));
        let mut input = InputState::default();

        let secs = Settings::default().first_wave_delay + 3.0;
        for _ in 0..(secs / SIM_DT) as u32 {
            host.frame(SIM_DT, &mut input);
            joiner.frame(SIM_DT, &mut input);
        }

        assert_eq!(joiner.hud().wave, 1);
        assert!(!joiner.state().remote_zombies.is_empty());
        assert!(joiner.state().zombies.is_empty());
        assert!(host.state().remote.is_some());
        assert!(joiner.state().remote.is_some());

        drop(joiner);
        host.frame(SIM_DT, &mut input);
        assert!(host.state().remote.is_none());
        assert_eq!(host.net_status(), Some(STATUS_DISCONNECTED));
    }

    #[test]
    fn test_host_reports_events_from_peer_messages() {
        let (a, mut b) = LoopbackChannel::pair();
        let mut host = Game::networked(Settings::default(), Role::Host, Box::new(a));
        let mut input = InputState::default();
        host.state
            .zombies
            .push(crate::sim::Zombie::new(42, Vec2::ZERO, 0, Default::default(), 1, 0.0));
        host.state.building.windows[2].set_planks(0);

        b.send(r#"{"type":"zombieHit","id":42,"damage":1}"#.to_string());
        b.send(r#"{"type":"addPlank","index":2}"#.to_string());
        host.frame(SIM_DT, &mut input);

        assert!(host.state().zombies.is_empty());
        assert_eq!(host.state().building.windows[2].planks(), 1);
        let events = host.frame_events();
        assert!(events.contains(&GameEvent::ZombieKilled { id: 42 }));
        assert!(events.contains(&GameEvent::PlankAdded { window: 2 }));
    }

    #[test]
    fn test_hud_carries_connection_status() {
        let solo = Game::solo(Settings::default());
        assert_eq!(solo.hud().net_status, None);

        let (a, b) = LoopbackChannel::pair();
        let mut host = Game::networked(Settings::default(), Role::Host, Box::new(a));
        let mut input = InputState::default();
        host.frame(SIM_DT, &mut input);
        assert_eq!(host.hud().net_status.as_deref(), Some("Connected."));

        drop(b);
        host.frame(SIM_DT, &mut input);
        assert_eq!(host.hud().net_status.as_deref(), Some(STATUS_DISCONNECTED));
    }
}
