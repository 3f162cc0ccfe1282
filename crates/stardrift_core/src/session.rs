//! Game session orchestration
//!
//! One `GameSession` owns every mutable piece of simulation state and is
//! the single authoritative mutation point per tick:
//!
//! 1. apply buffered network broadcasts
//! 2. advance the clock, player flight, and difficulty
//! 3. materialize due scheduled spawns, then top up via the spawn
//!    director and plan waves
//! 4. motion pass over active asteroids
//! 5. resolve at most one collision and its damage
//! 6. push transforms to the render sink, report state over the transport
//!
//! Timers, the frame loop, and network callbacks never reach into shared
//! globals; everything flows through this object. A session `reset` bumps
//! the generation counter so events scheduled by a previous round can
//! never mutate the new one.

use crate::collision::CollisionResolver;
use crate::config::{Config, GameConfig};
use crate::difficulty::{DifficultyController, SpeedProgression};
use crate::entity::AsteroidKind;
use crate::foundation::math::{forward_from_rotation, lateral_axis, Transform, Vec3};
use crate::input::InputState;
use crate::motion::MotionModel;
use crate::net::local::Transport;
use crate::net::protocol::{ClientMessage, ServerMessage};
use crate::net::reconcile::{merge_players, StateInbox};
use crate::player::{DamageOutcome, Player, PlayerId};
use crate::pool::AsteroidPool;
use crate::render::RenderSink;
use crate::schedule::{EventKind, Scheduler};
use crate::spawn::{SpawnContext, SpawnDirector};
use crate::waves::WaveDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// The complete state of one client's simulation
pub struct GameSession {
    config: GameConfig,
    local_id: PlayerId,
    players: HashMap<PlayerId, Player>,
    running: bool,
    game_over_sent: bool,
    fire_held: bool,
    generation: u64,
    clock: f64,
    pool: AsteroidPool,
    spawner: SpawnDirector,
    waves: WaveDirector,
    motion: MotionModel,
    collider: CollisionResolver,
    difficulty: DifficultyController,
    speed: SpeedProgression,
    scheduler: Scheduler,
    inbox: StateInbox,
    rng: StdRng,
}

impl GameSession {
    /// Create a session in the lobby with one local player
    pub fn new(config: GameConfig, local_id: PlayerId, name: impl Into<String>) -> Self {
        let mut players = HashMap::new();
        players.insert(local_id, Player::new(local_id, name));

        Self {
            pool: AsteroidPool::new(config.pool.clone()),
            spawner: SpawnDirector::new(config.spawn.clone()),
            waves: WaveDirector::new(config.waves.clone()),
            motion: MotionModel::new(config.motion.clone()),
            collider: CollisionResolver::new(config.combat.clone()),
            difficulty: DifficultyController::new(config.difficulty.clone()),
            speed: SpeedProgression::new(config.flight.clone()),
            scheduler: Scheduler::new(),
            inbox: StateInbox::new(),
            rng: StdRng::from_entropy(),
            config,
            local_id,
            players,
            running: false,
            game_over_sent: false,
            fire_held: false,
            generation: 0,
            clock: 0.0,
        }
    }

    /// Create a session from a config file, falling back to defaults
    pub fn from_config_file(path: &str, local_id: PlayerId, name: impl Into<String>) -> Self {
        Self::new(GameConfig::load_or_default(path), local_id, name)
    }

    /// Use a deterministic RNG seed (tests and replays of a sort)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Begin a round: fresh simulation state, difficulty back to 1
    pub fn start(&mut self) {
        self.wipe_simulation();
        self.running = true;
        log::info!("session started (generation {})", self.generation);
    }

    /// Return to the lobby: fresh simulation state, players reset,
    /// not running
    pub fn reset(&mut self) {
        self.wipe_simulation();
        self.running = false;
        for player in self.players.values_mut() {
            player.reset();
        }
        log::info!("session reset to lobby (generation {})", self.generation);
    }

    fn wipe_simulation(&mut self) {
        self.generation += 1; // invalidates every pending scheduled event
        self.scheduler.clear();
        self.pool.clear();
        self.spawner.reset();
        self.waves.reset();
        self.collider.reset();
        self.difficulty.reset();
        self.speed.reset();
        self.clock = 0.0;
        self.game_over_sent = false;
        self.fire_held = false;
    }

    /// Whether a round is in progress
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current difficulty level
    pub fn difficulty_level(&self) -> u32 {
        self.difficulty.level()
    }

    /// Session clock in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// The local player, if still present in the roster
    pub fn local_player(&self) -> Option<&Player> {
        self.players.get(&self.local_id)
    }

    /// Full mirrored roster
    pub fn players(&self) -> &HashMap<PlayerId, Player> {
        &self.players
    }

    /// The asteroid pool (read access for renderers and tests)
    pub fn pool(&self) -> &AsteroidPool {
        &self.pool
    }

    /// Buffer a server broadcast for the next tick (socket callback side)
    pub fn buffer_broadcast(&mut self, msg: ServerMessage) {
        self.inbox.push(msg);
    }

    /// Run one simulation tick
    pub fn tick(
        &mut self,
        dt: f32,
        input: &InputState,
        render: &mut dyn RenderSink,
        transport: &mut dyn Transport,
    ) {
        self.apply_buffered_broadcasts(transport);

        if !self.running {
            return;
        }
        self.clock += f64::from(dt);

        let eliminated = self
            .players
            .get(&self.local_id)
            .map_or(true, |p| p.eliminated);

        if !eliminated {
            self.advance_flight(dt, input);
        }

        let (player_pos, player_forward) = match self.players.get(&self.local_id) {
            Some(p) => (p.position, forward_from_rotation(&p.rotation)),
            // player not in the mirror this tick: retry next tick
            None => return,
        };

        // fire is edge-triggered so a held key sends one shot per press
        if !eliminated && input.fire && !self.fire_held {
            transport.send(&ClientMessage::Shoot {
                position: player_pos.into(),
                direction: player_forward.into(),
            });
        }
        self.fire_held = input.fire;

        let ctx = SpawnContext {
            player_pos,
            player_forward,
            player_speed: self.speed.speed(),
            difficulty_level: self.difficulty.level(),
            now: self.clock,
        };

        self.materialize_due_spawns(render);

        for handle in self.spawner.tick(&ctx, &mut self.pool, &mut self.rng) {
            if let Some(asteroid) = self.pool.get(handle) {
                render.entity_spawned(
                    handle.index,
                    &Transform {
                        position: asteroid.position,
                        rotation: asteroid.rotation,
                        scale: asteroid.scale,
                    },
                    asteroid.is_hunter(),
                );
            }
        }

        self.waves.tick(
            &ctx,
            &self.difficulty,
            &mut self.scheduler,
            self.generation,
            &mut self.rng,
        );

        // motion pass
        for handle in self.pool.active_handles() {
            if let Some(asteroid) = self.pool.get_mut(handle) {
                self.motion.step(asteroid, &player_pos, dt, &mut self.rng);
                render.entity_moved(
                    handle.index,
                    &Transform {
                        position: asteroid.position,
                        rotation: asteroid.rotation,
                        scale: asteroid.scale,
                    },
                );
            }
        }

        if !eliminated {
            self.resolve_collisions(&player_pos, render, transport);
        }

        if let Some(player) = self.players.get(&self.local_id) {
            render.player_moved(&Transform {
                position: player.position,
                rotation: player.rotation,
                scale: 1.0,
            });
            transport.send(&ClientMessage::Update {
                position: player.position.into(),
                rotation: player.rotation.into(),
                health: player.health,
                score: player.score,
            });
        }
    }

    /// Apply every buffered broadcast atomically before simulating
    fn apply_buffered_broadcasts(&mut self, transport: &mut dyn Transport) {
        for msg in transport.poll() {
            self.inbox.push(msg);
        }

        for msg in self.inbox.drain() {
            match msg {
                ServerMessage::Joined { id, players } => {
                    // adopt the relay-assigned identity, keeping our name
                    if let Some(mut local) = self.players.remove(&self.local_id) {
                        local.id = id;
                        self.local_id = id;
                        self.players.insert(id, local);
                    } else {
                        self.local_id = id;
                    }
                    merge_players(&mut self.players, self.local_id, &players);
                }
                ServerMessage::PlayersUpdated {
                    players,
                    game_started,
                }
                | ServerMessage::GameState {
                    players,
                    game_started,
                } => {
                    merge_players(&mut self.players, self.local_id, &players);
                    if !game_started && self.running {
                        self.reset();
                    }
                }
                ServerMessage::GameStarted => {
                    if !self.running {
                        self.start();
                    }
                }
                ServerMessage::Countdown { time_left } => {
                    log::debug!("countdown: {time_left}");
                }
                ServerMessage::Shoot { player_id, .. } => {
                    // remote shot visuals are a renderer concern
                    log::trace!("remote shot from {player_id}");
                }
                ServerMessage::GameOver { winner } => {
                    log::info!("game over, winner: {winner:?}");
                    self.running = false;
                }
            }
        }
    }

    /// Constant forward flight plus steering from the discrete inputs
    fn advance_flight(&mut self, dt: f32, input: &InputState) {
        let flight = &self.config.flight;
        let turn = flight.turn_rate * dt;
        let base_speed = self.speed.speed();

        let Some(player) = self.players.get_mut(&self.local_id) else {
            return;
        };

        if input.left {
            player.rotation.y += turn;
        }
        if input.right {
            player.rotation.y -= turn;
        }
        if input.up {
            player.rotation.x = (player.rotation.x + turn).min(1.2);
        }
        if input.down {
            player.rotation.x = (player.rotation.x - turn).max(-1.2);
        }

        let forward = forward_from_rotation(&player.rotation);
        let speed = if input.boost {
            base_speed * flight.boost_multiplier
        } else {
            base_speed
        };
        player.position += forward * speed * dt;

        // lateral drift while steering makes dodging feel responsive
        let side = lateral_axis(&forward);
        if input.left {
            player.position -= side * flight.strafe_speed * dt;
        }
        if input.right {
            player.position += side * flight.strafe_speed * dt;
        }

        // distance via time x speed integration drives both progressions
        let milestones = self.difficulty.advance(speed * dt);
        for _ in 0..milestones {
            self.speed.on_milestone();
        }
    }

    /// Pop due scheduled events and turn them into live asteroids
    fn materialize_due_spawns(&mut self, render: &mut dyn RenderSink) {
        for event in self.scheduler.drain_due(self.clock, self.generation) {
            match event {
                EventKind::SpawnAsteroid {
                    position,
                    kind,
                    velocity,
                } => {
                    let handle = self.pool.acquire(self.clock);
                    if let Some(asteroid) = self.pool.get_mut(handle) {
                        let (lo, hi) = kind.targeting_factor_range();
                        asteroid.position = position;
                        asteroid.velocity = velocity;
                        asteroid.kind = kind;
                        asteroid.targeting_factor = self.rng.gen_range(lo..=hi);
                        asteroid.targeting_speed = 1.0;
                        asteroid.scale = self
                            .rng
                            .gen_range(self.config.spawn.scale_range.0..=self.config.spawn.scale_range.1);
                        asteroid.angular_velocity = Vec3::new(
                            self.rng.gen_range(-0.8..0.8),
                            self.rng.gen_range(-0.8..0.8),
                            self.rng.gen_range(-0.8..0.8),
                        );
                        render.entity_spawned(
                            handle.index,
                            &Transform {
                                position,
                                rotation: Vec3::zeros(),
                                scale: asteroid.scale,
                            },
                            kind == AsteroidKind::Hunter,
                        );
                    }
                }
            }
        }
    }

    fn resolve_collisions(
        &mut self,
        player_pos: &Vec3,
        render: &mut dyn RenderSink,
        transport: &mut dyn Transport,
    ) {
        let Some(player) = self.players.get_mut(&self.local_id) else {
            return;
        };

        if let Some(hit) = self
            .collider
            .resolve(player, player_pos, &mut self.pool, self.clock)
        {
            render.player_hit(hit.damage);
            render.entity_despawned(hit.asteroid.index);

            if hit.outcome == DamageOutcome::Eliminated && !self.game_over_sent {
                self.game_over_sent = true;
                transport.send(&ClientMessage::GameOver);
                log::info!("local player eliminated");
                if transport.is_local() {
                    // single-player: the session ends here; multiplayer
                    // waits for the relay's verdict
                    self.running = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::local::LocalTransport;
    use crate::net::protocol::PlayerSnapshot;
    use crate::render::recording::{RecordingSink, SinkEvent};
    use crate::render::NullRenderSink;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> GameSession {
        let mut s = GameSession::new(GameConfig::default(), PlayerId(0), "pilot").with_seed(42);
        s.start();
        s
    }

    fn run_ticks(session: &mut GameSession, ticks: usize) {
        let input = InputState::default();
        let mut render = NullRenderSink;
        let mut transport = LocalTransport::new();
        for _ in 0..ticks {
            session.tick(DT, &input, &mut render, &mut transport);
        }
    }

    #[test]
    fn asteroids_appear_and_difficulty_holds_at_one_early() {
        let mut s = session();
        run_ticks(&mut s, 120);
        assert!(s.pool().active_count() > 0);
        assert_eq!(s.difficulty_level(), 1);
    }

    #[test]
    fn difficulty_climbs_with_distance() {
        let mut s = session();
        // enough flight time to cross several 300-unit milestones
        run_ticks(&mut s, 60 * 60);
        assert!(s.difficulty_level() > 1);
        let level_then = s.difficulty_level();
        run_ticks(&mut s, 60 * 30);
        assert!(s.difficulty_level() >= level_then);
    }

    #[test]
    fn render_sink_sees_spawn_lifecycle() {
        let mut s = session();
        let input = InputState::default();
        let mut sink = RecordingSink::default();
        let mut transport = LocalTransport::new();
        for _ in 0..120 {
            s.tick(DT, &input, &mut sink, &mut transport);
        }
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, SinkEvent::Spawned(_))));
    }

    #[test]
    fn lethal_collision_ends_single_player_session() {
        let mut s = session();
        let input = InputState::default();
        let mut sink = RecordingSink::default();
        let mut transport = LocalTransport::new();

        // park an asteroid on the player every tick until health runs out
        for _ in 0..600 {
            let player_pos = s.local_player().unwrap().position;
            let handle = s.pool.acquire(s.clock());
            if let Some(a) = s.pool.get_mut(handle) {
                a.position = player_pos;
                a.scale = 1.0;
                a.targeting_factor = 0.0;
            }
            s.tick(DT, &input, &mut sink, &mut transport);
            if !s.is_running() {
                break;
            }
        }

        assert!(!s.is_running());
        let player = s.local_player().unwrap();
        assert_eq!(player.health, 0);
        assert!(player.eliminated);
        assert!(transport.sent_game_over());
        let hits = sink
            .events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Hit(_)))
            .count();
        assert_eq!(hits, 10, "100 health / 10 damage = 10 hits");
    }

    #[test]
    fn game_started_broadcast_starts_round_at_difficulty_one() {
        let mut s = GameSession::new(GameConfig::default(), PlayerId(0), "pilot").with_seed(1);
        assert!(!s.is_running());

        s.buffer_broadcast(ServerMessage::GameStarted);
        let input = InputState::default();
        let mut render = NullRenderSink;
        let mut transport = LocalTransport::new();
        s.tick(DT, &input, &mut render, &mut transport);

        assert!(s.is_running());
        assert_eq!(s.difficulty_level(), 1);
    }

    #[test]
    fn joined_broadcast_adopts_relay_identity() {
        let mut s = GameSession::new(GameConfig::default(), PlayerId(0), "pilot").with_seed(1);

        let mut roster = HashMap::new();
        let mut me = Player::new(PlayerId(7), "pilot");
        me.position = Vec3::zeros();
        roster.insert(PlayerId(7), PlayerSnapshot::from(&me));

        s.buffer_broadcast(ServerMessage::Joined {
            id: PlayerId(7),
            players: roster,
        });
        let input = InputState::default();
        let mut render = NullRenderSink;
        let mut transport = LocalTransport::new();
        s.tick(DT, &input, &mut render, &mut transport);

        assert_eq!(s.local_player().unwrap().id, PlayerId(7));
    }

    #[test]
    fn broadcast_merge_keeps_local_kinematics() {
        let mut s = session();
        run_ticks(&mut s, 30);
        let pre = s.local_player().unwrap().clone();

        // echo of our own state with stale kinematics but fresh vitals
        let mut echoed = pre.clone();
        echoed.position = Vec3::zeros();
        echoed.health = 55;
        let mut roster = HashMap::new();
        roster.insert(echoed.id, PlayerSnapshot::from(&echoed));
        s.buffer_broadcast(ServerMessage::GameState {
            players: roster,
            game_started: true,
        });

        let input = InputState::default();
        let mut render = NullRenderSink;
        let mut transport = LocalTransport::new();
        s.tick(DT, &input, &mut render, &mut transport);

        let after = s.local_player().unwrap();
        assert_eq!(after.health, 55);
        // position moved on by exactly one tick of flight from the local
        // value, not the stale echoed one
        assert!((after.position - pre.position).magnitude() < 5.0);
    }

    #[test]
    fn held_fire_key_shoots_once() {
        let mut s = session();
        let mut render = NullRenderSink;
        let mut transport = LocalTransport::new();
        let firing = InputState {
            fire: true,
            ..InputState::default()
        };

        for _ in 0..10 {
            s.tick(DT, &firing, &mut render, &mut transport);
        }
        assert_eq!(transport.shots_fired(), 1);

        // release and press again: one more shot
        s.tick(DT, &InputState::default(), &mut render, &mut transport);
        s.tick(DT, &firing, &mut render, &mut transport);
        assert_eq!(transport.shots_fired(), 2);
    }

    #[test]
    fn reset_invalidates_scheduled_waves() {
        let mut s = session();
        // run long enough for at least one wave to be scheduled
        run_ticks(&mut s, 60 * 10);
        s.reset();
        assert!(!s.is_running());
        assert_eq!(s.pool().active_count(), 0);

        // restart and confirm stale events never fire into the new round
        s.start();
        run_ticks(&mut s, 2);
        assert_eq!(s.difficulty_level(), 1);
    }
}
