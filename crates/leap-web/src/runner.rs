use leap_engine::{
    build_render_buffer, EngineContext, EngineResult, FixedTimestep, Game, GameConfig, GameEvent,
    InputEvent, InputQueue, RenderBuffer, RenderInstance, Scheduler,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// Constructed, `init` not called yet.
    Created,
    /// Waiting for outstanding loads.
    Loading,
    Running,
}

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game (e.g. `platformer`) creates a `thread_local!` GameRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    scheduler: Scheduler,
    input: InputQueue,
    render_buffer: RenderBuffer,
    /// Atlas batches flattened as (atlas, start, count) triples.
    batch_buffer: Vec<u32>,
    timestep: FixedTimestep,
    config: GameConfig,
    state: RunState,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> EngineResult<Self> {
        let config = game.config();
        let ctx = EngineContext::from_config(&config)?;
        let timestep = FixedTimestep::new(config.fixed_dt)?;

        Ok(Self {
            game,
            ctx,
            scheduler: Scheduler::new(),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            batch_buffer: Vec::new(),
            timestep,
            config,
            state: RunState::Created,
        })
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        if self.state != RunState::Created {
            log::warn!("runner: init called twice");
            return;
        }
        self.game.init(&mut self.ctx);
        self.state = RunState::Loading;
        self.poll_loading();
    }

    /// Hand level JSON fetched by the host to the game and mark the load done.
    pub fn load_level(&mut self, json: &str) -> bool {
        let ok = match self.game.level_loaded(&mut self.ctx, json) {
            Ok(()) => true,
            Err(err) => {
                log::error!("runner: level failed to load: {}", err);
                false
            }
        };
        self.ctx.loading.finish();
        ok
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: fold input, run whole ticks, rebuild the render snapshot.
    pub fn tick(&mut self, dt: f32) {
        match self.state {
            RunState::Created => return,
            RunState::Loading => {
                if !self.poll_loading() {
                    return;
                }
            }
            RunState::Running => {}
        }

        self.input.apply_to(&mut self.ctx.input);

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.scheduler.tick(&mut self.game, &mut self.ctx);
        }

        self.rebuild_snapshot();
    }

    /// Fire `loading_complete` once nothing is outstanding.
    fn poll_loading(&mut self) -> bool {
        if !self.ctx.loading.take_completion() {
            return false;
        }
        log::info!("runner: loading complete, starting ticks");
        self.game.loading_complete(&mut self.ctx);
        self.timestep.reset();
        self.state = RunState::Running;
        self.rebuild_snapshot();
        true
    }

    fn rebuild_snapshot(&mut self) {
        build_render_buffer(self.ctx.registry.iter(), &mut self.render_buffer);
        self.batch_buffer.clear();
        for batch in self.render_buffer.batches() {
            self.batch_buffer
                .extend_from_slice(&[batch.atlas, batch.start, batch.count]);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state != RunState::Running
    }

    pub fn ticks(&self) -> u64 {
        self.scheduler.ticks()
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn instances(&self) -> &[RenderInstance] {
        self.render_buffer.instances()
    }

    // ---- Pointer accessors for zero-copy reads from JS ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn batches_ptr(&self) -> *const u32 {
        self.batch_buffer.as_ptr()
    }

    pub fn batch_count(&self) -> u32 {
        (self.batch_buffer.len() / 3) as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events().as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events().len() as u32
    }

    pub fn events(&self) -> &[GameEvent] {
        self.ctx.events()
    }

    /// Camera viewport top-left, shake included.
    pub fn camera_x(&self) -> f32 {
        self.ctx.camera.top_left().x
    }

    pub fn camera_y(&self) -> f32 {
        self.ctx.camera.top_left().y
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leap_engine::{
        Behavior, Control, EngineError, Entity, EntityId, EntityKind, SpriteComponent,
    };
    use leap_engine::input::state::KEY_RIGHT;

    const DT: f32 = 1.0 / 60.0;

    struct WalkRight;

    impl Behavior for WalkRight {
        fn update(&mut self, owner: EntityId, ctx: &mut EngineContext) {
            if ctx.input.is_held(Control::Right) {
                if let Some(e) = ctx.registry.get_mut(owner) {
                    e.pos.x += 1.0;
                }
            }
        }
    }

    #[derive(Default)]
    struct TestGame {
        wait_for_level: bool,
        completions: u32,
        level_json: Option<String>,
    }

    impl Game for TestGame {
        fn init(&mut self, ctx: &mut EngineContext) {
            if self.wait_for_level {
                ctx.loading.begin();
            }
            let id = ctx.next_id();
            ctx.spawn(
                Entity::new(id)
                    .with_kind(EntityKind::Player)
                    .with_sprite(SpriteComponent::default())
                    .with_behavior(WalkRight),
            );
        }

        fn level_loaded(&mut self, _ctx: &mut EngineContext, json: &str) -> EngineResult<()> {
            if json.is_empty() {
                return Err(EngineError::UnknownEntity(EntityId(0)));
            }
            self.level_json = Some(json.to_string());
            Ok(())
        }

        fn loading_complete(&mut self, _ctx: &mut EngineContext) {
            self.completions += 1;
        }
    }

    #[test]
    fn runs_immediately_without_loads() {
        let mut runner = GameRunner::new(TestGame::default()).unwrap();
        runner.init();
        assert!(!runner.is_loading());
        assert_eq!(runner.game().completions, 1);
        assert_eq!(runner.instance_count(), 1);

        runner.tick(DT);
        assert_eq!(runner.ticks(), 1);
    }

    #[test]
    fn ticks_wait_for_level_load() {
        let game = TestGame {
            wait_for_level: true,
            ..Default::default()
        };
        let mut runner = GameRunner::new(game).unwrap();
        runner.init();
        assert!(runner.is_loading());

        runner.tick(DT);
        assert_eq!(runner.ticks(), 0);

        assert!(runner.load_level("{}"));
        runner.tick(DT);
        assert!(!runner.is_loading());
        assert_eq!(runner.game().completions, 1);
        assert_eq!(runner.game().level_json.as_deref(), Some("{}"));

        runner.tick(DT);
        assert_eq!(runner.game().completions, 1);
    }

    #[test]
    fn failed_level_still_finishes_the_load() {
        let game = TestGame {
            wait_for_level: true,
            ..Default::default()
        };
        let mut runner = GameRunner::new(game).unwrap();
        runner.init();
        assert!(!runner.load_level(""));
        runner.tick(DT);
        assert!(!runner.is_loading());
    }

    #[test]
    fn input_reaches_behaviors_before_ticks() {
        let mut runner = GameRunner::new(TestGame::default()).unwrap();
        runner.init();
        runner.push_input(InputEvent::KeyDown { key_code: KEY_RIGHT });
        runner.tick(DT);
        runner.tick(DT);

        assert_eq!(runner.instances()[0].x, 2.0);
        let player = runner.context().first_of_kind(EntityKind::Player).unwrap();
        assert_eq!(runner.context().registry.get(player).unwrap().pos.x, 2.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        struct Broken;
        impl Game for Broken {
            fn config(&self) -> GameConfig {
                GameConfig {
                    fixed_dt: -1.0,
                    ..Default::default()
                }
            }
            fn init(&mut self, _ctx: &mut EngineContext) {}
        }
        assert!(GameRunner::new(Broken).is_err());
    }
}
