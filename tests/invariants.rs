use brick_breaker::sim::physics::{
    attach_point, paddle_x_range, reset_ball_to_paddle, update_paddle,
};
use brick_breaker::sim::scoring::commit_streak;
use brick_breaker::sim::state::MAX_BRICK_HP;
use brick_breaker::sim::*;
use brick_breaker::{GameConfig, MemoryScoreStore};
use glam::Vec3;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Frame {
    paddle_dir: f32,
    launch: bool,
    aim_x: f32,
    pause: bool,
    card_pick: Option<usize>,
    dt: f32,
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        -1i8..=1,
        any::<bool>(),
        -3.0f32..3.0,
        prop::bool::weighted(0.02),
        prop::option::of(0usize..4),
        0.0f32..0.07,
    )
        .prop_map(|(dir, launch, aim_x, pause, card_pick, dt)| Frame {
            paddle_dir: dir as f32,
            launch,
            aim_x,
            pause,
            card_pick,
            dt,
        })
}

fn game_type() -> impl Strategy<Value = GameType> {
    prop_oneof![
        Just(GameType::Normal),
        Just(GameType::Endless),
        Just(GameType::Rogue),
        Just(GameType::Levels),
    ]
}

fn check_state(state: &GameState) -> Result<(), TestCaseError> {
    prop_assert!(state.score >= 0, "score {}", state.score);
    prop_assert!(state.lives >= 0);
    for brick in &state.bricks {
        prop_assert!(brick.hp <= brick.max_hp);
        prop_assert!(brick.max_hp <= MAX_BRICK_HP);
        prop_assert_eq!(brick.alive, brick.hp > 0);
    }
    for ball in state.balls.iter().filter(|b| b.attached) {
        prop_assert_eq!(ball.vel, Vec3::ZERO);
    }
    for picked in &state.rogue.chosen {
        prop_assert!(!state.rogue.normal_pool.contains(picked));
        prop_assert!(!state.rogue.op_pool.contains(picked));
        prop_assert!(!state.rogue.offers.contains(picked));
    }
    prop_assert!(state.rogue.offers.len() <= 3);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_random_play_keeps_invariants(
        game_type in game_type(),
        seed in any::<u64>(),
        frames in prop::collection::vec(frame(), 1..400),
    ) {
        let cfg = GameConfig { seed, ..Default::default() };
        let mut state = GameState::new(&cfg);
        let mut store = MemoryScoreStore::new();
        state.game_type = game_type;
        init_game(&mut state, &cfg, &mut store);
        check_state(&state)?;

        let mut rows_spawned = state.endless.rows_spawned;
        for f in frames {
            let input = TickInput {
                paddle_dir: f.paddle_dir,
                launch: f.launch,
                launch_dir: Some(Vec3::new(f.aim_x, 0.0, -1.0)),
                pause: f.pause,
                card_pick: f.card_pick,
                ..Default::default()
            };
            let runs = state.runs_started;
            tick(&mut state, &cfg, &input, &mut store, f.dt);
            state.drain_events();
            check_state(&state)?;

            if state.game_type == GameType::Endless && state.runs_started == runs {
                prop_assert!(state.endless.rows_spawned >= rows_spawned);
            }
            rows_spawned = state.endless.rows_spawned;
        }
    }

    #[test]
    fn test_paddle_stays_in_bounds(
        start_x in -40.0f32..40.0,
        dir in -1.0f32..1.0,
        dt in 0.0f32..0.05,
        expand in any::<bool>(),
        tiny in any::<bool>(),
        rogue in any::<bool>(),
        margin in 0.0f32..3.0,
    ) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        state.mode = Mode::Playing;
        if rogue {
            state.game_type = GameType::Rogue;
            state.rogue.mods.paddle_clamp_margin = margin;
        }
        if expand {
            state.timers.expand = 1.0;
        }
        if tiny {
            state.timers.tiny = 1.0;
        }
        state.paddle.x = start_x;

        update_paddle(&mut state, &cfg, dir, dt);
        let (lo, hi) = paddle_x_range(&state, &cfg);
        prop_assert!(state.paddle.x >= lo - 1e-4 && state.paddle.x <= hi + 1e-4);
    }

    #[test]
    fn test_empty_commit_is_noop(score in 0i64..1_000_000, endless in any::<bool>()) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg);
        state.game_type = if endless { GameType::Endless } else { GameType::Rogue };
        state.score = score;
        let mut store = MemoryScoreStore::new();

        commit_streak(&mut state, &mut store);
        prop_assert_eq!(state.score, score);
        prop_assert_eq!(store.writes, 0);
        prop_assert!(state.streak.is_empty());
        prop_assert!(state.events.is_empty());
    }

    #[test]
    fn test_reset_to_paddle_is_idempotent(paddle_x in -15.0f32..15.0, times in 1usize..5) {
        let cfg = GameConfig::default();
        let paddle = Vec3::new(paddle_x, 0.0, cfg.paddle_start_z);
        let mut ball = Ball::new(Vec3::new(3.0, 0.0, -2.0), Vec3::new(4.0, 0.0, -6.0));
        reset_ball_to_paddle(&mut ball, paddle, &cfg);
        let once = ball.clone();
        for _ in 0..times {
            reset_ball_to_paddle(&mut ball, paddle, &cfg);
        }
        prop_assert!(ball.attached);
        prop_assert_eq!(ball.pos, attach_point(paddle, &cfg));
        prop_assert_eq!(&ball, &once);
    }
}
