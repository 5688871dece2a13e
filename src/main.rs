//! Blast Grid entry point
//!
//! Headless driver: generates a seeded arena, runs a short scripted
//! skirmish through the simulation core and logs the event stream the
//! rendering/audio layers would consume. Pass a seed as the first
//! argument for a different layout, `--dump-state` for a JSON snapshot
//! of the final arena on stdout.

use blast_grid::consts::SIM_DT;
use blast_grid::sim::{Arena, BombSpec, EntityKind, GameMode, ProximityProbe, TileGrid, TileKind};
use blast_grid::tile_to_world;
use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const MAP_DIMENSIONS: (i32, i32) = (13, 11);
const SOFT_BLOCK_CHANCE: f64 = 0.35;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let dump_state = args.iter().any(|arg| arg == "--dump-state");
    let seed: u64 = args
        .iter()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xB1A57);

    let mut arena = generate_arena(seed);
    log::info!("Arena initialized with seed: {}", seed);

    let player = arena.spawn(EntityKind::Player, tile_to_world((1, 1)));
    let enemy = arena.spawn(
        EntityKind::Enemy,
        tile_to_world((MAP_DIMENSIONS.0 - 2, MAP_DIMENSIONS.1 - 2)),
    );
    log::info!("player is entity {}, enemy is entity {}", player, enemy);

    // Drop a bomb, walk clear so it can turn solid, let the fuse run down
    let bomb = arena
        .place_bomb(
            tile_to_world((1, 1)),
            BombSpec {
                owner: Some(player),
                explosion_length: 2,
                ..Default::default()
            },
        )
        .expect("spawn tile is kept clear by generation");
    arena.force_move(player, Vec2::new(1.0, 0.0));
    run_for(&mut arena, 0.6);
    arena.force_move(player, Vec2::ZERO);

    let probe = ProximityProbe::of_arena(&arena);
    arena.contact_end(player, bomb, &probe);
    if let Some(entity) = arena.entity(bomb) {
        if entity.bomb.as_ref().is_some_and(|b| b.solid) {
            log::info!("bomb {} re-armed solid behind its owner", bomb);
        }
    }
    run_for(&mut arena, 3.0);

    // Two bombs in a row, detonated by hand: the sweep chains them
    let first = arena
        .place_bomb(
            tile_to_world((5, 1)),
            BombSpec {
                owner: Some(player),
                explosion_length: 2,
                ..Default::default()
            },
        )
        .expect("chain lane is kept clear by generation");
    let second = arena
        .place_bomb(
            tile_to_world((6, 1)),
            BombSpec {
                owner: Some(player),
                ..Default::default()
            },
        )
        .expect("chain lane is kept clear by generation");
    log::info!("detonating bomb {} next to bomb {}", first, second);
    arena.detonate_with_sweep(first);
    drain_and_log(&mut arena);

    log::info!(
        "skirmish over after {} ticks, {} entities still alive",
        arena.time_ticks,
        arena.entities.iter().filter(|e| e.is_alive()).count()
    );

    if dump_state {
        if let Err(err) = dump_snapshot(&arena) {
            log::error!("snapshot failed: {}", err);
        }
    }
}

/// Bordered arena with seeded soft-block fill, spawn corners and the
/// scripted bomb lane kept clear
fn generate_arena(seed: u64) -> Arena {
    let mut rng = Pcg32::seed_from_u64(seed);
    let (width, height) = MAP_DIMENSIONS;
    let mut grid = TileGrid::bordered(width, height);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if is_kept_clear((x, y)) {
                continue;
            }
            if rng.random_bool(SOFT_BLOCK_CHANCE) {
                grid.set((x, y), TileKind::SoftBlock);
            }
        }
    }

    let mut arena = Arena::new(GameMode::Story, grid);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if arena.grid.get((x, y)) == TileKind::SoftBlock {
                arena.spawn(EntityKind::SoftBlock, tile_to_world((x, y)));
            }
        }
    }
    arena
}

fn is_kept_clear(tile: (i32, i32)) -> bool {
    let (width, height) = MAP_DIMENSIONS;
    // player corner plus the lane the script walks and bombs
    if tile.1 == 1 && tile.0 <= 7 {
        return true;
    }
    if tile == (1, 2) {
        return true;
    }
    // enemy corner
    matches!(
        tile,
        (x, y) if x >= width - 3 && y >= height - 3
    )
}

fn run_for(arena: &mut Arena, seconds: f32) {
    let steps = (seconds / SIM_DT).ceil() as u32;
    for _ in 0..steps {
        arena.tick(SIM_DT);
        drain_and_log(arena);
    }
}

fn drain_and_log(arena: &mut Arena) {
    for event in arena.drain_explosions() {
        log::info!(
            "explosion at ({:.1}, {:.1}) from bomb #{} ranges={:?} broken={} shaking={}",
            event.pos.x,
            event.pos.y,
            event.bomb.number,
            event.ranges,
            event.broken.len(),
            event.shaking
        );
    }
    for sound in arena.drain_sounds() {
        log::debug!("sound request: {:?}", sound);
    }
    for notice in arena.drain_destroyed() {
        log::debug!(
            "entity {} marked for destruction (trigger={})",
            notice.id,
            notice.trigger
        );
    }
}

fn dump_snapshot(arena: &Arena) -> serde_json::Result<()> {
    let json = serde_json::to_string_pretty(arena)?;
    println!("{}", json);
    Ok(())
}
