//! Void Drift entry point
//!
//! On native this runs one headless autopilot run against the recording
//! renderer and prints the result. The browser build is driven by the host
//! page through the library API.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use void_drift::highscores::JsonFileScoreStore;
    use void_drift::platform::InputMapper;
    use void_drift::renderer::{SceneRecorder, StaticModelLoader};
    use void_drift::sim::{Command, GameEvent, RunPhase, Simulation};
    use void_drift::{FrameOutcome, Scheduler, Settings, Tuning};

    const DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u64 = 60 * 180;

    void_drift::init_logging();
    log::info!("Void Drift (native) starting...");

    let settings = Settings::load_from("void_drift_settings.json");
    let tuning = match std::env::var("VOID_DRIFT_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(void_drift::GameError::from)
            .and_then(|json| Tuning::from_json(&json))
        {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring tuning file {}: {}", path, err);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let store = JsonFileScoreStore::new("void_drift_highscore.json");
    let seed = void_drift::default_seed();
    let mut input = InputMapper::new(settings.touch_sensitivity);
    let sim = Simulation::new(tuning, settings, Box::new(store), seed);
    let mut scheduler = Scheduler::new(sim, SceneRecorder::new(), StaticModelLoader::craft());
    scheduler.queue_command(Command::Start);

    let mut destroyed = 0u32;
    let mut frame = 0u64;
    while frame < MAX_FRAMES {
        // Weave left and right, firing a few times a second
        let key = if (frame / 90) % 2 == 0 { "a" } else { "d" };
        let other = if key == "a" { "d" } else { "a" };
        input.keyboard.key_up(other);
        input.keyboard.key_down(key);
        if frame % 12 == 0 {
            input.keyboard.key_up(" ");
            input.keyboard.key_down(" ");
        }

        if scheduler.tick(DT, &input.frame_input()) == FrameOutcome::Cancelled {
            break;
        }
        destroyed += scheduler
            .last_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleDestroyed { .. }))
            .count() as u32;
        if scheduler.sim().phase() == RunPhase::GameOver {
            break;
        }
        frame += 1;
    }

    let sim = scheduler.sim();
    match sim.last_summary() {
        Some(summary) => {
            println!("\nGame over after {}s", summary.elapsed_secs);
            println!("  score:      {}", summary.score);
            println!("  high score: {}{}", summary.high_score, if summary.new_high_score { " (new!)" } else { "" });
        }
        None => println!("\nSurvived {} frames (score {})", frame, sim.score()),
    }
    println!("  destroyed:  {}", destroyed);
    println!("  drawn:      {} frames", scheduler.renderer().draws);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the scheduler through the library
}
