use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use engine::{
    DEFAULT_TICK_PERIOD, EditCommand, EditSession, FfmpegTranscodeGateway, MediaPlayer,
    SourceVideo, Ticker,
};
use tracing::{info, warn};

/// Clock-driven stand-in for the device media player.
///
/// Advances its own position from elapsed wall time while "playing", the way
/// a real player would report a moving cursor between ticks.
#[derive(Debug)]
struct SimulatedPlayer {
    position: f64,
    playing: bool,
    last_update: Instant,
}

impl SimulatedPlayer {
    fn new() -> Self {
        Self {
            position: 0.0,
            playing: true,
            last_update: Instant::now(),
        }
    }

    fn advance(&mut self) {
        let now = Instant::now();
        if self.playing {
            self.position += now.duration_since(self.last_update).as_secs_f64();
        }
        self.last_update = now;
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
        self.last_update = Instant::now();
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

fn main() -> engine::Result<()> {
    init_tracing();

    let source = SourceVideo {
        uri: "demo.mp4".to_string(),
        duration: 20.0,
    };
    let mut session = EditSession::new(SimulatedPlayer::new(), source)?;
    session.settings_mut().music.set_percent(60);
    info!(
        music_volume = session.settings().music.effective(),
        "playback settings"
    );

    apply(&mut session, EditCommand::Split { at: 8.0 });

    // Split edits are preview-only; committing a split timeline is refused.
    if let Err(error) = session.commit_trim(
        &FfmpegTranscodeGateway,
        std::path::PathBuf::from("demo-export.mp4"),
    ) {
        warn!(%error, "export refused");
    }

    apply(
        &mut session,
        EditCommand::Delete {
            start: 0.0,
            end: 8.0,
        },
    );
    print_snapshot(&session);

    // Let the clamp loop chase the simulated cursor for a few seconds.
    let session = Arc::new(Mutex::new(session));
    let ticking = Arc::clone(&session);
    let ticker = Ticker::spawn(DEFAULT_TICK_PERIOD, move || {
        let mut session = ticking.lock().expect("lock session for tick");
        session.player_mut().advance();
        for event in session.tick() {
            info!(?event, "tick event");
        }
    });
    std::thread::sleep(Duration::from_secs(3));
    ticker.stop();

    let session = session.lock().expect("lock session for summary");
    info!(
        virtual_time = session.virtual_current_time(),
        virtual_duration = session.virtual_duration(),
        "demo finished"
    );
    Ok(())
}

fn apply(session: &mut EditSession<SimulatedPlayer>, command: EditCommand) {
    info!(?command, "applying");
    for event in session.handle_command(command) {
        info!(?event, "event");
    }
}

fn print_snapshot(session: &EditSession<SimulatedPlayer>) {
    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(error) => info!(%error, "snapshot serialization failed"),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
