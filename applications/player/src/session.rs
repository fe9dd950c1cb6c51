//! Interactive playback session
//!
//! Multiplexes typed commands, the progress timer and play-count reports on
//! one task. The playback manager is only touched from here; play-count
//! updates run as detached tasks and report back over a channel.

use crate::audio::HeadlessAudio;
use crate::command::{Command, HELP};
use crate::error::{PlayerError, Result};
use melody_core::{format_play_count, format_time, Track, TrackContext, TrackId, TrackStore};
use melody_playback::{
    AttributionReport, PlayCountAttributor, PlaybackConfig, PlaybackError, PlaybackEvent,
    PlaybackManager, PlaybackSettings, PlaybackState, TickOutcome,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How long a finished session waits for outstanding play-count updates
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Tracks listed by the `queue` command
const QUEUE_PREVIEW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S: TrackStore + ?Sized + 'static> {
    manager: PlaybackManager,
    attributor: PlayCountAttributor<S>,
    context: TrackContext,

    reports_tx: mpsc::UnboundedSender<AttributionReport>,
    reports_rx: mpsc::UnboundedReceiver<AttributionReport>,
    in_flight: usize,

    // Restart the timer period after a track change
    reset_timer: bool,
}

impl<S: TrackStore + ?Sized + 'static> Session<S> {
    /// Fetch the context's tracks and start playing `start` (or the first)
    pub async fn open(
        store: Arc<S>,
        context: TrackContext,
        start: Option<&TrackId>,
        config: PlaybackConfig,
    ) -> Result<Self> {
        let tracks = store.fetch_tracks_by_context(&context).await?;
        info!(context = %context, tracks = tracks.len(), "Opening session");

        let start = match start {
            Some(id) if !tracks.iter().any(|track| &track.id == id) => {
                return Err(PlayerError::TrackNotFound(id.to_string()));
            }
            Some(id) => Some(id.clone()),
            None => tracks.first().map(|track| track.id.clone()),
        };

        let mut manager = PlaybackManager::new(config);
        manager.set_audio_resource(Box::new(HeadlessAudio::new(&tracks)));
        if let Err(e) = manager.load_context(tracks, start.as_ref()) {
            warn!(error = %e, "Could not start playback");
        }

        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        Ok(Self {
            manager,
            attributor: PlayCountAttributor::new(store),
            context,
            reports_tx,
            reports_rx,
            in_flight: 0,
            reset_timer: false,
        })
    }

    pub fn manager(&self) -> &PlaybackManager {
        &self.manager
    }

    pub fn context(&self) -> &TrackContext {
        &self.context
    }

    /// Play-count updates dispatched but not yet reported back
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run until `quit` or end of input
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut period = self.manager.tick_interval();
        let mut ticker = new_ticker(period);

        writeln!(out, "Playing from {}", self.context)?;
        self.flush_events(out)?;
        out.flush()?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line, out)? == Flow::Quit {
                        break;
                    }
                }
                _ = ticker.tick() => self.tick(out)?,
                Some(report) = self.reports_rx.recv() => self.apply_report(report, out)?,
            }
            out.flush()?;

            // Timer follows the playback speed and restarts on track changes
            let wanted = self.manager.tick_interval();
            if wanted != period {
                debug!(?wanted, "Tick interval changed");
                period = wanted;
                ticker = new_ticker(period);
                self.reset_timer = false;
            } else if self.reset_timer {
                ticker.reset();
                self.reset_timer = false;
            }
        }

        self.finish(out).await
    }

    /// Handle one input line; unknown commands are reported, not fatal
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => self.handle(command, out),
            Err(e) => {
                writeln!(out, "{}. Type 'help' for commands.", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        debug!(?command, "Command");

        let outcome: std::result::Result<(), PlaybackError> = match command {
            Command::Next => self.manager.next().map(drop),
            Command::Previous => self.manager.previous().map(drop),
            Command::Play => self.manager.play(),
            Command::Pause => {
                self.manager.pause();
                Ok(())
            }
            Command::Toggle => self.manager.toggle_play(),
            Command::Shuffle => {
                self.manager.toggle_shuffle();
                Ok(())
            }
            Command::Loop => {
                self.manager.toggle_loop();
                Ok(())
            }
            Command::Seek(fraction) => match self.manager.seek_to_fraction(fraction) {
                Ok(elapsed) => {
                    writeln!(
                        out,
                        "{} / {}",
                        format_time(elapsed),
                        format_time(self.manager.progress().total())
                    )?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Volume(level) => {
                self.manager.set_volume(level);
                Ok(())
            }
            Command::Mute => {
                self.manager.toggle_mute();
                Ok(())
            }
            Command::Speed(Some(speed)) => self.manager.set_speed(speed),
            Command::Speed(None) => {
                self.manager.cycle_speed();
                Ok(())
            }
            Command::Goto(id) => self.manager.select(&id).map(drop),
            Command::Queue => {
                self.write_queue(out)?;
                Ok(())
            }
            Command::Status => {
                writeln!(out, "{}", self.status_line())?;
                Ok(())
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        if let Err(e) = outcome {
            warn!(error = %e, "Command failed");
            writeln!(out, "! {}", e)?;
        }

        self.flush_events(out)?;
        Ok(Flow::Continue)
    }

    /// Timer tick; a finished track ends like the audio primitive would end it
    pub fn tick<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.manager.tick() == Some(TickOutcome::Finished) {
            if let Err(e) = self.manager.track_ended() {
                warn!(error = %e, "Could not continue after track end");
                writeln!(out, "! {}", e)?;
            }
        }
        self.flush_events(out)
    }

    /// Reconcile a finished play-count update
    pub fn apply_report<W: Write>(&mut self, report: AttributionReport, out: &mut W) -> Result<()> {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.manager.apply_attribution(report);
        self.flush_events(out)
    }

    /// Wait briefly for outstanding play-count updates
    pub async fn finish<W: Write>(&mut self, out: &mut W) -> Result<()> {
        while self.in_flight > 0 {
            match time::timeout(SHUTDOWN_GRACE, self.reports_rx.recv()).await {
                Ok(Some(report)) => self.apply_report(report, out)?,
                Ok(None) | Err(_) => {
                    warn!(pending = self.in_flight, "Play-count updates still pending");
                    break;
                }
            }
        }

        info!("Session ended");
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let Some(track) = self.manager.active_track() else {
            return "Nothing playing".to_string();
        };
        let progress = self.manager.progress();

        format!(
            "[{}] {}  {} / {} (heard {})  {}",
            state_label(self.manager.state()),
            describe(track),
            format_time(progress.elapsed()),
            format_time(progress.total()),
            format_time(progress.listened()),
            settings_line(&self.manager.settings())
        )
    }

    fn write_queue<W: Write>(&self, out: &mut W) -> Result<()> {
        let upcoming = self.manager.up_next(QUEUE_PREVIEW);
        if upcoming.is_empty() {
            writeln!(out, "Nothing queued after this track")?;
        }
        for (i, track) in upcoming.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {}  {}",
                i + 1,
                describe(track),
                format_time(track.duration)
            )?;
        }
        Ok(())
    }

    fn flush_events<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for event in self.manager.drain_events() {
            match event {
                PlaybackEvent::TrackChanged {
                    track_id,
                    previous_track_id,
                } => {
                    self.reset_timer = true;
                    let label = if previous_track_id.as_ref() == Some(&track_id) {
                        "Replaying"
                    } else {
                        "Now playing"
                    };
                    if let Some(track) = self.manager.catalog().get(&track_id) {
                        writeln!(out, "{}: {}", label, describe(track))?;
                    }
                }
                PlaybackEvent::StateChanged { state } => {
                    writeln!(out, "[{}]", state_label(state))?;
                }
                PlaybackEvent::SettingsChanged { settings } => {
                    writeln!(out, "{}", settings_line(&settings))?;
                }
                PlaybackEvent::QueueChanged { length } => {
                    writeln!(out, "Queue: {} tracks", length)?;
                }
                PlaybackEvent::PlayCountDue { track_id } => self.dispatch_attribution(track_id),
                PlaybackEvent::Notification { message } => {
                    writeln!(out, "! Could not update play count: {}", message)?;
                }
                PlaybackEvent::PositionUpdate { .. } | PlaybackEvent::TrackFinished { .. } => {}
            }
        }
        Ok(())
    }

    /// Fire-and-forget store update; the result comes back over the channel
    fn dispatch_attribution(&mut self, track_id: TrackId) {
        let attributor = self.attributor.clone();
        let reports = self.reports_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let report = attributor.attribute(track_id).await;
            // Receiver is gone once the session has ended
            let _ = reports.send(report);
        });
    }
}

fn new_ticker(period: Duration) -> Interval {
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn describe(track: &Track) -> String {
    format!(
        "{} - {} ({} plays)",
        track.title,
        track.author,
        format_play_count(track.play_count)
    )
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
        PlaybackState::Stopped => "stopped",
    }
}

fn settings_line(settings: &PlaybackSettings) -> String {
    let volume = if settings.volume == 0.0 {
        "muted".to_string()
    } else {
        format!("vol {:.0}%", settings.volume * 100.0)
    };

    let mut line = format!("{}  {}x", volume, settings.speed);
    if settings.shuffle {
        line.push_str("  shuffle");
    }
    if settings.loop_enabled {
        line.push_str("  loop");
    }
    line
}
