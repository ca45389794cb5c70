//! Device session lifecycle.
//!
//! Switching input devices tears the old capture down and brings a new one up
//! over several frames. The controller is ticked once per frame and advances at
//! most one step per tick, so waits are plain elapsed-time bookkeeping and never
//! block the frame loop.

use crate::audio::host::{AudioHost, Capture};
use crate::config::CaptureConfig;
use crate::error::{PipelineError, PipelineResult};
use log::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    /// No capture, nothing pending.
    Idle,
    /// Stop the active capture, if there is one.
    Stopping,
    /// Capture released; waiting for the backend to drain.
    Cleared { remaining: f32 },
    /// Open the capture on the requested device.
    Starting,
    /// Capture open; polling for the cursor to move.
    AwaitingFirstSample { attempts: u32 },
    /// Samples are flowing; the output gain ramps up.
    FadingIn { elapsed: f32 },
    /// Steady state. The capture can be read.
    Recording,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Stopping => "Stopping",
            SessionState::Cleared { .. } => "Cleared",
            SessionState::Starting => "Starting",
            SessionState::AwaitingFirstSample { .. } => "Waiting for input",
            SessionState::FadingIn { .. } => "Fading in",
            SessionState::Recording => "Listening",
        }
    }
}

/// One open capture and the parameters it was opened with.
///
/// Never mutated in place: a device change drops it and opens a new one.
pub struct DeviceSession<C> {
    pub device_name: String,
    pub length_secs: u32,
    pub sample_rate: u32,
    pub capture: C,
}

pub struct DeviceSessionController<H: AudioHost> {
    state: SessionState,
    session: Option<DeviceSession<H::Capture>>,
    requested_device: Option<String>,
    settings: CaptureConfig,
    last_error: Option<PipelineError>,
}

impl<H: AudioHost> DeviceSessionController<H> {
    pub fn new(settings: CaptureConfig) -> Self {
        Self {
            state: SessionState::Idle,
            session: None,
            requested_device: None,
            settings,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Name of the device the current or in-flight session targets.
    pub fn device_name(&self) -> Option<&str> {
        self.requested_device.as_deref()
    }

    pub fn session(&self) -> Option<&DeviceSession<H::Capture>> {
        self.session.as_ref()
    }

    /// Most recent failure, cleared when a new device change is requested.
    pub fn last_error(&self) -> Option<&PipelineError> {
        self.last_error.as_ref()
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Output gain of the post-restart fade: 0 before samples flow, 1 once recording.
    ///
    /// Informational only. Reads are gated to `Recording`, so captured data is
    /// never scaled by it; the status line shows it as fade progress.
    pub fn gain(&self) -> f32 {
        match self.state {
            SessionState::Recording => 1.0,
            SessionState::FadingIn { elapsed } => {
                if self.settings.fade_in_secs > 0.0 {
                    (elapsed / self.settings.fade_in_secs).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            }
            _ => 0.0,
        }
    }

    /// The capture, but only while recording. Any other state is `CaptureNotReady`.
    pub fn recording_capture(&mut self) -> PipelineResult<&mut H::Capture> {
        match (&self.state, self.session.as_mut()) {
            (SessionState::Recording, Some(session)) => Ok(&mut session.capture),
            _ => Err(PipelineError::CaptureNotReady),
        }
    }

    /// Starts a switch to `device`, superseding any switch already in flight.
    pub fn request_device_change(&mut self, device: &str, settings: &CaptureConfig) {
        if self.state != SessionState::Idle && self.state != SessionState::Recording {
            debug!(
                "Device change to '{device}' supersedes in-flight restart ({})",
                self.state.label()
            );
        }
        info!("Switching input device to '{device}'");
        self.requested_device = Some(device.to_string());
        self.settings = settings.clone();
        self.last_error = None;
        self.state = SessionState::Stopping;
    }

    /// Advances the restart sequence by one step.
    ///
    /// Returns the state after the step. An error means the attempt ended: the
    /// controller is back in `Idle` and will accept another device change.
    pub fn tick(&mut self, dt: f32, host: &mut H) -> PipelineResult<SessionState> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        match self.state {
            SessionState::Idle | SessionState::Recording => {}

            SessionState::Stopping => {
                if let Some(session) = self.session.as_mut() {
                    debug!("Stopping capture on '{}'", session.device_name);
                    session.capture.stop();
                }
                self.state = SessionState::Cleared {
                    remaining: self.settings.restart_delay_secs,
                };
            }

            SessionState::Cleared { remaining } => {
                if let Some(session) = self.session.take() {
                    debug!("Released capture on '{}'", session.device_name);
                }
                let remaining = remaining - dt;
                self.state = if remaining <= 0.0 {
                    SessionState::Starting
                } else {
                    SessionState::Cleared { remaining }
                };
            }

            SessionState::Starting => {
                let Some(device) = self.requested_device.clone() else {
                    self.state = SessionState::Idle;
                    return self.fail(PipelineError::ConfigurationMissing(
                        "no input device selected".to_string(),
                    ));
                };

                let opened = host.open_capture(
                    &device,
                    true,
                    self.settings.recording_length_secs,
                    self.settings.sample_rate,
                );
                match opened {
                    Ok(capture) => {
                        debug!("Capture opened on '{device}', waiting for first sample");
                        self.session = Some(DeviceSession {
                            device_name: device,
                            length_secs: self.settings.recording_length_secs,
                            sample_rate: capture.sample_rate(),
                            capture,
                        });
                        self.state = SessionState::AwaitingFirstSample { attempts: 0 };
                    }
                    Err(e) => {
                        self.state = SessionState::Idle;
                        let e = match e {
                            PipelineError::Stream(msg) => PipelineError::DeviceUnavailable(msg),
                            other => other,
                        };
                        return self.fail(e);
                    }
                }
            }

            SessionState::AwaitingFirstSample { attempts } => {
                let attempts = attempts + 1;
                let advanced = self
                    .session
                    .as_ref()
                    .map(|s| s.capture.position() > 0)
                    .unwrap_or(false);

                if advanced {
                    debug!("First sample after {attempts} polls, fading in");
                    self.state = SessionState::FadingIn { elapsed: 0.0 };
                } else if attempts >= self.settings.first_sample_poll_budget {
                    let device = self.requested_device.clone().unwrap_or_default();
                    if let Some(mut session) = self.session.take() {
                        session.capture.stop();
                    }
                    self.state = SessionState::Idle;
                    return self.fail(PipelineError::DeviceStartTimeout { device, attempts });
                } else {
                    self.state = SessionState::AwaitingFirstSample { attempts };
                }
            }

            SessionState::FadingIn { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.settings.fade_in_secs {
                    info!(
                        "Recording from '{}'",
                        self.requested_device.as_deref().unwrap_or("unknown")
                    );
                    self.state = SessionState::Recording;
                } else {
                    self.state = SessionState::FadingIn { elapsed };
                }
            }
        }

        Ok(self.state)
    }

    fn fail(&mut self, e: PipelineError) -> PipelineResult<SessionState> {
        match &e {
            PipelineError::DeviceStartTimeout { .. } => error!("{e}"),
            _ => warn!("{e}"),
        }
        self.last_error = Some(e.clone());
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::FakeHost;

    const DT: f32 = 1.0 / 60.0;

    fn settings() -> CaptureConfig {
        CaptureConfig {
            sample_rate: 1000,
            ..CaptureConfig::default()
        }
    }

    fn run_until_settled(
        controller: &mut DeviceSessionController<FakeHost>,
        host: &mut FakeHost,
        max_ticks: usize,
    ) -> (usize, PipelineResult<SessionState>) {
        for tick in 1..=max_ticks {
            let result = controller.tick(DT, host);
            match result {
                Ok(SessionState::Recording) | Ok(SessionState::Idle) | Err(_) => {
                    return (tick, result);
                }
                _ => {}
            }
        }
        (max_ticks, Ok(controller.state()))
    }

    #[test]
    fn walks_every_state_to_recording() {
        let mut host = FakeHost::new(&["mic"]);
        host.polls_until_ready = Some(3);
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        controller.request_device_change("mic", &settings());

        let mut seen = vec![controller.state().label()];
        for _ in 0..200 {
            let state = controller.tick(DT, &mut host).unwrap();
            if seen.last() != Some(&state.label()) {
                seen.push(state.label());
            }
            if state == SessionState::Recording {
                break;
            }
        }

        assert_eq!(
            seen,
            vec![
                "Stopping",
                "Cleared",
                "Starting",
                "Waiting for input",
                "Fading in",
                "Listening"
            ]
        );
        assert_eq!(host.opened, vec!["mic".to_string()]);
        assert_eq!(controller.gain(), 1.0);
        assert!(controller.recording_capture().is_ok());
        assert_eq!(controller.session().map(|s| s.sample_rate), Some(44100));
    }

    #[test]
    fn restart_delay_is_counted_in_frame_time() {
        let settings = CaptureConfig {
            restart_delay_secs: 0.25,
            ..settings()
        };
        let mut host = FakeHost::new(&["mic"]);
        let mut controller = DeviceSessionController::<FakeHost>::new(settings.clone());
        controller.request_device_change("mic", &settings);

        controller.tick(0.0625, &mut host).unwrap();
        let mut cleared_ticks = 0;
        while matches!(controller.state(), SessionState::Cleared { .. }) {
            controller.tick(0.0625, &mut host).unwrap();
            cleared_ticks += 1;
        }
        assert_eq!(cleared_ticks, 4);
        assert_eq!(controller.state(), SessionState::Starting);
    }

    #[test]
    fn silent_device_times_out_after_exact_poll_budget() {
        let mut host = FakeHost::new(&["dead mic"]);
        host.polls_until_ready = None;
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        controller.request_device_change("dead mic", &settings());

        let mut polls = 0;
        let mut outcome = None;
        for _ in 0..500 {
            let before = controller.state();
            let result = controller.tick(DT, &mut host);
            if matches!(before, SessionState::AwaitingFirstSample { .. }) {
                polls += 1;
            }
            assert_ne!(controller.state(), SessionState::Recording);
            if let Err(e) = result {
                outcome = Some(e);
                break;
            }
        }

        assert_eq!(polls, 50);
        assert_eq!(
            outcome,
            Some(PipelineError::DeviceStartTimeout {
                device: "dead mic".to_string(),
                attempts: 50
            })
        );
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.session().is_none());
        assert!(matches!(
            controller.recording_capture(),
            Err(PipelineError::CaptureNotReady)
        ));

        // Still live: a new request on a working device succeeds
        host.devices.push("mic".to_string());
        host.polls_until_ready = Some(1);
        controller.request_device_change("mic", &settings());
        let (_, result) = run_until_settled(&mut controller, &mut host, 200);
        assert_eq!(result, Ok(SessionState::Recording));
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn unknown_device_is_unavailable() {
        let mut host = FakeHost::new(&["mic"]);
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        controller.request_device_change("ghost", &settings());

        let (_, result) = run_until_settled(&mut controller, &mut host, 50);
        assert!(matches!(result, Err(PipelineError::DeviceUnavailable(_))));
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.last_error().is_some());
    }

    #[test]
    fn capture_is_gated_until_recording() {
        let mut host = FakeHost::new(&["mic"]);
        host.polls_until_ready = Some(2);
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        assert!(controller.recording_capture().is_err());

        controller.request_device_change("mic", &settings());
        while controller.state() != SessionState::Recording {
            assert!(matches!(
                controller.recording_capture(),
                Err(PipelineError::CaptureNotReady)
            ));
            controller.tick(DT, &mut host).unwrap();
        }
        assert!(controller.recording_capture().is_ok());
    }

    #[test]
    fn gain_ramps_linearly_during_fade() {
        let mut host = FakeHost::new(&["mic"]);
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        controller.request_device_change("mic", &settings());
        while !matches!(controller.state(), SessionState::FadingIn { .. }) {
            controller.tick(DT, &mut host).unwrap();
        }
        assert_eq!(controller.gain(), 0.0);

        controller.tick(0.125, &mut host).unwrap();
        assert!((controller.gain() - 0.25).abs() < 1e-6);
        controller.tick(0.25, &mut host).unwrap();
        assert!((controller.gain() - 0.75).abs() < 1e-6);
        controller.tick(0.125, &mut host).unwrap();
        assert_eq!(controller.state(), SessionState::Recording);
    }

    #[test]
    fn new_request_restarts_from_stopping() {
        let mut host = FakeHost::new(&["mic", "usb"]);
        host.polls_until_ready = None;
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        controller.request_device_change("mic", &settings());
        while !matches!(controller.state(), SessionState::AwaitingFirstSample { .. }) {
            controller.tick(DT, &mut host).unwrap();
        }
        for _ in 0..10 {
            controller.tick(DT, &mut host).unwrap();
        }

        host.polls_until_ready = Some(1);
        controller.request_device_change("usb", &settings());
        assert_eq!(controller.state(), SessionState::Stopping);
        assert_eq!(controller.device_name(), Some("usb"));

        // The stalled capture is stopped, then released
        controller.tick(DT, &mut host).unwrap();
        assert!(controller.session().is_some_and(|s| s.capture.stopped));
        controller.tick(DT, &mut host).unwrap();
        assert!(controller.session().is_none());

        let (_, result) = run_until_settled(&mut controller, &mut host, 200);
        assert_eq!(result, Ok(SessionState::Recording));
        assert_eq!(host.opened, vec!["mic".to_string(), "usb".to_string()]);
        assert_eq!(controller.session().map(|s| s.device_name.as_str()), Some("usb"));
    }

    #[test]
    fn switching_away_from_a_recording_device_stops_it() {
        let mut host = FakeHost::new(&["mic", "usb"]);
        let mut controller = DeviceSessionController::<FakeHost>::new(settings());
        controller.request_device_change("mic", &settings());
        let (_, result) = run_until_settled(&mut controller, &mut host, 200);
        assert_eq!(result, Ok(SessionState::Recording));

        controller.request_device_change("usb", &settings());
        controller.tick(DT, &mut host).unwrap();
        assert!(controller.session().is_some_and(|s| s.capture.stopped));
        assert!(controller.recording_capture().is_err());
    }
}
