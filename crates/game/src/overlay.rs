//! Full-screen fade that frames teleports and respawns.
//!
//! Only the opacity value and the phase changes are modelled; drawing the
//! quad is up to the renderer.

/// Where the fade currently is. Elapsed times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayPhase {
    Transparent,
    FadingIn { elapsed: f64 },
    Opaque,
    Holding { elapsed: f64 },
    FadingOut { elapsed: f64 },
}

/// Reported by [`Overlay::update`] when a phase completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The screen just turned fully black.
    Opaque,
    /// The black hold after [`Overlay::fade_out`] ended; fading back starts.
    HoldComplete,
    /// The screen is clear again.
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    phase: OverlayPhase,
    fade_ms: f64,
    hold_ms: f64,
}

impl Overlay {
    pub fn new(fade_ms: f64, hold_ms: f64) -> Self {
        Self {
            phase: OverlayPhase::Transparent,
            fade_ms,
            hold_ms,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn is_transparent(&self) -> bool {
        self.phase == OverlayPhase::Transparent
    }

    /// Start fading to black. Replaces any fade in flight.
    pub fn fade_in(&mut self) {
        self.phase = OverlayPhase::FadingIn { elapsed: 0.0 };
    }

    /// Hold black, then fade back to clear. Replaces any fade in flight.
    pub fn fade_out(&mut self) {
        self.phase = OverlayPhase::Holding { elapsed: 0.0 };
    }

    /// Current opacity in [0, 1].
    pub fn opacity(&self) -> f32 {
        match self.phase {
            OverlayPhase::Transparent => 0.0,
            OverlayPhase::FadingIn { elapsed } => ease_in_out_quad(progress(elapsed, self.fade_ms)),
            OverlayPhase::Opaque | OverlayPhase::Holding { .. } => 1.0,
            OverlayPhase::FadingOut { elapsed } => {
                1.0 - ease_in_out_quad(progress(elapsed, self.fade_ms))
            }
        }
    }

    /// Advance by `dt` seconds. At most one phase completes per call.
    pub fn update(&mut self, dt: f32) -> Option<OverlayEvent> {
        let step = f64::from(dt) * 1000.0;
        match self.phase {
            OverlayPhase::Transparent | OverlayPhase::Opaque => None,
            OverlayPhase::FadingIn { elapsed } => {
                let elapsed = elapsed + step;
                if elapsed >= self.fade_ms {
                    self.phase = OverlayPhase::Opaque;
                    Some(OverlayEvent::Opaque)
                } else {
                    self.phase = OverlayPhase::FadingIn { elapsed };
                    None
                }
            }
            OverlayPhase::Holding { elapsed } => {
                let elapsed = elapsed + step;
                if elapsed >= self.hold_ms {
                    self.phase = OverlayPhase::FadingOut { elapsed: 0.0 };
                    Some(OverlayEvent::HoldComplete)
                } else {
                    self.phase = OverlayPhase::Holding { elapsed };
                    None
                }
            }
            OverlayPhase::FadingOut { elapsed } => {
                let elapsed = elapsed + step;
                if elapsed >= self.fade_ms {
                    self.phase = OverlayPhase::Transparent;
                    Some(OverlayEvent::Transparent)
                } else {
                    self.phase = OverlayPhase::FadingOut { elapsed };
                    None
                }
            }
        }
    }
}

fn progress(elapsed: f64, duration: f64) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0) as f32
    }
}

/// Quadratic ease-in-out on [0, 1].
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
