use crate::error::{Error, Result};
use ordered_float::NotNan;

/// Kinds of events the scheduler can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Collision between particles `a` and `b`.
    Particles { a: u32, b: u32 },
    /// Particle `a` reaches the left or right wall.
    VerticalWall { a: u32 },
    /// Particle `a` reaches the bottom or top wall.
    HorizontalWall { a: u32 },
    /// Periodic render tick; touches no particle.
    Redraw,
}

impl EventKind {
    /// Arena indices of the particles this event involves.
    #[inline]
    pub fn participants(&self) -> (Option<u32>, Option<u32>) {
        match *self {
            EventKind::Particles { a, b } => (Some(a), Some(b)),
            EventKind::VerticalWall { a } | EventKind::HorizontalWall { a } => (Some(a), None),
            EventKind::Redraw => (None, None),
        }
    }
}

/// A predicted future occurrence.
///
/// - `time`: absolute simulation time (finite, non-NaN).
/// - `kind`: event kind and participants.
/// - `cc_a`, `cc_b`: collision-count snapshots taken when the event was predicted.
///
/// Events never change after construction; a prediction that no longer holds
/// is detected by [`Event::is_valid`] when it reaches the front of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    time: NotNan<f64>,
    kind: EventKind,
    cc_a: Option<u64>,
    cc_b: Option<u64>,
}

impl Event {
    /// Create a new event, validating that time is finite and non-NaN.
    ///
    /// The snapshots must line up with the participants of `kind`.
    pub fn new(time: f64, kind: EventKind, cc_a: Option<u64>, cc_b: Option<u64>) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        let (pa, pb) = kind.participants();
        if pa.is_some() != cc_a.is_some() || pb.is_some() != cc_b.is_some() {
            return Err(Error::InvalidParam(format!(
                "collision-count snapshots do not match participants of {kind:?}"
            )));
        }
        Ok(Self {
            time,
            kind,
            cc_a,
            cc_b,
        })
    }

    /// Particle-particle collision predicted at `time`.
    pub fn particles(time: f64, a: u32, cc_a: u64, b: u32, cc_b: u64) -> Result<Self> {
        Self::new(time, EventKind::Particles { a, b }, Some(cc_a), Some(cc_b))
    }

    pub fn vertical_wall(time: f64, a: u32, cc_a: u64) -> Result<Self> {
        Self::new(time, EventKind::VerticalWall { a }, Some(cc_a), None)
    }

    pub fn horizontal_wall(time: f64, a: u32, cc_a: u64) -> Result<Self> {
        Self::new(time, EventKind::HorizontalWall { a }, Some(cc_a), None)
    }

    pub fn redraw(time: f64) -> Result<Self> {
        Self::new(time, EventKind::Redraw, None, None)
    }

    #[inline]
    pub fn time(&self) -> NotNan<f64> {
        self.time
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Validate against the live collision counts of the participants, in the
    /// same order as [`EventKind::participants`]. Redraw events are always valid.
    #[inline]
    pub fn is_valid(&self, cc_a_now: Option<u64>, cc_b_now: Option<u64>) -> bool {
        self.cc_a == cc_a_now && self.cc_b == cc_b_now
    }
}
