//! Render collaborators notified on every fired redraw event.
//!
//! Renderers get the clock and a shared slice of particles; nothing they do
//! flows back into the physics loop.

use crate::core::particle::DIM;
use crate::core::Particle;
use serde::Serialize;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use tracing::{debug, trace};

/// Receives a read-only view of the particle set at each redraw tick.
pub trait Renderer {
    fn redraw(&mut self, clock: f64, particles: &[Particle]);
}

/// Ignores redraw ticks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn redraw(&mut self, _clock: f64, _particles: &[Particle]) {}
}

/// What a renderer needs to draw one disc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Disc {
    pub position: [f64; DIM],
    pub radius: f64,
    pub color: [u8; 3],
}

/// Owned snapshot of the particle set at one redraw tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub clock: f64,
    pub discs: Vec<Disc>,
}

impl Frame {
    pub fn capture(clock: f64, particles: &[Particle]) -> Self {
        Self {
            clock,
            discs: particles
                .iter()
                .map(|p| Disc {
                    position: p.position(),
                    radius: p.radius(),
                    color: p.color,
                })
                .collect(),
        }
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default, Clone)]
pub struct FrameLog {
    pub frames: Vec<Frame>,
}

impl Renderer for FrameLog {
    fn redraw(&mut self, clock: f64, particles: &[Particle]) {
        self.frames.push(Frame::capture(clock, particles));
    }
}

/// Forwards frames over a bounded channel to a consumer on another thread.
///
/// Sending never blocks: when the channel is full the frame is dropped and
/// counted, so a slow consumer cannot stall or reorder the simulation.
#[derive(Debug)]
pub struct ChannelRenderer {
    tx: SyncSender<Frame>,
    dropped: u64,
    disconnected: bool,
}

impl ChannelRenderer {
    /// Create a renderer and the receiving end of its channel.
    pub fn bounded(capacity: usize) -> (Self, Receiver<Frame>) {
        let (tx, rx) = sync_channel(capacity);
        (
            Self {
                tx,
                dropped: 0,
                disconnected: false,
            },
            rx,
        )
    }

    /// Frames discarded because the consumer lagged or went away.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Renderer for ChannelRenderer {
    fn redraw(&mut self, clock: f64, particles: &[Particle]) {
        if self.disconnected {
            self.dropped += 1;
            return;
        }
        match self.tx.try_send(Frame::capture(clock, particles)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                trace!(clock, "render channel full, frame dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                self.disconnected = true;
                debug!(clock, "render consumer disconnected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn two() -> Result<Vec<Particle>> {
        Ok(vec![
            Particle::new(0, [0.25, 0.5], [0.1, 0.0], 0.02, 1.0)?.with_color([255, 0, 0]),
            Particle::new(1, [0.75, 0.5], [-0.1, 0.0], 0.03, 1.0)?,
        ])
    }

    #[test]
    fn frame_captures_display_state() -> Result<()> {
        let ps = two()?;
        let f = Frame::capture(1.25, &ps);
        assert_eq!(f.clock, 1.25);
        assert_eq!(f.discs.len(), 2);
        assert_eq!(f.discs[0].color, [255, 0, 0]);
        assert_eq!(f.discs[1].radius, 0.03);
        assert_eq!(f.discs[1].position, [0.75, 0.5]);
        Ok(())
    }

    #[test]
    fn channel_drops_when_full() -> Result<()> {
        let ps = two()?;
        let (mut r, rx) = ChannelRenderer::bounded(1);
        r.redraw(0.0, &ps);
        r.redraw(0.5, &ps);
        assert_eq!(r.dropped(), 1);
        let got = rx.try_recv().expect("first frame queued");
        assert_eq!(got.clock, 0.0);
        assert!(rx.try_recv().is_err());
        Ok(())
    }

    #[test]
    fn channel_survives_disconnected_consumer() -> Result<()> {
        let ps = two()?;
        let (mut r, rx) = ChannelRenderer::bounded(4);
        drop(rx);
        r.redraw(0.0, &ps);
        r.redraw(1.0, &ps);
        assert_eq!(r.dropped(), 2);
        Ok(())
    }
}
