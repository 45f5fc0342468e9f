use std::time::Instant;

use super::host::RenderHost;
use super::timer::TimerSlot;
use crate::config::BlinkParams;
use crate::math::Point3;
use crate::point::PointId;

/// State of the transient highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    Idle,
    /// Toggling visibility; `lit` is the current visibility.
    Blinking { lit: bool },
}

/// The single blinking marker and its two timers.
///
/// `blink` toggles visibility every interval; `auto_clear` ends the blink.
/// Starting a new highlight cancels and replaces both.
#[derive(Debug)]
pub struct Highlight<M> {
    marker: Option<M>,
    point: Option<PointId>,
    position: Option<Point3>,
    state: HighlightState,
    blink: TimerSlot,
    auto_clear: TimerSlot,
}

impl<M: Copy> Default for Highlight<M> {
    fn default() -> Self {
        Self {
            marker: None,
            point: None,
            position: None,
            state: HighlightState::Idle,
            blink: TimerSlot::new(),
            auto_clear: TimerSlot::new(),
        }
    }
}

impl<M: Copy> Highlight<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Point of the current or most recent highlight.
    #[must_use]
    pub fn point(&self) -> Option<&PointId> {
        self.point.as_ref()
    }

    #[must_use]
    pub fn position(&self) -> Option<Point3> {
        self.position
    }

    #[must_use]
    pub fn marker(&self) -> Option<M> {
        self.marker
    }

    #[must_use]
    pub fn blink_pending(&self) -> bool {
        self.blink.is_pending()
    }

    #[must_use]
    pub fn auto_clear_pending(&self) -> bool {
        self.auto_clear.is_pending()
    }

    pub(super) fn attach(&mut self, marker: M) {
        self.marker = Some(marker);
    }

    /// Shows the marker at `position` and (re)starts both timers.
    pub(super) fn start<H>(
        &mut self,
        host: &mut H,
        point: PointId,
        position: Point3,
        timing: BlinkParams,
        now: Instant,
    ) where
        H: RenderHost<Marker = M> + ?Sized,
    {
        self.blink.cancel();
        self.auto_clear.cancel();

        if let Some(marker) = self.marker {
            host.place_marker(marker, position);
            host.set_marker_visible(marker, true);
        }
        self.point = Some(point);
        self.position = Some(position);
        self.state = HighlightState::Blinking { lit: true };

        self.blink.start_repeating(now, timing.interval());
        self.auto_clear.start_once(now, timing.duration());
    }

    /// Cancels both timers and hides the marker.
    pub(super) fn stop<H>(&mut self, host: &mut H)
    where
        H: RenderHost<Marker = M> + ?Sized,
    {
        self.blink.cancel();
        self.auto_clear.cancel();
        if let Some(marker) = self.marker {
            host.set_marker_visible(marker, false);
        }
        self.state = HighlightState::Idle;
    }

    /// Fires whatever timers are due at `now`.
    pub(super) fn tick<H>(&mut self, host: &mut H, now: Instant)
    where
        H: RenderHost<Marker = M> + ?Sized,
    {
        let HighlightState::Blinking { lit } = self.state else {
            return;
        };

        if self.auto_clear.poll(now) > 0 {
            tracing::debug!(point = ?self.point, "highlight expired");
            self.stop(host);
            return;
        }

        let toggles = self.blink.poll(now);
        if toggles % 2 == 1 {
            let lit = !lit;
            if let Some(marker) = self.marker {
                host.set_marker_visible(marker, lit);
            }
            self.state = HighlightState::Blinking { lit };
        }
    }
}
