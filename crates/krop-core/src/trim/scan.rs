//! Scan-line classification and the per-edge shrink state machine.

use crate::geometry::PixelRect;

use super::{IntensitySampler, TrimPolicy};

/// Counts large jumps between consecutive samples of a scan line.
///
/// The reference is always the previous sample, so a slow gradient never
/// registers as a change while a single sharp step does.
#[derive(Debug, Clone)]
pub struct ChangeCounter {
    sensitivity: f64,
    reference: Option<u8>,
    changes: u32,
}

impl ChangeCounter {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            reference: None,
            changes: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, sample: u8) {
        if let Some(reference) = self.reference {
            if (f64::from(sample) - f64::from(reference)).abs() > self.sensitivity {
                self.changes += 1;
            }
        }
        self.reference = Some(sample);
    }

    pub fn changes(&self) -> u32 {
        self.changes
    }

    /// True once the line has more changes than the policy tolerates.
    #[inline]
    pub fn exceeds(&self, allowed_changes: f64) -> bool {
        f64::from(self.changes) > allowed_changes
    }
}

/// Count the changes along a sequence of samples.
pub fn count_changes(samples: &[u8], sensitivity: f64) -> u32 {
    let mut counter = ChangeCounter::new(sensitivity);
    for &sample in samples {
        counter.push(sample);
    }
    counter.changes()
}

/// Classify a scan line: `true` means content, `false` means background.
pub fn is_content(samples: &[u8], policy: &TrimPolicy) -> bool {
    count_changes(samples, policy.sensitivity) as f64 > policy.allowed_changes
}

/// One side of the rectangle being trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Processing order. Left and right see the already-trimmed top and
    /// bottom; top and bottom see the untrimmed left and right.
    pub const ORDER: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    pub fn position(self, rect: &PixelRect) -> i32 {
        match self {
            Edge::Top => rect.top,
            Edge::Bottom => rect.bottom,
            Edge::Left => rect.left,
            Edge::Right => rect.right,
        }
    }

    pub fn with_position(self, rect: PixelRect, position: i32) -> PixelRect {
        let mut rect = rect;
        match self {
            Edge::Top => rect.top = position,
            Edge::Bottom => rect.bottom = position,
            Edge::Left => rect.left = position,
            Edge::Right => rect.right = position,
        }
        rect
    }

    /// Direction of one inward step.
    fn inward(self) -> i32 {
        match self {
            Edge::Top | Edge::Left => 1,
            Edge::Bottom | Edge::Right => -1,
        }
    }

    /// Extent of the axis this edge shrinks.
    fn extent(self, rect: &PixelRect) -> i64 {
        match self {
            Edge::Top | Edge::Bottom => rect.height(),
            Edge::Left | Edge::Right => rect.width(),
        }
    }

    /// Pixel coordinates of the scan line sitting on this edge.
    fn line(self, rect: &PixelRect) -> impl Iterator<Item = (i32, i32)> {
        let (fixed, span, horizontal) = match self {
            Edge::Top => (rect.top, rect.left..rect.right, true),
            Edge::Bottom => (rect.bottom, rect.left..rect.right, true),
            Edge::Left => (rect.left, rect.top..rect.bottom, false),
            Edge::Right => (rect.right, rect.top..rect.bottom, false),
        };
        span.map(move |v| if horizontal { (v, fixed) } else { (fixed, v) })
    }
}

/// Why an edge stopped moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The scan line at the edge is content.
    Content,
    /// The axis reached the minimum extent.
    MinExtent,
}

/// State of a single edge scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeState {
    Scanning(i32),
    Stopped { position: i32, reason: StopReason },
}

impl EdgeState {
    /// Advance the scan by one line.
    ///
    /// `rect` is the rectangle as left by the previously processed edges;
    /// only this edge's coordinate is replaced by the scan position.
    pub fn step<S>(
        self,
        sampler: &S,
        rect: &PixelRect,
        edge: Edge,
        policy: &TrimPolicy,
    ) -> Result<EdgeState, S::Error>
    where
        S: IntensitySampler + ?Sized,
    {
        let position = match self {
            EdgeState::Scanning(position) => position,
            stopped => return Ok(stopped),
        };

        let current = edge.with_position(*rect, position);
        if edge.extent(&current) <= policy.min_extent() {
            return Ok(EdgeState::Stopped {
                position,
                reason: StopReason::MinExtent,
            });
        }

        if line_is_content(sampler, edge, &current, policy)? {
            Ok(EdgeState::Stopped {
                position,
                reason: StopReason::Content,
            })
        } else {
            Ok(EdgeState::Scanning(position + edge.inward()))
        }
    }
}

/// Run one edge's state machine to completion.
pub fn scan_edge<S>(
    sampler: &S,
    rect: &PixelRect,
    edge: Edge,
    policy: &TrimPolicy,
) -> Result<(i32, StopReason), S::Error>
where
    S: IntensitySampler + ?Sized,
{
    let mut state = EdgeState::Scanning(edge.position(rect));
    loop {
        match state.step(sampler, rect, edge, policy)? {
            EdgeState::Stopped { position, reason } => return Ok((position, reason)),
            scanning => state = scanning,
        }
    }
}

/// Classify the scan line on `edge`, reading samples in order.
///
/// Reading stops at the first sample that pushes the line over the allowed
/// change count, so the sampler is never asked for the rest of the line.
fn line_is_content<S>(
    sampler: &S,
    edge: Edge,
    rect: &PixelRect,
    policy: &TrimPolicy,
) -> Result<bool, S::Error>
where
    S: IntensitySampler + ?Sized,
{
    let mut counter = ChangeCounter::new(policy.sensitivity);
    for (x, y) in edge.line(rect) {
        counter.push(sampler.intensity(x, y)?);
        if counter.exceeds(policy.allowed_changes) {
            return Ok(true);
        }
    }
    Ok(false)
}
