use foundation::ids::AnimationId;

/// What a scripted flight is heading to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlightKind {
    /// Close-up of the record at this index.
    Location { index: usize },
    /// Back to the home pose.
    Home,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActiveFlight {
    pub id: AnimationId,
    pub kind: FlightKind,
}

/// Why a rotation step did not run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SuspendReason {
    Dragging,
    Flying(FlightKind),
    ZoomedIn { zoom: f64 },
}

/// Interaction flags owned by the controller.
///
/// The two flags are independent; the globe is idle only when both are clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    dragging: bool,
    flight: Option<ActiveFlight>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn flight(&self) -> Option<ActiveFlight> {
        self.flight
    }

    pub fn is_idle(&self) -> bool {
        !self.dragging && self.flight.is_none()
    }

    /// Flag-based suspension; the zoom gate is checked by the controller.
    pub fn suspension(&self) -> Option<SuspendReason> {
        if self.dragging {
            Some(SuspendReason::Dragging)
        } else {
            self.flight.map(|f| SuspendReason::Flying(f.kind))
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Start tracking `flight`, superseding any flight already in the air.
    pub fn begin_flight(&mut self, flight: ActiveFlight) -> Option<ActiveFlight> {
        self.flight.replace(flight)
    }

    /// A camera move settled. Clears the flight flag when the settle belongs
    /// to the flight currently tracked; returns the flight that landed.
    pub fn settle(&mut self, settled: Option<AnimationId>) -> Option<ActiveFlight> {
        match (self.flight, settled) {
            (Some(active), Some(id)) if active.id == id => self.flight.take(),
            _ => None,
        }
    }
}
