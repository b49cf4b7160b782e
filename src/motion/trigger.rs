use std::str::FromStr;

use super::{ElementRect, MotionError};

/// Reference line on the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn parse(word: &str) -> Option<Edge> {
        match word {
            "top" => Some(Edge::Top),
            "center" => Some(Edge::Center),
            "bottom" => Some(Edge::Bottom),
            _ => None,
        }
    }

    fn fraction(&self) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => 0.5,
            Edge::Bottom => 1.0,
        }
    }
}

/// A point where an element edge meets a viewport line, written
/// `"<element edge> <viewport position>"`, e.g. `"top 80%"`: the element's
/// top reaches 80% of the viewport height, measured from the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub element: Edge,
    /// Viewport line as a fraction of the viewport height.
    pub viewport: f64,
}

impl Anchor {
    pub const fn new(element: Edge, viewport: f64) -> Self {
        Self { element, viewport }
    }

    /// Whether the scroll position is at or past this anchor.
    pub fn reached(&self, rect: &ElementRect, viewport_height: f64) -> bool {
        let edge = rect.top + (rect.bottom - rect.top) * self.element.fraction();
        edge <= self.viewport * viewport_height
    }
}

impl FromStr for Anchor {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidAnchor(s.to_string());
        let mut words = s.split_whitespace();
        let element = words.next().and_then(Edge::parse).ok_or_else(invalid)?;
        let viewport = match words.next() {
            Some(word) => match Edge::parse(word) {
                Some(edge) => edge.fraction(),
                None => word
                    .strip_suffix('%')
                    .and_then(|p| p.parse::<f64>().ok())
                    .map(|p| p / 100.0)
                    .ok_or_else(invalid)?,
            },
            None => return Err(invalid()),
        };
        if words.next().is_some() {
            return Err(invalid());
        }
        Ok(Anchor { element, viewport })
    }
}

/// What the timeline does on a trigger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleAction {
    #[default]
    None,
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
}

impl FromStr for ToggleAction {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ToggleAction::None),
            "play" => Ok(ToggleAction::Play),
            "pause" => Ok(ToggleAction::Pause),
            "resume" => Ok(ToggleAction::Resume),
            "reverse" => Ok(ToggleAction::Reverse),
            "restart" => Ok(ToggleAction::Restart),
            "reset" => Ok(ToggleAction::Reset),
            "complete" => Ok(ToggleAction::Complete),
            other => Err(MotionError::InvalidToggleAction(other.to_string())),
        }
    }
}

/// Actions for enter, leave, enter-back and leave-back, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl ToggleActions {
    pub fn action_for(&self, event: TriggerEvent) -> ToggleAction {
        match event {
            TriggerEvent::Enter => self.on_enter,
            TriggerEvent::Leave => self.on_leave,
            TriggerEvent::EnterBack => self.on_enter_back,
            TriggerEvent::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .split_whitespace()
            .map(ToggleAction::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        match actions.as_slice() {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(ToggleActions {
                on_enter: *on_enter,
                on_leave: *on_leave,
                on_enter_back: *on_enter_back,
                on_leave_back: *on_leave_back,
            }),
            _ => Err(MotionError::InvalidToggleAction(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSpec {
    pub start: Anchor,
    pub end: Anchor,
    pub actions: ToggleActions,
    /// Stop observing after the first enter.
    pub once: bool,
}

impl Default for TriggerSpec {
    fn default() -> Self {
        Self {
            start: Anchor::new(Edge::Top, 1.0),
            end: Anchor::new(Edge::Bottom, 0.0),
            actions: ToggleActions::default(),
            once: false,
        }
    }
}

impl TriggerSpec {
    pub fn start(mut self, start: Anchor) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: Anchor) -> Self {
        self.end = end;
        self
    }

    pub fn actions(mut self, actions: ToggleActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Whether a leave-back can undo the entrance.
    pub fn is_reversible(&self) -> bool {
        matches!(
            self.actions.on_leave_back,
            ToggleAction::Reverse | ToggleAction::Reset
        )
    }
}

/// Scroll position relative to the start/end anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

/// Turns viewport samples into trigger events.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    spec: TriggerSpec,
    region: Region,
}

impl ScrollTrigger {
    pub fn new(spec: TriggerSpec) -> Self {
        Self {
            spec,
            region: Region::Before,
        }
    }

    pub fn spec(&self) -> &TriggerSpec {
        &self.spec
    }

    pub fn region(&self) -> Region {
        self.region
    }

    fn region_for(&self, rect: &ElementRect, viewport_height: f64) -> Region {
        if !self.spec.start.reached(rect, viewport_height) {
            Region::Before
        } else if self.spec.end.reached(rect, viewport_height) {
            Region::After
        } else {
            Region::Active
        }
    }

    /// Feeds one viewport sample. Jumping over the active region yields
    /// both boundary events in scroll order.
    pub fn update(&mut self, rect: &ElementRect, viewport_height: f64) -> Vec<TriggerEvent> {
        let next = self.region_for(rect, viewport_height);
        let events = match (self.region, next) {
            (Region::Before, Region::Active) => vec![TriggerEvent::Enter],
            (Region::Before, Region::After) => vec![TriggerEvent::Enter, TriggerEvent::Leave],
            (Region::Active, Region::After) => vec![TriggerEvent::Leave],
            (Region::Active, Region::Before) => vec![TriggerEvent::LeaveBack],
            (Region::After, Region::Active) => vec![TriggerEvent::EnterBack],
            (Region::After, Region::Before) => {
                vec![TriggerEvent::EnterBack, TriggerEvent::LeaveBack]
            }
            _ => Vec::new(),
        };
        self.region = next;
        events
    }
}

/// Reveal state of a section's entrance animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    #[default]
    BeforeTrigger,
    Revealed,
    /// Reversed back out after having been revealed.
    Hidden,
}

impl RevealPhase {
    pub fn after(self, action: ToggleAction) -> RevealPhase {
        match action {
            ToggleAction::Play
            | ToggleAction::Restart
            | ToggleAction::Complete
            | ToggleAction::Resume => RevealPhase::Revealed,
            ToggleAction::Reverse | ToggleAction::Reset if self == RevealPhase::Revealed => {
                RevealPhase::Hidden
            }
            _ => self,
        }
    }
}
