use std::str::FromStr;

use super::{defaults, trigger::ToggleAction, Ease, MotionError, VisualState};

/// Index of an animated element within one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub usize);

impl TargetId {
    /// `count` consecutive targets starting at `first`.
    pub fn range(first: usize, count: usize) -> impl Iterator<Item = TargetId> {
        (first..first + count).map(TargetId)
    }
}

/// Where a tween starts relative to what is already on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// At the current end of the timeline.
    #[default]
    Append,
    /// Offset in seconds from the current end, `"-=0.4"` / `"+=0.2"`.
    Offset(f64),
    /// Absolute time in seconds.
    At(f64),
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || MotionError::InvalidPosition(s.to_string());
        if s.is_empty() || s == ">" {
            return Ok(Position::Append);
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return rest
                .parse::<f64>()
                .map(|v| Position::Offset(-v))
                .map_err(|_| invalid());
        }
        if let Some(rest) = s.strip_prefix("+=") {
            return rest
                .parse::<f64>()
                .map(Position::Offset)
                .map_err(|_| invalid());
        }
        match s.parse::<f64>() {
            Ok(v) if v >= 0.0 => Ok(Position::At(v)),
            _ => Err(invalid()),
        }
    }
}

/// One `fromTo` step applied to a group of targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    pub from: VisualState,
    pub to: VisualState,
    pub duration: Option<f64>,
    pub ease: Option<Ease>,
    /// Delay between consecutive targets of the group, in seconds.
    pub stagger: f64,
    pub repeat: u32,
    pub yoyo: bool,
}

impl TweenSpec {
    pub fn from_to(from: VisualState, to: VisualState) -> Self {
        Self {
            from,
            to,
            duration: None,
            ease: None,
            stagger: 0.0,
            repeat: 0,
            yoyo: false,
        }
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs;
        self
    }

    /// Play forward then back `repeat` extra times, alternating direction.
    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self.yoyo = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tween {
    target: TargetId,
    from: VisualState,
    to: VisualState,
    start: f64,
    duration: f64,
    ease: Ease,
    repeat: u32,
    yoyo: bool,
}

impl Tween {
    fn end(&self) -> f64 {
        self.start + self.duration * (self.repeat as f64 + 1.0)
    }

    fn value_at(&self, time: f64) -> VisualState {
        let end_state = if self.yoyo && self.repeat % 2 == 1 {
            self.from
        } else {
            self.to
        };
        if time <= self.start {
            return if self.duration <= 0.0 && time == self.start {
                end_state
            } else {
                self.from
            };
        }
        if time >= self.end() {
            return end_state;
        }
        let local = time - self.start;
        let iteration = (local / self.duration).floor();
        let frac = (local - iteration * self.duration) / self.duration;
        let backwards = self.yoyo && iteration as u32 % 2 == 1;
        let p = if backwards { 1.0 - frac } else { frac };
        self.from.lerp(&self.to, self.ease.apply(p))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    tweens: Vec<Tween>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn end(&self) -> f64 {
        self.tweens.iter().map(Tween::end).fold(0.0, f64::max)
    }

    pub fn from_to(
        mut self,
        targets: impl IntoIterator<Item = TargetId>,
        spec: TweenSpec,
        position: Position,
    ) -> Self {
        let defaults = defaults();
        let end = self.end();
        let base = match position {
            Position::Append => end,
            Position::Offset(offset) => (end + offset).max(0.0),
            Position::At(at) => at.max(0.0),
        };
        let duration = spec.duration.unwrap_or(defaults.duration).max(0.0);
        let ease = spec.ease.unwrap_or(defaults.ease);
        for (i, target) in targets.into_iter().enumerate() {
            self.tweens.push(Tween {
                target,
                from: spec.from,
                to: spec.to,
                start: base + spec.stagger * i as f64,
                duration,
                ease,
                repeat: spec.repeat,
                yoyo: spec.yoyo,
            });
        }
        self
    }

    pub fn build(self) -> Timeline {
        let duration = self.end();
        Timeline {
            tweens: self.tweens,
            duration,
            time: 0.0,
            playback: Playback::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Forward,
    Reverse,
    Paused { reversed: bool },
    Killed,
}

/// An ordered set of tweens with a playhead.
///
/// Time only moves through [`Timeline::advance`]; sampling is pure.
#[derive(Debug, Clone)]
pub struct Timeline {
    tweens: Vec<Tween>,
    duration: f64,
    time: f64,
    playback: Playback,
}

impl Timeline {
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_active(&self) -> bool {
        matches!(self.playback, Playback::Forward | Playback::Reverse)
    }

    pub fn is_killed(&self) -> bool {
        self.playback == Playback::Killed
    }

    fn set_playback(&mut self, playback: Playback) {
        if !self.is_killed() {
            self.playback = playback;
        }
    }

    pub fn play(&mut self) {
        self.set_playback(Playback::Forward);
    }

    pub fn reverse(&mut self) {
        self.set_playback(Playback::Reverse);
    }

    pub fn pause(&mut self) {
        let reversed = self.playback == Playback::Reverse;
        if self.is_active() {
            self.set_playback(Playback::Paused { reversed });
        }
    }

    pub fn resume(&mut self) {
        if let Playback::Paused { reversed } = self.playback {
            self.set_playback(if reversed {
                Playback::Reverse
            } else {
                Playback::Forward
            });
        }
    }

    pub fn restart(&mut self) {
        if !self.is_killed() {
            self.time = 0.0;
            self.playback = Playback::Forward;
        }
    }

    /// Back to the start, stopped.
    pub fn reset(&mut self) {
        if !self.is_killed() {
            self.time = 0.0;
            self.playback = Playback::Idle;
        }
    }

    /// Jump to the end, stopped.
    pub fn complete(&mut self) {
        if !self.is_killed() {
            self.time = self.duration;
            self.playback = Playback::Idle;
        }
    }

    /// Stops the timeline for good. Every later control call is ignored.
    pub fn kill(&mut self) {
        self.playback = Playback::Killed;
    }

    pub fn apply(&mut self, action: ToggleAction) {
        match action {
            ToggleAction::None => {}
            ToggleAction::Play => self.play(),
            ToggleAction::Pause => self.pause(),
            ToggleAction::Resume => self.resume(),
            ToggleAction::Reverse => self.reverse(),
            ToggleAction::Restart => self.restart(),
            ToggleAction::Reset => self.reset(),
            ToggleAction::Complete => self.complete(),
        }
    }

    /// Moves the playhead by `dt` seconds in the playing direction.
    /// Returns whether the timeline is still playing afterwards.
    pub fn advance(&mut self, dt: f64) -> bool {
        match self.playback {
            Playback::Forward => {
                self.time = (self.time + dt).min(self.duration);
                if self.time >= self.duration {
                    self.playback = Playback::Idle;
                }
            }
            Playback::Reverse => {
                self.time = (self.time - dt).max(0.0);
                if self.time <= 0.0 {
                    self.playback = Playback::Idle;
                }
            }
            _ => {}
        }
        self.is_active()
    }

    pub fn targets(&self) -> Vec<TargetId> {
        let mut targets = self.tweens.iter().map(|t| t.target).collect::<Vec<_>>();
        targets.sort();
        targets.dedup();
        targets
    }

    fn state_at(&self, target: TargetId, time: f64) -> Option<VisualState> {
        let mut tweens = self.tweens.iter().filter(|t| t.target == target);
        let first = tweens.next()?;
        let mut current = first;
        for tween in tweens {
            if tween.start <= time {
                current = tween;
            }
        }
        Some(current.value_at(time))
    }

    /// Visual state of every target at the playhead. Empty once killed.
    pub fn sample(&self) -> Vec<(TargetId, VisualState)> {
        if self.is_killed() {
            return Vec::new();
        }
        self.targets()
            .into_iter()
            .filter_map(|target| self.state_at(target, self.time).map(|s| (target, s)))
            .collect()
    }

    /// State of every target before anything has played.
    pub fn initial_states(&self) -> Vec<(TargetId, VisualState)> {
        self.targets()
            .into_iter()
            .filter_map(|target| self.state_at(target, 0.0).map(|s| (target, s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> VisualState {
        VisualState::RESTING.with_opacity(0.0).with_y(50.0)
    }

    fn contact_like() -> Timeline {
        TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(hidden(), VisualState::RESTING).duration(0.8),
                Position::Append,
            )
            .from_to(
                [TargetId(1)],
                TweenSpec::from_to(hidden(), VisualState::RESTING).duration(0.6),
                "-=0.4".parse().unwrap(),
            )
            .from_to(
                TargetId::range(2, 2),
                TweenSpec::from_to(
                    VisualState::RESTING.with_opacity(0.0).with_scale(0.5),
                    VisualState::RESTING,
                )
                .stagger(0.1),
                "-=0.4".parse().unwrap(),
            )
            .build()
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("-=0.4".parse::<Position>(), Ok(Position::Offset(-0.4)));
        assert_eq!("+=0.25".parse::<Position>(), Ok(Position::Offset(0.25)));
        assert_eq!("1.5".parse::<Position>(), Ok(Position::At(1.5)));
        assert_eq!("".parse::<Position>(), Ok(Position::Append));
        assert!("-=soon".parse::<Position>().is_err());
        assert!("-3".parse::<Position>().is_err());
    }

    #[test]
    fn test_overlap_layout() {
        let tl = contact_like();
        // title 0..0.8, box 0.4..1.0, icons start 0.6 and 0.7 with default 0.5s
        assert!((tl.duration() - 1.2).abs() < 1e-9);

        let mut tl = tl;
        tl.play();
        tl.advance(0.4);
        let at = |tl: &Timeline, id: usize| {
            tl.sample()
                .into_iter()
                .find(|(t, _)| *t == TargetId(id))
                .map(|(_, s)| s)
                .unwrap()
        };
        assert!(at(&tl, 0).opacity > 0.0);
        assert_eq!(at(&tl, 1).opacity, 0.0);
        tl.advance(0.25);
        assert!(at(&tl, 2).opacity > 0.0);
        assert_eq!(at(&tl, 3).opacity, 0.0);
    }

    #[test]
    fn test_play_to_end_and_reverse_to_start() {
        let mut tl = contact_like();
        let initial = tl.initial_states();
        assert_eq!(tl.sample(), initial);

        tl.play();
        while tl.advance(0.016) {}
        assert_eq!(tl.playback(), Playback::Idle);
        assert!(tl
            .sample()
            .iter()
            .all(|(_, s)| *s == VisualState::RESTING));

        tl.reverse();
        while tl.advance(0.016) {}
        assert_eq!(tl.time(), 0.0);
        assert_eq!(tl.sample(), initial);
    }

    #[test]
    fn test_stagger_offsets() {
        let tl = TimelineBuilder::new()
            .from_to(
                TargetId::range(0, 3),
                TweenSpec::from_to(hidden(), VisualState::RESTING)
                    .duration(1.0)
                    .stagger(0.2),
                Position::Append,
            )
            .build();
        assert!((tl.duration() - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        let base = VisualState::RESTING;
        let big = VisualState::RESTING.with_scale(1.3);
        let mut tl = TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(base, big).duration(0.2).yoyo(1),
                Position::Append,
            )
            .build();
        assert!((tl.duration() - 0.4).abs() < 1e-9);
        tl.play();
        tl.advance(0.2);
        assert!((tl.sample()[0].1.scale - 1.3).abs() < 1e-9);
        tl.advance(0.2);
        assert_eq!(tl.sample()[0].1.scale, 1.0);
        assert!(!tl.is_active());
    }

    #[test]
    fn test_pause_resume_keeps_direction() {
        let mut tl = contact_like();
        tl.complete();
        tl.reverse();
        tl.advance(0.1);
        tl.pause();
        let t = tl.time();
        assert!(!tl.advance(0.1));
        assert_eq!(tl.time(), t);
        tl.resume();
        assert_eq!(tl.playback(), Playback::Reverse);
    }

    #[test]
    fn test_killed_timeline_ignores_controls() {
        let mut tl = contact_like();
        tl.kill();
        tl.play();
        tl.restart();
        assert!(!tl.advance(1.0));
        assert!(tl.sample().is_empty());
        assert!(tl.is_killed());
    }
}
