/// What a start or update call did to a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing in flight; the call changed nothing.
    Idle,
    /// A transition began on this call.
    Started,
    /// A transition is in flight and has not reached its rest point.
    Running,
    /// The transition reached its rest point on this call.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Idle,
    Advancing,
    Reversing,
}

impl Motion {
    pub fn sign(self) -> f32 {
        match self {
            Motion::Idle => 0.0,
            Motion::Advancing => 1.0,
            Motion::Reversing => -1.0,
        }
    }
}

/// Progress of one animated object between its rest points 0 and 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    scale: f32,
    dir: Motion,
    prev_scale: f32,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn motion(&self) -> Motion {
        self.dir
    }

    pub fn prev_scale(&self) -> f32 {
        self.prev_scale
    }

    pub fn is_idle(&self) -> bool {
        self.dir == Motion::Idle
    }

    /// Steps the progress by `gap`. Once it moves more than a whole unit
    /// away from the last rest point it snaps onto the next one.
    pub fn update(&mut self, gap: f32) -> Transition {
        if self.is_idle() {
            return Transition::Idle;
        }

        let sign = self.dir.sign();
        self.scale += gap * sign;
        if (self.scale - self.prev_scale).abs() > 1.0 {
            self.scale = self.prev_scale + sign;
            self.dir = Motion::Idle;
            self.prev_scale = self.scale;
            return Transition::Completed;
        }
        Transition::Running
    }

    /// Starts moving toward the other rest point. Ignored mid-transition.
    pub fn start_updating(&mut self) -> Transition {
        if !self.is_idle() {
            return Transition::Running;
        }

        self.dir = if self.prev_scale == 0.0 {
            Motion::Advancing
        } else {
            Motion::Reversing
        };
        Transition::Started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAP: f32 = 0.02 / 8.0;

    fn run_to_rest(state: &mut State, gap: f32) -> (usize, usize) {
        let mut ticks = 0;
        let mut completions = 0;
        while ticks < 10_000 {
            ticks += 1;
            match state.update(gap) {
                Transition::Completed => completions += 1,
                Transition::Idle => break,
                _ => {}
            }
        }
        (ticks - 1, completions)
    }

    #[test]
    fn new_state_is_idle_at_zero() {
        let state = State::new();
        assert!(state.is_idle());
        assert_eq!(state.scale(), 0.0);
        assert_eq!(state.prev_scale(), 0.0);
    }

    #[test]
    fn update_while_idle_changes_nothing() {
        let mut state = State::new();
        assert_eq!(state.update(GAP), Transition::Idle);
        assert_eq!(state, State::new());
    }

    #[test]
    fn advances_from_zero_to_one() {
        let mut state = State::new();
        assert_eq!(state.start_updating(), Transition::Started);
        assert_eq!(state.motion(), Motion::Advancing);

        let (ticks, completions) = run_to_rest(&mut state, GAP);
        assert_eq!(completions, 1);
        assert!(ticks <= (1.0 / GAP).ceil() as usize + 1, "took {} ticks", ticks);
        assert_eq!(state.scale(), 1.0);
        assert_eq!(state.prev_scale(), 1.0);
        assert!(state.is_idle());
    }

    #[test]
    fn reverses_from_one_to_zero() {
        let mut state = State::new();
        state.start_updating();
        run_to_rest(&mut state, GAP);

        assert_eq!(state.start_updating(), Transition::Started);
        assert_eq!(state.motion(), Motion::Reversing);

        let (_, completions) = run_to_rest(&mut state, GAP);
        assert_eq!(completions, 1);
        assert_eq!(state.scale(), 0.0);
        assert_eq!(state.prev_scale(), 0.0);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let mut state = State::new();
        state.start_updating();
        state.update(GAP);
        state.update(GAP);
        let before = state.clone();

        assert_eq!(state.start_updating(), Transition::Running);
        assert_eq!(state, before);
    }

    #[test]
    fn coarse_gap_still_snaps_exactly() {
        let mut state = State::new();
        state.start_updating();
        assert_eq!(state.update(0.7), Transition::Running);
        assert_eq!(state.update(0.7), Transition::Completed);
        assert_eq!(state.scale(), 1.0);
    }
}
