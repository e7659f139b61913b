/// Logical input actions and the per-frame snapshot the simulation reads.
///
/// Devices never reach the core: they implement `InputSource`, and the
/// frame loop freezes their state into an `ActionSet` before stepping.

use super::entity::Facing;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::MoveLeft, Action::MoveRight, Action::Jump];

    fn bit(self) -> u8 {
        match self {
            Action::MoveLeft => 0b001,
            Action::MoveRight => 0b010,
            Action::Jump => 0b100,
        }
    }
}

/// Anything that can report currently-held actions.
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
}

/// Immutable bitmask of the actions held this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn from_source(source: &dyn InputSource) -> ActionSet {
        Action::ALL
            .iter()
            .filter(|a| source.is_held(**a))
            .fold(ActionSet::EMPTY, |set, a| set.with(*a))
    }

    pub fn with(self, action: Action) -> ActionSet {
        ActionSet(self.0 | action.bit())
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn union(self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 | other.0)
    }

    /// Horizontal direction requested this frame. Left wins when both
    /// directions are held.
    pub fn horizontal(self) -> Option<Facing> {
        if self.contains(Action::MoveLeft) {
            Some(Facing::Left)
        } else if self.contains(Action::MoveRight) {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl InputSource for ActionSet {
    fn is_held(&self, action: Action) -> bool {
        self.contains(action)
    }
}
