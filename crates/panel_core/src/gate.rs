use std::fmt;

use crate::OperationPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonId {
    Verify,
    Process,
    Download,
    Read,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [
        ButtonId::Verify,
        ButtonId::Process,
        ButtonId::Download,
        ButtonId::Read,
    ];

    /// Download and read act on an already located file and share the
    /// tertiary rule.
    pub fn is_tertiary(self) -> bool {
        matches!(self, ButtonId::Download | ButtonId::Read)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonId::Verify => "verify",
            ButtonId::Process => "process",
            ButtonId::Download => "download",
            ButtonId::Read => "read",
        };
        f.write_str(name)
    }
}

/// Set of button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        ButtonId::ALL.into_iter().collect()
    }

    pub fn contains(&self, id: ButtonId) -> bool {
        self.0 & id.bit() != 0
    }

    pub fn insert(&mut self, id: ButtonId) {
        self.0 |= id.bit();
    }

    pub fn with(mut self, id: ButtonId) -> Self {
        self.insert(id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ButtonId> + '_ {
        ButtonId::ALL.into_iter().filter(|id| self.contains(*id))
    }
}

impl FromIterator<ButtonId> for ButtonSet {
    fn from_iter<T: IntoIterator<Item = ButtonId>>(iter: T) -> Self {
        let mut set = ButtonSet::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Button enablement for a phase.
///
/// `tertiary_unlocked` records whether a success earlier in the session made
/// a file available; an error never takes that back. Buttons outside
/// `relevant` are disabled.
pub fn compute(phase: OperationPhase, relevant: ButtonSet, tertiary_unlocked: bool) -> ButtonSet {
    relevant
        .iter()
        .filter(|id| match phase {
            OperationPhase::Idle => !id.is_tertiary(),
            OperationPhase::Running => false,
            OperationPhase::Success => true,
            OperationPhase::Error => !id.is_tertiary() || tertiary_unlocked,
        })
        .collect()
}

