use serde::{Deserialize, Serialize};

/// One slot per question: `None` means unanswered, `Some(i)` the chosen option.
pub type AnswerSlot = Option<usize>;

/// Per-question answer slots, sized to the loaded question list.
///
/// Serializes as a plain array with `null` for unanswered slots, which is the
/// shape scorers receive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    slots: Vec<AnswerSlot>,
}

impl AnswerSheet {
    /// Creates a sheet with `len` unanswered slots.
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot for question `question`; out-of-range reads as unanswered.
    #[must_use]
    pub fn get(&self, question: usize) -> AnswerSlot {
        self.slots.get(question).copied().flatten()
    }

    /// Record `choice` for `question`, replacing any earlier choice.
    ///
    /// Returns false (and changes nothing) if `question` is out of range.
    pub fn set(&mut self, question: usize, choice: usize) -> bool {
        match self.slots.get_mut(question) {
            Some(slot) => {
                *slot = Some(choice);
                true
            }
            None => false,
        }
    }

    /// Reset every slot to unanswered, keeping the length.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.len() - self.answered_count()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[AnswerSlot] {
        &self.slots
    }
}

impl From<Vec<AnswerSlot>> for AnswerSheet {
    fn from(slots: Vec<AnswerSlot>) -> Self {
        Self { slots }
    }
}
