//! Change notifications.
//!
//! Every successful mutation publishes one [`StateEvent`] per change to each
//! live subscriber. Receivers that have been dropped are pruned on the next
//! publish.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use agri_model::{FormType, RecordId, TabId, UserRole};

/// Kind of stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    InspectionTask,
    Seizure,
    LabSample,
    FirCase,
    Submission,
}

impl RecordKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InspectionTask => "Inspection",
            Self::Seizure => "Seizure",
            Self::LabSample => "Sample",
            Self::FirCase => "FIR",
            Self::Submission => "Submission",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    RoleChanged(UserRole),
    TabChanged(TabId),
    SelectedFormChanged(Option<FormType>),
    RecordAdded {
        kind: RecordKind,
        id: RecordId,
    },
    StatusChanged {
        kind: RecordKind,
        id: RecordId,
        from: &'static str,
        to: &'static str,
    },
    FormDraftChanged,
}

/// Fan-out list of event channels.
#[derive(Debug, Default)]
pub struct Subscribers {
    senders: Vec<Sender<StateEvent>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<StateEvent> {
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        receiver
    }

    pub fn publish(&mut self, event: &StateEvent) {
        self.senders.retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
