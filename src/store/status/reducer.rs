use crate::mvi::Reducer;
use crate::store::status::intent::StatusIntent;
use crate::store::status::state::{MessageStatus, StatusState};

pub struct StatusReducer;

impl Reducer for StatusReducer {
    type State = StatusState;
    type Intent = StatusIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            StatusIntent::EnsureDefault { id } => {
                state
                    .entries_mut()
                    .entry(id)
                    .or_insert(MessageStatus::DEFAULT);
                state
            }
            StatusIntent::SetRead { id, is_read } => {
                let record = state.entries_mut().entry(id).or_insert(MessageStatus::DEFAULT);
                record.is_read = is_read;
                state
            }
            StatusIntent::SetArchived { ids, is_archived } => {
                let entries = state.entries_mut();
                for id in ids {
                    entries
                        .entry(id)
                        .or_insert(MessageStatus::DEFAULT)
                        .is_archived = is_archived;
                }
                state
            }
            StatusIntent::Remove { ids } => {
                state.entries_mut().retain(|id, _| !ids.contains(id));
                state
            }
            StatusIntent::Clear => StatusState::default(),
        }
    }
}
