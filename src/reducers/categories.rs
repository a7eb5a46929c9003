use crate::messages::{Command, Message};
use crate::state::{AppState, RequestStatus};

pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    match msg {
        Message::FetchCategories => {
            state.categories.status = RequestStatus::Loading;
            state.categories.error = None;
            commands.push(Command::FetchCategories);
            true
        }
        Message::CategoriesLoaded { items, demo } => {
            state.categories.items = items.clone();
            state.categories.status = RequestStatus::Succeeded;
            state.categories.using_demo_data = *demo;
            true
        }
        Message::CategoriesFailed(error) => {
            state.categories.status = RequestStatus::Failed;
            state.categories.error = Some(error.clone());
            true
        }
        _ => false,
    }
}
