//! Settings page: preferences, profile and password change.

use crate::messages::{Command, Message};
use crate::state::{AppState, RequestStatus};
use crate::validation::validate_settings;

use super::reject;

pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    match msg {
        Message::FetchSettings => {
            state.settings.status = RequestStatus::Loading;
            state.settings.error = None;
            commands.push(Command::FetchSettings);
            true
        }
        Message::SettingsLoaded { settings, demo } => {
            state.settings.settings = Some(settings.clone());
            state.settings.status = RequestStatus::Succeeded;
            state.settings.using_demo_data = *demo;
            true
        }
        Message::SettingsFailed(error) => {
            state.settings.status = RequestStatus::Failed;
            state.settings.error = Some(error.clone());
            true
        }

        Message::SaveSettings(settings) => {
            match validate_settings(settings) {
                Ok(normalised) => {
                    begin_save(state);
                    commands.push(Command::SaveSettingsApi(normalised));
                }
                Err(errors) => reject(&mut state.settings.field_errors, &mut state.settings.error, &errors),
            }
            true
        }
        Message::SettingsSaved(settings) => {
            state.settings.saving = false;
            state.settings.saved = true;
            state.settings.settings = Some(settings.clone());
            true
        }
        Message::UpdateProfile(form) => {
            match form.validate() {
                Ok(update) => {
                    begin_save(state);
                    commands.push(Command::UpdateProfileApi(update));
                }
                Err(errors) => reject(&mut state.settings.field_errors, &mut state.settings.error, &errors),
            }
            true
        }
        Message::ProfileUpdated(user) => {
            state.settings.saving = false;
            state.settings.saved = true;
            state.auth.user = Some(user.clone());
            true
        }
        Message::ChangePassword(form) => {
            match form.validate() {
                Ok(req) => {
                    begin_save(state);
                    commands.push(Command::ChangePasswordApi(req));
                }
                Err(errors) => reject(&mut state.settings.field_errors, &mut state.settings.error, &errors),
            }
            true
        }
        Message::PasswordChanged => {
            state.settings.saving = false;
            state.settings.password_changed = true;
            true
        }
        Message::SettingsMutationFailed(error) => {
            state.settings.saving = false;
            state.settings.error = Some(error.clone());
            true
        }
        _ => false,
    }
}

fn begin_save(state: &mut AppState) {
    let settings = &mut state.settings;
    settings.saving = true;
    settings.saved = false;
    settings.password_changed = false;
    settings.error = None;
    settings.field_errors.clear();
}
