//! Dashboard domain reducer: summary loading and period selection.

use crate::debug_log;
use crate::messages::{Command, Message};
use crate::state::{AppState, RequestStatus};

/// Handles dashboard-related messages. Returns true if the message was handled.
pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    match msg {
        Message::FetchDashboard => {
            state.dashboard.status = RequestStatus::Loading;
            state.dashboard.error = None;
            commands.push(Command::FetchDashboard(state.dashboard.period));
            true
        }
        Message::SetDashboardPeriod(period) => {
            if state.dashboard.period != *period {
                state.dashboard.period = *period;
                state.dashboard.status = RequestStatus::Loading;
                state.dashboard.error = None;
                commands.push(Command::FetchDashboard(*period));
            }
            true
        }
        Message::DashboardLoaded { summary, demo } => {
            // A slow response for a period the user already left.
            if summary.period != state.dashboard.period {
                debug_log!(
                    "Ignoring stale {} summary (showing {})",
                    summary.period.as_str(),
                    state.dashboard.period.as_str()
                );
                return true;
            }
            state.dashboard.summary = Some(summary.clone());
            state.dashboard.status = RequestStatus::Succeeded;
            state.dashboard.using_demo_data = *demo;
            true
        }
        Message::DashboardFailed(error) => {
            state.dashboard.status = RequestStatus::Failed;
            state.dashboard.error = Some(error.clone());
            true
        }
        _ => false,
    }
}
