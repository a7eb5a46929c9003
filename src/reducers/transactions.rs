//! Transactions reducer: list loading, create/update/delete and the list
//! controls (search, filters, sort, paging).

use crate::filters::normalize_page_size;
use crate::messages::{Command, Message};
use crate::state::{AppState, RequestStatus};
use crate::storage::ListPreferences;
use crate::validation::parse_date_range;

use super::reject;

/// Field-error keys owned by the filter bar rather than the edit form.
const FILTER_FIELDS: [&str; 2] = ["date", "date_to"];

pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    let txs = &mut state.transactions;
    match msg {
        Message::FetchTransactions => {
            txs.status = RequestStatus::Loading;
            txs.error = None;
            commands.push(Command::FetchTransactions);
            true
        }
        Message::TransactionsLoaded { items, demo } => {
            txs.items = items.clone();
            txs.status = RequestStatus::Succeeded;
            txs.using_demo_data = *demo;
            if txs.selected_id.is_some() && txs.selected().is_none() {
                txs.selected_id = None;
            }
            true
        }
        Message::TransactionsFailed(error) => {
            txs.status = RequestStatus::Failed;
            txs.error = Some(error.clone());
            true
        }

        // Mutations
        Message::CreateTransaction(form) => {
            match form.validate() {
                Ok(payload) => {
                    begin_save(state);
                    commands.push(Command::CreateTransactionApi(payload));
                }
                Err(errors) => reject(&mut txs.field_errors, &mut txs.error, &errors),
            }
            true
        }
        Message::UpdateTransaction { id, form } => {
            match form.validate() {
                Ok(payload) => {
                    begin_save(state);
                    commands.push(Command::UpdateTransactionApi { id: *id, payload });
                }
                Err(errors) => reject(&mut txs.field_errors, &mut txs.error, &errors),
            }
            true
        }
        Message::DeleteTransaction(id) => {
            txs.saving = true;
            txs.error = None;
            commands.push(Command::DeleteTransactionApi(*id));
            true
        }
        Message::TransactionSaved(tx) => {
            txs.saving = false;
            txs.field_errors.clear();
            txs.upsert(tx.clone());
            commands.push(Command::send(Message::FetchDashboard));
            true
        }
        Message::TransactionDeleted(id) => {
            txs.saving = false;
            txs.items.retain(|t| t.id != *id);
            if txs.selected_id == Some(*id) {
                txs.selected_id = None;
            }
            commands.push(Command::send(Message::FetchDashboard));
            true
        }
        Message::TransactionMutationFailed(error) => {
            txs.saving = false;
            txs.error = Some(error.clone());
            true
        }
        Message::SelectTransaction(id) => {
            txs.selected_id = *id;
            txs.field_errors.clear();
            true
        }

        // List controls
        Message::SetSearch(search) => {
            txs.query.search = search.clone();
            txs.query.page = 1;
            true
        }
        Message::SetKindFilter(kind) => {
            txs.query.kind = *kind;
            txs.query.page = 1;
            true
        }
        Message::SetCategoryFilter(category_id) => {
            txs.query.category_id = *category_id;
            txs.query.page = 1;
            true
        }
        Message::SetDateRange { from, to } => {
            match parse_date_range(from.as_deref(), to.as_deref()) {
                Ok((date_from, date_to)) => {
                    txs.query.date_from = date_from;
                    txs.query.date_to = date_to;
                    txs.query.page = 1;
                    for key in FILTER_FIELDS {
                        txs.field_errors.remove(key);
                    }
                }
                Err(e) => {
                    txs.field_errors.insert(e.field().to_string(), e.to_string());
                }
            }
            true
        }
        Message::SetAmountRange { min, max } => {
            let valid = |v: &Option<f64>| v.filter(|x| x.is_finite() && *x >= 0.0);
            let (mut min, mut max) = (valid(min), valid(max));
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    std::mem::swap(&mut min, &mut max);
                }
            }
            txs.query.min_amount = min;
            txs.query.max_amount = max;
            txs.query.page = 1;
            true
        }
        Message::ClearFilters => {
            txs.query = txs.query.cleared();
            for key in FILTER_FIELDS {
                txs.field_errors.remove(key);
            }
            true
        }
        Message::SortTransactions(key) => {
            txs.query.sort = txs.query.sort.toggled(*key);
            txs.query.page = 1;
            commands.push(persist_preferences(state));
            true
        }
        Message::SetPage(page) => {
            txs.query.page = (*page).max(1);
            // Clamp against the filtered total.
            let clamped = state.transactions_page().page;
            state.transactions.query.page = clamped;
            true
        }
        Message::SetPageSize(size) => {
            txs.query.page_size = normalize_page_size(*size);
            txs.query.page = 1;
            commands.push(persist_preferences(state));
            true
        }
        _ => false,
    }
}

fn begin_save(state: &mut AppState) {
    state.transactions.saving = true;
    state.transactions.error = None;
    state.transactions.field_errors.clear();
}

fn persist_preferences(state: &AppState) -> Command {
    Command::PersistListPreferences(ListPreferences {
        sort: state.transactions.query.sort,
        page_size: state.transactions.query.page_size,
    })
}
