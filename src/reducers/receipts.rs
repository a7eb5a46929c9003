//! Receipts reducer.
//!
//! An uploaded receipt that the backend could parse becomes *pending*: the
//! UI shows it for review and the user confirms it into a transaction.

use crate::messages::{Command, Message};
use crate::models::ReceiptStatus;
use crate::state::{AppState, RequestStatus};
use crate::validation::validate_receipt_file;

use super::reject;

const UNREADABLE_RECEIPT: &str = "We could not read that receipt. Try a clearer photo.";

pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    let receipts = &mut state.receipts;
    match msg {
        Message::UploadReceipt(file) => {
            match validate_receipt_file(&file.type_(), file.size()) {
                Ok(()) => {
                    receipts.uploading = true;
                    receipts.error = None;
                    receipts.field_errors.clear();
                    commands.push(Command::UploadReceiptApi(file.clone()));
                }
                Err(e) => reject(&mut receipts.field_errors, &mut receipts.error, &[e]),
            }
            true
        }
        Message::ReceiptUploaded(receipt) => {
            receipts.uploading = false;
            match receipt.status {
                ReceiptStatus::Parsed | ReceiptStatus::Processing => {
                    receipts.pending_id = Some(receipt.id);
                }
                ReceiptStatus::Failed => {
                    receipts.error = Some(UNREADABLE_RECEIPT.to_string());
                }
                ReceiptStatus::Confirmed => {}
            }
            receipts.upsert(receipt.clone());
            true
        }
        Message::ReceiptUploadFailed(error) => {
            receipts.uploading = false;
            receipts.error = Some(error.clone());
            true
        }

        Message::FetchReceipts => {
            receipts.status = RequestStatus::Loading;
            receipts.error = None;
            commands.push(Command::FetchReceipts);
            true
        }
        Message::ReceiptsLoaded { items, demo } => {
            receipts.items = items.clone();
            receipts.status = RequestStatus::Succeeded;
            receipts.using_demo_data = *demo;
            if receipts.pending_id.is_some() && receipts.pending().is_none() {
                receipts.pending_id = None;
            }
            true
        }
        Message::ReceiptsFailed(error) => {
            receipts.status = RequestStatus::Failed;
            receipts.error = Some(error.clone());
            true
        }

        Message::ReviewReceipt(id) => {
            let reviewable = receipts
                .items
                .iter()
                .any(|r| r.id == *id && r.status != ReceiptStatus::Confirmed);
            if reviewable {
                receipts.pending_id = Some(*id);
                receipts.field_errors.clear();
            }
            true
        }
        Message::ConfirmReceipt { id, form } => {
            match form.validate() {
                Ok(confirmation) => {
                    receipts.confirming = true;
                    receipts.error = None;
                    receipts.field_errors.clear();
                    commands.push(Command::ConfirmReceiptApi {
                        id: *id,
                        confirmation,
                    });
                }
                Err(errors) => reject(&mut receipts.field_errors, &mut receipts.error, &errors),
            }
            true
        }
        Message::ReceiptConfirmed {
            receipt_id,
            transaction,
        } => {
            receipts.confirming = false;
            receipts.field_errors.clear();
            if let Some(receipt) = receipts.items.iter_mut().find(|r| r.id == *receipt_id) {
                receipt.status = ReceiptStatus::Confirmed;
                receipt.transaction_id = Some(transaction.id);
            }
            if receipts.pending_id == Some(*receipt_id) {
                receipts.pending_id = None;
            }

            let mut tx = transaction.clone();
            tx.receipt_id.get_or_insert(*receipt_id);
            state.transactions.upsert(tx);
            commands.push(Command::send(Message::FetchDashboard));
            true
        }
        Message::DeleteReceipt(id) => {
            receipts.error = None;
            commands.push(Command::DeleteReceiptApi(*id));
            true
        }
        Message::ReceiptDeleted(id) => {
            receipts.items.retain(|r| r.id != *id);
            if receipts.pending_id == Some(*id) {
                receipts.pending_id = None;
            }
            true
        }
        Message::ReceiptMutationFailed(error) => {
            receipts.uploading = false;
            receipts.confirming = false;
            receipts.error = Some(error.clone());
            true
        }
        Message::DismissPendingReceipt => {
            receipts.pending_id = None;
            receipts.field_errors.clear();
            true
        }
        _ => false,
    }
}
