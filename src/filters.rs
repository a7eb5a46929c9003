//! Client-side filtering, sorting and pagination of the transaction list.
//!
//! The backend returns the full list; everything the transactions page shows
//! is derived here from `TransactionsState::query`.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::{Category, Transaction, TransactionKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSortKey {
    #[default]
    Date,
    Amount,
    Description,
    Category,
}

impl TransactionSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSortKey::Date => "date",
            TransactionSortKey::Amount => "amount",
            TransactionSortKey::Description => "description",
            TransactionSortKey::Category => "category",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date" => Some(TransactionSortKey::Date),
            "amount" => Some(TransactionSortKey::Amount),
            "description" => Some(TransactionSortKey::Description),
            "category" => Some(TransactionSortKey::Category),
            _ => None,
        }
    }

    /// Direction used when the user first sorts by this key: newest and
    /// largest first, text alphabetically.
    pub fn default_ascending(&self) -> bool {
        matches!(
            self,
            TransactionSortKey::Description | TransactionSortKey::Category
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSort {
    pub key: TransactionSortKey,
    pub ascending: bool,
}

impl Default for TransactionSort {
    fn default() -> Self {
        Self {
            key: TransactionSortKey::Date,
            ascending: false,
        }
    }
}

impl TransactionSort {
    /// Same key flips direction, a new key starts at its default direction.
    pub fn toggled(self, key: TransactionSortKey) -> Self {
        if self.key == key {
            Self {
                key,
                ascending: !self.ascending,
            }
        } else {
            Self {
                key,
                ascending: key.default_ascending(),
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub search: String,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<u32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub sort: TransactionSort,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            kind: None,
            category_id: None,
            date_from: None,
            date_to: None,
            min_amount: None,
            max_amount: None,
            sort: TransactionSort::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TransactionQuery {
    /// True when any narrowing filter (not sort/paging) is set.
    pub fn has_filters(&self) -> bool {
        !self.search.trim().is_empty()
            || self.kind.is_some()
            || self.category_id.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.min_amount.is_some()
            || self.max_amount.is_some()
    }

    /// Drop every filter but keep sort order and page size.
    pub fn cleared(&self) -> Self {
        Self {
            sort: self.sort,
            page_size: self.page_size,
            ..Self::default()
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let in_description = tx.description.to_lowercase().contains(&needle);
            let in_merchant = tx
                .merchant
                .as_deref()
                .map(|m| m.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_description && !in_merchant {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }
        if let Some(cat) = self.category_id {
            if tx.category_id != Some(cat) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if tx.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if tx.date > to {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if tx.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if tx.amount > max {
                return false;
            }
        }
        true
    }
}

pub fn normalize_page_size(size: usize) -> usize {
    if size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        size.min(MAX_PAGE_SIZE)
    }
}

/// One page of results plus the numbers a pager needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into the requested page.  The page number is clamped into
/// `[1, max(total_pages, 1)]`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = normalize_page_size(page_size);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

fn compare(
    a: &Transaction,
    b: &Transaction,
    key: TransactionSortKey,
    names: &HashMap<u32, String>,
) -> Ordering {
    match key {
        TransactionSortKey::Date => a.date.cmp(&b.date),
        TransactionSortKey::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
        TransactionSortKey::Description => a
            .description
            .to_lowercase()
            .cmp(&b.description.to_lowercase()),
        TransactionSortKey::Category => {
            match (category_name(a, names), category_name(b, names)) {
                (Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
                _ => Ordering::Equal,
            }
        }
    }
}

/// Name of the transaction's category.  An id with no matching category
/// counts as uncategorised.
fn category_name<'a>(tx: &Transaction, names: &'a HashMap<u32, String>) -> Option<&'a String> {
    tx.category_id.and_then(|id| names.get(&id))
}

/// Filter, sort (stable) and paginate.
pub fn apply(
    transactions: &[Transaction],
    categories: &[Category],
    query: &TransactionQuery,
) -> Page<Transaction> {
    let names: HashMap<u32, String> = categories.iter().map(|c| (c.id, c.name.clone())).collect();

    let mut filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| query.matches(tx))
        .cloned()
        .collect();

    let TransactionSort { key, ascending } = query.sort;
    filtered.sort_by(|a, b| {
        // Uncategorised rows go last regardless of direction.
        let uncategorised_order = if key == TransactionSortKey::Category {
            match (
                category_name(a, &names).is_some(),
                category_name(b, &names).is_some(),
            ) {
                (true, false) => Some(Ordering::Less),
                (false, true) => Some(Ordering::Greater),
                _ => None,
            }
        } else {
            None
        };
        if let Some(ord) = uncategorised_order {
            return ord;
        }
        let ord = compare(a, b, key, &names);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    paginate(&filtered, query.page, query.page_size)
}
