//! Local stand-in for the AI assistant.
//!
//! Used when `POST /chat` is unavailable.  Answers are built from the
//! dashboard summary already in state; no data leaves the browser.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::DashboardSummary;
use crate::utils::format_amount;

const NO_DATA: &str =
    "I don't have your numbers yet. Open the dashboard once and ask me again.";

const FALLBACKS: [&str; 3] = [
    "I can tell you about your spending, income, balance or top category. What would you like to know?",
    "Try asking \"How much did I spend?\" or \"What is my biggest category?\"",
    "I'm a simple offline assistant for now. Ask me about spending, income or your balance.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Spending,
    Income,
    Balance,
    TopCategory,
    Other,
}

fn topic(message: &str) -> Topic {
    let lower = message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
    if has(&["category", "categories", "biggest", "most", "top"]) {
        Topic::TopCategory
    } else if has(&["spend", "spent", "expense", "cost"]) {
        Topic::Spending
    } else if has(&["income", "earn", "salary", "paid"]) {
        Topic::Income
    } else if has(&["balance", "net", "save", "saving", "left"]) {
        Topic::Balance
    } else {
        Topic::Other
    }
}

/// Compose a reply to `message`.
pub fn stub_reply<R: Rng + ?Sized>(
    message: &str,
    summary: Option<&DashboardSummary>,
    currency: &str,
    rng: &mut R,
) -> String {
    let topic = topic(message);
    if topic == Topic::Other {
        return canned(rng);
    }
    let Some(s) = summary else {
        return NO_DATA.to_string();
    };
    let period = s.period.as_str();
    let money = |v: f64| format_amount(v, currency);

    match topic {
        Topic::Spending => format!(
            "You spent {} this {}.",
            money(s.total_expense),
            period_noun(period)
        ),
        Topic::Income => format!(
            "Your income this {} is {}.",
            period_noun(period),
            money(s.total_income)
        ),
        Topic::Balance => {
            let verdict = if s.net >= 0.0 { "ahead" } else { "behind" };
            format!(
                "Income {} minus expenses {} leaves you {} by {}.",
                money(s.total_income),
                money(s.total_expense),
                verdict,
                money(s.net.abs())
            )
        }
        Topic::TopCategory => match s.by_category.first() {
            Some(top) => format!(
                "Your biggest expense category is {} at {}.",
                top.name,
                money(top.total)
            ),
            None => "No expenses recorded for this period yet.".to_string(),
        },
        Topic::Other => canned(rng),
    }
}

fn canned<R: Rng + ?Sized>(rng: &mut R) -> String {
    FALLBACKS
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACKS[0])
        .to_string()
}

fn period_noun(period: &str) -> &str {
    match period {
        "all" => "period",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryTotal, SummaryPeriod};
    use rand::rngs::mock::StepRng;

    fn summary() -> DashboardSummary {
        DashboardSummary {
            period: SummaryPeriod::Month,
            total_income: 3000.0,
            total_expense: 1250.5,
            net: 1749.5,
            by_category: vec![CategoryTotal {
                category_id: Some(1),
                name: "Groceries".into(),
                total: 600.0,
            }],
            recent: vec![],
        }
    }

    #[test]
    fn answers_from_the_summary() {
        let mut rng = StepRng::new(0, 1);
        let s = summary();
        assert_eq!(
            stub_reply("How much did I spend?", Some(&s), "USD", &mut rng),
            "You spent $1,250.50 this month."
        );
        assert!(stub_reply("what's my top category", Some(&s), "USD", &mut rng)
            .contains("Groceries at $600.00"));
        assert!(stub_reply("balance?", Some(&s), "EUR", &mut rng).contains("ahead by €1,749.50"));
    }

    #[test]
    fn without_a_summary_asks_to_load_the_dashboard() {
        let mut rng = StepRng::new(0, 1);
        assert_eq!(stub_reply("income", None, "USD", &mut rng), NO_DATA);
    }

    #[test]
    fn small_talk_gets_a_canned_answer() {
        let mut rng = StepRng::new(0, 1);
        let reply = stub_reply("hello there", None, "USD", &mut rng);
        assert!(FALLBACKS.contains(&reply.as_str()));
    }
}
