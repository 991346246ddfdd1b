//! Static advisory cards. There is no model behind these yet; the list is fixed.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Transfer,
    Reduce,
    Alert,
    Tip,
    Achievement,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Impact {
    High,
    Medium,
    LongTerm,
    Positive,
}

impl Impact {
    pub fn label(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::LongTerm => "Long-term",
            Impact::Positive => "Positive",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    pub id: &'static str,
    pub kind: SuggestionKind,
    pub title: &'static str,
    pub description: &'static str,
    pub impact: Impact,
    pub reason: &'static str,
}

static SUGGESTIONS: [Suggestion; 5] = [
    Suggestion {
        id: "s1",
        kind: SuggestionKind::Transfer,
        title: "Move $200 from Wants to Savings",
        description: "Based on your spending patterns, you can increase your savings rate without impacting your lifestyle.",
        impact: Impact::High,
        reason: "Your 'Wants' category has consistently been underspent by ~$200 for the past 3 months.",
    },
    Suggestion {
        id: "s2",
        kind: SuggestionKind::Reduce,
        title: "Reduce Dining budget by 10%",
        description: "Your dining expenses are consistently lower than budgeted.",
        impact: Impact::Medium,
        reason: "You've only used 75% of your dining budget on average over the last 4 months.",
    },
    Suggestion {
        id: "s3",
        kind: SuggestionKind::Alert,
        title: "Grocery spending trending higher",
        description: "You may exceed your grocery budget this month based on current spending.",
        impact: Impact::High,
        reason: "Your grocery spending is 15% higher than the same period last month.",
    },
    Suggestion {
        id: "s4",
        kind: SuggestionKind::Tip,
        title: "Set up automatic transfers to savings",
        description: "Automate your savings to build wealth consistently.",
        impact: Impact::LongTerm,
        reason: "Studies show automatic savers accumulate 2x more wealth over time than manual savers.",
    },
    Suggestion {
        id: "s5",
        kind: SuggestionKind::Achievement,
        title: "You've maintained your emergency fund!",
        description: "Your emergency fund has been fully funded for 3 consecutive months.",
        impact: Impact::Positive,
        reason: "Financial experts recommend keeping 3-6 months of expenses in an emergency fund.",
    },
];

pub fn all_suggestions() -> &'static [Suggestion] {
    &SUGGESTIONS
}

/// Suggestions not in `dismissed`, in their fixed order.
pub fn active_suggestions<S: AsRef<str>>(dismissed: &[S]) -> Vec<&'static Suggestion> {
    SUGGESTIONS
        .iter()
        .filter(|s| !dismissed.iter().any(|d| d.as_ref() == s.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_fixed_cards() {
        let all = all_suggestions();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].kind, SuggestionKind::Transfer);
        assert_eq!(all[4].impact.label(), "Positive");
    }

    #[test]
    fn test_dismissed_are_hidden() {
        let active = active_suggestions(&["s2", "s5", "nope"]);
        let ids: Vec<_> = active.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["s1", "s3", "s4"]);
        assert_eq!(active_suggestions::<&str>(&[]).len(), 5);
    }
}
