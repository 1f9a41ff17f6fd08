//! Greedy per-section token allocation.
//!
//! Given the total budget and the fixed overheads that compete with section
//! bodies, [`allocate`] decides how many tokens each body may keep. Headings
//! are always paid for up front so the document structure survives even when
//! every body is cut.
//!
//! The policy is a deterministic greedy walk, not an optimal packing:
//!
//! 1. Relevant sections go first, smaller before larger.
//! 2. A relevant section takes up to half of what remains, or everything that
//!    remains once the remainder drops to the share threshold.
//! 3. A non-relevant section takes a small, roughly equal share:
//!    `min(non_relevant_minimum, remaining / section_count)`.
//! 4. No section is granted more than its full cost.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::estimate::estimate_tokens;
use super::segment::Section;

/// Default tokens held back for estimator error and formatting.
pub const DEFAULT_RESERVE_MARGIN: usize = 500;

/// Default remainder at or below which a relevant section takes all of it.
pub const DEFAULT_RELEVANT_SHARE_THRESHOLD: usize = 100;

/// Default cap on a non-relevant section's allowance.
pub const DEFAULT_NON_RELEVANT_MINIMUM: usize = 200;

/// Tunable constants of the allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Tokens subtracted from the budget before any body is funded.
    pub reserve_margin: usize,
    /// Above this remainder, a relevant section takes at most half of it.
    pub relevant_share_threshold: usize,
    /// Upper bound on a non-relevant section's allowance.
    pub non_relevant_minimum: usize,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            reserve_margin: DEFAULT_RESERVE_MARGIN,
            relevant_share_threshold: DEFAULT_RELEVANT_SHARE_THRESHOLD,
            non_relevant_minimum: DEFAULT_NON_RELEVANT_MINIMUM,
        }
    }
}

/// Outcome of an allocation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetPlan {
    pub total_budget: usize,
    pub fixed_overhead: usize,
    /// Estimated cost of every heading, joined by newlines.
    pub heading_overhead: usize,
    /// What is left for bodies after all overheads, clamped at zero.
    pub available_for_bodies: usize,
    /// Allowance per section index.
    pub allowances: BTreeMap<usize, usize>,
}

impl BudgetPlan {
    /// Allowance for section `index` (zero if the index was never planned).
    pub fn allowance(&self, index: usize) -> usize {
        self.allowances.get(&index).copied().unwrap_or(0)
    }

    /// Sum of all allowances. Never exceeds `available_for_bodies`.
    pub fn total_allocated(&self) -> usize {
        self.allowances.values().sum()
    }

    /// Copy the planned allowances onto `sections`.
    pub fn apply(&self, sections: &mut [Section]) {
        for (index, section) in sections.iter_mut().enumerate() {
            section.allowance = self.allowance(index);
        }
    }
}

/// Plan per-section allowances.
///
/// `change_request_cost` and `fixed_overhead` are token estimates for the
/// change request and the surrounding instruction text.
pub fn allocate(
    sections: &[Section],
    total_budget: usize,
    change_request_cost: usize,
    fixed_overhead: usize,
    policy: &AllocationPolicy,
) -> BudgetPlan {
    let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
    let heading_overhead = estimate_tokens(&headings.join("\n"));

    let available_for_bodies = total_budget
        .saturating_sub(change_request_cost)
        .saturating_sub(fixed_overhead)
        .saturating_sub(heading_overhead)
        .saturating_sub(policy.reserve_margin);

    let mut order: Vec<usize> = (0..sections.len()).collect();
    order.sort_by_key(|&i| (!sections[i].relevant, sections[i].body.len()));

    let section_count = sections.len().max(1);
    let mut remaining = available_for_bodies;
    let mut allowances = BTreeMap::new();

    for index in order {
        let section = &sections[index];
        let share = if section.relevant {
            if remaining > policy.relevant_share_threshold {
                remaining / 2
            } else {
                remaining
            }
        } else {
            policy.non_relevant_minimum.min(remaining / section_count)
        };
        let allocated = section.original_tokens.min(share);
        remaining -= allocated;
        allowances.insert(index, allocated);
    }

    BudgetPlan {
        total_budget,
        fixed_overhead,
        heading_overhead,
        available_for_bodies,
        allowances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_reserve() -> AllocationPolicy {
        AllocationPolicy {
            reserve_margin: 0,
            ..Default::default()
        }
    }

    fn relevant(heading: &str, body: &str) -> Section {
        let mut s = Section::new(heading, body);
        s.relevant = true;
        s
    }

    #[test]
    fn default_policy_constants() {
        let policy = AllocationPolicy::default();
        assert_eq!(policy.reserve_margin, 500);
        assert_eq!(policy.relevant_share_threshold, 100);
        assert_eq!(policy.non_relevant_minimum, 200);
    }

    #[test]
    fn overheads_are_subtracted() {
        let sections = vec![Section::new("## A", "x".repeat(40))];
        let plan = allocate(&sections, 1000, 50, 100, &AllocationPolicy::default());
        assert_eq!(plan.heading_overhead, 1);
        assert_eq!(plan.available_for_bodies, 1000 - 50 - 100 - 1 - 500);
    }

    #[test]
    fn overheads_beyond_budget_clamp_to_zero() {
        let sections = vec![Section::new("## A", "x".repeat(4000))];
        let plan = allocate(&sections, 300, 200, 1000, &AllocationPolicy::default());
        assert_eq!(plan.available_for_bodies, 0);
        assert_eq!(plan.allowance(0), 0);
    }

    #[test]
    fn worked_example_relevant_takes_half() {
        // "## A\n## B" costs 3 tokens; 203 - 3 leaves 200 for bodies.
        let sections = vec![
            relevant("## A", &"a".repeat(600)),
            Section::new("## B", "b".repeat(50)),
        ];
        let plan = allocate(&sections, 203, 0, 0, &no_reserve());
        assert_eq!(plan.available_for_bodies, 200);
        assert_eq!(plan.allowance(0), 100);
        assert_eq!(plan.allowance(1), 13);
        assert!(plan.total_allocated() <= plan.available_for_bodies);
    }

    #[test]
    fn relevant_takes_remainder_below_threshold() {
        let sections = vec![relevant("## API", &"a".repeat(2000))];
        let plan = allocate(&sections, 80 + 2, 0, 0, &no_reserve());
        assert_eq!(plan.available_for_bodies, 80);
        assert_eq!(plan.allowance(0), 80);
    }

    #[test]
    fn allowance_never_exceeds_full_cost() {
        let sections = vec![relevant("## API", "short"), Section::new("## B", "tiny")];
        let plan = allocate(&sections, 10_000, 0, 0, &no_reserve());
        assert_eq!(plan.allowance(0), sections[0].original_tokens);
        assert_eq!(plan.allowance(1), sections[1].original_tokens);
    }

    #[test]
    fn non_relevant_share_is_capped_by_minimum() {
        let sections = vec![
            Section::new("## A", "a".repeat(4000)),
            Section::new("## B", "b".repeat(4000)),
        ];
        let plan = allocate(&sections, 5000, 0, 0, &no_reserve());
        assert_eq!(plan.allowance(0), 200);
        assert_eq!(plan.allowance(1), 200);
    }

    #[test]
    fn relevance_bias_under_scarcity() {
        let body = "z".repeat(2000);
        let sections = vec![Section::new("## Other", body.clone()), relevant("## API", &body)];
        let plan = allocate(&sections, 400, 0, 0, &no_reserve());
        assert!(plan.allowance(1) >= plan.allowance(0));
        assert!(plan.allowance(1) > 0);
    }

    #[test]
    fn smaller_sections_funded_first() {
        // Three non-relevant sections; the smallest must not starve.
        let sections = vec![
            Section::new("## Big", "b".repeat(8000)),
            Section::new("## Small", "s".repeat(40)),
            Section::new("## Mid", "m".repeat(800)),
        ];
        let plan = allocate(&sections, 60, 0, 0, &no_reserve());
        assert_eq!(plan.allowance(1), sections[1].original_tokens);
    }

    #[test]
    fn total_never_exceeds_available() {
        let sections: Vec<Section> = (0..12)
            .map(|i| {
                let mut s = Section::new(format!("## S{i}"), "q".repeat(300 * (i + 1)));
                s.relevant = i % 3 == 0;
                s
            })
            .collect();
        for budget in [0, 50, 333, 1200, 4000, 20_000] {
            let plan = allocate(&sections, budget, 10, 20, &AllocationPolicy::default());
            assert!(plan.total_allocated() <= plan.available_for_bodies);
        }
    }

    #[test]
    fn apply_copies_allowances() {
        let mut sections = vec![
            relevant("## A", &"a".repeat(600)),
            Section::new("## B", "b".repeat(50)),
        ];
        let plan = allocate(&sections, 203, 0, 0, &no_reserve());
        plan.apply(&mut sections);
        assert_eq!(sections[0].allowance, 100);
        assert_eq!(sections[1].allowance, 13);
    }
}
