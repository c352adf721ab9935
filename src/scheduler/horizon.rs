//! Multi-month horizon composer.
//!
//! # Algorithm
//!
//! 1. Split the horizon into [`MonthBlock`]s of `block_length_days`.
//! 2. Per block: build the model, solve for a baseline, re-solve for
//!    maximum agreement with it, extract a block-local roster.
//! 3. Merge block rosters, offsetting each by `block.index × block.length`.
//!
//! Blocks are independent unless `carry_over_boundary` is set, in which case
//! the tail of block `i` constrains the start of block `i + 1` and blocks
//! must be solved in order.

use tracing::{debug, info, instrument};

use crate::config::SchedulerConfig;
use crate::error::{Result, RosterError};
use crate::models::{Employee, MonthBlock, Roster, ShiftType};
use crate::problem::{BoundaryHistory, RosterProblemBuilder};

use super::extract::extract_roster;
use super::feasibility::FeasibilitySolver;
use super::stability::StabilityOptimizer;

/// Input container for roster generation.
#[derive(Debug, Clone)]
pub struct RosterRequest {
    /// Employees to schedule.
    pub employees: Vec<Employee>,
    /// Shift types to cover every day.
    pub shift_types: Vec<ShiftType>,
    /// Number of month blocks (≥ 1).
    pub horizon_months: usize,
}

impl RosterRequest {
    /// Creates a request.
    pub fn new(employees: Vec<Employee>, shift_types: Vec<ShiftType>, horizon_months: usize) -> Self {
        Self {
            employees,
            shift_types,
            horizon_months,
        }
    }
}

/// Solved roster of one block, with block-local days.
#[derive(Debug, Clone)]
pub struct BlockResult {
    /// The block this result covers.
    pub block: MonthBlock,
    /// Roster with days `0..block.length`.
    pub roster: Roster,
    /// Decision variables in the block model.
    pub variables: usize,
    /// Linear constraints in the block model.
    pub constraints: usize,
    /// Variables agreeing with the feasibility baseline.
    pub agreement: usize,
}

impl BlockResult {
    /// Summary without the roster.
    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            block: self.block,
            variables: self.variables,
            constraints: self.constraints,
            agreement: self.agreement,
        }
    }
}

/// Per-block solve statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSummary {
    pub block: MonthBlock,
    pub variables: usize,
    pub constraints: usize,
    pub agreement: usize,
}

/// Result of a full horizon run.
#[derive(Debug, Clone)]
pub struct RosterPlan {
    /// Merged roster with horizon day offsets.
    pub roster: Roster,
    /// One summary per block, in block order.
    pub blocks: Vec<BlockSummary>,
}

/// Two-phase roster scheduler over a multi-month horizon.
///
/// # Example
///
/// ```no_run
/// use u_roster::config::SchedulerConfig;
/// use u_roster::models::{Employee, ShiftTime, ShiftType};
/// use u_roster::scheduler::{RosterRequest, RosterScheduler};
///
/// let employees: Vec<_> = (1..=7).map(|i| Employee::anonymous(format!("E{i}"))).collect();
/// let shifts = vec![
///     ShiftType::new("early", ShiftTime::hm(6, 0), ShiftTime::hm(14, 0)),
///     ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0)),
///     ShiftType::new("evening", ShiftTime::hm(14, 0), ShiftTime::hm(22, 0)),
///     ShiftType::new("night", ShiftTime::hm(22, 0), ShiftTime::hm(6, 0)),
/// ];
///
/// let scheduler = RosterScheduler::new(SchedulerConfig::default());
/// let plan = scheduler.generate(&RosterRequest::new(employees, shifts, 1)).unwrap();
/// assert_eq!(plan.roster.employee_count(), 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterScheduler {
    config: SchedulerConfig,
}

impl RosterScheduler {
    /// Creates a scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs build → feasibility → stability → extraction for one block.
    ///
    /// `history` carries the previous block's tail; pass `None` for an
    /// independent block.
    #[instrument(skip_all, fields(block = block.index))]
    pub fn solve_block(
        &self,
        employees: &[Employee],
        shift_types: &[ShiftType],
        block: MonthBlock,
        history: Option<&BoundaryHistory>,
    ) -> Result<BlockResult> {
        let mut builder = RosterProblemBuilder::new(employees, shift_types, block.length)
            .with_policy(self.config.policy.clone());
        if let Some(history) = history {
            builder = builder.with_history(history);
        }
        let model = builder.build()?;

        let limits = self.config.solver.limits();
        let baseline = FeasibilitySolver::with_kind(self.config.solver.feasibility_backend)
            .with_limits(limits)
            .solve(&model)
            .map_err(|e| e.in_block(block.index))?;
        let outcome = StabilityOptimizer::with_kind(self.config.solver.stability_backend)
            .with_limits(limits)
            .optimize(&model, &baseline)
            .map_err(|e| e.in_block(block.index))?;

        let roster = extract_roster(&model, &outcome.assignment, employees, shift_types);
        info!(
            variables = model.var_count(),
            constraints = model.constraint_count(),
            agreement = outcome.agreement,
            assignments = roster.assignment_count(),
            "block solved"
        );

        Ok(BlockResult {
            block,
            roster,
            variables: model.var_count(),
            constraints: model.constraint_count(),
            agreement: outcome.agreement,
        })
    }

    /// Generates a roster for the whole horizon.
    ///
    /// # Errors
    /// - `InvalidInput` for an empty employee or shift-type list, a
    ///   zero-month horizon, or one whose day offsets overflow `u32`
    /// - `Infeasible` / `NoOptimal` from the first block that fails; no
    ///   partial roster is returned
    pub fn generate(&self, request: &RosterRequest) -> Result<RosterPlan> {
        if request.horizon_months == 0 {
            return Err(RosterError::InvalidInput(
                "horizon must cover at least one month".into(),
            ));
        }
        self.config.validate()?;

        let policy = &self.config.policy;
        let blocks = MonthBlock::split(request.horizon_months, policy.block_length_days)?;
        info!(
            employees = request.employees.len(),
            shift_types = request.shift_types.len(),
            blocks = blocks.len(),
            carry_over = policy.carry_over_boundary,
            "generating roster"
        );

        let mut results: Vec<BlockResult> = Vec::with_capacity(blocks.len());
        for block in blocks {
            let history = match results.last() {
                Some(prev) if policy.carry_over_boundary => Some(BoundaryHistory::from_roster(
                    &prev.roster,
                    &request.employees,
                    &request.shift_types,
                    prev.block.length,
                    policy.consecutive_window() - 1,
                )),
                _ => None,
            };
            let result = self.solve_block(
                &request.employees,
                &request.shift_types,
                block,
                history.as_ref(),
            )?;
            results.push(result);
        }

        let roster = merge_blocks(&results)?;
        debug!(assignments = roster.assignment_count(), "horizon merged");
        Ok(RosterPlan {
            roster,
            blocks: results.iter().map(BlockResult::summary).collect(),
        })
    }
}

/// Merges block-local rosters into one horizon roster.
///
/// Results are ordered by block index before merging, so the output does
/// not depend on the order they were solved in.
///
/// # Errors
/// `InvalidInput` if a block's day offsets do not fit in `u32`.
pub fn merge_blocks(results: &[BlockResult]) -> Result<Roster> {
    let mut ordered: Vec<&BlockResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.block.index);

    let mut roster = Roster::new();
    for result in ordered {
        let offset = result.block.offset().ok_or_else(|| {
            RosterError::InvalidInput(format!(
                "month block {} lies beyond the day offset range",
                result.block.index + 1
            ))
        })?;
        roster.merge(result.roster.offset_days(offset));
    }
    Ok(roster)
}

/// Generates a roster with the default configuration.
///
/// # Errors
/// See [`RosterScheduler::generate`].
pub fn generate_roster(
    employees: &[Employee],
    shift_types: &[ShiftType],
    horizon_months: usize,
) -> Result<Roster> {
    let request = RosterRequest::new(employees.to_vec(), shift_types.to_vec(), horizon_months);
    RosterScheduler::default()
        .generate(&request)
        .map(|plan| plan.roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterPolicy;
    use crate::models::ShiftTime;
    use crate::validation::audit_roster;

    fn staff(n: usize) -> Vec<Employee> {
        (1..=n).map(|i| Employee::anonymous(format!("E{i}"))).collect()
    }

    fn four_shifts() -> Vec<ShiftType> {
        vec![
            ShiftType::new("early", ShiftTime::hm(6, 0), ShiftTime::hm(14, 0)),
            ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0)),
            ShiftType::new("evening", ShiftTime::hm(14, 0), ShiftTime::hm(22, 0)),
            ShiftType::new("night", ShiftTime::hm(22, 0), ShiftTime::hm(6, 0)),
        ]
    }

    fn block_result(index: usize, length: usize, entries: &[(&str, u32, &str)]) -> BlockResult {
        let mut roster = Roster::new();
        for &(emp, day, shift) in entries {
            roster.assign(emp, day, shift);
        }
        BlockResult {
            block: MonthBlock::new(index, length),
            roster,
            variables: 0,
            constraints: 0,
            agreement: 0,
        }
    }

    #[test]
    fn test_single_employee_is_infeasible() {
        let shifts = vec![ShiftType::new("day", ShiftTime::hm(8, 0), ShiftTime::hm(16, 0))];
        let err = generate_roster(&staff(1), &shifts, 1).unwrap_err();
        assert!(err.is_infeasible(), "{err}");
        assert!(err.to_string().contains("month block 1"));
    }

    #[test]
    fn test_seven_employees_four_shifts() {
        let employees = staff(7);
        let shifts = four_shifts();
        let roster = generate_roster(&employees, &shifts, 1).unwrap();

        assert_eq!(roster.employee_count(), 7);
        for emp in &employees {
            assert_eq!(roster.working_days(&emp.id), 20, "{}", emp.id);
        }
        let violations = audit_roster(&roster, &employees, &shifts, &RosterPolicy::default(), 28);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_two_month_horizon() {
        let employees = staff(7);
        let shifts = four_shifts();
        let scheduler = RosterScheduler::default();
        let plan = scheduler
            .generate(&RosterRequest::new(employees.clone(), shifts.clone(), 2))
            .unwrap();

        assert_eq!(plan.blocks.len(), 2);
        assert_eq!(plan.blocks[1].block.offset(), Some(28));
        assert_eq!(plan.blocks[0].variables, 7 * 28 * 4);
        assert_eq!(plan.blocks[0].agreement, plan.blocks[0].variables);

        let (first, last) = plan.roster.day_span().unwrap();
        assert!(first < 28 && last >= 28 && last <= 55);
        for emp in &employees {
            assert_eq!(plan.roster.working_days_between(&emp.id, 0, 28), 20);
            assert_eq!(plan.roster.working_days_between(&emp.id, 28, 56), 20);
            assert_eq!(plan.roster.working_days_between(&emp.id, 56, u32::MAX), 0);
        }
        // Every day of both blocks is covered
        for day in 0..56 {
            assert!(plan.roster.assignments_on(day).len() >= shifts.len(), "day {day}");
        }
    }

    #[test]
    fn test_zero_months_is_invalid() {
        let err = generate_roster(&staff(7), &four_shifts(), 0).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_inputs_are_invalid() {
        let err = generate_roster(&[], &four_shifts(), 1).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
        let err = generate_roster(&staff(3), &[], 1).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
    }

    #[test]
    fn test_merge_offsets_by_block_length() {
        let results = vec![
            block_result(1, 28, &[("E1", 0, "day"), ("E1", 27, "night")]),
            block_result(0, 28, &[("E1", 0, "day"), ("E2", 5, "early")]),
        ];
        let merged = merge_blocks(&results).unwrap();
        assert_eq!(merged.shift_on("E1", 0), Some("day"));
        assert_eq!(merged.shift_on("E1", 28), Some("day"));
        assert_eq!(merged.shift_on("E1", 55), Some("night"));
        assert_eq!(merged.shift_on("E2", 5), Some("early"));
        assert_eq!(merged.assignment_count(), 4);
    }

    #[test]
    fn test_merge_rejects_out_of_range_block() {
        let results = vec![block_result(u32::MAX as usize, 28, &[("E1", 0, "day")])];
        let err = merge_blocks(&results).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
    }

    #[test]
    fn test_oversized_horizon_is_invalid() {
        let err = generate_roster(&staff(7), &four_shifts(), usize::MAX).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = block_result(0, 28, &[("E1", 3, "day")]);
        let b = block_result(1, 28, &[("E1", 3, "night")]);
        let forward = merge_blocks(&[a.clone(), b.clone()]).unwrap();
        let backward = merge_blocks(&[b, a]).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_block_roster_matches_merged_slice() {
        let employees = staff(7);
        let shifts = four_shifts();
        let scheduler = RosterScheduler::default();
        let block = scheduler
            .solve_block(&employees, &shifts, MonthBlock::new(1, 28), None)
            .unwrap();
        let merged = merge_blocks(std::slice::from_ref(&block)).unwrap();

        for (emp, day, shift) in block.roster.iter() {
            assert_eq!(merged.shift_on(emp, day + 28), Some(shift));
        }
        assert_eq!(merged.assignment_count(), block.roster.assignment_count());
    }

    #[test]
    fn test_carry_over_boundary() {
        let employees = staff(7);
        let shifts = four_shifts();
        let policy = RosterPolicy {
            carry_over_boundary: true,
            ..RosterPolicy::default()
        };
        let scheduler = RosterScheduler::new(SchedulerConfig::default().with_policy(policy));
        let plan = scheduler
            .generate(&RosterRequest::new(employees.clone(), shifts.clone(), 2))
            .unwrap();
        let roster = &plan.roster;

        for emp in &employees {
            // 4-day windows straddling the 27/28 boundary
            for start in 25..=27 {
                assert!(
                    roster.working_days_between(&emp.id, start, start + 4) <= 3,
                    "{} from day {start}",
                    emp.id
                );
            }
            // Restricted shifts on day 27 continue only as themselves
            if let Some(last) = roster.shift_on(&emp.id, 27) {
                if last == "night" || last == "evening" {
                    let next = roster.shift_on(&emp.id, 28);
                    assert!(next.is_none() || next == Some(last), "{}", emp.id);
                }
            }
        }
    }
}
