//! Clausal encodings of small Boolean constraints.
//!
//! In the reified encodings `target` is the Boolean variable whose truth value equals the truth
//! value of the constraint. Every encoding only calls [`SatSolver::add_clause`], so it must be
//! used at the root and the usual simplifications apply.
use super::BooleanVariable;
use super::SatSolver;
use crate::basic_types::ClauseOperationError;

type EncodingResult = Result<(), ClauseOperationError>;

impl SatSolver {
    /// `positive[0] \/ ... \/ ~negative[0] \/ ...`
    pub fn add_clause_pos_neg(
        &mut self,
        positive: &[BooleanVariable],
        negative: &[BooleanVariable],
    ) -> EncodingResult {
        let clause = positive
            .iter()
            .map(|variable| variable.positive())
            .chain(negative.iter().map(|variable| variable.negative()))
            .collect::<Vec<_>>();
        self.add_clause(&clause)
    }

    pub fn add_true(&mut self, variable: BooleanVariable) -> EncodingResult {
        self.add_unit(variable.positive())
    }

    pub fn add_false(&mut self, variable: BooleanVariable) -> EncodingResult {
        self.add_unit(variable.negative())
    }

    /// `left = right`
    pub fn add_bool_eq(&mut self, left: BooleanVariable, right: BooleanVariable) -> EncodingResult {
        self.add_binary(left.negative(), right.positive())?;
        self.add_binary(left.positive(), right.negative())
    }

    /// `left != right`
    pub fn add_bool_not(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
    ) -> EncodingResult {
        self.add_binary(left.negative(), right.negative())?;
        self.add_binary(left.positive(), right.positive())
    }

    /// `left <= right`
    pub fn add_bool_le(&mut self, left: BooleanVariable, right: BooleanVariable) -> EncodingResult {
        self.add_binary(left.negative(), right.positive())
    }

    /// `left < right`, which fixes `left` to false and `right` to true.
    pub fn add_bool_lt(&mut self, left: BooleanVariable, right: BooleanVariable) -> EncodingResult {
        self.add_unit(right.positive())?;
        self.add_binary(left.negative(), right.negative())
    }

    /// `target <=> (left = right)`
    pub fn add_bool_is_eq_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_ternary(left.negative(), right.positive(), target.negative())?;
        self.add_ternary(left.positive(), right.negative(), target.negative())?;
        self.add_ternary(left.positive(), right.positive(), target.positive())?;
        self.add_ternary(left.negative(), right.negative(), target.positive())
    }

    /// `target <=> (left != right)`
    pub fn add_bool_is_neq_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_ternary(left.negative(), right.positive(), target.positive())?;
        self.add_ternary(left.positive(), right.negative(), target.positive())?;
        self.add_ternary(left.positive(), right.positive(), target.negative())?;
        self.add_ternary(left.negative(), right.negative(), target.negative())
    }

    /// `target <=> (left <= right)`
    pub fn add_bool_is_le_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_ternary(left.negative(), right.positive(), target.negative())?;
        self.add_binary(left.positive(), target.positive())?;
        self.add_binary(right.negative(), target.positive())
    }

    /// `target <=> (left < right)`
    pub fn add_bool_is_lt_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_ternary(left.positive(), right.positive(), target.negative())?;
        self.add_ternary(left.negative(), right.positive(), target.negative())?;
        self.add_ternary(left.positive(), right.negative(), target.positive())?;
        self.add_ternary(left.negative(), right.negative(), target.negative())
    }

    /// `target <=> (left \/ right)`
    pub fn add_bool_or_eq_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_ternary(left.positive(), right.positive(), target.negative())?;
        self.add_binary(left.negative(), target.positive())?;
        self.add_binary(right.negative(), target.positive())
    }

    /// `target <=> (left /\ right)`
    pub fn add_bool_and_eq_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_ternary(left.negative(), right.negative(), target.positive())?;
        self.add_binary(left.positive(), target.negative())?;
        self.add_binary(right.positive(), target.negative())
    }

    /// `target <=> (left xor right)`
    pub fn add_bool_xor_eq_var(
        &mut self,
        left: BooleanVariable,
        right: BooleanVariable,
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_bool_is_neq_var(left, right, target)
    }

    /// `target <=> (variables[0] \/ variables[1] \/ ...)`
    pub fn add_bool_or_array_eq_var(
        &mut self,
        variables: &[BooleanVariable],
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_clause_pos_neg(variables, &[target])?;
        for &variable in variables {
            self.add_binary(target.positive(), variable.negative())?;
        }
        Ok(())
    }

    /// `target <=> (variables[0] /\ variables[1] /\ ...)`
    pub fn add_bool_and_array_eq_var(
        &mut self,
        variables: &[BooleanVariable],
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_clause_pos_neg(&[target], variables)?;
        for &variable in variables {
            self.add_binary(target.negative(), variable.positive())?;
        }
        Ok(())
    }

    /// At least one of `variables` is true.
    pub fn add_bool_or_array_equal_true(
        &mut self,
        variables: &[BooleanVariable],
    ) -> EncodingResult {
        self.add_clause_pos_neg(variables, &[])
    }

    /// At least one of `variables` is false.
    pub fn add_bool_and_array_equal_false(
        &mut self,
        variables: &[BooleanVariable],
    ) -> EncodingResult {
        self.add_clause_pos_neg(&[], variables)
    }

    /// At most one of `variables` is true, with the pairwise encoding.
    pub fn add_at_most_one(&mut self, variables: &[BooleanVariable]) -> EncodingResult {
        for (index, &first) in variables.iter().enumerate() {
            for &second in &variables[index + 1..] {
                self.add_binary(first.negative(), second.negative())?;
            }
        }
        Ok(())
    }

    /// At most `variables.len() - 1` of `variables` are true.
    pub fn add_at_most_n_minus_one(&mut self, variables: &[BooleanVariable]) -> EncodingResult {
        self.add_bool_and_array_equal_false(variables)
    }

    /// `sum(variables) >= target`
    pub fn add_sum_bool_array_greater_eq_var(
        &mut self,
        variables: &[BooleanVariable],
        target: BooleanVariable,
    ) -> EncodingResult {
        self.add_clause_pos_neg(variables, &[target])
    }

    /// `max(variables) <= target`
    pub fn add_max_bool_array_less_eq_var(
        &mut self,
        variables: &[BooleanVariable],
        target: BooleanVariable,
    ) -> EncodingResult {
        for &variable in variables {
            self.add_binary(variable.negative(), target.positive())?;
        }
        Ok(())
    }

    /// `sum(variables) <= target` over Booleans, which only requires `target` to hold when any of
    /// `variables` does. A fresh variable stands for the disjunction of `variables`.
    pub fn add_sum_bool_array_less_eq_var(
        &mut self,
        variables: &[BooleanVariable],
        target: BooleanVariable,
    ) -> EncodingResult {
        if let [only] = variables {
            return self.add_bool_le(*only, target);
        }

        let disjunction = self.new_variable();
        self.add_clause_pos_neg(variables, &[disjunction])?;
        for &variable in variables {
            self.add_binary(disjunction.positive(), variable.negative())?;
        }
        self.add_binary(disjunction.negative(), target.positive())
    }
}
