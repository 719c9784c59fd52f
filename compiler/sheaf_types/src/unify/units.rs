//! Unit unification by integer elimination.

use tracing::trace;

use super::Unifier;
use crate::{UnitExponents, UnitMismatch, UnitTerm, UnitVarId};

impl Unifier {
    /// Solve `expected = found` for the unit variables in both.
    ///
    /// The equation is rewritten as `expected * found^-1 = 1`. The variable
    /// with the smallest exponent `x` is eliminated: when `x` divides every
    /// other exponent it is bound outright. If it does not and no other
    /// variable remains the units cannot match. Otherwise it is bound to a
    /// fresh variable times the integer part of the solution and the
    /// remainder is solved again.
    pub(super) fn unify_units_inner(
        &mut self,
        expected: &UnitTerm,
        found: &UnitTerm,
    ) -> Result<(), UnitMismatch> {
        let mut eq = self.resolve_unit(expected);
        eq.multiply(&self.resolve_unit(found), -1);

        loop {
            let Some((var, power)) = eq.vars().min_by_key(|(_, e)| e.abs()) else {
                if eq.is_scalar() {
                    return Ok(());
                }
                return Err(UnitMismatch {
                    expected: self.resolve_unit(expected),
                    found: self.resolve_unit(found),
                });
            };
            eq.remove_var(var);

            let divides = eq.names().all(|(_, e)| e % power == 0)
                && eq.vars().all(|(_, e)| e % power == 0);

            let mut binding = UnitExponents::scalar();
            for (name, e) in eq.names() {
                binding.add_name(name, -(e / power));
            }
            for (v, e) in eq.vars() {
                binding.add_var(v, -(e / power));
            }

            if divides {
                self.bind_unit(var, binding);
                return Ok(());
            }
            if eq.is_concrete() {
                // Nothing left to absorb the remainder, e.g. `?u^2 = m`.
                return Err(UnitMismatch {
                    expected: self.resolve_unit(expected),
                    found: self.resolve_unit(found),
                });
            }

            let fresh = self.fresh_unit_var();
            binding.add_var(fresh, 1);
            // var^power * rest becomes fresh^power * (rest mod power).
            eq.multiply(&binding, power);
            self.bind_unit(var, binding);
        }
    }

    fn bind_unit(&mut self, var: UnitVarId, binding: UnitExponents) {
        trace!(var = var.raw(), unit = %binding, "bind unit variable");
        self.units.insert(var, binding);
    }
}
