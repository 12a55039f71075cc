use crate::engines::generation::genome::Genome;

/// Field-wise recombination: powers from the first parent, constants from the second.
pub fn recombine(power_parent: &Genome, constant_parent: &Genome) -> Genome {
    Genome {
        constants: constant_parent.constants,
        powers: power_parent.powers,
    }
}

/// Strictly-greater scan: the first genome holding the maximum wins.
///
/// Returns `(index, value)`; `(0, 0.0)` for an empty table.
pub fn locate_best(fitness: &[f64]) -> (usize, f64) {
    let mut best_index = 0;
    let mut best_value = fitness.first().copied().unwrap_or(0.0);

    for (i, &value) in fitness.iter().enumerate().skip(1) {
        if value > best_value {
            best_index = i;
            best_value = value;
        }
    }

    (best_index, best_value)
}
