use std::fmt::Write;

use truss2d::{Analysis, Convergence};

/// Render displacement, stress and reaction tables for an analysis.
#[must_use]
pub fn render_report(analysis: &Analysis) -> String {
    let mut output = String::new();

    match analysis.solver().status {
        Convergence::Converged => writeln!(
            &mut output,
            "Solver converged after {} sweeps (last change {:.3e})",
            analysis.solver().sweeps,
            analysis.solver().max_change
        ),
        Convergence::Exhausted => writeln!(
            &mut output,
            "WARNING: solver stopped after {} sweeps without converging (last change {:.3e})",
            analysis.solver().sweeps,
            analysis.solver().max_change
        ),
    }
    .expect("writing to string cannot fail");

    output.push_str("\nFinal Displacements\n");
    for (dof, value) in analysis.displacements().iter().enumerate() {
        let axis = if dof % 2 == 0 { 'u' } else { 'v' };
        writeln!(&mut output, "{axis}{:<4} : {value:+.6e} m", dof / 2)
            .expect("writing to string cannot fail");
    }

    output.push_str("\nStresses\n");
    for (index, stress) in analysis.stresses().iter().enumerate() {
        writeln!(&mut output, "Element {index:<4} : {stress:+.6e} Pa")
            .expect("writing to string cannot fail");
    }

    output.push_str("\nReaction Forces\n");
    for (dof, value) in analysis.reactions().iter().enumerate() {
        let axis = if dof % 2 == 0 { 'x' } else { 'y' };
        writeln!(&mut output, "F{}{axis:<3} : {value:+.6e} N", dof / 2)
            .expect("writing to string cannot fail");
    }

    output
}
