//! The inferred hybrid automaton.
//!
//! Purpose
//! -------
//! Package the result of one inference run: modes with their flows and
//! invariants, transitions with their guards and assignments, the initial
//! mode and the variable ordering every polynomial refers to.
//!
//! Conventions
//! -----------
//! - Every polynomial is over `variables()`, i.e. inputs followed by
//!   outputs.
//! - Flows and assignments are listed per output variable, in output order.
//! - A guard `g` enables its transition where `g(x) ≤ 0`.

use std::fmt;

use crate::{inference::invariant::Invariant, polynomial::Polynomial};

/// One continuous regime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mode {
    pub id: usize,
    pub invariant: Invariant,
    /// `(output, d output / dt)` pairs.
    pub flow: Vec<(String, Polynomial)>,
}

/// One discrete jump between modes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub id: usize,
    pub src: usize,
    pub dst: usize,
    pub guard: Polynomial,
    /// `(output, value after the jump)` pairs; degree 1.
    pub assignments: Vec<(String, Polynomial)>,
}

/// A polynomial hybrid automaton.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Automaton {
    pub initial_mode: usize,
    pub modes: Vec<Mode>,
    pub transitions: Vec<Transition>,
    pub input_variables: Vec<String>,
    pub output_variables: Vec<String>,
}

impl Automaton {
    /// Transitions leaving `mode`, in id order.
    pub fn outgoing_transitions(&self, mode: usize) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(move |t| t.src == mode)
    }

    /// Inputs followed by outputs.
    pub fn variables(&self) -> Vec<String> {
        self.input_variables.iter().chain(&self.output_variables).cloned().collect()
    }

    pub fn mode(&self, id: usize) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inputs: {}", self.input_variables.join(", "))?;
        writeln!(f, "outputs: {}", self.output_variables.join(", "))?;
        writeln!(f, "initial mode: {}", self.initial_mode)?;
        for mode in &self.modes {
            writeln!(f, "mode {}", mode.id)?;
            if mode.invariant.is_unconstrained() {
                writeln!(f, "  invariant: true")?;
            }
            for (name, range) in mode.invariant.ranges() {
                writeln!(f, "  invariant: {} in {}", name, range)?;
            }
            for (name, rhs) in &mode.flow {
                writeln!(f, "  {}' = {}", name, rhs)?;
            }
        }
        for t in &self.transitions {
            writeln!(f, "transition {}: {} -> {}", t.id, t.src, t.dst)?;
            writeln!(f, "  guard: {} <= 0", t.guard)?;
            for (name, rhs) in &t.assignments {
                writeln!(f, "  {} := {}", name, rhs)?;
            }
        }
        Ok(())
    }
}
