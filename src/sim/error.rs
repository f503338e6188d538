use thiserror::Error;

/// Ways a simulation can fail to settle. The netlist is left in the state reached so far.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error("propagation didn't converge after {iterations} iterations")]
    NonConvergent { iterations: usize },
    #[error("circuit didn't settle after {resimulations} resimulations")]
    SettleLimit { resimulations: usize },
}
