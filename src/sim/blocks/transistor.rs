/// Output of a transistor activated by its inputs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TransistorOutput {
    Emitter,
    NotOut,
}

/// Returns the output a transistor activates, [None] if its collector is low.
///
/// The caller clears both outputs before driving the returned one.
pub fn evaluate(collector: bool, base: bool) -> Option<TransistorOutput> {
    match (collector, base) {
        (true, true) => Some(TransistorOutput::Emitter),
        (true, false) => Some(TransistorOutput::NotOut),
        (false, _) => None,
    }
}
