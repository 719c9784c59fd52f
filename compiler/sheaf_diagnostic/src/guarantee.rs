use std::fmt;

/// Proof that at least one error diagnostic was recorded.
///
/// Cannot be constructed outside this crate except through
/// [`DiagnosticBag`](crate::DiagnosticBag), which hands one out for every
/// error it accepts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    #[inline]
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

#[cfg(test)]
mod tests;
