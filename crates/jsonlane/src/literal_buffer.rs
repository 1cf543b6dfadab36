/// One of the three fixed JSON literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    True,
    False,
}

impl Literal {
    /// Picks the literal a leading byte announces.
    pub(crate) fn from_first(b: u8) -> Option<Self> {
        match b {
            b'n' => Some(Literal::Null),
            b't' => Some(Literal::True),
            b'f' => Some(Literal::False),
            _ => None,
        }
    }

    /// Bytes still expected after the first one.
    pub(crate) fn tail(self) -> &'static [u8] {
        match self {
            Literal::Null => b"ull",
            Literal::True => b"rue",
            Literal::False => b"alse",
        }
    }

    pub(crate) fn kind(self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::True | Literal::False => "boolean",
        }
    }
}

/// What happened after feeding one more byte into the literal matcher?
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched and was the last one of the literal.
    Done(Literal),
    /// Byte did **not** match the expected one.
    Reject,
}

/// Matches the remainder of a literal one byte at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteralBuffer {
    rest: &'static [u8],
    literal: Literal,
}

impl ExpectedLiteralBuffer {
    /// Start matching after the first byte (`n`, `t`, or `f`) was consumed.
    pub(crate) fn new(literal: Literal) -> Self {
        Self {
            rest: literal.tail(),
            literal,
        }
    }

    pub(crate) fn step(&mut self, b: u8) -> Step {
        match self.rest.split_first() {
            Some((&expected, rest)) if expected == b => {
                self.rest = rest;
                if rest.is_empty() {
                    Step::Done(self.literal)
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(first: u8, rest: &[u8]) -> Option<Literal> {
        let mut m = ExpectedLiteralBuffer::new(Literal::from_first(first)?);
        for &b in rest {
            match m.step(b) {
                Step::NeedMore => {}
                Step::Done(lit) => return Some(lit),
                Step::Reject => return None,
            }
        }
        None
    }

    #[test]
    fn matches_each_literal() {
        assert_eq!(run(b'n', b"ull"), Some(Literal::Null));
        assert_eq!(run(b't', b"rue"), Some(Literal::True));
        assert_eq!(run(b'f', b"alse"), Some(Literal::False));
    }

    #[test]
    fn rejects_misspellings() {
        assert_eq!(run(b'n', b"xll"), None);
        assert_eq!(run(b'f', b"aulse"), None);
        assert_eq!(run(b't', b"ru"), None);
        assert!(Literal::from_first(b'x').is_none());
    }
}
