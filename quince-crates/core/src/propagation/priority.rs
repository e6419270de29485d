/// The priority of a propagator: the index of the queue it is scheduled in.
///
/// Lower values are propagated first. The engine always pops from the lowest non-empty queue,
/// so cheap propagators get the chance to detect a contradiction before expensive ones run.
/// Within one priority propagators run in the order they were scheduled.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    pub const UNARY: Priority = Priority(0);
    pub const BINARY: Priority = Priority(1);
    pub const TERNARY: Priority = Priority(2);
    pub const LINEAR: Priority = Priority(3);
    pub const QUADRATIC: Priority = Priority(4);
    pub const CUBIC: Priority = Priority(5);
    pub const VERY_SLOW: Priority = Priority(6);

    pub const fn new(value: u8) -> Priority {
        Priority(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::VERY_SLOW
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
