macro_rules! var {
    ($n:expr) => {
        $crate::term::Term::Var($n)
    };
}
macro_rules! lambda {
    ($body:expr) => {
        $crate::term::Term::Abs(Box::new($body))
    };
}
macro_rules! apply {
    ($lhs:expr, $rhs:expr) => {
        $crate::term::Term::Apply(Box::new($lhs), Box::new($rhs))
    };
}
