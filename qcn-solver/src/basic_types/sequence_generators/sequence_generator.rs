pub(crate) trait SequenceGenerator: std::fmt::Debug {
    fn next(&mut self) -> i64;
}
