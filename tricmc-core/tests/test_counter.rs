#[cfg(test)]
mod counter_test {
    use tricmc_core::Counter;

    #[test]
    fn rate_is_zero_before_any_attempts() {
        let c = Counter::new();
        assert_eq!(c.acceptance_rate(), 0.0);
        assert_eq!(c.rate_since_eval(), 0.0);
    }

    #[test]
    fn reset_since_eval_keeps_lifetime_totals() {
        let mut c = Counter::new();
        for accepted in [true, true, false, true] {
            c.record(accepted);
        }
        c.reset_since_eval();
        assert_eq!(c.moves, 4);
        assert_eq!(c.accepted_moves, 3);
        assert_eq!(c.moves_since_eval, 0);
        assert_eq!(c.rate_since_eval(), 0.0);
    }

    #[test]
    fn merge_sums_both_fields() {
        let mut a = Counter::new();
        a.record(true);
        a.record(false);
        let mut b = Counter::new();
        b.record(true);
        a.merge(&b);
        assert_eq!(a.moves, 3);
        assert_eq!(a.accepted_moves, 2);
    }
}
