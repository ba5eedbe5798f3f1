#[cfg(test)]
mod shape_test {
    use tricmc_core::orthogonality_deviation;
    use tricmc_geometry::Matrix3x3;

    #[test]
    fn identity_has_zero_deviation() {
        assert_eq!(orthogonality_deviation(&Matrix3x3::identity()), 0.0);
    }
}
