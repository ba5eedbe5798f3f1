#[cfg(test)]
mod vec3_test {
    use tricmc_geometry::Vec3;

    #[test]
    fn cross_product_is_orthogonal() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(&b);
        assert!((c.dot(&a)).abs() < 1e-15);
        assert!((c.dot(&b)).abs() < 1e-15);
        assert_eq!(c, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec3::new(3.0, 4.0, 0.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-15);
    }
}
