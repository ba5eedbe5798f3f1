#[cfg(test)]
mod active_domain_test {
    use tricmc_core::ActiveRegion;
    use tricmc_domain::{ActiveDomain, RegionBounds};
    use tricmc_geometry::{Box as TriBox, Vec3};

    fn unit_box() -> TriBox {
        TriBox::orthorhombic(1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn normal_order_bounds_accept_only_strict_interior() {
        let bounds = [
            RegionBounds { beg: 1.0, end: 2.0 },
            RegionBounds { beg: 3.0, end: 4.0 },
            RegionBounds { beg: 5.0, end: 6.0 },
        ];
        let domain = ActiveDomain::new(unit_box(), bounds);

        assert!(domain.contains(Vec3::new(1.5, 3.5, 5.5)));
        assert!(!domain.contains(Vec3::new(0.5, 3.5, 5.5)));
        assert!(!domain.contains(Vec3::new(1.5, 2.5, 5.5)));
        assert!(!domain.contains(Vec3::new(1.5, 3.5, 6.5)));
    }

    #[test]
    fn reversed_bound_wraps_around() {
        let bounds = [
            RegionBounds { beg: 2.0, end: 1.0 },
            RegionBounds { beg: 3.0, end: 4.0 },
            RegionBounds { beg: 5.0, end: 6.0 },
        ];
        let domain = ActiveDomain::new(unit_box(), bounds);

        assert!(domain.contains(Vec3::new(0.5, 3.5, 5.5)));
        assert!(!domain.contains(Vec3::new(1.5, 3.5, 5.5)));
    }

    #[test]
    fn unbounded_region_accepts_everything() {
        let domain = ActiveDomain::new(unit_box(), [RegionBounds::unbounded(); 3]);
        assert!(domain.contains(Vec3::new(1e6, -1e6, 0.0)));
    }
}
