#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use num_complex::Complex64;

    use crate::basis::{Basis, CorrelatedGaussian};
    use crate::driver::{find_best_addition, select_best, Candidate, Driver, DriverSettings};
    use crate::error::SvmError;
    use crate::io::{read_basis, read_config, write_basis};
    use crate::sampling::{SampleSpace, Strain, UniformWidth, WidthDistribution};
    use crate::solver::{Solver, SolverResults};
    use crate::system::{Interaction, Particle, ParticleSystem, ParticleType, System};

    fn boson_pair() -> Arc<ParticleSystem> {
        let particles = vec![
            Particle::new("a", 1.0, ParticleType::Boson, "x"),
            Particle::new("b", 1.0, ParticleType::Boson, "x"),
        ];
        let interactions = vec![("a".to_string(), "b".to_string(), Interaction::Gaussian { v0: -10.0, r0: 1.0 })];
        Arc::new(ParticleSystem::new(particles, interactions).unwrap())
    }

    fn uniform_space(seed: u64) -> SampleSpace {
        let mut space = SampleSpace::with_seed(0);
        let strain = Strain::new().with_distribution("a", "b", Box::new(UniformWidth::new(0.1, 5.0, Some(seed)).unwrap()));
        space.add_strain(strain, 1);
        space
    }

    fn pair_function(system: &ParticleSystem, width: f64) -> CorrelatedGaussian {
        let widths = DMatrix::from_row_slice(2, 2, &[0.0, width, width, 0.0]);
        CorrelatedGaussian::from_widths(widths, system)
    }

    fn driver(threads: usize, seed: u64) -> Driver<ParticleSystem> {
        let settings = DriverSettings::new().with_trial_size(5).with_num_threads(threads);
        Driver::new(Solver::new(boson_pair()), uniform_space(seed), settings).unwrap()
    }

    fn candidate(strain: usize, energy: f64) -> Candidate {
        let system = boson_pair();
        Candidate {
            function: pair_function(&system, 1.0).with_strain(strain),
            eigenvalue: Complex64::new(energy, 0.0),
            cache: SolverResults::default(),
        }
    }

    #[test]
    fn test_boson_pair_growth_lowers_energy() {
        let system = boson_pair();
        let start = vec![pair_function(&system, 1.0)];
        let baseline = Solver::new(system).solve(&start, 0.0).unwrap().eigenvalues[0];

        let mut driver = driver(1, 1).with_basis(start).unwrap();
        driver.generate_basis(1).unwrap();

        assert_eq!(driver.basis().len(), 2);
        assert_eq!(driver.convergence().len(), 1);
        assert!(driver.convergence()[0].re <= baseline.re + 1e-12);
        assert_eq!(driver.basis()[1].strain(), Some(0));
        assert_eq!(driver.cache().dimension(), 2);
        assert_eq!(driver.sample_space().history().len(), 1);
    }

    #[test]
    fn test_growth_is_deterministic() {
        let mut first = driver(1, 7);
        let mut second = driver(1, 7);
        first.generate_basis(3).unwrap();
        second.generate_basis(3).unwrap();

        assert_eq!(first.convergence(), second.convergence());
        for (a, b) in first.basis().iter().zip(second.basis().iter()) {
            assert_eq!(a.widths(), b.widths());
        }
    }

    #[test]
    fn test_accepted_energy_never_rises() {
        let mut driver = driver(2, 3);
        for _ in 0..4 {
            let before = driver.cache().eigenvalues.clone();
            driver.generate_basis(1).unwrap();
            let accepted = driver.convergence().last().unwrap();
            if let Some(previous) = before.get(driver.target_state()) {
                assert!(accepted.re <= previous.re + 1e-10);
            }
        }
        assert_eq!(driver.convergence().len(), 4);
    }

    #[test]
    fn test_duplicate_trial_is_rejected() {
        let system = boson_pair();
        let f = pair_function(&system, 1.3);
        let mut driver = driver(1, 1).with_basis(vec![f.clone()]).unwrap();
        assert_eq!(driver.cache().dimension(), 1);

        assert!(!driver.search_step(vec![vec![f]]));
        assert_eq!(driver.basis().len(), 1);
        assert!(driver.convergence().is_empty());
    }

    /// Replays fixed widths, repeating the last one once exhausted.
    struct ScriptedWidth {
        widths: Vec<f64>,
        next: usize,
    }

    impl WidthDistribution for ScriptedWidth {
        fn sample(&mut self) -> f64 {
            let w = self.widths[self.next.min(self.widths.len() - 1)];
            self.next += 1;
            w
        }
    }

    #[test]
    fn test_rejected_iteration_is_retried() {
        let system = boson_pair();
        let mut space = SampleSpace::with_seed(0);
        let scripted = ScriptedWidth { widths: vec![1.3, 2.0], next: 0 };
        space.add_strain(Strain::new().with_distribution("a", "b", Box::new(scripted)), 1);
        let settings = DriverSettings::new().with_trial_size(1);
        let mut driver = Driver::new(Solver::new(system.clone()), space, settings)
            .unwrap()
            .with_basis(vec![pair_function(&system, 1.3)])
            .unwrap();

        driver.generate_basis(1).unwrap();

        assert_eq!(driver.basis().len(), 2);
        assert_eq!(driver.convergence().len(), 1);
        assert_eq!(driver.basis()[1].widths()[(0, 1)], 2.0);
        assert_eq!(driver.sample_space().history().len(), 1);
    }

    #[test]
    fn test_high_singularity_limit_rejects_everything() {
        let system = boson_pair();
        let solver = Solver::new(system.clone());
        let basis = vec![pair_function(&system, 1.0), pair_function(&system, 2.0)];
        let cache = solver.solve(&basis, 0.0).unwrap();
        let mut space = uniform_space(5);
        let trials: Basis = (0..4).map(|_| space.gen_matrix(None, system.as_ref()).unwrap()).collect();

        assert!(find_best_addition(&solver, &basis, trials.clone(), cache.clone(), 0, 0.0, 1e6).is_none());
        let best = find_best_addition(&solver, &basis, trials, cache, 0, 0.0, 5e-14).unwrap();
        assert_eq!(best.cache.dimension(), 3);
    }

    #[test]
    fn test_select_best_prefers_later_on_ties() {
        let best = select_best(vec![None, Some(candidate(1, -1.0)), Some(candidate(2, -1.0)), Some(candidate(3, -0.5))]);
        assert_eq!(best.unwrap().function.strain(), Some(2));

        let best = select_best(vec![Some(candidate(1, -2.0)), Some(candidate(2, -1.0))]);
        assert_eq!(best.unwrap().function.strain(), Some(1));

        assert!(select_best(vec![None, None]).is_none());
    }

    #[test]
    fn test_target_advances_past_bound_root() {
        let system = boson_pair();
        let start = vec![pair_function(&system, 0.8), pair_function(&system, 1.7)];
        let ground = Solver::new(system).solve(&start, 0.0).unwrap().eigenvalues[0];
        assert!(ground.re < -0.02);

        let mut driver = driver(1, 11).with_basis(start).unwrap();
        driver.generate_basis(1).unwrap();
        assert_eq!(driver.target_state(), 1);
        assert_eq!(driver.basis().len(), 3);
    }

    #[test]
    fn test_sweep_order_and_thread_independence() {
        let system = boson_pair();
        let basis: Basis = [0.6, 1.1, 2.3].iter().map(|&w| pair_function(&system, w)).collect();
        let serial = driver(1, 1).with_basis(basis.clone()).unwrap();
        let parallel = driver(2, 1).with_basis(basis.clone()).unwrap();

        let a = serial.sweep_angle(5, 0.05).unwrap();
        let b = parallel.sweep_angle(5, 0.05).unwrap();
        assert_eq!(a.len(), 5);
        for (i, ((ta, ra), (tb, rb))) in a.iter().zip(b.iter()).enumerate() {
            assert_relative_eq!(*ta, 0.05 * i as f64);
            assert_relative_eq!(*ta, *tb);
            assert_eq!(ra.eigenvalues.len(), 3);
            for (x, y) in ra.eigenvalues.iter().zip(rb.eigenvalues.iter()) {
                assert!((x - y).norm() < 1e-10);
            }
        }

        let direct = Solver::new(system).solve(&basis, 0.0).unwrap();
        for (x, y) in a[0].1.eigenvalues.iter().zip(direct.eigenvalues.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_missing_distribution_is_fatal() {
        let mut space = SampleSpace::with_seed(0);
        space.add_strain(Strain::new(), 1);
        let settings = DriverSettings::new().with_trial_size(2);
        let mut driver = Driver::new(Solver::new(boson_pair()), space, settings).unwrap();
        assert!(matches!(driver.generate_basis(1), Err(SvmError::MissingDistribution { .. })));
    }

    #[test]
    fn test_invalid_driver_settings() {
        let settings = DriverSettings::new().with_num_threads(0);
        assert!(matches!(
            Driver::new(Solver::new(boson_pair()), uniform_space(1), settings),
            Err(SvmError::InvalidConfig(_))
        ));

        let three = Particle::new("c", 1.0, ParticleType::Distinguishable, "c");
        let other = Arc::new(
            ParticleSystem::new(vec![Particle::new("a", 1.0, ParticleType::Boson, "x"), Particle::new("b", 1.0, ParticleType::Boson, "x"), three], vec![])
                .unwrap(),
        );
        let wrong = vec![pair_function(&boson_pair(), 1.0)];
        let driver = Driver::new(Solver::new(other), SampleSpace::new(), DriverSettings::new()).unwrap();
        assert!(driver.with_basis(wrong).is_err());
    }

    #[test]
    fn test_grown_basis_survives_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basis.json");
        let mut grown = driver(1, 2);
        grown.generate_basis(3).unwrap();
        write_basis(&path, grown.basis()).unwrap();

        let loaded = read_basis(&path).unwrap();
        let solver = Solver::new(boson_pair());
        let before = solver.solve(grown.basis(), 0.0).unwrap();
        let after = solver.solve(&loaded, 0.0).unwrap();
        for (x, y) in before.eigenvalues.iter().zip(after.eigenvalues.iter()) {
            assert_relative_eq!(x.re, y.re, epsilon = 1e-8, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_run_from_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yml");
        std::fs::write(
            &path,
            r#"
particles:
  - { name: a, mass: 1.0, kind: boson, identicality: x }
  - { name: b, mass: 1.0, kind: boson, identicality: x }
interactions:
  - { pair: [a, b], kind: gaussian, v0: -10.0, r0: 1.0 }
strains:
  - frequency: 1
    widths:
      - { pair: [a, b], distribution: uniform, min: 0.1, max: 5.0, seed: 4 }
driver: { trial_size: 4, num_threads: 2 }
run: { basis_size: 2 }
"#,
        )
        .unwrap();

        let config = read_config(path.to_str().unwrap()).unwrap();
        let system = Arc::new(config.build_system().unwrap());
        assert_eq!(system.num_particles(), 2);
        let mut driver = Driver::new(Solver::new(system), config.build_sample_space().unwrap(), config.driver.clone()).unwrap();
        driver.generate_basis(config.run.basis_size).unwrap();
        assert_eq!(driver.basis().len(), 2);
        assert_eq!(driver.convergence().len(), 2);
        assert!(driver.cache().eigenvalues[0].re < 0.0);
    }
}
