use super::*;
use crate::linalg::norm_l2;
use crate::DenseMatrix;

const ROOT: f64 = core::f64::consts::FRAC_1_SQRT_2;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

/// x^2 + y^2 = 1 and x = y.
fn circle_line() -> NonlinearSystem<f64> {
    NonlinearSystem::new()
        .with(|x: &[f64]| x[0] * x[0] + x[1] * x[1] - 1.0)
        .with(|x: &[f64]| x[0] - x[1])
}

fn tight() -> NewtonSettings<f64> {
    NewtonSettings {
        damping: 1.0,
        f_tol: 1e-10,
        x_tol: 1e-10,
        max_iter: 20,
    }
}

fn x0() -> DenseMatrix<f64> {
    DenseMatrix::column_vector(&[1.0, 1.0])
}

// ═══════════════════════════════════════════════════════════════════
// Newton
// ═══════════════════════════════════════════════════════════════════

#[test]
fn newton_circle_line() {
    let solver = NewtonSolver::new(circle_line(), tight());
    let mut trace = NewtonTrace::new();
    let r = solver.solve_with(&x0(), |it| trace.record(it)).unwrap();

    assert!(r.status.is_converged());
    assert_near(r.x[(0, 0)], ROOT, 1e-8, "newton x");
    assert_near(r.x[(1, 0)], ROOT, 1e-8, "newton y");
    assert!(r.residual_norm < 1e-10);
    assert_eq!(r.x.shape(), (2, 1));
    assert_eq!(trace.len(), r.iterations);

    // Ratio r_{k+1} / r_k shrinks every step near the root.
    let norms = trace.residual_norms();
    assert!(norms.len() >= 3);
    let ratios: alloc::vec::Vec<f64> = norms.windows(2).map(|w| w[1] / w[0]).collect();
    for w in ratios.windows(2) {
        assert!(w[1] < w[0], "ratios not decreasing: {:?}", ratios);
    }
    assert!(*ratios.last().unwrap() < 1e-2);
}

#[test]
fn newton_first_step_from_one_one() {
    // F(1,1) = (1, 0); J = [[2,2],[1,-1]] gives s = (-1/4, -1/4).
    let solver = NewtonSolver::new(circle_line(), tight());
    let mut first = None;
    solver
        .solve_with(&x0(), |it| {
            if it.iteration == 0 {
                first = Some(it.clone());
            }
        })
        .unwrap();
    let first = first.unwrap();
    assert_near(first.residual_norm, 1.0, 1e-15, "F(x0)");
    assert_near(first.x_next[(0, 0)], 0.75, 1e-7, "x1");
    assert_near(first.x_next[(1, 0)], 0.75, 1e-7, "y1");
}

#[test]
fn evaluation_counts_two_point() {
    let r = NewtonSolver::new(circle_line(), tight()).solve(&x0()).unwrap();
    assert_eq!(r.status, Status::Converged(Criterion::ResidualNorm));
    // one residual per loop pass plus n + 1 per Jacobian
    assert_eq!(r.j_evals, r.iterations);
    assert_eq!(r.f_evals, (r.iterations + 1) + 3 * r.iterations);
}

#[test]
fn already_converged_takes_no_step() {
    let x = DenseMatrix::row_vector(&[ROOT, ROOT]);
    let settings = NewtonSettings { f_tol: 1e-8, ..tight() };
    let r = NewtonSolver::new(circle_line(), settings).solve(&x).unwrap();
    assert_eq!(r.status, Status::Converged(Criterion::ResidualNorm));
    assert_eq!(r.iterations, 0);
    assert_eq!(r.j_evals, 0);
    assert_eq!(r.f_evals, 1);
    // row-vector input comes back as a column
    assert_eq!(r.x.shape(), (2, 1));
}

#[test]
fn three_point_3d() {
    // Root at (1, 1, 1).
    let system = NonlinearSystem::new()
        .with(|x: &[f64]| x[0] * x[0] + x[1] * x[1] + x[2] * x[2] - 3.0)
        .with(|x: &[f64]| x[0] * x[1] - 1.0)
        .with(|x: &[f64]| x[1] * x[2] - 1.0);
    let solver = NewtonSolver::new(system, NewtonSettings::default())
        .with_jacobian(JacobianSource::Numeric(FiniteDifference::ThreePoint));
    let r = solver
        .solve(&DenseMatrix::column_vector(&[1.2, 0.9, 1.1]))
        .unwrap();
    assert!(r.status.is_converged());
    for i in 0..3 {
        assert_near(r.x[(i, 0)], 1.0, 1e-8, "3d root");
    }
}

#[test]
fn newton_f32() {
    let system = NonlinearSystem::new()
        .with(|x: &[f32]| x[0] * x[0] + x[1] * x[1] - 1.0)
        .with(|x: &[f32]| x[0] - x[1]);
    let r = NewtonSolver::new(system, NewtonSettings::<f32>::default())
        .solve(&DenseMatrix::column_vector(&[1.0_f32, 1.0]))
        .unwrap();
    assert!(r.status.is_converged());
    assert!((r.x[(0, 0)] - core::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
}

// ═══════════════════════════════════════════════════════════════════
// Modified Newton
// ═══════════════════════════════════════════════════════════════════

#[test]
fn modified_newton_needs_more_iterations() {
    // Same x0 and tolerances, including max_iter = 20, for both methods.
    let newton = NewtonSolver::new(circle_line(), tight()).solve(&x0()).unwrap();
    let modified = NewtonSolver::new(circle_line(), tight())
        .with_method(Method::ModifiedNewton)
        .solve(&x0())
        .unwrap();

    assert!(newton.status.is_converged());
    assert!(modified.status.is_converged());
    assert!(modified.iterations <= 20);
    assert_near(modified.x[(0, 0)], ROOT, 1e-8, "modified x");
    assert_near(modified.x[(1, 0)], ROOT, 1e-8, "modified y");
    assert!(
        modified.iterations > newton.iterations,
        "modified {} vs newton {}",
        modified.iterations,
        newton.iterations
    );
    // Jacobian computed once, before the loop.
    assert_eq!(modified.j_evals, 1);
}

#[test]
fn modified_newton_linear_rate() {
    let settings = NewtonSettings { max_iter: 50, ..tight() };
    let mut trace = NewtonTrace::new();
    NewtonSolver::new(circle_line(), settings)
        .with_method(Method::ModifiedNewton)
        .solve_with(&x0(), |it| trace.record(it))
        .unwrap();
    // Error contracts by about 1 - 1/sqrt(2) per step on the diagonal.
    let norms = trace.residual_norms();
    let ratio = norms[6] / norms[5];
    assert_near(ratio, 1.0 - ROOT, 0.02, "contraction");
}

#[test]
fn max_iterations_is_not_an_error() {
    let settings = NewtonSettings { max_iter: 3, ..tight() };
    let r = NewtonSolver::new(circle_line(), settings)
        .with_method(Method::ModifiedNewton)
        .solve(&x0())
        .unwrap();
    assert_eq!(r.status, Status::MaxIterations);
    assert!(!r.status.is_converged());
    assert_eq!(r.iterations, 3);
    assert!(r.residual_norm > 1e-10);
    // final residual is evaluated at the returned point
    assert_near(
        r.residual_norm,
        norm_l2(&circle_line().evaluate(r.x.as_slice())),
        1e-15,
        "final residual",
    );
}

// ═══════════════════════════════════════════════════════════════════
// Manual Jacobian, damping
// ═══════════════════════════════════════════════════════════════════

#[test]
fn manual_jacobian_linear_system() {
    // F(x) = A x - b with A = [[3, 1], [1, 2]], b = [9, 8] -> x = (2, 3)
    let system = NonlinearSystem::new()
        .with(|x: &[f64]| 3.0 * x[0] + x[1] - 9.0)
        .with(|x: &[f64]| x[0] + 2.0 * x[1] - 8.0);
    let a = DenseMatrix::from_rows(&[[3.0, 1.0], [1.0, 2.0]]).unwrap();
    let r = NewtonSolver::new(system, NewtonSettings::default())
        .with_jacobian(JacobianSource::Manual(a))
        .solve(&DenseMatrix::column_vector(&[0.0, 0.0]))
        .unwrap();
    assert!(r.status.is_converged());
    assert_eq!(r.iterations, 1);
    assert_eq!(r.j_evals, 0);
    assert_near(r.x[(0, 0)], 2.0, 1e-12, "x");
    assert_near(r.x[(1, 0)], 3.0, 1e-12, "y");
}

#[test]
fn singular_jacobian_aborts() {
    let j = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
    let err = NewtonSolver::new(circle_line(), tight())
        .with_jacobian(JacobianSource::Manual(j))
        .solve(&x0())
        .unwrap_err();
    assert_eq!(
        err,
        NewtonError::Linalg(crate::MatrixError::Singular { column: 1 })
    );
}

#[test]
fn damping_half_step() {
    let settings = NewtonSettings {
        damping: 0.5,
        max_iter: 100,
        ..tight()
    };
    let mut trace = NewtonTrace::new();
    let r = NewtonSolver::new(circle_line(), settings)
        .solve_with(&x0(), |it| trace.record(it))
        .unwrap();
    assert!(r.status.is_converged());
    assert!(!trace.is_empty());
    for it in trace.records() {
        for i in 0..2 {
            let dx = it.x_next[(i, 0)] - it.x[(i, 0)];
            assert_eq!(it.x_next[(i, 0)], it.x[(i, 0)] + 0.5 * it.step[(i, 0)]);
            assert_near(dx, 0.5 * it.step[(i, 0)], 1e-15, "damped update");
        }
    }
    // consecutive records chain
    for w in trace.records().windows(2) {
        assert_eq!(w[0].x_next, w[1].x);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn rejects_bad_input() {
    let empty = NewtonSolver::new(NonlinearSystem::<f64>::new(), tight());
    assert_eq!(empty.solve(&x0()).unwrap_err(), NewtonError::EmptySystem);

    let solver = NewtonSolver::new(circle_line(), tight());
    assert!(matches!(
        solver.solve(&DenseMatrix::column_vector(&[1.0, 1.0, 1.0])),
        Err(NewtonError::DimensionMismatch { what: "initial guess", .. })
    ));
    assert!(matches!(
        solver.solve(&DenseMatrix::filled(2, 2, 1.0)),
        Err(NewtonError::DimensionMismatch { .. })
    ));

    let solver = NewtonSolver::new(circle_line(), tight())
        .with_jacobian(JacobianSource::Manual(DenseMatrix::new(3, 3)));
    assert_eq!(
        solver.solve(&x0()).unwrap_err(),
        NewtonError::DimensionMismatch {
            what: "manual Jacobian",
            expected: (2, 2),
            got: (3, 3)
        }
    );
}

#[test]
fn settings_validation() {
    let ok = tight();
    assert!(ok.validate().is_ok());
    for bad in [
        NewtonSettings { damping: 0.0, ..ok },
        NewtonSettings { damping: 1.5, ..ok },
        NewtonSettings { damping: f64::NAN, ..ok },
        NewtonSettings { f_tol: -1.0, ..ok },
        NewtonSettings { x_tol: f64::NAN, ..ok },
        NewtonSettings { max_iter: 0, ..ok },
    ] {
        assert!(matches!(
            bad.validate(),
            Err(NewtonError::InvalidSettings(_))
        ));
        assert!(NewtonSolver::new(circle_line(), bad).solve(&x0()).is_err());
    }
}

#[test]
fn non_finite_residual() {
    let system = NonlinearSystem::new().with(|x: &[f64]| x[0].ln());
    let err = NewtonSolver::new(system, tight())
        .solve(&DenseMatrix::column_vector(&[-1.0]))
        .unwrap_err();
    assert_eq!(err, NewtonError::NotFinite { iteration: 0 });
}

#[test]
fn trace_display_line() {
    let mut trace = NewtonTrace::new();
    NewtonSolver::new(circle_line(), tight())
        .solve_with(&x0(), |it| trace.record(it))
        .unwrap();
    let line = alloc::format!("{}", trace.records()[0]);
    assert!(line.starts_with("[newton] iter      0 | F"));
    assert!(line.contains("| lambda"));
    let all = alloc::format!("{trace}");
    assert_eq!(all.lines().count(), trace.len());
}
