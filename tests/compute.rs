use std::path::Path;

use midpointrule::compute::computeerror::ComputeError;
use midpointrule::compute::computerequest::ComputeRequest;
use midpointrule::configuration::Configuration;
use midpointrule::expression::expressionerror::ExpressionError;
use midpointrule::integrand::integrand::IntegrandError;
use midpointrule::manager::manager::IManager;
use midpointrule::quadrature::convergence::ConvergenceLadder;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn default_request_end_to_end() {
    init_logger();
    let report = ComputeRequest::default()
        .compute(&ConvergenceLadder::default())
        .unwrap();
    let exact = report.exact().unwrap();
    assert!((exact - 4.0 / 3.0).abs() < 1e-14);
    assert!(report.absolute_error().unwrap() < 1e-4);
    assert_eq!(report.series().subdivisions(), vec![10, 20, 50, 100]);
    assert_eq!(report.series_errors().len(), 4);
}

#[test]
fn square_on_four_subintervals() {
    let report = ComputeRequest::new("x**2", 0.0, 1.0, 4)
        .compute(&ConvergenceLadder::default())
        .unwrap();
    assert_eq!(report.approximation(), 0.328125);
    assert_eq!(report.request(), &ComputeRequest::new("x**2", 0.0, 1.0, 4));
    assert!(report.series().is_empty());
    let rounded = report.rounded(6);
    assert_eq!(rounded.exact, Some(0.333333));
}

#[test]
fn missing_reference_does_not_fail_the_request() {
    let report = ComputeRequest::new("x*sin(x)", 0.0, 1.0, 50)
        .compute(&ConvergenceLadder::default())
        .unwrap();
    assert_eq!(report.exact(), None);
    assert_eq!(report.absolute_error(), None);
    assert!(report.series_errors().is_empty());
    let exact = 1.0_f64.sin() - 1.0_f64.cos();
    assert!((report.approximation() - exact).abs() < 1e-4);
}

#[test]
fn non_positive_n_is_not_an_error() {
    let report = ComputeRequest::new("1/x", -1.0, 1.0, 0)
        .compute(&ConvergenceLadder::default())
        .unwrap();
    assert_eq!(report.approximation(), 0.0);
    assert!(report.series().is_empty());
}

#[test]
fn invalid_expression() {
    let error = ComputeRequest::new("x + y", 0.0, 1.0, 10)
        .compute(&ConvergenceLadder::default())
        .unwrap_err();
    assert_eq!(
        error,
        ComputeError::InvalidExpression {
            source_text: "x + y".to_string(),
            error: ExpressionError::UnknownSymbol("y".to_string()),
        }
    );
}

#[test]
fn evaluation_failure() {
    let error = ComputeRequest::new("log(x)", -1.0, 1.0, 10)
        .compute(&ConvergenceLadder::default())
        .unwrap_err();
    assert!(matches!(
        error,
        ComputeError::Evaluation(IntegrandError::DomainError { .. })
    ));
}

#[test]
fn bundled_configuration_presets() {
    init_logger();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("json").join("config.json");
    let config = Configuration::new();
    config.from_reader(&path).unwrap();

    assert_eq!(
        config.preset_manager().names(),
        vec!["Default", "Gaussian", "Quadratic", "Reciprocal", "Sine"]
    );

    let ladder = config.default_ladder().unwrap();
    let sine = config.preset_manager().get("Sine").unwrap();
    let report = sine.compute(&ladder).unwrap();
    assert!((report.exact().unwrap() - 2.0).abs() < 1e-12);
    assert_eq!(report.series().subdivisions(), vec![10, 20, 50, 100, 200]);

    let doubling = config.ladder_manager().get("Doubling").unwrap();
    let reciprocal = config.preset_manager().get("Reciprocal").unwrap();
    let report = reciprocal.compute(&doubling).unwrap();
    assert!((report.exact().unwrap() - 1.0).abs() < 1e-12);
    for (_, order) in report.series().observed_orders(1.0) {
        assert!((order - 2.0).abs() < 0.1);
    }
}
