use std::env;
use std::error::Error;
use std::path::Path;

use log::info;

use midpointrule::configuration::{
    Configuration,
    DEFAULT_NAME
};
use midpointrule::manager::manager::IManager;

// usage: midpointrule [config.json] [preset]
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Configuration::new();
    if let Some(config_path) = args.first() {
        config.from_reader(Path::new(config_path))?;
        info!("loaded configuration from {}", config_path);
    }

    let preset_name = args.get(1).map(String::as_str).unwrap_or(DEFAULT_NAME);
    let request = config.preset_manager().get(preset_name)?;
    let ladder = config.default_ladder()?;
    let digits = config.display_digits();

    let report = request.compute(&ladder)?;
    let rounded = report.rounded(digits);

    let request = report.request();
    println!("f(x) = {}, [{}, {}], N = {}",
             request.expression(),
             request.a(),
             request.b(),
             request.n());
    println!("midpoint approximation: {}", rounded.approximation);
    match (rounded.exact, rounded.absolute_error) {
        (Some(exact), Some(error)) => println!("exact value: {}, absolute error: {}", exact, error),
        _ => println!("exact value: unavailable")
    }
    for (n, approximation) in rounded.series {
        println!("{}, {}", n, approximation);
    }
    Ok(())
}
